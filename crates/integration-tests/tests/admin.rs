//! Admin dashboard operations: access checks, product creation with image
//! upload, and order management.

use axum::http::{Method, StatusCode};
use serde_json::json;

use atelier_core::{CurrentUser, Email, OrderId, OrderStatus, ProductId, UserId};
use atelier_integration_tests::{
    StubApi, StubRoute, assert_price, memory_store, order_json, product_json,
};
use atelier_storefront::api::{ImageFile, ProductQuery};
use atelier_storefront::error::AppError;
use atelier_storefront::flows::admin::{self, ProductForm};
use atelier_storefront::flows::catalog;
use atelier_storefront::store::{AuthToken, CartStore, MemoryStorage};

fn session_store(is_admin: bool) -> CartStore<MemoryStorage> {
    let mut store = memory_store();
    let user = CurrentUser {
        id: UserId::new("staff-1"),
        email: Email::parse("staff@example.com").expect("valid email"),
        first_name: "Sam".to_string(),
        last_name: "Staff".to_string(),
        is_admin,
    };
    store.set_user(user, AuthToken::new("tok-admin"));
    store
}

fn product_form() -> ProductForm {
    ProductForm {
        title: "Linen Shirt".to_string(),
        description: "Breathable".to_string(),
        price: "49.99".to_string(),
        stock: "12".to_string(),
        ..ProductForm::default()
    }
}

#[tokio::test]
async fn test_non_admin_is_refused_before_any_request() {
    let stub = StubApi::start(vec![StubRoute::get("admin/orders", json!([]))]).await;
    let state = StubApi::app_state(stub.config());

    let err = admin::list_orders(&state, &session_store(false))
        .await
        .expect_err("Customers cannot list every order");
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = admin::list_users(&state, &memory_store())
        .await
        .expect_err("Guests cannot list users");
    assert!(matches!(err, AppError::Unauthorized(_)));

    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_dashboard_products_load_without_token() {
    let stub = StubApi::start(vec![StubRoute::get(
        "products",
        json!({ "products": [product_json("p1", "Tee", 19.99)], "total": 1 }),
    )])
    .await;
    let state = StubApi::app_state(stub.config());

    let page = admin::list_products(&state)
        .await
        .expect("Catalog listing is public");
    assert_eq!(page.products.len(), 1);

    let request = &stub.requests_to(&Method::GET, "/products")[0];
    assert_eq!(request.authorization, None);
    assert_eq!(request.query_param("limit").as_deref(), Some("100"));
}

#[tokio::test]
async fn test_admin_lists_orders_and_users() {
    let stub = StubApi::start(vec![
        StubRoute::get(
            "admin/orders",
            json!([{
                "_id": "o1",
                "user": { "_id": "user-1", "email": "ada@example.com", "firstName": "Ada", "lastName": "Lovelace" },
                "items": [{ "product": "p1", "title": "Tee", "price": 10, "quantity": 3, "size": "M" }],
                "totalPrice": 30,
                "orderStatus": "shipped",
            }]),
        ),
        StubRoute::get(
            "admin/users",
            json!([{ "_id": "user-1", "email": "ada@example.com", "isAdmin": false }]),
        ),
    ])
    .await;
    let state = StubApi::app_state(stub.config());
    let store = session_store(true);

    let orders = admin::list_orders(&state, &store).await.expect("Orders should load");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order_status, OrderStatus::Shipped);
    assert_eq!(orders[0].item_count(), 3);
    assert_eq!(
        orders[0].customer().map(|c| c.full_name()).as_deref(),
        Some("Ada Lovelace")
    );

    let users = admin::list_users(&state, &store).await.expect("Users should load");
    assert_eq!(users[0].email, "ada@example.com");

    for request in stub.requests() {
        assert_eq!(request.authorization.as_deref(), Some("Bearer tok-admin"));
    }
}

#[tokio::test]
async fn test_admin_updates_order_status() {
    let stub = StubApi::start(vec![StubRoute::put(
        "admin/orders/o1/status",
        order_json("o1", 30.0, "delivered"),
    )])
    .await;
    let state = StubApi::app_state(stub.config());

    let order = admin::update_order_status(
        &state,
        &session_store(true),
        &OrderId::new("o1"),
        OrderStatus::Delivered,
    )
    .await
    .expect("Status should update");

    assert_eq!(order.order_status, OrderStatus::Delivered);
    let request = &stub.requests_to(&Method::PUT, "/admin/orders/o1/status")[0];
    assert_eq!(request.json(), json!({ "orderStatus": "delivered" }));
}

#[tokio::test]
async fn test_create_product_without_image_uses_placeholder() {
    let stub = StubApi::start(vec![StubRoute::post(
        "admin/products",
        json!({ "product": product_json("p9", "Linen Shirt", 49.99) }),
    )])
    .await;
    let state = StubApi::app_state(stub.config());

    let created = admin::create_product(&state, &session_store(true), &product_form(), None)
        .await
        .expect("Product should be created");
    assert_eq!(created.expect("Product echoed back").id, ProductId::new("p9"));

    let body = stub.requests_to(&Method::POST, "/admin/products")[0].json();
    assert_eq!(body["title"], "Linen Shirt");
    assert_price(&body["price"], 49.99);
    assert_eq!(body["stock"], 12);
    assert_eq!(body["sizes"], json!(["XS", "S", "M", "L", "XL"]));
    assert_eq!(body["images"][0]["secure_url"], "/placeholder.svg");
}

#[tokio::test]
async fn test_create_product_uploads_image_first() {
    let stub = StubApi::start(vec![
        StubRoute::post(
            "upload",
            json!({ "secure_url": "https://img.example/uploaded/shirt.jpg" }),
        ),
        StubRoute::post("admin/products", product_json("p9", "Linen Shirt", 49.99)),
    ])
    .await;
    let state = StubApi::app_state(stub.config_with_upload());
    let image = ImageFile {
        file_name: "shirt.jpg".to_string(),
        bytes: b"not really a jpeg".to_vec(),
    };

    admin::create_product(&state, &session_store(true), &product_form(), Some(image))
        .await
        .expect("Product should be created");

    let requests = stub.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/upload");
    assert_eq!(requests[0].authorization, None);
    assert!(requests[0].body.contains("test-preset"));
    assert!(requests[0].body.contains("shirt.jpg"));

    let body = requests[1].json();
    assert_eq!(
        body["images"][0]["secure_url"],
        "https://img.example/uploaded/shirt.jpg"
    );
}

#[tokio::test]
async fn test_create_product_rejects_image_without_upload() {
    let stub = StubApi::start(vec![]).await;
    let state = StubApi::app_state(stub.config());
    let image = ImageFile {
        file_name: "shirt.jpg".to_string(),
        bytes: vec![1, 2, 3],
    };

    let err = admin::create_product(&state, &session_store(true), &product_form(), Some(image))
        .await
        .expect_err("Upload is not configured");

    assert!(matches!(err, AppError::UploadUnavailable));
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_invalid_form_skips_upload() {
    let stub = StubApi::start(vec![]).await;
    let state = StubApi::app_state(stub.config_with_upload());
    let mut form = product_form();
    form.price = "cheap".to_string();
    let image = ImageFile {
        file_name: "shirt.jpg".to_string(),
        bytes: vec![1, 2, 3],
    };

    let err = admin::create_product(&state, &session_store(true), &form, Some(image))
        .await
        .expect_err("Price is invalid");

    assert!(matches!(err, AppError::Validation(_)));
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_failed_upload_reports_host_message() {
    let stub = StubApi::start(vec![
        StubRoute::post("upload", json!({ "error": { "message": "Invalid upload preset" } }))
            .with_status(StatusCode::BAD_REQUEST),
    ])
    .await;
    let state = StubApi::app_state(stub.config_with_upload());
    let image = ImageFile {
        file_name: "shirt.jpg".to_string(),
        bytes: vec![1, 2, 3],
    };

    let err = admin::create_product(&state, &session_store(true), &product_form(), Some(image))
        .await
        .expect_err("Upload should fail");

    assert_eq!(err.user_message(), "Invalid upload preset");
    assert!(stub.requests_to(&Method::POST, "/admin/products").is_empty());
}

#[tokio::test]
async fn test_delete_product_invalidates_catalog_cache() {
    let stub = StubApi::start(vec![
        StubRoute::get(
            "products",
            json!({ "products": [product_json("p1", "Tee", 19.99)] }),
        ),
        StubRoute::delete("admin/products/p1", json!({ "message": "Product deleted" })),
    ])
    .await;
    let state = StubApi::app_state(stub.config());
    let store = session_store(true);
    let query = ProductQuery::new();

    catalog::browse(&state, &query).await.expect("Catalog should load");
    catalog::browse(&state, &query).await.expect("Catalog should load");
    assert_eq!(stub.requests_to(&Method::GET, "/products").len(), 1);

    admin::delete_product(&state, &store, &ProductId::new("p1"))
        .await
        .expect("Product should be deleted");
    catalog::browse(&state, &query).await.expect("Catalog should load");
    assert_eq!(stub.requests_to(&Method::GET, "/products").len(), 2);
}
