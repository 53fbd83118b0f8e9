//! REST client behavior against a stub API: auth headers, query strings,
//! error messages and the catalog cache.

use axum::http::{Method, StatusCode};
use serde_json::json;

use atelier_core::{Price, ProductId};
use atelier_integration_tests::{StubApi, StubRoute, auth_json, memory_store, product_json};
use atelier_storefront::api::ProductQuery;
use atelier_storefront::error::AppError;
use atelier_storefront::flows::{account, catalog};

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
async fn test_catalog_requests_carry_no_bearer() {
    let stub = StubApi::start(vec![StubRoute::get(
        "products",
        json!({ "products": [product_json("p1", "Tee", 19.99)] }),
    )])
    .await;
    let state = StubApi::app_state(stub.config());

    catalog::browse(&state, &ProductQuery::new())
        .await
        .expect("Catalog should load");

    let requests = stub.requests_to(&Method::GET, "/products");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization, None);
}

#[tokio::test]
async fn test_session_requests_carry_bearer() {
    let stub = StubApi::start(vec![
        StubRoute::post("auth/login", auth_json("tok-abc", false)),
        StubRoute::get("orders/my-orders", json!([])),
    ])
    .await;
    let state = StubApi::app_state(stub.config());
    let mut store = memory_store();

    account::login(&state, &mut store, "ada@example.com", "secret")
        .await
        .expect("Login should succeed");
    let orders = account::my_orders(&state, &store)
        .await
        .expect("Orders should load");
    assert!(orders.is_empty());

    let login = &stub.requests_to(&Method::POST, "/auth/login")[0];
    assert_eq!(login.authorization, None);
    assert_eq!(login.json()["email"], "ada@example.com");
    assert_eq!(login.json()["password"], "secret");

    let mine = &stub.requests_to(&Method::GET, "/orders/my-orders")[0];
    assert_eq!(mine.authorization.as_deref(), Some("Bearer tok-abc"));
}

#[tokio::test]
async fn test_my_orders_without_session_sends_nothing() {
    let stub = StubApi::start(vec![]).await;
    let state = StubApi::app_state(stub.config());

    let err = account::my_orders(&state, &memory_store())
        .await
        .expect_err("Orders should need a session");

    assert!(matches!(err, AppError::Unauthorized(_)));
    assert!(stub.requests().is_empty());
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_login_failure_shows_server_message() {
    let stub = StubApi::start(vec![
        StubRoute::post("auth/login", json!({ "message": "Invalid credentials" }))
            .with_status(StatusCode::UNAUTHORIZED),
    ])
    .await;
    let state = StubApi::app_state(stub.config());
    let mut store = memory_store();

    let err = account::login(&state, &mut store, "ada@example.com", "wrong")
        .await
        .expect_err("Login should fail");

    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(!err.is_internal());
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_server_error_without_message_uses_fallback() {
    let stub = StubApi::start(vec![
        StubRoute::get("products/p1", json!({})).with_status(StatusCode::INTERNAL_SERVER_ERROR),
    ])
    .await;
    let state = StubApi::app_state(stub.config());

    let err = catalog::product_detail(&state, &ProductId::new("p1"))
        .await
        .expect_err("Product should fail to load");

    assert_eq!(err.user_message(), "An error occurred");
    assert!(err.is_internal());
}

#[tokio::test]
async fn test_unreachable_api_reports_network_error() {
    let stub = StubApi::start(vec![]).await;
    // Nothing listens on port 9 of the loopback interface
    let config = stub
        .config()
        .with_api_url("http://127.0.0.1:9/api")
        .expect("URL should be valid");
    let state = StubApi::app_state(config);

    let err = catalog::browse(&state, &ProductQuery::new())
        .await
        .expect_err("Request should fail");

    assert_eq!(
        err.user_message(),
        "Could not reach the store. Please try again."
    );
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_product_filters_become_query_params() {
    let stub = StubApi::start(vec![StubRoute::get(
        "products",
        json!({ "products": [], "totalPages": 0, "currentPage": 2, "total": 0 }),
    )])
    .await;
    let state = StubApi::app_state(stub.config());

    let query = ProductQuery::new()
        .category("mens")
        .size("M")
        .min_price(Price::from_cents(1000))
        .max_price(Price::from_cents(5000))
        .search("linen shirt")
        .page(2);
    let page = catalog::browse(&state, &query)
        .await
        .expect("Catalog should load");
    assert_eq!(page.current_page, Some(2));

    let request = &stub.requests_to(&Method::GET, "/products")[0];
    assert_eq!(request.query_param("category").as_deref(), Some("mens"));
    assert_eq!(request.query_param("size").as_deref(), Some("M"));
    assert_eq!(request.query_param("minPrice").as_deref(), Some("10.00"));
    assert_eq!(request.query_param("maxPrice").as_deref(), Some("50.00"));
    assert_eq!(request.query_param("search").as_deref(), Some("linen shirt"));
    assert_eq!(request.query_param("page").as_deref(), Some("2"));
    assert_eq!(request.query_param("gender"), None);
}

#[tokio::test]
async fn test_product_detail_is_cached() {
    let stub = StubApi::start(vec![StubRoute::get(
        "products/p1",
        product_json("p1", "Linen Shirt", 49.99),
    )])
    .await;
    let state = StubApi::app_state(stub.config());
    let id = ProductId::new("p1");

    let first = catalog::product_detail(&state, &id).await.expect("Product should load");
    let second = catalog::product_detail(&state, &id).await.expect("Product should load");

    assert_eq!(first, second);
    assert_eq!(first.price, Price::from_cents(4999));
    assert_eq!(stub.requests_to(&Method::GET, "/products/p1").len(), 1);
}

#[tokio::test]
async fn test_product_id_is_path_encoded() {
    let stub = StubApi::start(vec![]).await;
    let state = StubApi::app_state(stub.config());

    let _ = catalog::product_detail(&state, &ProductId::new("a/b")).await;

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/products/a%2Fb");
}

#[tokio::test]
async fn test_add_fetched_product_to_cart() {
    let stub = StubApi::start(vec![StubRoute::get(
        "products/p1",
        product_json("p1", "Linen Shirt", 49.99),
    )])
    .await;
    let state = StubApi::app_state(stub.config());
    let mut store = memory_store();

    let product = catalog::product_detail(&state, &ProductId::new("p1"))
        .await
        .expect("Product should load");
    catalog::add_to_cart(&mut store, &product, "m", 2).expect("Size M is offered");

    let line = &store.cart().lines()[0];
    assert_eq!(line.size, "M");
    assert_eq!(line.image_ref.as_deref(), Some("https://img.example/p1.jpg"));
    assert_eq!(store.cart_total(), Price::from_cents(9998));
}
