//! The file-backed store across restarts.

use axum::http::Method;

use atelier_core::{CartItem, Price, ProductId, WishlistEntry};
use atelier_integration_tests::{ScratchDir, StubApi, StubRoute, auth_json};
use atelier_storefront::flows::account;
use atelier_storefront::store::{CartStore, FileStorage};

fn open(dir: &ScratchDir) -> CartStore<FileStorage> {
    CartStore::open(FileStorage::open(dir.path()).expect("Data dir should open"))
}

#[test]
fn test_cart_and_wishlist_survive_reopen() {
    let dir = ScratchDir::new();
    {
        let mut store = open(&dir);
        store.add_to_cart(
            CartItem::new(ProductId::new("p1"), "Tee", Price::from_cents(1999), "M").with_quantity(2),
        );
        store.add_to_cart(CartItem::new(ProductId::new("p2"), "Cap", Price::from_cents(900), "L"));
        store.add_to_wishlist(WishlistEntry {
            product_id: ProductId::new("p3"),
            title: "Scarf".to_string(),
            price: Price::from_cents(2500),
            image: None,
        });
    }

    let store = open(&dir);
    let lines = store.cart().lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].product_id, ProductId::new("p1"));
    assert_eq!(lines[0].quantity, 2);
    assert_eq!(lines[1].product_id, ProductId::new("p2"));
    assert_eq!(store.cart_total(), Price::from_cents(4898));
    assert!(store.is_wishlisted(&ProductId::new("p3")));
}

#[test]
fn test_corrupt_records_load_empty() {
    let dir = ScratchDir::new();
    std::fs::create_dir_all(dir.path()).expect("Scratch dir should be created");
    std::fs::write(dir.path().join("cart.json"), "{not json").expect("write cart");
    std::fs::write(dir.path().join("wishlist.json"), "42").expect("write wishlist");

    let store = open(&dir);
    assert!(store.cart().is_empty());
    assert!(store.wishlist().is_empty());
}

#[test]
fn test_token_without_user_is_no_session() {
    let dir = ScratchDir::new();
    std::fs::create_dir_all(dir.path()).expect("Scratch dir should be created");
    std::fs::write(dir.path().join("token.json"), "tok-orphan").expect("write token");

    let store = open(&dir);
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_login_survives_restart_and_logout_clears_it() {
    let stub = StubApi::start(vec![StubRoute::post("auth/login", auth_json("tok-abc", true))]).await;
    let state = StubApi::app_state(stub.config());
    let dir = ScratchDir::new();

    {
        let mut store = open(&dir);
        account::login(&state, &mut store, "ada@example.com", "secret")
            .await
            .expect("Login should succeed");
    }
    assert_eq!(stub.requests_to(&Method::POST, "/auth/login").len(), 1);

    let mut store = open(&dir);
    let session = store.session().expect("Session should be restored");
    assert_eq!(session.user().email.as_str(), "ada@example.com");
    assert_eq!(session.token().expose(), "tok-abc");
    assert!(store.is_admin());

    account::logout(&mut store);
    assert!(!dir.path().join("user.json").exists());
    assert!(!dir.path().join("token.json").exists());
    assert!(!open(&dir).is_authenticated());
}

#[test]
fn test_clear_cart_removes_record() {
    let dir = ScratchDir::new();
    let mut store = open(&dir);
    store.add_to_cart(CartItem::new(ProductId::new("p1"), "Tee", Price::from_cents(1999), "M"));
    assert!(dir.path().join("cart.json").exists());

    store.clear_cart();
    assert!(!dir.path().join("cart.json").exists());
    assert!(open(&dir).cart().is_empty());
}
