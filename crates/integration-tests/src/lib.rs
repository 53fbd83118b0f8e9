//! Integration tests for the Atelier storefront client.
//!
//! The tests drive the real API client and flows against [`StubApi`], an
//! in-process HTTP server that answers canned JSON and records every request
//! it receives. Nothing outside the test process is contacted.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p atelier-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use atelier_storefront::config::{StorefrontConfig, UploadConfig};
use atelier_storefront::state::AppState;
use atelier_storefront::store::{CartStore, MemoryStorage};

/// Prefix every stub route is served under.
const API_PREFIX: &str = "/api";

/// A canned response for one method and path.
#[derive(Debug, Clone)]
pub struct StubRoute {
    method: Method,
    path: String,
    status: StatusCode,
    body: Value,
}

impl StubRoute {
    fn new(method: Method, path: &str, body: Value) -> Self {
        Self {
            method,
            path: format!("/{}", path.trim_start_matches('/')),
            status: StatusCode::OK,
            body,
        }
    }

    #[must_use]
    pub fn get(path: &str, body: Value) -> Self {
        Self::new(Method::GET, path, body)
    }

    #[must_use]
    pub fn post(path: &str, body: Value) -> Self {
        Self::new(Method::POST, path, body)
    }

    #[must_use]
    pub fn put(path: &str, body: Value) -> Self {
        Self::new(Method::PUT, path, body)
    }

    #[must_use]
    pub fn delete(path: &str, body: Value) -> Self {
        Self::new(Method::DELETE, path, body)
    }

    /// Answer with `status` instead of 200.
    #[must_use]
    pub const fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

/// A request as the stub received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path relative to the API prefix, e.g. `/products/abc`
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// The body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("Request body should be JSON")
    }

    /// Value of a query parameter, if sent.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

struct StubState {
    routes: Vec<StubRoute>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process stand-in for the storefront API.
pub struct StubApi {
    base_url: String,
    state: Arc<StubState>,
}

impl StubApi {
    /// Start serving `routes` on an ephemeral local port.
    ///
    /// Requests that match no route get a 404 with a JSON message.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(routes: Vec<StubRoute>) -> Self {
        let state = Arc::new(StubState {
            routes,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub API listener");
        let addr = listener
            .local_addr()
            .expect("Stub API listener has no address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Stub API server failed");
        });

        Self {
            base_url: format!("http://{addr}{API_PREFIX}"),
            state,
        }
    }

    /// Base URL to configure the client with.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Everything received so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if a handler panicked while holding the log.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("Request log poisoned")
            .clone()
    }

    /// Requests received for `method` and `path`.
    #[must_use]
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == *method && request.path == path)
            .collect()
    }

    /// Client configuration pointing at this stub.
    ///
    /// # Panics
    ///
    /// Panics if the base URL is rejected.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig::default()
            .with_api_url(&self.base_url)
            .expect("Stub base URL should be valid")
    }

    /// Configuration that also uploads images to this stub's `/upload` route.
    ///
    /// # Panics
    ///
    /// Panics if the upload URL is rejected.
    #[must_use]
    pub fn config_with_upload(&self) -> StorefrontConfig {
        let url = url::Url::parse(&format!("{}/upload", self.base_url))
            .expect("Stub upload URL should be valid");
        StorefrontConfig {
            upload: Some(UploadConfig {
                url,
                preset: secrecy::SecretString::from("test-preset"),
            }),
            ..self.config()
        }
    }

    /// Application state for `config`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn app_state(config: StorefrontConfig) -> AppState {
        AppState::new(config).expect("Failed to build app state")
    }
}

async fn handle(
    State(stub): State<Arc<StubState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or_else(|| uri.path())
        .to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    if let Ok(mut requests) = stub.requests.lock() {
        requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            query: uri.query().map(str::to_string),
            authorization,
            body,
        });
    }

    stub.routes
        .iter()
        .find(|route| route.method == method && route.path == path)
        .map_or_else(
            || {
                (
                    StatusCode::NOT_FOUND,
                    axum::Json(json!({ "message": format!("No route for {method} {path}") })),
                )
                    .into_response()
            },
            |route| (route.status, axum::Json(route.body.clone())).into_response(),
        )
}

// ============================================================================
// Fixtures
// ============================================================================

/// A product record as the API returns it.
#[must_use]
pub fn product_json(id: &str, title: &str, price: f64) -> Value {
    json!({
        "_id": id,
        "title": title,
        "description": "Soft and breathable.",
        "price": price,
        "category": "mens",
        "gender": "male",
        "sizes": ["S", "M", "L"],
        "stock": 10,
        "images": [{ "secure_url": format!("https://img.example/{id}.jpg") }],
    })
}

/// A login/signup response.
#[must_use]
pub fn auth_json(token: &str, is_admin: bool) -> Value {
    json!({
        "user": {
            "_id": "user-1",
            "email": "ada@example.com",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "isAdmin": is_admin,
        },
        "token": token,
    })
}

/// A placed order record.
#[must_use]
pub fn order_json(id: &str, total: f64, status: &str) -> Value {
    json!({
        "_id": id,
        "user": "user-1",
        "items": [],
        "totalPrice": total,
        "orderStatus": status,
        "paymentStatus": "pending",
        "createdAt": "2024-05-01T12:00:00Z",
    })
}

/// Assert that `value` is a JSON number equal to `expected`.
///
/// # Panics
///
/// Panics if `value` is not a number or differs from `expected`.
pub fn assert_price(value: &Value, expected: f64) {
    let amount = value
        .as_f64()
        .unwrap_or_else(|| panic!("Price should be a JSON number, got {value}"));
    assert!(
        (amount - expected).abs() < 1e-9,
        "Price {amount} should be {expected}"
    );
}

/// A store with nothing persisted.
#[must_use]
pub fn memory_store() -> CartStore<MemoryStorage> {
    CartStore::open(MemoryStorage::new())
}

/// A scratch directory removed on drop.
pub struct ScratchDir(PathBuf);

impl ScratchDir {
    #[must_use]
    pub fn new() -> Self {
        Self(std::env::temp_dir().join(format!("atelier-it-{}", uuid::Uuid::new_v4())))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Default for ScratchDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}
