//! REST API client for the storefront backend.
//!
//! # Architecture
//!
//! - JSON over HTTP with `reqwest` 0.13
//! - One [`ApiClient`] per process, cheap to clone (`Arc` inside)
//! - Catalog reads cached in memory via `moka`; admin product changes
//!   invalidate the cache
//! - The caller passes the session token; calls without one send no
//!   `Authorization` header
//!
//! Endpoint methods live next to their resource: [`products`], `auth`,
//! `orders` and `admin`. Image upload to the external host is in [`upload`].

mod admin;
mod auth;
mod cache;
mod orders;
pub mod products;
pub mod types;
pub mod upload;

pub use products::ProductQuery;
pub use types::*;
pub use upload::{ImageFile, UploadClient};

use std::sync::Arc;

use moka::future::Cache;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::StorefrontConfig;
use crate::store::AuthToken;

use cache::{CacheKey, CacheValue};

/// Shown when an error response carries no message of its own.
const FALLBACK_MESSAGE: &str = "An error occurred";

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The session token contains characters not allowed in a header.
    #[error("Token cannot be sent in a header")]
    InvalidToken,
}

impl ApiError {
    /// HTTP status of an error response, if the server sent one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.clone(),
                cache,
            }),
        })
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build the URL for a path under the base URL.
    ///
    /// Segments are percent-encoded, so ids cannot escape their position.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request, attaching the bearer token when there is one.
    fn request(
        &self,
        method: Method,
        url: Url,
        token: Option<&AuthToken>,
    ) -> Result<RequestBuilder, ApiError> {
        let mut builder = self
            .inner
            .client
            .request(method, url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = token {
            let value = HeaderValue::from_str(&token.bearer())
                .map_err(|_| ApiError::InvalidToken)?;
            builder = builder.header(AUTHORIZATION, value);
        }

        Ok(builder)
    }

    /// Send a request and decode the JSON body.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let text = self.send_raw(builder).await?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&text, 500),
                "Failed to parse storefront API response"
            );
            ApiError::Parse(e.to_string())
        })
    }

    /// Send a request and return the body of a successful response.
    async fn send_raw(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %truncate(&text, 500),
                "Storefront API returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        Ok(text)
    }

    /// Drop every cached catalog response.
    pub fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
        tracing::debug!("Catalog cache invalidated");
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{ "message": ... }` and `{ "error": { "message": ... } }`;
/// anything else yields a generic message.
pub(crate) fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return FALLBACK_MESSAGE.to_string();
    };

    value
        .get("message")
        .or_else(|| value.get("error").and_then(|e| e.get("message")))
        .or_else(|| value.get("error").filter(|e| e.is_string()))
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map_or_else(|| FALLBACK_MESSAGE.to_string(), str::to_string)
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
