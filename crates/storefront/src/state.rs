//! Application state shared across flows.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError, UploadClient};
use crate::config::StorefrontConfig;

/// Application state shared across all flows.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the API clients. The cart store is not part of it: the
/// caller owns the store and lends it to each flow.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    upload: Option<UploadClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config)?;
        let upload = config
            .upload
            .as_ref()
            .map(|upload| UploadClient::new(upload, config.request_timeout))
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                upload,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the REST API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get the image upload client, if upload is configured.
    #[must_use]
    pub fn upload(&self) -> Option<&UploadClient> {
        self.inner.upload.as_ref()
    }
}
