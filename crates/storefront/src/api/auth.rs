//! Login and signup endpoints.

use reqwest::Method;
use tracing::instrument;

use super::types::{AuthResponse, LoginRequest, SignupRequest};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the server's message on bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(&["auth", "login"])?;
        let body = LoginRequest { email, password };
        self.send(self.request(Method::POST, url, None)?.json(&body))
            .await
    }

    /// Create an account and start a session for it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the server's message if the account
    /// cannot be created (e.g. the email is taken).
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: &SignupRequest<'_>) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(&["auth", "signup"])?;
        self.send(self.request(Method::POST, url, None)?.json(request))
            .await
    }
}
