//! Session state: the logged-in identity and its bearer token.

use secrecy::{ExposeSecret, SecretString};

use atelier_core::CurrentUser;

/// Opaque bearer token issued by the backend.
///
/// Implements `Debug` manually so the token never reaches logs.
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for the `Authorization` header and storage only.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Value for an `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

impl From<String> for AuthToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

/// An authenticated session.
///
/// The identity and token only exist together: there is no way to hold one
/// without the other.
#[derive(Debug, Clone)]
pub struct Session {
    user: CurrentUser,
    token: AuthToken,
}

impl Session {
    #[must_use]
    pub const fn new(user: CurrentUser, token: AuthToken) -> Self {
        Self { user, token }
    }

    #[must_use]
    pub const fn user(&self) -> &CurrentUser {
        &self.user
    }

    #[must_use]
    pub const fn token(&self) -> &AuthToken {
        &self.token
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.user.is_admin
    }
}
