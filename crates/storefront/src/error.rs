//! Unified error handling with Sentry integration.
//!
//! Flows return `Result<T, AppError>`. Callers show [`AppError::user_message`]
//! to the shopper and call [`AppError::report`] so unexpected failures reach
//! Sentry.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::store::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// REST API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Local storage could not be opened or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration is missing or malformed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Form or argument input was rejected before any call was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation needs a logged-in session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The session is valid but lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// An image was supplied but no upload endpoint is configured.
    #[error("Image upload is not configured")]
    UploadUnavailable,
}

impl AppError {
    /// Message safe to show to the shopper.
    ///
    /// Server-provided messages pass through; transport, decode, storage and
    /// configuration details do not.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Api { message, .. }) => message.clone(),
            Self::Api(ApiError::Http(_)) => {
                "Could not reach the store. Please try again.".to_string()
            }
            Self::Api(_) => "The store sent an unexpected response".to_string(),
            Self::Storage(_) => "Could not save your data on this device".to_string(),
            Self::Config(_) => "The storefront is not configured correctly".to_string(),
            Self::Validation(msg) | Self::Unauthorized(msg) | Self::Forbidden(msg) => msg.clone(),
            Self::EmptyCart => "Your cart is empty".to_string(),
            Self::UploadUnavailable => "Image upload is not available".to_string(),
        }
    }

    /// Whether this failure points at a bug or an outage rather than bad input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        match self {
            Self::Api(ApiError::Api { status, .. }) => *status >= 500,
            Self::Api(_) | Self::Storage(_) | Self::Config(_) => true,
            _ => false,
        }
    }

    /// Log the error, capturing internal failures to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::info!(error = %self, "Request rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Validation("Please select a size".to_string());
        assert_eq!(err.to_string(), "Validation error: Please select a size");

        let err = AppError::EmptyCart;
        assert_eq!(err.to_string(), "Cart is empty");
    }

    #[test]
    fn test_user_message_passes_server_message() {
        let err = AppError::Api(ApiError::Api {
            status: 400,
            message: "Insufficient stock".to_string(),
        });
        assert_eq!(err.user_message(), "Insufficient stock");
        assert!(!err.is_internal());
    }

    #[test]
    fn test_user_message_hides_internal_details() {
        let err = AppError::Api(ApiError::Parse("expected value at line 1".to_string()));
        assert!(!err.user_message().contains("line 1"));
        assert!(err.is_internal());

        let err = AppError::Storage(StorageError::Rejected("cart", "disk full".to_string()));
        assert!(!err.user_message().contains("disk full"));
        assert!(err.is_internal());
    }

    #[test]
    fn test_server_errors_are_internal() {
        let err = AppError::Api(ApiError::Api {
            status: 503,
            message: "Service unavailable".to_string(),
        });
        assert!(err.is_internal());
    }
}
