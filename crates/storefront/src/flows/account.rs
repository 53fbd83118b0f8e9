//! Login, signup, logout and the shopper's own orders.

use atelier_core::{CurrentUser, Email, OrderId, OrderStatus};

use crate::api::{AuthResponse, Order, SignupRequest};
use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::state::AppState;
use crate::store::{AuthToken, CartStore, KeyValueStorage};

/// Fields of the signup form.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Log in and start a session in `store`.
///
/// # Errors
///
/// Returns `AppError::Validation` for a malformed email or empty password,
/// or the API's message if the credentials are rejected.
pub async fn login<S: KeyValueStorage>(
    state: &AppState,
    store: &mut CartStore<S>,
    email: &str,
    password: &str,
) -> Result<CurrentUser> {
    let email = parse_email(email)?;
    require_password(password)?;

    let response = state.api().login(email.as_str(), password).await?;
    Ok(start_session(store, response))
}

/// Create an account and start a session for it.
///
/// # Errors
///
/// Returns `AppError::Validation` if a field is missing or the email is
/// malformed, or the API's message if the account cannot be created.
pub async fn signup<S: KeyValueStorage>(
    state: &AppState,
    store: &mut CartStore<S>,
    form: &SignupForm,
) -> Result<CurrentUser> {
    let email = parse_email(&form.email)?;
    require_password(&form.password)?;
    let first_name = form.first_name.trim();
    let last_name = form.last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::Validation(
            "First and last name are required".to_string(),
        ));
    }

    let request = SignupRequest {
        email: email.as_str(),
        password: &form.password,
        first_name,
        last_name,
    };
    let response = state.api().signup(&request).await?;
    Ok(start_session(store, response))
}

/// End the session.
pub fn logout<S: KeyValueStorage>(store: &mut CartStore<S>) {
    store.logout();
    clear_sentry_user();
    add_breadcrumb("auth", "Logged out", None);
}

/// Orders placed by the logged-in user.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` without a session, or an API error.
pub async fn my_orders<S: KeyValueStorage>(
    state: &AppState,
    store: &CartStore<S>,
) -> Result<Vec<Order>> {
    let token = session_token(store)?;
    Ok(state.api().my_orders(&token).await?)
}

/// Change the status of one of the logged-in user's orders.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` without a session, or an API error.
pub async fn update_order_status<S: KeyValueStorage>(
    state: &AppState,
    store: &CartStore<S>,
    order_id: &OrderId,
    status: OrderStatus,
) -> Result<Order> {
    let token = session_token(store)?;
    let order = state
        .api()
        .update_order_status(&token, order_id, status)
        .await?;
    tracing::info!(order_id = %order.id, status = %order.order_status, "Order status updated");
    Ok(order)
}

fn start_session<S: KeyValueStorage>(store: &mut CartStore<S>, response: AuthResponse) -> CurrentUser {
    let user = response.user;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    add_breadcrumb("auth", "Logged in", Some(&[("user_id", user.id.as_str())]));
    store.set_user(user.clone(), AuthToken::new(response.token));
    user
}

fn session_token<S: KeyValueStorage>(store: &CartStore<S>) -> Result<AuthToken> {
    store
        .session()
        .map(|session| session.token().clone())
        .ok_or_else(|| AppError::Unauthorized("Please log in to continue".to_string()))
}

fn parse_email(email: &str) -> Result<Email> {
    Email::parse(email).map_err(|e| AppError::Validation(format!("Invalid email: {e}")))
}

fn require_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use atelier_core::UserId;

    use super::*;
    use crate::store::{MemoryStorage, StorageKey};

    fn response(admin: bool) -> AuthResponse {
        AuthResponse {
            user: CurrentUser {
                id: UserId::new("u-1"),
                email: Email::parse("ada@example.com").unwrap(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                is_admin: admin,
            },
            token: "tok-1".to_string(),
        }
    }

    #[test]
    fn test_start_session_persists_both_halves() {
        let mut store = CartStore::open(MemoryStorage::new());
        let user = start_session(&mut store, response(false));

        assert_eq!(user.display_name(), "Ada Lovelace");
        assert!(store.is_authenticated());
        assert!(store.storage().contains(StorageKey::User));
        assert_eq!(store.storage().get(StorageKey::Token), Some("tok-1"));
    }

    #[test]
    fn test_logout_clears_session() {
        let mut store = CartStore::open(MemoryStorage::new());
        start_session(&mut store, response(true));
        logout(&mut store);

        assert!(!store.is_authenticated());
        assert!(!store.storage().contains(StorageKey::Token));
    }

    #[test]
    fn test_session_token_requires_login() {
        let store = CartStore::open(MemoryStorage::new());
        assert!(matches!(session_token(&store), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_input_validation() {
        assert!(matches!(parse_email("nope"), Err(AppError::Validation(_))));
        assert!(parse_email(" Ada@Example.com ").is_ok());
        assert!(matches!(require_password(""), Err(AppError::Validation(_))));
    }
}
