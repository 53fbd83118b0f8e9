//! Page-level operations.
//!
//! Each flow validates its input, talks to the API through [`AppState`] and
//! updates the caller's [`CartStore`]. Flows return `Result`; a front-end
//! that wants per-page status turns the result into a [`LoadState`].
//!
//! [`AppState`]: crate::state::AppState
//! [`CartStore`]: crate::store::CartStore

pub mod account;
pub mod admin;
pub mod catalog;
pub mod checkout;

use crate::error::AppError;

/// Status of a page's data, as a UI would track it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight.
    Loading,
    /// Data arrived.
    Ready(T),
    /// The request failed; holds the message to show.
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> LoadState<T> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Transform the loaded value, keeping any other status.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            Self::Idle => LoadState::Idle,
            Self::Loading => LoadState::Loading,
            Self::Ready(value) => LoadState::Ready(f(value)),
            Self::Failed(message) => LoadState::Failed(message),
        }
    }
}

impl<T> From<Result<T, AppError>> for LoadState<T> {
    fn from(result: Result<T, AppError>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => {
                e.report();
                Self::Failed(e.user_message())
            }
        }
    }
}
