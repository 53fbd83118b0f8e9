//! Subcommand implementations.
//!
//! Results go to stdout; logs go to stderr.

pub mod account;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;

use atelier_storefront::config::StorefrontConfig;
use atelier_storefront::error::AppError;
use atelier_storefront::state::AppState;
use atelier_storefront::store::{CartStore, FileStorage, StoreEvent};

/// What every command runs against: the API clients and the on-disk store.
pub struct Context {
    pub state: AppState,
    pub store: CartStore<FileStorage>,
}

impl Context {
    /// Open the store in the configured data directory and build the clients.
    pub fn open(config: StorefrontConfig) -> Result<Self, AppError> {
        let storage = FileStorage::open(&config.data_dir)?;
        let mut store = CartStore::open(storage);
        store.subscribe(|event, _| {
            if let StoreEvent::PersistFailed { key, error } = event {
                tracing::warn!(%key, %error, "Change will not survive a restart");
            }
        });

        let state = AppState::new(config)?;
        Ok(Self { state, store })
    }
}
