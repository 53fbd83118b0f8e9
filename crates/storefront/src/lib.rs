//! Atelier Storefront library.
//!
//! Everything a shopper-facing front-end needs short of rendering:
//!
//! - [`store`] - the cart/wishlist/session store and its durable storage
//! - [`api`] - typed client for the product, auth, order and admin REST API
//! - [`flows`] - page-level operations combining the two
//! - [`config`] - environment-driven configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_storefront::{config::StorefrontConfig, state::AppState};
//! use atelier_storefront::store::{CartStore, FileStorage};
//!
//! let config = StorefrontConfig::from_env()?;
//! let mut store = CartStore::open(FileStorage::open(&config.data_dir)?);
//! let state = AppState::new(config)?;
//!
//! let product = atelier_storefront::flows::catalog::product_detail(&state, &id).await?;
//! atelier_storefront::flows::catalog::add_to_cart(&mut store, &product, "M", 1)?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod flows;
pub mod state;
pub mod store;
