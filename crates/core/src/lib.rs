//! Atelier Core - Shared domain types.
//!
//! This crate provides the types used across all Atelier components:
//! - `storefront` - Cart store, API client and page-level flows
//! - `cli` - Command-line front-end over the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and their invariants - no I/O, no
//! storage, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, emails, order statuses, and the cart/wishlist
//!   collections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
