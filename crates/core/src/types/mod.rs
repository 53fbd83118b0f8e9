//! Core types for Atelier.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod price;
pub mod status;
pub mod user;

pub use cart::{Cart, CartItem, CartLine, Wishlist, WishlistEntry};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use status::*;
pub use user::CurrentUser;
