//! Wire types for the storefront REST API.
//!
//! Field names follow the API's camelCase JSON; document ids arrive as `_id`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use atelier_core::{CartLine, CurrentUser, OrderId, OrderStatus, PaymentStatus, Price, ProductId, UserId};

/// Image shown when a product has none.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

// =============================================================================
// Products
// =============================================================================

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Department, e.g. `mens`, `womens`, `unisex`
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub gender: String,
    /// Sizes the product can be ordered in
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl Product {
    /// URL of the first image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .first()
            .map(|image| image.secure_url.as_str())
            .filter(|url| !url.is_empty())
    }

    /// Whether `size` is one of the product's sizes (case-insensitive).
    #[must_use]
    pub fn offers_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s.eq_ignore_ascii_case(size))
    }

    /// The product's own spelling of `size`, if offered.
    #[must_use]
    pub fn canonical_size(&self, size: &str) -> Option<&str> {
        self.sizes
            .iter()
            .find(|s| s.eq_ignore_ascii_case(size))
            .map(String::as_str)
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Hosted product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub secure_url: String,
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Body of `POST /admin/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub gender: String,
    pub sizes: Vec<String>,
    pub stock: u32,
    pub images: Vec<ProductImage>,
}

// =============================================================================
// Auth
// =============================================================================

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// Response to login and signup.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: CurrentUser,
    pub token: String,
}

// =============================================================================
// Orders
// =============================================================================

/// A purchased line, as sent at checkout and returned with orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: ProductId,
    pub title: String,
    pub price: Price,
    pub quantity: u32,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product: line.product_id.clone(),
            title: line.title.clone(),
            price: line.unit_price,
            quantity: line.quantity,
            size: line.size.clone(),
            image: line.image_ref.clone(),
        }
    }
}

/// Where an order ships.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
}

/// Body of `POST /orders/demo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub total_price: Price,
    pub shipping_address: ShippingAddress,
}

/// Body of the order status endpoints.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub order_status: OrderStatus,
}

/// Who placed an order: a populated profile (admin listings) or a bare id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OrderOwner {
    Profile(UserSummary),
    Id(UserId),
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    #[serde(default)]
    pub user: Option<OrderOwner>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_price: Price,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub order_status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// The owner's profile, when the API populated it.
    #[must_use]
    pub fn customer(&self) -> Option<&UserSummary> {
        match &self.user {
            Some(OrderOwner::Profile(profile)) => Some(profile),
            _ => None,
        }
    }

    /// Total units across all items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }
}

// =============================================================================
// Users
// =============================================================================

/// A user as listed by the admin API.
///
/// Email is kept as received; listings should not fail on one odd record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserSummary {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Decode a resource that may arrive bare or wrapped as `{ "<key>": ... }`.
pub(crate) fn unwrap_resource<T: DeserializeOwned>(body: serde_json::Value, key: &str) -> Option<T> {
    let wrapped = body.get(key).cloned();
    serde_json::from_value(body)
        .ok()
        .or_else(|| wrapped.and_then(|inner| serde_json::from_value(inner).ok()))
}
