//! Admin dashboard: products, orders and users.
//!
//! Every operation except the public product listing checks for an admin
//! session before calling the API.

use atelier_core::{OrderId, OrderStatus, Price, ProductId};

use crate::api::{
    ImageFile, NewProduct, Order, PLACEHOLDER_IMAGE, Product, ProductImage, ProductPage,
    ProductQuery, UserSummary,
};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;
use crate::store::{AuthToken, CartStore, KeyValueStorage};

/// Products shown on the dashboard's product tab.
const DASHBOARD_PRODUCT_LIMIT: u32 = 100;

/// Fields of the new-product form, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    pub title: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub gender: String,
    /// Comma-separated, e.g. `XS,S,M,L,XL`
    pub sizes: String,
    pub stock: String,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            price: String::new(),
            category: "mens".to_string(),
            gender: "male".to_string(),
            sizes: "XS,S,M,L,XL".to_string(),
            stock: String::new(),
        }
    }
}

impl ProductForm {
    /// Parse the form into a product, using `image_url` as its only image.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a missing title, a price or stock
    /// that is not a non-negative number, or an empty size list.
    pub fn validate(&self, image_url: &str) -> Result<NewProduct> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }

        let price = Price::parse(&self.price)
            .map_err(|e| AppError::Validation(format!("Invalid price: {e}")))?;

        let stock = self
            .stock
            .trim()
            .parse::<u32>()
            .map_err(|_| AppError::Validation("Stock must be a whole number".to_string()))?;

        let sizes = parse_sizes(&self.sizes);
        if sizes.is_empty() {
            return Err(AppError::Validation(
                "At least one size is required".to_string(),
            ));
        }

        Ok(NewProduct {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            price,
            category: self.category.trim().to_string(),
            gender: self.gender.trim().to_string(),
            sizes,
            stock,
            images: vec![ProductImage {
                secure_url: image_url.to_string(),
            }],
        })
    }
}

/// Split a comma-separated size list, dropping blanks and repeats.
#[must_use]
pub fn parse_sizes(sizes: &str) -> Vec<String> {
    let mut parsed: Vec<String> = Vec::new();
    for size in sizes.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !parsed.iter().any(|s| s.eq_ignore_ascii_case(size)) {
            parsed.push(size.to_string());
        }
    }
    parsed
}

/// The session token, if the session belongs to an admin.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` without a session and
/// `AppError::Forbidden` for a non-admin session.
pub fn require_admin<S: KeyValueStorage>(store: &CartStore<S>) -> Result<AuthToken> {
    let session = store
        .session()
        .ok_or_else(|| AppError::Unauthorized("Please log in as an admin".to_string()))?;
    if !session.is_admin() {
        tracing::warn!(user_id = %session.user().id, "Non-admin attempted an admin operation");
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(session.token().clone())
}

/// Catalog listing for the dashboard.
///
/// The catalog is public, so this sends no token and needs no session.
///
/// # Errors
///
/// Returns an error if the request fails.
pub async fn list_products(state: &AppState) -> Result<ProductPage> {
    let query = ProductQuery::new().limit(DASHBOARD_PRODUCT_LIMIT);
    Ok(state.api().list_products(&query).await?)
}

/// Create a product, uploading its image first when one is given.
///
/// Without an image the product gets the placeholder image.
///
/// # Errors
///
/// Returns an error without an admin session, for invalid form input,
/// when an image is given but upload is not configured, or if the upload
/// or the API request fails.
pub async fn create_product<S: KeyValueStorage>(
    state: &AppState,
    store: &CartStore<S>,
    form: &ProductForm,
    image: Option<ImageFile>,
) -> Result<Option<Product>> {
    let token = require_admin(store)?;
    // Reject a bad form before anything is uploaded
    form.validate(PLACEHOLDER_IMAGE)?;

    let image_url = match image {
        Some(image) => {
            let upload = state.upload().ok_or(AppError::UploadUnavailable)?;
            upload.upload_image(image).await?.to_string()
        }
        None => PLACEHOLDER_IMAGE.to_string(),
    };
    let product = form.validate(&image_url)?;

    let created = state.api().create_product(&token, &product).await?;
    tracing::info!(title = %product.title, "Product created");
    add_breadcrumb("admin", "Created product", Some(&[("title", product.title.as_str())]));
    Ok(created)
}

/// Delete a product.
///
/// # Errors
///
/// Returns an error without an admin session or if the request fails.
pub async fn delete_product<S: KeyValueStorage>(
    state: &AppState,
    store: &CartStore<S>,
    id: &ProductId,
) -> Result<()> {
    let token = require_admin(store)?;
    state.api().delete_product(&token, id).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(())
}

/// Every order in the store.
///
/// # Errors
///
/// Returns an error without an admin session or if the request fails.
pub async fn list_orders<S: KeyValueStorage>(
    state: &AppState,
    store: &CartStore<S>,
) -> Result<Vec<Order>> {
    let token = require_admin(store)?;
    Ok(state.api().admin_orders(&token).await?)
}

/// Every registered user.
///
/// # Errors
///
/// Returns an error without an admin session or if the request fails.
pub async fn list_users<S: KeyValueStorage>(
    state: &AppState,
    store: &CartStore<S>,
) -> Result<Vec<UserSummary>> {
    let token = require_admin(store)?;
    Ok(state.api().admin_users(&token).await?)
}

/// Change any order's status.
///
/// # Errors
///
/// Returns an error without an admin session or if the request fails.
pub async fn update_order_status<S: KeyValueStorage>(
    state: &AppState,
    store: &CartStore<S>,
    order_id: &OrderId,
    status: OrderStatus,
) -> Result<Order> {
    let token = require_admin(store)?;
    let order = state
        .api()
        .admin_update_order_status(&token, order_id, status)
        .await?;
    tracing::info!(order_id = %order.id, status = %order.order_status, "Order status updated by admin");
    Ok(order)
}
