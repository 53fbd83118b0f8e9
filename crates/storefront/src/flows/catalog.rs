//! Browsing, product detail, and adding products to the cart or wishlist.

use atelier_core::{Cart, CartItem, ProductId, Wishlist, WishlistEntry};

use crate::api::{Product, ProductPage, ProductQuery};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;
use crate::store::{CartStore, KeyValueStorage};

/// One page of the catalog.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn browse(state: &AppState, query: &ProductQuery) -> Result<ProductPage> {
    Ok(state.api().list_products(query).await?)
}

/// A single product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the request fails.
pub async fn product_detail(state: &AppState, id: &ProductId) -> Result<Product> {
    add_breadcrumb("navigation", "Viewed product", Some(&[("product_id", id.as_str())]));
    Ok(state.api().get_product(id).await?)
}

/// Add `quantity` units of `product` in `size` to the cart.
///
/// The size must be one the product offers; it is stored in the product's
/// own spelling so `m` and `M` land on the same line.
///
/// # Errors
///
/// Returns `AppError::Validation` if no size is selected, the size is not
/// offered, or `quantity` is zero. The store is untouched in that case.
pub fn add_to_cart<'a, S: KeyValueStorage>(
    store: &'a mut CartStore<S>,
    product: &Product,
    size: &str,
    quantity: u32,
) -> Result<&'a Cart> {
    let size = size.trim();
    if size.is_empty() {
        return Err(AppError::Validation("Please select a size".to_string()));
    }
    let Some(size) = product.canonical_size(size) else {
        return Err(AppError::Validation(format!(
            "Size {size} is not available for {}",
            product.title
        )));
    };
    if quantity == 0 {
        return Err(AppError::Validation(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let mut item = CartItem::new(
        product.id.clone(),
        product.title.clone(),
        product.price,
        size,
    )
    .with_quantity(quantity);
    if let Some(image) = product.primary_image() {
        item = item.with_image(image);
    }

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product.id.as_str()), ("size", size)]),
    );
    Ok(store.add_to_cart(item))
}

/// Save `product` to the wishlist. Saving it again changes nothing.
pub fn add_to_wishlist<'a, S: KeyValueStorage>(
    store: &'a mut CartStore<S>,
    product: &Product,
) -> &'a Wishlist {
    store.add_to_wishlist(wishlist_entry(product))
}

/// Save `product` if it is not saved, remove it if it is.
///
/// Returns whether the product is saved afterwards.
pub fn toggle_wishlist<S: KeyValueStorage>(store: &mut CartStore<S>, product: &Product) -> bool {
    if store.is_wishlisted(&product.id) {
        store.remove_from_wishlist(&product.id);
        false
    } else {
        store.add_to_wishlist(wishlist_entry(product));
        true
    }
}

fn wishlist_entry(product: &Product) -> WishlistEntry {
    WishlistEntry {
        product_id: product.id.clone(),
        title: product.title.clone(),
        price: product.price,
        image: product.primary_image().map(str::to_string),
    }
}
