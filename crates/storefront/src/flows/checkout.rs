//! Checkout: shipping form, order placement, and clearing the cart.
//!
//! Orders are demo orders; no payment is collected. The cart is cleared only
//! after the API accepts the order.

use atelier_core::{Cart, CurrentUser, Email, Price};

use crate::api::{NewOrder, Order, OrderItem, ShippingAddress};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;
use crate::store::{CartStore, KeyValueStorage};

/// Fields of the shipping form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
}

impl CheckoutForm {
    /// A form with name and email filled in from the logged-in user.
    #[must_use]
    pub fn prefilled(user: Option<&CurrentUser>) -> Self {
        user.map_or_else(Self::default, |user| Self {
            full_name: format!("{} {}", user.first_name, user.last_name)
                .trim()
                .to_string(),
            email: user.email.to_string(),
            ..Self::default()
        })
    }

    /// Check every field and produce the shipping address.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` naming the first missing field, or for
    /// a malformed email.
    pub fn validate(&self) -> Result<ShippingAddress> {
        let fields = [
            ("Full name", &self.full_name),
            ("Email", &self.email),
            ("Address", &self.address),
            ("City", &self.city),
            ("ZIP code", &self.zip_code),
            ("Country", &self.country),
        ];
        if let Some((label, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(AppError::Validation(format!("{label} is required")));
        }

        let email = Email::parse(&self.email)
            .map_err(|e| AppError::Validation(format!("Invalid email: {e}")))?;

        Ok(ShippingAddress {
            full_name: self.full_name.trim().to_string(),
            email: email.to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            country: self.country.trim().to_string(),
        })
    }
}

/// The result of a successful checkout.
#[derive(Debug, Clone)]
pub struct Receipt {
    /// The created order, when the API returned it.
    pub order: Option<Order>,
    pub total: Price,
    pub item_count: u32,
}

/// Build the order request for `cart`.
///
/// # Errors
///
/// Returns `AppError::EmptyCart` if there is nothing to order.
pub fn build_order(cart: &Cart, shipping_address: ShippingAddress) -> Result<NewOrder> {
    if cart.is_empty() {
        return Err(AppError::EmptyCart);
    }

    Ok(NewOrder {
        items: cart.lines().iter().map(OrderItem::from).collect(),
        total_price: cart.total(),
        shipping_address,
    })
}

/// Place an order for the cart's contents.
///
/// With a session the order is placed as that user; without one it is a
/// guest order, which must be enabled in the configuration. On success the
/// cart is cleared; on any failure it is left as it was.
///
/// # Errors
///
/// Returns `AppError::Validation` for an incomplete form,
/// `AppError::EmptyCart`, `AppError::Unauthorized` when guest checkout is
/// disabled and nobody is logged in, or the API error.
pub async fn place_order<S: KeyValueStorage>(
    state: &AppState,
    store: &mut CartStore<S>,
    form: &CheckoutForm,
) -> Result<Receipt> {
    let shipping_address = form.validate()?;
    let order = build_order(store.cart(), shipping_address)?;

    let token = store.session().map(|session| session.token().clone());
    if token.is_none() && !state.config().guest_checkout {
        return Err(AppError::Unauthorized(
            "Please log in to check out".to_string(),
        ));
    }

    let placed = state
        .api()
        .place_demo_order(&order, token.as_ref())
        .await?;

    let receipt = Receipt {
        order: placed,
        total: order.total_price,
        item_count: store.cart_item_count(),
    };
    store.clear_cart();

    tracing::info!(
        total = %receipt.total,
        items = receipt.item_count,
        guest = token.is_none(),
        "Order placed"
    );
    add_breadcrumb("checkout", "Order placed", None);
    Ok(receipt)
}
