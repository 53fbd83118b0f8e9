//! Login, signup, and the shopper's orders.

use atelier_core::{OrderId, OrderStatus};
use atelier_storefront::api::Order;
use atelier_storefront::error::AppError;
use atelier_storefront::flows::account::{self, SignupForm};

use super::Context;

#[allow(clippy::print_stdout)]
pub async fn login(ctx: &mut Context, email: &str, password: &str) -> Result<(), AppError> {
    let user = account::login(&ctx.state, &mut ctx.store, email, password).await?;
    println!("Logged in as {} <{}>", user.display_name(), user.email);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn signup(
    ctx: &mut Context,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
) -> Result<(), AppError> {
    let form = SignupForm {
        email,
        password,
        first_name,
        last_name,
    };
    let user = account::signup(&ctx.state, &mut ctx.store, &form).await?;
    println!("Welcome, {}!", user.display_name());
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn logout(ctx: &mut Context) {
    account::logout(&mut ctx.store);
    println!("Logged out.");
}

#[allow(clippy::print_stdout)]
pub fn whoami(ctx: &Context) {
    match ctx.store.session() {
        Some(session) => {
            let user = session.user();
            let role = if user.is_admin { " (admin)" } else { "" };
            println!("{} <{}>{role}", user.display_name(), user.email);
        }
        None => println!("Not logged in."),
    }
}

pub async fn orders(ctx: &Context) -> Result<(), AppError> {
    let orders = account::my_orders(&ctx.state, &ctx.store).await?;
    print_orders(&orders, false);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn update_status(
    ctx: &Context,
    order_id: &OrderId,
    status: OrderStatus,
) -> Result<(), AppError> {
    let order = account::update_order_status(&ctx.state, &ctx.store, order_id, status).await?;
    println!("Order {} is now {}", order.id, order.order_status);
    Ok(())
}

/// Print an order table, optionally with a customer column.
#[allow(clippy::print_stdout)]
pub(crate) fn print_orders(orders: &[Order], with_customer: bool) {
    if orders.is_empty() {
        println!("No orders yet.");
        return;
    }

    for order in orders {
        let placed = order
            .created_at
            .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d").to_string());
        let customer = if with_customer {
            let customer = order
                .customer()
                .map(|c| c.email.as_str())
                .or_else(|| order.shipping_address.as_ref().map(|a| a.email.as_str()))
                .unwrap_or("-");
            format!(" {customer:<28}")
        } else {
            String::new()
        };
        println!(
            "{:<26} {placed:<10}{customer} {:>4} items {:>10} {:<10} {}",
            order.id,
            order.item_count(),
            order.total_price.to_string(),
            order.order_status.to_string(),
            order.payment_status
        );
    }
}
