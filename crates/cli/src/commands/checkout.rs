//! `atelier checkout`

use atelier_storefront::error::AppError;
use atelier_storefront::flows::checkout::{self, CheckoutForm};

use super::Context;
use crate::CheckoutArgs;

#[allow(clippy::print_stdout)]
pub async fn run(ctx: &mut Context, args: CheckoutArgs) -> Result<(), AppError> {
    let form = checkout_form(ctx, args);
    let receipt = checkout::place_order(&ctx.state, &mut ctx.store, &form).await?;

    match &receipt.order {
        Some(order) => println!("Order {} placed.", order.id),
        None => println!("Order placed."),
    }
    println!("{} items, total {}", receipt.item_count, receipt.total);
    Ok(())
}

/// Flags override the name and email taken from the session.
fn checkout_form(ctx: &Context, args: CheckoutArgs) -> CheckoutForm {
    let prefilled = CheckoutForm::prefilled(ctx.store.session().map(|s| s.user()));
    CheckoutForm {
        full_name: args.full_name.unwrap_or(prefilled.full_name),
        email: args.email.unwrap_or(prefilled.email),
        address: args.address,
        city: args.city,
        zip_code: args.zip_code,
        country: args.country,
    }
}
