//! `atelier cart ...` and `atelier wishlist ...`

use atelier_core::{Cart, ProductId};
use atelier_storefront::error::AppError;
use atelier_storefront::flows::catalog;

use super::Context;
use super::catalog::truncate;

pub fn show(ctx: &Context) {
    print_cart(ctx.store.cart());
}

pub async fn add(
    ctx: &mut Context,
    product_id: &ProductId,
    size: &str,
    quantity: u32,
) -> Result<(), AppError> {
    let product = catalog::product_detail(&ctx.state, product_id).await?;
    let cart = catalog::add_to_cart(&mut ctx.store, &product, size, quantity)?;
    print_cart(cart);
    Ok(())
}

pub fn remove(ctx: &mut Context, product_id: &ProductId, size: &str) {
    let cart = ctx.store.remove_from_cart(product_id, size);
    print_cart(cart);
}

pub fn update(ctx: &mut Context, product_id: &ProductId, size: &str, quantity: i64) {
    let cart = ctx.store.update_cart_quantity(product_id, size, quantity);
    print_cart(cart);
}

pub fn clear(ctx: &mut Context) {
    ctx.store.clear_cart();
    print_cart(ctx.store.cart());
}

#[allow(clippy::print_stdout)]
pub fn show_wishlist(ctx: &Context) {
    let wishlist = ctx.store.wishlist();
    if wishlist.is_empty() {
        println!("Your wishlist is empty.");
        return;
    }
    for entry in wishlist.entries() {
        println!(
            "{:<26} {:<32} {:>10}",
            entry.product_id,
            truncate(&entry.title, 32),
            entry.price.to_string()
        );
    }
}

pub async fn wishlist_add(ctx: &mut Context, product_id: &ProductId) -> Result<(), AppError> {
    let product = catalog::product_detail(&ctx.state, product_id).await?;
    catalog::add_to_wishlist(&mut ctx.store, &product);
    show_wishlist(ctx);
    Ok(())
}

pub fn wishlist_remove(ctx: &mut Context, product_id: &ProductId) {
    ctx.store.remove_from_wishlist(product_id);
    show_wishlist(ctx);
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    println!(
        "{:<26} {:<32} {:<6} {:>4} {:>10}",
        "ID", "TITLE", "SIZE", "QTY", "TOTAL"
    );
    for line in cart.lines() {
        println!(
            "{:<26} {:<32} {:<6} {:>4} {:>10}",
            line.product_id,
            truncate(&line.title, 32),
            line.size,
            line.quantity,
            line.line_total().to_string()
        );
    }
    println!("\n{} items, total {}", cart.item_count(), cart.total());
}
