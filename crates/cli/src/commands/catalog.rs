//! `atelier products ...`

use atelier_core::ProductId;
use atelier_storefront::api::{Product, ProductQuery};
use atelier_storefront::error::AppError;
use atelier_storefront::flows::catalog;

use super::Context;

pub async fn list(ctx: &Context, query: ProductQuery) -> Result<(), AppError> {
    let page = catalog::browse(&ctx.state, &query).await?;

    #[allow(clippy::print_stdout)]
    {
        if page.products.is_empty() {
            println!("No products match those filters.");
            return Ok(());
        }

        println!("{:<26} {:<32} {:>10} {:>6}", "ID", "TITLE", "PRICE", "STOCK");
        for product in &page.products {
            println!(
                "{:<26} {:<32} {:>10} {:>6}",
                product.id,
                truncate(&product.title, 32),
                product.price.to_string(),
                product.stock
            );
        }
        let current = page.current_page.unwrap_or(1);
        let pages = page.total_pages.unwrap_or(current);
        let total = page.total.unwrap_or(page.products.len() as u64);
        println!("\nPage {current} of {pages} ({total} products)");
    }
    Ok(())
}

pub async fn show(ctx: &Context, id: &ProductId) -> Result<(), AppError> {
    let product = catalog::product_detail(&ctx.state, id).await?;
    print_product(&product, ctx.store.is_wishlisted(&product.id));
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_product(product: &Product, saved: bool) {
    println!("{}", product.title);
    println!("  ID:       {}", product.id);
    println!("  Price:    {}", product.price);
    println!("  Category: {} / {}", product.category, product.gender);
    println!("  Sizes:    {}", product.sizes.join(", "));
    if product.in_stock() {
        println!("  Stock:    {}", product.stock);
    } else {
        println!("  Stock:    sold out");
    }
    if let Some(image) = product.primary_image() {
        println!("  Image:    {image}");
    }
    if saved {
        println!("  (in your wishlist)");
    }
    if !product.description.is_empty() {
        println!("\n{}", product.description);
    }
}

/// Cut `s` to at most `max` characters, marking the cut with `...`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
