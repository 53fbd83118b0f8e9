//! `atelier admin ...`

use std::path::Path;

use atelier_core::{OrderId, OrderStatus, ProductId};
use atelier_storefront::api::ImageFile;
use atelier_storefront::error::AppError;
use atelier_storefront::flows::admin::{self, ProductForm};

use super::Context;
use super::account::print_orders;
use super::catalog::truncate;
use crate::NewProductArgs;

#[allow(clippy::print_stdout)]
pub async fn products(ctx: &Context) -> Result<(), AppError> {
    let page = admin::list_products(&ctx.state).await?;
    for product in &page.products {
        println!(
            "{:<26} {:<32} {:>10} {:>6} {}",
            product.id,
            truncate(&product.title, 32),
            product.price.to_string(),
            product.stock,
            product.sizes.join(",")
        );
    }
    println!(
        "\n{} products",
        page.total.unwrap_or(page.products.len() as u64)
    );
    Ok(())
}

pub async fn orders(ctx: &Context) -> Result<(), AppError> {
    let orders = admin::list_orders(&ctx.state, &ctx.store).await?;
    print_orders(&orders, true);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn users(ctx: &Context) -> Result<(), AppError> {
    let users = admin::list_users(&ctx.state, &ctx.store).await?;
    for user in &users {
        let role = if user.is_admin { "admin" } else { "customer" };
        let joined = user
            .created_at
            .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d").to_string());
        println!(
            "{:<26} {:<32} {:<24} {role:<8} {joined}",
            user.id,
            user.email,
            user.full_name()
        );
    }
    println!("\n{} users", users.len());
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn update_status(
    ctx: &Context,
    order_id: &OrderId,
    status: OrderStatus,
) -> Result<(), AppError> {
    let order = admin::update_order_status(&ctx.state, &ctx.store, order_id, status).await?;
    println!("Order {} is now {}", order.id, order.order_status);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn create_product(ctx: &Context, args: NewProductArgs) -> Result<(), AppError> {
    let image = args.image.as_deref().map(read_image).transpose()?;
    let form = ProductForm {
        title: args.title,
        description: args.description,
        price: args.price,
        category: args.category,
        gender: args.gender,
        sizes: args.sizes,
        stock: args.stock,
    };

    match admin::create_product(&ctx.state, &ctx.store, &form, image).await? {
        Some(product) => println!("Created {} ({})", product.title, product.id),
        None => println!("Created {}", form.title.trim()),
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn delete_product(ctx: &Context, id: &ProductId) -> Result<(), AppError> {
    admin::delete_product(&ctx.state, &ctx.store, id).await?;
    println!("Deleted {id}");
    Ok(())
}

fn read_image(path: &Path) -> Result<ImageFile, AppError> {
    let bytes = std::fs::read(path).map_err(|e| {
        AppError::Validation(format!("Could not read {}: {e}", path.display()))
    })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |name| name.to_string_lossy().into_owned());
    Ok(ImageFile { file_name, bytes })
}
