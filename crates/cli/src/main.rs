//! Atelier CLI - the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! atelier products list --category mens --max-price 50
//! atelier products show 66a1f0
//!
//! # Fill the cart and check out
//! atelier cart add 66a1f0 --size M --quantity 2
//! atelier checkout --full-name "Ada Lovelace" --email ada@example.com \
//!     --address "12 Analytical St" --city London --zip-code "N1 9GU" --country UK
//!
//! # Account
//! atelier login -e ada@example.com -p secret
//! atelier orders list
//!
//! # Admin
//! atelier admin create-product --title "Linen Shirt" --price 49.99 --stock 12 --image shirt.jpg
//! ```
//!
//! Cart, wishlist and session are kept in `STOREFRONT_DATA_DIR` between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atelier_core::{OrderId, OrderStatus, Price, ProductId};
use atelier_storefront::config::StorefrontConfig;
use atelier_storefront::error::AppError;

mod commands;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(author, version, about = "Atelier storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// View and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// View and edit the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Log in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create an account and log in
    Signup {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Place an order for the cart
    Checkout(CheckoutArgs),
    /// Your orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Admin dashboard
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products matching the filters
    List(ProductFilter),
    /// Show one product
    Show { id: ProductId },
}

#[derive(Args)]
struct ProductFilter {
    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    gender: Option<String>,

    #[arg(long)]
    size: Option<String>,

    #[arg(long, value_parser = parse_price)]
    min_price: Option<Price>,

    #[arg(long, value_parser = parse_price)]
    max_price: Option<Price>,

    #[arg(short, long)]
    search: Option<String>,

    #[arg(long, default_value_t = 1)]
    page: u32,

    #[arg(long)]
    limit: Option<u32>,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and total
    Show,
    /// Add a product in a size
    Add {
        product_id: ProductId,

        #[arg(short, long)]
        size: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line
    Remove {
        product_id: ProductId,

        #[arg(short, long)]
        size: String,
    },
    /// Set a line's quantity (0 or less removes it)
    Update {
        product_id: ProductId,

        #[arg(short, long)]
        size: String,

        #[arg(short, long, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    Show,
    /// Save a product
    Add { product_id: ProductId },
    /// Remove a saved product
    Remove { product_id: ProductId },
}

#[derive(Args)]
struct CheckoutArgs {
    /// Defaults to the logged-in user's name
    #[arg(long)]
    full_name: Option<String>,

    /// Defaults to the logged-in user's email
    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    address: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    zip_code: String,

    #[arg(long)]
    country: String,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List your orders
    List,
    /// Change the status of one of your orders
    Status {
        order_id: OrderId,

        #[arg(value_parser = parse_status)]
        status: OrderStatus,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List catalog products
    Products,
    /// List every order
    Orders,
    /// List every user
    Users,
    /// Change an order's status
    Status {
        order_id: OrderId,

        #[arg(value_parser = parse_status)]
        status: OrderStatus,
    },
    /// Add a product to the catalog
    CreateProduct(NewProductArgs),
    /// Remove a product from the catalog
    DeleteProduct { product_id: ProductId },
}

#[derive(Args)]
struct NewProductArgs {
    #[arg(long)]
    title: String,

    #[arg(long, default_value = "")]
    description: String,

    #[arg(long)]
    price: String,

    #[arg(long, default_value = "mens")]
    category: String,

    #[arg(long, default_value = "male")]
    gender: String,

    /// Comma-separated sizes
    #[arg(long, default_value = "XS,S,M,L,XL")]
    sizes: String,

    #[arg(long)]
    stock: String,

    /// Image file to upload (requires `UPLOAD_URL` and `UPLOAD_PRESET`)
    #[arg(long)]
    image: Option<PathBuf>,
}

fn parse_price(s: &str) -> Result<Price, String> {
    Price::parse(s).map_err(|e| e.to_string())
}

fn parse_status(s: &str) -> Result<OrderStatus, String> {
    s.parse()
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "atelier_storefront=info,atelier=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        e.report();
        tracing::error!("Command failed: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), AppError> {
    let mut ctx = commands::Context::open(config)?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List(filter) => commands::catalog::list(&ctx, filter.into()).await?,
            ProductsAction::Show { id } => commands::catalog::show(&ctx, &id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx),
            CartAction::Add {
                product_id,
                size,
                quantity,
            } => commands::cart::add(&mut ctx, &product_id, &size, quantity).await?,
            CartAction::Remove { product_id, size } => {
                commands::cart::remove(&mut ctx, &product_id, &size);
            }
            CartAction::Update {
                product_id,
                size,
                quantity,
            } => commands::cart::update(&mut ctx, &product_id, &size, quantity),
            CartAction::Clear => commands::cart::clear(&mut ctx),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::cart::show_wishlist(&ctx),
            WishlistAction::Add { product_id } => {
                commands::cart::wishlist_add(&mut ctx, &product_id).await?;
            }
            WishlistAction::Remove { product_id } => {
                commands::cart::wishlist_remove(&mut ctx, &product_id);
            }
        },
        Commands::Login { email, password } => {
            commands::account::login(&mut ctx, &email, &password).await?;
        }
        Commands::Signup {
            email,
            password,
            first_name,
            last_name,
        } => {
            commands::account::signup(&mut ctx, email, password, first_name, last_name).await?;
        }
        Commands::Logout => commands::account::logout(&mut ctx),
        Commands::Whoami => commands::account::whoami(&ctx),
        Commands::Checkout(args) => commands::checkout::run(&mut ctx, args).await?,
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::account::orders(&ctx).await?,
            OrdersAction::Status { order_id, status } => {
                commands::account::update_status(&ctx, &order_id, status).await?;
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::Products => commands::admin::products(&ctx).await?,
            AdminAction::Orders => commands::admin::orders(&ctx).await?,
            AdminAction::Users => commands::admin::users(&ctx).await?,
            AdminAction::Status { order_id, status } => {
                commands::admin::update_status(&ctx, &order_id, status).await?;
            }
            AdminAction::CreateProduct(args) => commands::admin::create_product(&ctx, args).await?,
            AdminAction::DeleteProduct { product_id } => {
                commands::admin::delete_product(&ctx, &product_id).await?;
            }
        },
    }
    Ok(())
}

impl From<ProductFilter> for atelier_storefront::api::ProductQuery {
    fn from(filter: ProductFilter) -> Self {
        Self {
            category: filter.category,
            gender: filter.gender,
            size: filter.size,
            min_price: filter.min_price,
            max_price: filter.max_price,
            search: filter.search,
            page: filter.page.max(1),
            limit: filter.limit,
        }
    }
}
