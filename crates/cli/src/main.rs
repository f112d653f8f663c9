//! Tiffin CLI - catalog browsing and cart management.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, narrowed by filters
//! tiffin products list --category lunchbox --search paneer
//!
//! # Show a single product
//! tiffin products show prod-42
//!
//! # Manage the locally persisted cart
//! tiffin cart add prod-42 --quantity 2
//! tiffin cart show
//! tiffin cart clear
//! ```
//!
//! # Commands
//!
//! - `products list` - Fetch the catalog and print the filtered view
//! - `products show` - Fetch and print one product
//! - `cart show|add|remove|increase|decrease|clear` - Cart operations

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "tiffin")]
#[command(author, version, about = "Tiffin marketplace CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Inspect and mutate the locally persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// Fetch the catalog and print it, narrowed by the given filters
    List(ListArgs),
    /// Fetch a single product and print it
    Show {
        /// Product ID
        id: String,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Only products in this category
    #[arg(long)]
    category: Option<String>,

    /// Case-insensitive name or SKU substring
    #[arg(long)]
    search: Option<String>,

    /// Lower price bound, inclusive
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Upper price bound, inclusive
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Only products from this seller (repeatable)
    #[arg(long = "brand")]
    brands: Vec<String>,

    /// Only products with a variant in this color (repeatable)
    #[arg(long = "color")]
    colors: Vec<String>,

    /// Delivery window: `today`, `tomorrow` or `week`
    #[arg(long)]
    delivery: Option<String>,

    /// Only featured products
    #[arg(long)]
    featured: bool,
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart contents and totals
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        product_id: String,

        /// Number of units to add
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line from the cart
    Remove {
        /// Product ID
        product_id: String,
    },
    /// Increase a line's quantity by one
    Increase {
        /// Product ID
        product_id: String,
    },
    /// Decrease a line's quantity by one (never below one)
    Decrease {
        /// Product ID
        product_id: String,
    },
    /// Remove every line from the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List(args) => commands::products::list(&args).await?,
            ProductsAction::Show { id } => commands::products::show(&id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show()?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&product_id, quantity).await?,
            CartAction::Remove { product_id } => commands::cart::remove(&product_id)?,
            CartAction::Increase { product_id } => commands::cart::increase(&product_id)?,
            CartAction::Decrease { product_id } => commands::cart::decrease(&product_id)?,
            CartAction::Clear => commands::cart::clear()?,
        },
    }
    Ok(())
}
