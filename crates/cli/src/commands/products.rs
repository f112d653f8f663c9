//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! # Everything from one seller, cheapest view of the catalog
//! tiffin products list --brand "Amma's Kitchen" --max-price 15
//!
//! # One product in full
//! tiffin products show prod-42
//! ```
//!
//! # Environment Variables
//!
//! - `TIFFIN_API_BASE_URL` - Base URL of the platform API (required)
//! - `TIFFIN_API_TOKEN` - Optional bearer token for the platform API
//! - `TIFFIN_DATA_DIR` - Directory holding the persisted cart

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use thiserror::Error;

use tiffin_core::{CategoryId, Product, ProductId};
use tiffin_storefront::api::ApiError;
use tiffin_storefront::config::{ConfigError, StorefrontConfig};
use tiffin_storefront::state::AppState;
use tiffin_storefront::stores::{CategorySelection, CriteriaUpdate, DeliveryWindow, PriceRange};

use crate::ListArgs;

/// Errors that can occur during catalog commands.
#[derive(Debug, Error)]
pub enum ProductsError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed.
    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    /// The requested product is absent or unreachable.
    #[error("No product available with id: {0}")]
    NotFound(ProductId),
}

/// Fetch the catalog and print the filtered view.
pub async fn list(args: &ListArgs) -> Result<(), ProductsError> {
    let state = connect()?;

    tracing::info!("Fetching product catalog...");
    state.catalog().fetch_products().await;
    state.catalog().set_criteria(criteria_update(args));

    let snapshot = state.catalog().snapshot();
    let rows: Vec<&Product> = snapshot
        .filtered
        .iter()
        .filter(|p| !args.featured || p.is_featured)
        .collect();

    #[allow(clippy::print_stdout)]
    {
        if rows.is_empty() {
            println!(
                "No products matched ({} in catalog)",
                snapshot.products.len()
            );
        } else {
            println!("{} of {} products:", rows.len(), snapshot.products.len());
            println!();
            for product in rows {
                println!("  {}", format_product_line(product));
            }
        }
    }

    Ok(())
}

/// Fetch a single product and print it in full.
pub async fn show(id: &str) -> Result<(), ProductsError> {
    let state = connect()?;
    let id = ProductId::new(id);

    tracing::info!(id = %id, "Fetching product...");
    state.catalog().fetch_product(&id).await;

    let snapshot = state.catalog().snapshot();
    let product = snapshot
        .selected
        .as_ref()
        .ok_or_else(|| ProductsError::NotFound(id.clone()))?;

    #[allow(clippy::print_stdout)]
    {
        println!("{} ({})", product.name, product.id);
        println!("  Category:   {}", product.category);
        match product.seller.average_rating() {
            Some(avg) => println!("  Seller:     {} (rated {avg:.1})", product.seller.name),
            None => println!("  Seller:     {}", product.seller.name),
        }
        if let Some(days) = product.delivery_days {
            println!("  Delivery:   {days} day(s)");
        }
        if let Some(sku) = &product.sku {
            println!("  SKU:        {sku}");
        }
        println!(
            "  Available:  {}",
            if product.is_available { "yes" } else { "no" }
        );
        if product.is_featured {
            println!("  Featured:   yes");
        }
        if !product.description.is_empty() {
            println!();
            println!("  {}", product.description);
        }
        if !product.variants.is_empty() {
            println!();
            println!("  Variants:");
            for variant in &product.variants {
                let color = variant.color.as_deref().unwrap_or("-");
                let availability = if variant.is_available {
                    "available"
                } else {
                    "unavailable"
                };
                println!(
                    "    {:<14} {:<20} {:>10}  {:<10} {}",
                    variant.id, variant.name, variant.price, color, availability
                );
            }
        }
    }

    Ok(())
}

fn connect() -> Result<AppState, ProductsError> {
    let config = StorefrontConfig::from_env()?;
    Ok(AppState::new(config)?)
}

/// Translate command-line flags into one partial criteria update.
fn criteria_update(args: &ListArgs) -> CriteriaUpdate {
    let price_range = (args.min_price.is_some() || args.max_price.is_some()).then(|| {
        PriceRange::new(
            args.min_price.unwrap_or(Decimal::ZERO),
            args.max_price.unwrap_or(Decimal::MAX),
        )
    });

    CriteriaUpdate {
        category: args
            .category
            .as_deref()
            .map(|c| CategorySelection::Category(CategoryId::new(c))),
        search: args.search.clone(),
        price_range,
        brands: (!args.brands.is_empty())
            .then(|| args.brands.iter().cloned().collect::<BTreeSet<_>>()),
        colors: (!args.colors.is_empty())
            .then(|| args.colors.iter().cloned().collect::<BTreeSet<_>>()),
        delivery: args.delivery.as_deref().map(DeliveryWindow::parse),
    }
}

fn format_product_line(product: &Product) -> String {
    let price = product
        .default_variant()
        .map_or_else(|| "-".to_owned(), |v| v.price.to_string());
    let featured = if product.is_featured {
        "  [featured]"
    } else {
        ""
    };
    format!(
        "{:<12} {:<36} {:>10}  {}{}",
        product.id, product.name, price, product.seller.name, featured
    )
}
