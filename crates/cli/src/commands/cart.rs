//! Cart commands against the locally persisted cart.
//!
//! Every mutation is written straight through to the cart file under the
//! configured data directory, so the cart survives between invocations.
//!
//! # Usage
//!
//! ```bash
//! tiffin cart add prod-42 --quantity 2
//! tiffin cart decrease prod-42
//! tiffin cart show
//! ```
//!
//! # Environment Variables
//!
//! - `TIFFIN_API_BASE_URL` - Base URL of the platform API (required)
//! - `TIFFIN_DATA_DIR` - Directory holding the persisted cart

use thiserror::Error;

use tiffin_core::ProductId;
use tiffin_storefront::api::ApiError;
use tiffin_storefront::config::{ConfigError, StorefrontConfig};
use tiffin_storefront::state::AppState;
use tiffin_storefront::stores::CartSnapshot;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed.
    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    /// The product to add is absent or unreachable.
    #[error("No product available with id: {0}")]
    NotFound(ProductId),
}

/// Print the cart contents and totals.
pub fn show() -> Result<(), CartError> {
    let state = connect()?;
    render(&state.cart().snapshot());
    Ok(())
}

/// Resolve a product through the catalog and add it to the cart.
pub async fn add(product_id: &str, quantity: u32) -> Result<(), CartError> {
    let state = connect()?;
    let id = ProductId::new(product_id);

    tracing::info!(id = %id, "Resolving product...");
    state.catalog().fetch_product(&id).await;

    let snapshot = state.catalog().snapshot();
    let product = snapshot
        .selected
        .as_ref()
        .ok_or_else(|| CartError::NotFound(id.clone()))?;

    // Adding an existing line bumps its quantity, so repeating covers
    // both the first unit and the rest
    for _ in 0..quantity.max(1) {
        state.cart().add_to_cart(product);
    }

    render(&state.cart().snapshot());
    Ok(())
}

/// Remove a line from the cart.
pub fn remove(product_id: &str) -> Result<(), CartError> {
    let state = connect()?;
    state.cart().remove_from_cart(&ProductId::new(product_id));
    render(&state.cart().snapshot());
    Ok(())
}

/// Increase a line's quantity by one.
pub fn increase(product_id: &str) -> Result<(), CartError> {
    let state = connect()?;
    state.cart().increment_quantity(&ProductId::new(product_id));
    render(&state.cart().snapshot());
    Ok(())
}

/// Decrease a line's quantity by one, never below one.
pub fn decrease(product_id: &str) -> Result<(), CartError> {
    let state = connect()?;
    state.cart().decrement_quantity(&ProductId::new(product_id));
    render(&state.cart().snapshot());
    Ok(())
}

/// Remove every line from the cart.
pub fn clear() -> Result<(), CartError> {
    let state = connect()?;
    state.cart().clear_cart();
    render(&state.cart().snapshot());
    Ok(())
}

fn connect() -> Result<AppState, CartError> {
    let config = StorefrontConfig::from_env()?;
    Ok(AppState::new(config)?)
}

fn render(cart: &CartSnapshot) {
    #[allow(clippy::print_stdout)]
    {
        if cart.is_empty() {
            println!("Cart is empty");
            return;
        }
        println!(
            "Cart: {} line(s), {} unit(s), subtotal {}",
            cart.len(),
            cart.total_items(),
            cart.subtotal()
        );
        println!();
        for item in &cart.items {
            println!(
                "  {:<12} {:<36} x{:<4} {:>10}",
                item.id,
                item.name,
                item.quantity,
                item.line_total()
            );
        }
    }
}
