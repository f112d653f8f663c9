//! Platform products API client.
//!
//! # Architecture
//!
//! - REST endpoints under `/api/products` - the platform is the source of
//!   truth, NO local sync, direct API calls
//! - In-memory caching via `moka` for API responses (TTL from config)
//! - Stores depend on the [`ProductsApi`] trait, so tests substitute a stub
//!   without any HTTP
//!
//! # Example
//!
//! ```rust,ignore
//! use tiffin_storefront::api::{HttpProductsApi, ProductsApi};
//!
//! let api = HttpProductsApi::new(&config)?;
//!
//! // Full catalog listing
//! let products = api.list_products().await?;
//!
//! // Single product; Ok(None) when the platform has no such product
//! let product = api.get_product(&"prod-1".into()).await?;
//! ```

mod http;

pub use http::HttpProductsApi;

use async_trait::async_trait;
use thiserror::Error;

use tiffin_core::{Product, ProductId};

/// Errors that can occur when talking to the products API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with an unexpected status code.
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the platform.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// Read access to the platform product catalog.
#[async_trait]
pub trait ProductsApi: Send + Sync {
    /// Fetch the full product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// parsed.
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Fetch a single product by ID.
    ///
    /// Returns `Ok(None)` when the platform has no product with this ID;
    /// absence is data, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// parsed.
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, ApiError>;
}
