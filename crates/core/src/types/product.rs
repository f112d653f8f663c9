//! Catalog entities served by the platform products API.
//!
//! These types mirror the REST wire format (camelCase field names). The
//! catalog store consumes them read-only; the cart copies what it needs at
//! add-time instead of holding references into the catalog.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::{CategoryId, ProductId, SellerId, VariantId};

// =============================================================================
// Seller Types
// =============================================================================

/// A single customer rating for a seller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerRating {
    /// Rating score (1.0 through 5.0).
    pub score: f32,
    /// When the rating was left.
    pub created_at: DateTime<Utc>,
}

/// Seller summary denormalized into each product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerSummary {
    /// Seller ID.
    pub id: SellerId,
    /// Seller display name. Brand filtering matches on this.
    pub name: String,
    /// Logo URL.
    pub logo: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Whether the platform has approved this seller.
    pub is_approved: bool,
    /// Ratings left by customers.
    #[serde(default)]
    pub ratings: Vec<SellerRating>,
}

impl SellerSummary {
    /// Mean rating score, or `None` when the seller has no ratings yet.
    #[must_use]
    pub fn average_rating(&self) -> Option<f32> {
        if self.ratings.is_empty() {
            return None;
        }
        let sum: f32 = self.ratings.iter().map(|r| r.score).sum();
        #[allow(clippy::cast_precision_loss)]
        Some(sum / self.ratings.len() as f32)
    }
}

// =============================================================================
// Product Types
// =============================================================================

/// Image attached to a product variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantImage {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Variant ID.
    pub id: VariantId,
    /// Variant display name (e.g., "Family size").
    pub name: String,
    /// Current unit price.
    pub price: Decimal,
    /// Whether this variant can currently be ordered.
    pub is_available: bool,
    /// Color tag used by catalog filtering, when the variant has one.
    pub color: Option<String>,
    /// Variant images.
    #[serde(default)]
    pub images: Vec<VariantImage>,
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Product display name.
    pub name: String,
    /// Plain text description.
    pub description: String,
    /// Primary image URL.
    pub image: String,
    /// Category this product belongs to.
    #[serde(rename = "productType")]
    pub category: CategoryId,
    /// Whether the product can currently be ordered.
    pub is_available: bool,
    /// Whether the product is featured on the home page.
    pub is_featured: bool,
    /// Stock keeping unit, when the seller assigns one.
    pub sku: Option<String>,
    /// Promised delivery horizon in days (0 = same day). Absent when the
    /// seller makes no delivery promise.
    pub delivery_days: Option<u32>,
    /// The seller offering this product.
    #[serde(rename = "store")]
    pub seller: SellerSummary,
    /// Purchasable variants, default variant first.
    pub variants: Vec<Variant>,
}

impl Product {
    /// The default variant (first in the list), used for pricing and list
    /// rendering. `None` only for a catalog entry with no variants at all.
    #[must_use]
    pub fn default_variant(&self) -> Option<&Variant> {
        self.variants.first()
    }
}
