//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::{CategoryId, ProductId};
use crate::types::product::{Product, Variant};

/// A line in the shopping cart.
///
/// Product data is copied at add-time so the cart stays renderable when the
/// catalog is unavailable, and later catalog edits never retroactively
/// change a cart line. Pricing always uses the first variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// ID of the product this line was created from. Unique within a cart.
    pub id: ProductId,
    /// Product name at add-time.
    pub name: String,
    /// Primary image URL at add-time.
    pub image: String,
    /// Category at add-time.
    pub category: CategoryId,
    /// Variant list at add-time, default variant first.
    pub variants: Vec<Variant>,
    /// Number of units. Never below 1; removing the line is the only path
    /// to zero.
    pub quantity: u32,
}

impl CartItem {
    /// Create a line item from a catalog product, with quantity 1.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
            variants: product.variants.clone(),
            quantity: 1,
        }
    }

    /// Unit price: the first variant's price, or zero when the product had
    /// no variants.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.variants.first().map_or(Decimal::ZERO, |v| v.price)
    }

    /// Line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }
}
