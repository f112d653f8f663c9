//! Filter criteria and the matching rules behind the catalog's filtered view.
//!
//! Criteria combine with AND: a product survives only if it satisfies every
//! active criterion. Within one criterion the selected values combine with
//! OR (any selected brand, any selected color). An inactive criterion (the
//! `All` category, an empty search, the full price range, no selected
//! brands or colors, the `Any` delivery window) excludes nothing.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use tiffin_core::{CategoryId, Product};

// =============================================================================
// Criterion Types
// =============================================================================

/// Category criterion: everything, or exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    /// Sentinel that matches every product.
    #[default]
    All,
    /// Keep only products in this category.
    Category(CategoryId),
}

/// Inclusive price range criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    /// The range spanning every representable price.
    pub const FULL: Self = Self {
        min: Decimal::ZERO,
        max: Decimal::MAX,
    };

    /// Create a range; callers are expected to pass `min <= max`.
    #[must_use]
    pub const fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// Whether `price` falls inside the range (inclusive on both ends).
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }

    /// Whether this is the do-nothing full range.
    #[must_use]
    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Delivery window criterion, bucketed the way the storefront offers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryWindow {
    /// No delivery constraint.
    #[default]
    Any,
    /// Same-day delivery.
    Today,
    /// Delivery within one day.
    Tomorrow,
    /// Delivery within seven days.
    WithinWeek,
}

impl DeliveryWindow {
    /// Parse from a URL or CLI parameter value.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "today" => Self::Today,
            "tomorrow" => Self::Tomorrow,
            "week" | "within-week" => Self::WithinWeek,
            _ => Self::Any,
        }
    }

    /// Convert to a URL or CLI parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::WithinWeek => "week",
        }
    }

    /// Maximum promised delivery days this window accepts, or `None` when
    /// the window accepts everything.
    #[must_use]
    pub const fn max_days(self) -> Option<u32> {
        match self {
            Self::Any => None,
            Self::Today => Some(0),
            Self::Tomorrow => Some(1),
            Self::WithinWeek => Some(7),
        }
    }
}

/// How the catalog is rendered. Presentation-only: changing it never
/// touches the filtered results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    /// Parse from a URL or CLI parameter value.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "list" => Self::List,
            _ => Self::Grid,
        }
    }

    /// Convert to a URL or CLI parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }
}

// =============================================================================
// FilterCriteria
// =============================================================================

/// The complete set of active filter criteria.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    /// Category criterion.
    pub category: CategorySelection,
    /// Case-insensitive substring matched against product name or SKU.
    /// Empty means inactive.
    pub search: String,
    /// Inclusive price range; a product needs one variant priced inside it.
    pub price_range: PriceRange,
    /// Selected seller names. Empty means inactive.
    pub brands: BTreeSet<String>,
    /// Selected variant color tags. Empty means inactive.
    pub colors: BTreeSet<String>,
    /// Delivery window criterion.
    pub delivery: DeliveryWindow,
}

impl FilterCriteria {
    /// Whether `product` satisfies every active criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let CategorySelection::Category(category) = &self.category
            && product.category != *category
        {
            return false;
        }

        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let name_hit = product.name.to_lowercase().contains(&needle);
            let sku_hit = product
                .sku
                .as_ref()
                .is_some_and(|sku| sku.to_lowercase().contains(&needle));
            if !name_hit && !sku_hit {
                return false;
            }
        }

        if !self.price_range.is_full()
            && !product
                .variants
                .iter()
                .any(|v| self.price_range.contains(v.price))
        {
            return false;
        }

        if !self.brands.is_empty() && !self.brands.contains(product.seller.name.as_str()) {
            return false;
        }

        if !self.colors.is_empty()
            && !product.variants.iter().any(|v| {
                v.color
                    .as_deref()
                    .is_some_and(|color| self.colors.contains(color))
            })
        {
            return false;
        }

        if let Some(max_days) = self.delivery.max_days() {
            // A product without a delivery promise cannot satisfy a window
            match product.delivery_days {
                Some(days) if days <= max_days => {}
                _ => return false,
            }
        }

        true
    }

    /// Filter `products` down to the ones matching every active criterion,
    /// preserving order.
    #[must_use]
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        products
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect()
    }
}

/// Partial criteria change applied atomically by the catalog store.
///
/// `None` fields leave the corresponding criterion untouched.
#[derive(Debug, Clone, Default)]
pub struct CriteriaUpdate {
    pub category: Option<CategorySelection>,
    pub search: Option<String>,
    pub price_range: Option<PriceRange>,
    pub brands: Option<BTreeSet<String>>,
    pub colors: Option<BTreeSet<String>>,
    pub delivery: Option<DeliveryWindow>,
}

impl CriteriaUpdate {
    /// Produce the criteria that result from applying this update.
    #[must_use]
    pub fn apply_to(&self, criteria: &FilterCriteria) -> FilterCriteria {
        FilterCriteria {
            category: self
                .category
                .clone()
                .unwrap_or_else(|| criteria.category.clone()),
            search: self.search.clone().unwrap_or_else(|| criteria.search.clone()),
            price_range: self.price_range.unwrap_or(criteria.price_range),
            brands: self.brands.clone().unwrap_or_else(|| criteria.brands.clone()),
            colors: self.colors.clone().unwrap_or_else(|| criteria.colors.clone()),
            delivery: self.delivery.unwrap_or(criteria.delivery),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tiffin_core::{ProductId, SellerId, SellerSummary, Variant, VariantId};

    use super::*;

    fn seller(name: &str) -> SellerSummary {
        SellerSummary {
            id: SellerId::new(format!("seller-{name}")),
            name: name.to_owned(),
            logo: None,
            phone: None,
            email: None,
            is_approved: true,
            ratings: Vec::new(),
        }
    }

    fn variant(price: &str, color: Option<&str>) -> Variant {
        Variant {
            id: VariantId::new("var-1"),
            name: "Regular".to_owned(),
            price: price.parse().unwrap(),
            is_available: true,
            color: color.map(str::to_owned),
            images: Vec::new(),
        }
    }

    fn product(
        id: &str,
        name: &str,
        category: &str,
        brand: &str,
        variants: Vec<Variant>,
        delivery_days: Option<u32>,
    ) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: String::new(),
            image: String::new(),
            category: CategoryId::new(category),
            is_available: true,
            is_featured: false,
            sku: Some(format!("SKU-{id}")),
            delivery_days,
            seller: seller(brand),
            variants,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(
                "p1",
                "Paneer Tiffin",
                "lunchbox",
                "Amma's Kitchen",
                vec![variant("8.50", Some("green"))],
                Some(0),
            ),
            product(
                "p2",
                "Steel Tiffin Carrier",
                "containers",
                "SteelWorks",
                vec![variant("24.00", Some("silver")), variant("30.00", None)],
                Some(3),
            ),
            product(
                "p3",
                "Masala Dosa Kit",
                "breakfast",
                "Amma's Kitchen",
                vec![variant("12.00", None)],
                None,
            ),
        ]
    }

    #[test]
    fn test_default_criteria_match_everything() {
        let criteria = FilterCriteria::default();
        let filtered = criteria.apply(&catalog());
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_category_criterion() {
        let criteria = FilterCriteria {
            category: CategorySelection::Category(CategoryId::new("lunchbox")),
            ..FilterCriteria::default()
        };
        let filtered = criteria.apply(&catalog());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().unwrap().id.as_str(), "p1");
    }

    #[test]
    fn test_search_matches_name_case_insensitively() {
        let criteria = FilterCriteria {
            search: "TIFFIN".to_owned(),
            ..FilterCriteria::default()
        };
        assert_eq!(criteria.apply(&catalog()).len(), 2);
    }

    #[test]
    fn test_search_matches_sku() {
        let criteria = FilterCriteria {
            search: "sku-p3".to_owned(),
            ..FilterCriteria::default()
        };
        let filtered = criteria.apply(&catalog());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().unwrap().id.as_str(), "p3");
    }

    #[test]
    fn test_price_range_matches_any_variant() {
        // p2's cheaper variant is 24.00; the range catches it even though
        // the other variant is outside
        let criteria = FilterCriteria {
            price_range: PriceRange::new("20.00".parse().unwrap(), "25.00".parse().unwrap()),
            ..FilterCriteria::default()
        };
        let filtered = criteria.apply(&catalog());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().unwrap().id.as_str(), "p2");
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let criteria = FilterCriteria {
            price_range: PriceRange::new("8.50".parse().unwrap(), "8.50".parse().unwrap()),
            ..FilterCriteria::default()
        };
        assert_eq!(criteria.apply(&catalog()).len(), 1);
    }

    #[test]
    fn test_brand_criterion_ors_selected_values() {
        let mut brands = BTreeSet::new();
        brands.insert("Amma's Kitchen".to_owned());
        brands.insert("SteelWorks".to_owned());
        let criteria = FilterCriteria {
            brands,
            ..FilterCriteria::default()
        };
        assert_eq!(criteria.apply(&catalog()).len(), 3);
    }

    #[test]
    fn test_color_criterion_matches_any_variant_color() {
        let mut colors = BTreeSet::new();
        colors.insert("silver".to_owned());
        let criteria = FilterCriteria {
            colors,
            ..FilterCriteria::default()
        };
        let filtered = criteria.apply(&catalog());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().unwrap().id.as_str(), "p2");
    }

    #[test]
    fn test_delivery_window_buckets() {
        let today = FilterCriteria {
            delivery: DeliveryWindow::Today,
            ..FilterCriteria::default()
        };
        assert_eq!(today.apply(&catalog()).len(), 1);

        let tomorrow = FilterCriteria {
            delivery: DeliveryWindow::Tomorrow,
            ..FilterCriteria::default()
        };
        assert_eq!(tomorrow.apply(&catalog()).len(), 1);

        let week = FilterCriteria {
            delivery: DeliveryWindow::WithinWeek,
            ..FilterCriteria::default()
        };
        // p3 has no promised delivery and stays excluded
        assert_eq!(week.apply(&catalog()).len(), 2);
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let mut brands = BTreeSet::new();
        brands.insert("Amma's Kitchen".to_owned());
        let criteria = FilterCriteria {
            search: "tiffin".to_owned(),
            brands,
            ..FilterCriteria::default()
        };
        // "tiffin" matches p1 and p2, but only p1 is from Amma's Kitchen
        let filtered = criteria.apply(&catalog());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.first().unwrap().id.as_str(), "p1");
    }

    #[test]
    fn test_update_preserves_untouched_criteria() {
        let base = FilterCriteria {
            search: "tiffin".to_owned(),
            delivery: DeliveryWindow::WithinWeek,
            ..FilterCriteria::default()
        };

        let update = CriteriaUpdate {
            search: Some(String::new()),
            ..CriteriaUpdate::default()
        };
        let next = update.apply_to(&base);

        assert!(next.search.is_empty());
        assert_eq!(next.delivery, DeliveryWindow::WithinWeek);
    }

    #[test]
    fn test_delivery_window_parse_round_trip() {
        for window in [
            DeliveryWindow::Any,
            DeliveryWindow::Today,
            DeliveryWindow::Tomorrow,
            DeliveryWindow::WithinWeek,
        ] {
            assert_eq!(DeliveryWindow::parse(window.as_str()), window);
        }
        assert_eq!(DeliveryWindow::parse("nonsense"), DeliveryWindow::Any);
    }

    #[test]
    fn test_view_mode_parse_round_trip() {
        assert_eq!(ViewMode::parse("list"), ViewMode::List);
        assert_eq!(ViewMode::parse("grid"), ViewMode::Grid);
        assert_eq!(ViewMode::parse("nonsense"), ViewMode::Grid);
    }
}
