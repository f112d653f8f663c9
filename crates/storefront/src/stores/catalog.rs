//! Catalog state container.
//!
//! Holds the fetched product listing, the active filter criteria, and the
//! filtered view derived from them. Like the cart, state is published as
//! immutable snapshots and replaced wholesale: the filtered list is
//! recomputed inside the same swap as the criteria change that caused it,
//! so no reader ever sees criteria and results out of step.
//!
//! Fetch operations absorb errors at this boundary: failures are logged,
//! previously fetched data stays as it was, and the loading flag is always
//! cleared.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use tiffin_core::{CategoryId, Product, ProductId};

use super::criteria::{
    CategorySelection, CriteriaUpdate, DeliveryWindow, FilterCriteria, PriceRange, ViewMode,
};
use crate::api::ProductsApi;

// =============================================================================
// CatalogSnapshot
// =============================================================================

/// Immutable point-in-time view of the catalog.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    /// The listing as last fetched, unfiltered.
    pub products: Vec<Product>,
    /// `products` narrowed by `criteria`, in listing order. Always derived,
    /// never hand-edited.
    pub filtered: Vec<Product>,
    /// Result of the most recent single-product fetch. `None` either before
    /// any fetch or after the platform reported the product absent.
    pub selected: Option<Product>,
    /// Criteria the filtered view was computed under.
    pub criteria: FilterCriteria,
    /// Presentation mode for the listing.
    pub view_mode: ViewMode,
}

impl CatalogSnapshot {
    /// Distinct categories across the listing, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryId> {
        let set: BTreeSet<CategoryId> =
            self.products.iter().map(|p| p.category.clone()).collect();
        set.into_iter().collect()
    }

    /// Distinct seller names across the listing, sorted.
    #[must_use]
    pub fn brands(&self) -> Vec<String> {
        let set: BTreeSet<String> = self
            .products
            .iter()
            .map(|p| p.seller.name.clone())
            .collect();
        set.into_iter().collect()
    }

    /// Distinct variant color tags across the listing, sorted.
    #[must_use]
    pub fn colors(&self) -> Vec<String> {
        let set: BTreeSet<String> = self
            .products
            .iter()
            .flat_map(|p| p.variants.iter().filter_map(|v| v.color.clone()))
            .collect();
        set.into_iter().collect()
    }

    /// Lowest and highest variant price across the listing, or `None` when
    /// no product has a variant.
    #[must_use]
    pub fn price_bounds(&self) -> Option<(Decimal, Decimal)> {
        let mut bounds: Option<(Decimal, Decimal)> = None;
        for price in self
            .products
            .iter()
            .flat_map(|p| p.variants.iter().map(|v| v.price))
        {
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(price), max.max(price)),
                None => (price, price),
            });
        }
        bounds
    }

    /// Products flagged as featured, in listing order.
    #[must_use]
    pub fn featured(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_featured).collect()
    }
}

// =============================================================================
// CatalogStore
// =============================================================================

/// The catalog state container.
///
/// Cheap to clone; all clones share the same state and API client.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<CatalogStoreInner>,
}

struct CatalogStoreInner {
    api: Arc<dyn ProductsApi>,
    state: RwLock<Arc<CatalogSnapshot>>,
    /// Shared by both fetch paths; only `fetch_products` guards on it.
    loading: AtomicBool,
    /// ID of the most recently requested single product. A completing fetch
    /// publishes its response only while its ID still matches.
    detail_request: Mutex<Option<ProductId>>,
}

impl CatalogStore {
    /// Create a catalog store over the given products API.
    #[must_use]
    pub fn new(api: Arc<dyn ProductsApi>) -> Self {
        Self {
            inner: Arc::new(CatalogStoreInner {
                api,
                state: RwLock::new(Arc::new(CatalogSnapshot::default())),
                loading: AtomicBool::new(false),
                detail_request: Mutex::new(None),
            }),
        }
    }

    /// Fetch the product listing and recompute the filtered view under the
    /// current criteria.
    ///
    /// At most one listing fetch runs at a time: a call that finds the
    /// loading flag already set returns without touching the network. On
    /// failure the previous listing stays in place. The flag is cleared on
    /// every completion path.
    pub async fn fetch_products(&self) {
        if self
            .inner
            .loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Product fetch already in flight, skipping");
            return;
        }

        match self.inner.api.list_products().await {
            Ok(products) => {
                debug!(count = products.len(), "Fetched product listing");
                self.replace_state(move |current| CatalogSnapshot {
                    filtered: current.criteria.apply(&products),
                    products,
                    selected: current.selected.clone(),
                    criteria: current.criteria.clone(),
                    view_mode: current.view_mode,
                });
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch product listing");
            }
        }

        self.inner.loading.store(false, Ordering::SeqCst);
    }

    /// Fetch a single product into `selected`.
    ///
    /// Concurrent calls resolve last-requested-wins: each call stamps the
    /// shared request ID, and a response is discarded when a newer request
    /// has been stamped since. An absent product (the platform 404s)
    /// publishes `selected = None`; a transport or parse failure leaves the
    /// previous value in place.
    ///
    /// Unlike `fetch_products`, this path sets the shared loading flag
    /// without guarding on it, so it may run while a listing fetch is in
    /// flight.
    pub async fn fetch_product(&self, id: &ProductId) {
        self.stamp_detail_request(id);
        self.inner.loading.store(true, Ordering::SeqCst);

        match self.inner.api.get_product(id).await {
            Ok(selected) => {
                if selected.is_none() {
                    debug!(id = %id, "Product not found");
                }
                if !self.commit_detail(id, selected) {
                    debug!(id = %id, "Discarding stale product response");
                }
            }
            Err(e) => {
                warn!(error = %e, id = %id, "Failed to fetch product");
            }
        }

        self.inner.loading.store(false, Ordering::SeqCst);
    }

    /// Apply a partial criteria update and recompute the filtered view in
    /// one atomic swap.
    pub fn set_criteria(&self, update: CriteriaUpdate) {
        self.mutate_criteria(move |criteria| update.apply_to(criteria));
    }

    /// Replace the category criterion.
    pub fn set_category(&self, category: CategorySelection) {
        self.set_criteria(CriteriaUpdate {
            category: Some(category),
            ..CriteriaUpdate::default()
        });
    }

    /// Replace the search criterion. An empty string deactivates it.
    pub fn set_search(&self, search: impl Into<String>) {
        self.set_criteria(CriteriaUpdate {
            search: Some(search.into()),
            ..CriteriaUpdate::default()
        });
    }

    /// Replace the price range criterion.
    pub fn set_price_range(&self, price_range: PriceRange) {
        self.set_criteria(CriteriaUpdate {
            price_range: Some(price_range),
            ..CriteriaUpdate::default()
        });
    }

    /// Replace the delivery window criterion.
    pub fn set_delivery_window(&self, delivery: DeliveryWindow) {
        self.set_criteria(CriteriaUpdate {
            delivery: Some(delivery),
            ..CriteriaUpdate::default()
        });
    }

    /// Toggle a seller name in or out of the brand criterion.
    pub fn toggle_brand(&self, brand: &str) {
        self.mutate_criteria(move |criteria| {
            let mut next = criteria.clone();
            if !next.brands.remove(brand) {
                next.brands.insert(brand.to_owned());
            }
            next
        });
    }

    /// Toggle a color tag in or out of the color criterion.
    pub fn toggle_color(&self, color: &str) {
        self.mutate_criteria(move |criteria| {
            let mut next = criteria.clone();
            if !next.colors.remove(color) {
                next.colors.insert(color.to_owned());
            }
            next
        });
    }

    /// Switch between grid and list rendering. Presentation-only: the
    /// filtered view is not recomputed.
    pub fn set_view_mode(&self, view_mode: ViewMode) {
        self.replace_state(move |current| CatalogSnapshot {
            products: current.products.clone(),
            filtered: current.filtered.clone(),
            selected: current.selected.clone(),
            criteria: current.criteria.clone(),
            view_mode,
        });
    }

    /// Recompute the filtered view from the current listing and criteria.
    /// Idempotent; criterion mutations already do this implicitly.
    pub fn apply_filters(&self) {
        self.mutate_criteria(Clone::clone);
    }

    /// Whether either fetch path is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst)
    }

    /// Current snapshot of the catalog.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.inner
            .state
            .read()
            .map(|guard| Arc::clone(&guard))
            .unwrap_or_default()
    }

    fn stamp_detail_request(&self, id: &ProductId) {
        match self.inner.detail_request.lock() {
            Ok(mut guard) => *guard = Some(id.clone()),
            Err(_) => warn!("Detail request lock poisoned"),
        }
    }

    /// Publish `selected` only if `id` is still the most recently requested
    /// product. The tag lock is held across the swap so a concurrent fetch
    /// cannot interleave between check and publish.
    fn commit_detail(&self, id: &ProductId, selected: Option<Product>) -> bool {
        let Ok(guard) = self.inner.detail_request.lock() else {
            warn!("Detail request lock poisoned, dropping response");
            return false;
        };
        if guard.as_ref() != Some(id) {
            return false;
        }

        self.replace_state(move |current| CatalogSnapshot {
            products: current.products.clone(),
            filtered: current.filtered.clone(),
            selected,
            criteria: current.criteria.clone(),
            view_mode: current.view_mode,
        });
        true
    }

    /// Mutate the criteria and recompute the filtered view in the same
    /// state swap.
    fn mutate_criteria<F>(&self, f: F)
    where
        F: FnOnce(&FilterCriteria) -> FilterCriteria,
    {
        self.replace_state(move |current| {
            let criteria = f(&current.criteria);
            CatalogSnapshot {
                filtered: criteria.apply(&current.products),
                products: current.products.clone(),
                selected: current.selected.clone(),
                criteria,
                view_mode: current.view_mode,
            }
        });
    }

    /// Build the next snapshot from the current one and swap it in.
    fn replace_state<F>(&self, f: F)
    where
        F: FnOnce(&CatalogSnapshot) -> CatalogSnapshot,
    {
        match self.inner.state.write() {
            Ok(mut guard) => {
                let next = f(guard.as_ref());
                *guard = Arc::new(next);
            }
            Err(_) => warn!("Catalog state lock poisoned, dropping update"),
        }
    }
}
