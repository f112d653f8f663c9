//! Shopping cart state container.
//!
//! State is published as immutable snapshots behind an `Arc`: every
//! mutation builds a fresh item list, swaps it in wholesale, and
//! synchronously persists it through the [`CartRepository`]. Readers hold
//! on to a snapshot and never observe a half-applied mutation.
//!
//! Mutations never fail at this boundary: persistence errors are logged
//! and absorbed, and quantity or uniqueness preconditions that do not hold
//! make the call a silent no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use tiffin_core::{CartItem, Product, ProductId};

use crate::persist::CartRepository;

// =============================================================================
// CartSnapshot
// =============================================================================

/// Immutable point-in-time view of the cart.
#[derive(Debug, Default)]
pub struct CartSnapshot {
    /// Cart lines in insertion order.
    pub items: Vec<CartItem>,
}

impl CartSnapshot {
    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Look up a line by product ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == *id)
    }
}

// =============================================================================
// CartStore
// =============================================================================

/// The cart state container.
///
/// Cheap to clone; all clones share the same state and repository.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    repo: Arc<dyn CartRepository>,
    state: RwLock<Arc<CartSnapshot>>,
    loading: AtomicBool,
}

impl CartStore {
    /// Create a cart store backed by `repo`, loading whatever document a
    /// previous session persisted. A missing or unreadable document logs
    /// and starts the cart empty.
    #[must_use]
    pub fn new(repo: Arc<dyn CartRepository>) -> Self {
        let items = match repo.load() {
            Ok(Some(items)) => {
                debug!(items = items.len(), "Loaded persisted cart");
                items
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to load persisted cart, starting empty");
                Vec::new()
            }
        };

        Self {
            inner: Arc::new(CartStoreInner {
                repo,
                state: RwLock::new(Arc::new(CartSnapshot { items })),
                loading: AtomicBool::new(false),
            }),
        }
    }

    /// Add `product` to the cart. A product already in the cart gets its
    /// quantity incremented instead of a duplicate line.
    pub fn add_to_cart(&self, product: &Product) {
        self.mutate(|items| {
            if let Some(item) = items.iter_mut().find(|i| i.id == product.id) {
                item.quantity += 1;
            } else {
                items.push(CartItem::from_product(product));
            }
        });
    }

    /// Remove the line for `id`. No-op when the cart has no such line.
    pub fn remove_from_cart(&self, id: &ProductId) {
        self.mutate(|items| items.retain(|i| i.id != *id));
    }

    /// Increase the quantity of the line for `id` by one. No-op when the
    /// cart has no such line.
    pub fn increment_quantity(&self, id: &ProductId) {
        self.mutate(|items| {
            if let Some(item) = items.iter_mut().find(|i| i.id == *id) {
                item.quantity += 1;
            }
        });
    }

    /// Decrease the quantity of the line for `id` by one, stopping at 1.
    /// Removing the line is the only way to reach zero.
    pub fn decrement_quantity(&self, id: &ProductId) {
        self.mutate(|items| {
            if let Some(item) = items.iter_mut().find(|i| i.id == *id)
                && item.quantity > 1
            {
                item.quantity -= 1;
            }
        });
    }

    /// Empty the cart.
    pub fn clear_cart(&self) {
        self.mutate(Vec::clear);
    }

    /// Set the transient busy flag for the view layer. Independent of the
    /// cart contents; never persisted.
    pub fn set_loading(&self, loading: bool) {
        self.inner.loading.store(loading, Ordering::SeqCst);
    }

    /// Whether the busy flag is set.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst)
    }

    /// Current snapshot of the cart.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CartSnapshot> {
        self.inner
            .state
            .read()
            .map(|guard| Arc::clone(&guard))
            .unwrap_or_default()
    }

    /// Apply `f` to a copy of the item list, publish the result as the new
    /// snapshot, and persist it. Runs under the write lock so persisted
    /// documents land in mutation order. Every call persists, including
    /// no-op mutations.
    fn mutate<F>(&self, f: F)
    where
        F: FnOnce(&mut Vec<CartItem>),
    {
        let Ok(mut guard) = self.inner.state.write() else {
            warn!("Cart state lock poisoned, dropping mutation");
            return;
        };

        let mut items = guard.items.clone();
        f(&mut items);

        let next = Arc::new(CartSnapshot { items });
        *guard = Arc::clone(&next);

        if let Err(e) = self.inner.repo.save(&next.items) {
            warn!(error = %e, "Failed to persist cart");
        }
    }
}
