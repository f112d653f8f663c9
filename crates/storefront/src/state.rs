//! Application state shared across frontends.

use std::sync::Arc;

use crate::api::{ApiError, HttpProductsApi, ProductsApi};
use crate::config::StorefrontConfig;
use crate::persist::{CartRepository, JsonFileCartRepository};
use crate::stores::{CartStore, CatalogStore};

/// Application state shared across all frontends.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog and cart stores and the configuration they were wired from.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogStore,
    cart: CartStore,
}

impl AppState {
    /// Wire the default stack: an HTTP products API behind the catalog
    /// store and a JSON file cart repository under the configured data
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = Arc::new(HttpProductsApi::new(&config)?);
        let repository = Arc::new(JsonFileCartRepository::new(&config.data_dir));
        Ok(Self::with_parts(config, api, repository))
    }

    /// Wire explicit store collaborators. Lets tests and alternative
    /// frontends bring their own API client or persistence.
    #[must_use]
    pub fn with_parts(
        config: StorefrontConfig,
        api: Arc<dyn ProductsApi>,
        repository: Arc<dyn CartRepository>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: CatalogStore::new(api),
                cart: CartStore::new(repository),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog store.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }
}
