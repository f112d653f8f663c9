//! Integration test support for Tiffin.
//!
//! Spins up an in-process stub of the platform products API on an
//! ephemeral port, then wires the real storefront components against it
//! over real HTTP. No external services are required.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tiffin-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tempfile::TempDir;
use url::Url;

use tiffin_core::{CategoryId, Product, ProductId, SellerId, SellerSummary, Variant, VariantId};
use tiffin_storefront::config::StorefrontConfig;
use tiffin_storefront::persist::CART_STORAGE_KEY;
use tiffin_storefront::state::AppState;

// =============================================================================
// Stub platform
// =============================================================================

/// Per-route behavior knobs for the stub platform.
#[derive(Debug, Default)]
pub struct StubOptions {
    /// Hold the listing response open for this long.
    pub listing_delay: Option<Duration>,
    /// Hold the detail response for this product open for this long.
    pub detail_delay: Option<(ProductId, Duration)>,
}

struct StubState {
    products: Vec<Product>,
    options: StubOptions,
    list_hits: AtomicUsize,
    detail_hits: AtomicUsize,
}

/// In-process stand-in for the platform products API.
pub struct StubPlatform {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl StubPlatform {
    /// Bind an ephemeral port and serve the given products.
    pub async fn start(products: Vec<Product>) -> Self {
        Self::start_with(products, StubOptions::default()).await
    }

    /// As [`StubPlatform::start`], with response delays.
    pub async fn start_with(products: Vec<Product>, options: StubOptions) -> Self {
        let state = Arc::new(StubState {
            products,
            options,
            list_hits: AtomicUsize::new(0),
            detail_hits: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/api/products", get(list_products))
            .route("/api/products/{id}", get(get_product))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Failed to read stub address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub server error");
        });

        Self { addr, state }
    }

    /// Base URL the stub is reachable at.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests served by the listing route so far.
    #[must_use]
    pub fn list_hits(&self) -> usize {
        self.state.list_hits.load(Ordering::SeqCst)
    }

    /// Requests served by the detail route so far.
    #[must_use]
    pub fn detail_hits(&self) -> usize {
        self.state.detail_hits.load(Ordering::SeqCst)
    }
}

async fn list_products(State(state): State<Arc<StubState>>) -> Json<serde_json::Value> {
    state.list_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(delay) = state.options.listing_delay {
        tokio::time::sleep(delay).await;
    }
    Json(json!({ "data": state.products }))
}

async fn get_product(State(state): State<Arc<StubState>>, Path(id): Path<String>) -> Response {
    state.detail_hits.fetch_add(1, Ordering::SeqCst);
    let id = ProductId::new(id);
    if let Some((slow_id, delay)) = &state.options.detail_delay
        && *slow_id == id
    {
        tokio::time::sleep(*delay).await;
    }
    match state.products.iter().find(|p| p.id == id) {
        Some(product) => Json(json!({ "data": product })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Product not found" })),
        )
            .into_response(),
    }
}

// =============================================================================
// Test context
// =============================================================================

/// A stub platform plus a real `AppState` wired against it, with the cart
/// persisted under a temporary data directory.
pub struct TestContext {
    pub platform: StubPlatform,
    pub state: AppState,
    data_dir: TempDir,
}

impl TestContext {
    /// Start a stub serving `products` and wire an `AppState` against it.
    pub async fn new(products: Vec<Product>) -> Self {
        Self::with_options(products, StubOptions::default()).await
    }

    /// As [`TestContext::new`], with stub response delays.
    pub async fn with_options(products: Vec<Product>, options: StubOptions) -> Self {
        let platform = StubPlatform::start_with(products, options).await;
        let data_dir = tempfile::tempdir().expect("Failed to create data dir");
        let state = app_state_for(&platform.base_url(), data_dir.path());
        Self {
            platform,
            state,
            data_dir,
        }
    }

    /// A fresh `AppState` over the same platform and data directory,
    /// modelling a new session of the same installation.
    #[must_use]
    pub fn restart(&self) -> AppState {
        app_state_for(&self.platform.base_url(), self.data_dir.path())
    }

    /// Path of the JSON document the cart persists to.
    #[must_use]
    pub fn cart_file(&self) -> std::path::PathBuf {
        self.data_dir.path().join(format!("{CART_STORAGE_KEY}.json"))
    }
}

/// A real `AppState` pointed at an arbitrary base URL. Lets tests wire
/// against dead or misbehaving endpoints.
#[must_use]
pub fn app_state_for(base_url: &str, data_dir: &std::path::Path) -> AppState {
    let config = StorefrontConfig {
        api_base_url: Url::parse(base_url).expect("Base URL is valid"),
        api_token: None,
        data_dir: data_dir.to_path_buf(),
        http_timeout_secs: 5,
        cache_ttl_secs: 300,
    };
    AppState::new(config).expect("Failed to build app state")
}

// =============================================================================
// Fixtures
// =============================================================================

/// Build a single-variant product in the platform's wire model.
#[must_use]
pub fn fixture_product(
    id: &str,
    name: &str,
    category: &str,
    seller: &str,
    price: &str,
    color: Option<&str>,
    delivery_days: Option<u32>,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: format!("{name} from {seller}"),
        image: format!("https://cdn.tiffin.test/{id}.jpg"),
        category: CategoryId::new(category),
        is_available: true,
        is_featured: false,
        sku: Some(format!("SKU-{id}")),
        delivery_days,
        seller: SellerSummary {
            id: SellerId::new(format!("seller-{seller}")),
            name: seller.to_owned(),
            logo: None,
            phone: None,
            email: None,
            is_approved: true,
            ratings: Vec::new(),
        },
        variants: vec![Variant {
            id: VariantId::new(format!("{id}-default")),
            name: "Default".to_owned(),
            price: price.parse().expect("Fixture price parses"),
            is_available: true,
            color: color.map(str::to_owned),
            images: Vec::new(),
        }],
    }
}

/// A small mixed catalog shared across the integration tests.
#[must_use]
pub fn fixture_catalog() -> Vec<Product> {
    vec![
        fixture_product(
            "prod-1",
            "Paneer Tiffin Box",
            "lunchbox",
            "Amma's Kitchen",
            "8.50",
            Some("green"),
            Some(0),
        ),
        fixture_product(
            "prod-2",
            "Steel Tiffin Carrier",
            "containers",
            "SteelWorks",
            "24.00",
            Some("silver"),
            Some(3),
        ),
        fixture_product(
            "prod-3",
            "Masala Dosa Kit",
            "breakfast",
            "Amma's Kitchen",
            "12.00",
            None,
            Some(1),
        ),
        fixture_product(
            "prod-4",
            "Copper Water Bottle",
            "containers",
            "SteelWorks",
            "18.75",
            Some("copper"),
            None,
        ),
    ]
}
