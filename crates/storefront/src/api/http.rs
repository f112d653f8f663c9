//! HTTP implementation of the products API.
//!
//! Uses `reqwest` for HTTP and caches responses with `moka` so repeated
//! catalog reads within the TTL never hit the network.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument};

use tiffin_core::{Product, ProductId};

use super::{ApiError, ProductsApi};
use crate::config::StorefrontConfig;

/// Envelope every products endpoint wraps its payload in.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}

// =============================================================================
// HttpProductsApi
// =============================================================================

/// Client for the platform products API.
///
/// Cheap to clone; all clones share one connection pool and one response
/// cache.
#[derive(Clone)]
pub struct HttpProductsApi {
    inner: Arc<HttpProductsApiInner>,
}

struct HttpProductsApiInner {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
    cache: Cache<String, CacheValue>,
}

impl HttpProductsApi {
    /// Create a new products API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl())
            .build();

        // Url serializes with a trailing slash; strip it so path joins below
        // stay predictable
        let endpoint = config
            .api_base_url
            .as_str()
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            inner: Arc::new(HttpProductsApiInner {
                client,
                endpoint,
                api_token: config
                    .api_token
                    .as_ref()
                    .map(|t| t.expose_secret().to_string()),
                cache,
            }),
        })
    }

    /// Execute a GET request and parse the JSON body.
    async fn execute<T>(&self, url: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut request = self.inner.client.get(url);
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Get the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Products API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse products API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }
}

#[async_trait]
impl ProductsApi for HttpProductsApi {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let cache_key = "products".to_string();

        // Check cache
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product listing");
            return Ok(products);
        }

        let url = format!("{}/api/products", self.inner.endpoint);
        let envelope: DataEnvelope<Vec<Product>> = self.execute(&url).await?;

        // Cache the result
        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(envelope.data.clone()))
            .await;

        Ok(envelope.data)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, ApiError> {
        let cache_key = format!("product:{id}");

        // Check cache
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let url = format!("{}/api/products/{id}", self.inner.endpoint);
        let envelope: DataEnvelope<Product> = match self.execute(&url).await {
            Ok(envelope) => envelope,
            // The endpoint 404s for unknown products; absence is a value here
            Err(ApiError::Status { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        // Cache the result
        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(envelope.data.clone())))
            .await;

        Ok(Some(envelope.data))
    }
}
