// Rust guideline compliant 2026-02-27

//! HTTP adapter for the `CatalogFeed` port.
//!
//! Talks to a dummyjson-style products endpoint:
//! `GET {base}/products?limit={limit}&skip={offset}` returning
//! `{ "products": [...], "total": n, ... }`. Extra product fields are ignored.

use domain::{CatalogBatch, CatalogFeed, FeedError, PageRequest, Product};
use serde::Deserialize;

/// Public demo catalog used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

/// Only the fields the storefront renders are requested.
const SELECTED_FIELDS: &str = "id,title,price,thumbnail";

/// Wire shape of one products page.
#[derive(Debug, Deserialize)]
struct ProductsResponse {
    products: Vec<Product>,
    #[serde(default)]
    total: u64,
}

/// `CatalogFeed` adapter over HTTP via `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    /// Create a feed for the catalog rooted at `base_url` (no trailing slash needed).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client: reqwest::Client::new(), base_url }
    }

    /// URL for the `request` window.
    #[must_use]
    pub fn page_url(&self, request: PageRequest) -> String {
        format!(
            "{}/products?limit={}&skip={}&select={SELECTED_FIELDS}",
            self.base_url, request.limit, request.offset
        )
    }
}

impl CatalogFeed for HttpCatalog {
    /// Fetch and decode one page.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Network`] on transport failures or non-success
    /// statuses, and [`FeedError::Decode`] when the body is not a products page.
    async fn fetch_page(&self, request: PageRequest) -> Result<CatalogBatch, FeedError> {
        let url = self.page_url(request);
        tracing::debug!(%url, "http_catalog.fetch");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| FeedError::Network { reason: e.to_string() })?;
        let page: ProductsResponse = response
            .json()
            .await
            .map_err(|e| FeedError::Decode { reason: e.to_string() })?;
        Ok(CatalogBatch { products: page.products, total_available: page.total })
    }
}
