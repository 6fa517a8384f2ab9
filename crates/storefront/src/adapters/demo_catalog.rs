// Rust guideline compliant 2026-02-23

//! Demo adapter for the `CatalogFeed` port.
//!
//! Serves a finite synthetic catalog generated once from a seeded RNG. Each
//! fetch yields to the runtime once to stand in for network latency, and can
//! fail at a configured rate to exercise the loader's recovery path.

use std::cell::RefCell;

use domain::{CatalogBatch, CatalogFeed, FeedError, PageRequest, Product};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Adjective/noun pools used for synthetic titles.
///
/// Indices are always derived from `random_range(0..len())`, never panic.
const ADJECTIVES: &[&str] = &[
    "Classic", "Compact", "Deluxe", "Essential", "Modern", "Rustic", "Sleek", "Vintage",
];
const NOUNS: &[&str] = &[
    "Backpack", "Desk Lamp", "Headphones", "Mug", "Notebook", "Sneakers", "Sunglasses", "Watch",
];

/// Errors from building a [`DemoCatalogConfig`].
#[derive(Debug, thiserror::Error)]
pub enum DemoCatalogError {
    /// The supplied configuration is invalid.
    #[error("invalid demo catalog configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

/// Runtime configuration for a [`DemoCatalog`].
///
/// Construct via [`DemoCatalogConfig::builder`].
#[derive(Debug)]
pub struct DemoCatalogConfig {
    /// Number of products in the catalog.
    pub total_products: u64,
    /// Probability in `[0, 1]` that a fetch fails with `FeedError::Unavailable`.
    pub failure_rate: f64,
    /// Optional RNG seed for a reproducible catalog. `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// Builder for [`DemoCatalogConfig`].
#[derive(Debug)]
pub struct DemoCatalogConfigBuilder {
    total_products: u64,
    failure_rate: f64,
    seed: Option<u64>,
}

impl DemoCatalogConfig {
    /// Create a builder. Defaults: `failure_rate = 0.0`, `seed = None`.
    #[must_use]
    pub fn builder(total_products: u64) -> DemoCatalogConfigBuilder {
        DemoCatalogConfigBuilder { total_products, failure_rate: 0.0, seed: None }
    }
}

impl DemoCatalogConfigBuilder {
    /// Make each fetch fail with probability `rate`.
    #[must_use]
    pub fn failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate;
        self
    }

    /// Fix the RNG seed (useful in tests).
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DemoCatalogError::InvalidConfig`] when `failure_rate` is
    /// outside `[0, 1]`.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<DemoCatalogConfig, DemoCatalogError> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(DemoCatalogError::InvalidConfig {
                reason: format!("failure_rate must be in [0, 1], got {}", self.failure_rate),
            });
        }
        Ok(DemoCatalogConfig {
            total_products: self.total_products,
            failure_rate: self.failure_rate,
            seed: self.seed,
        })
    }
}

/// `CatalogFeed` adapter over an in-memory synthetic catalog.
#[derive(Debug)]
pub struct DemoCatalog {
    products: Vec<Product>,
    failure_rate: f64,
    /// Interior mutability required because `fetch_page` takes `&self`.
    rng: RefCell<StdRng>,
}

impl DemoCatalog {
    /// Generate the catalog described by `config`.
    #[must_use]
    pub fn new(config: &DemoCatalogConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let products = (1..=config.total_products)
            .map(|id| {
                let title = format!(
                    "{} {}",
                    ADJECTIVES[rng.random_range(0..ADJECTIVES.len())],
                    NOUNS[rng.random_range(0..NOUNS.len())]
                );
                // Integer cents keeps generated prices exact to two decimals.
                let price = f64::from(rng.random_range(99u32..=49_999u32)) / 100.0;
                Product {
                    id,
                    title,
                    price,
                    thumbnail: format!("https://cdn.dummyjson.com/products/images/{id}/thumbnail.webp"),
                }
            })
            .collect();
        Self { products, failure_rate: config.failure_rate, rng: RefCell::new(rng) }
    }
}

impl CatalogFeed for DemoCatalog {
    /// Return the `request` window of the catalog; empty past the end.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Unavailable`] with probability `failure_rate`.
    async fn fetch_page(&self, request: PageRequest) -> Result<CatalogBatch, FeedError> {
        tokio::task::yield_now().await;

        let roll: f64 = self.rng.borrow_mut().random();
        if roll < self.failure_rate {
            tracing::debug!(offset = request.offset, "demo_catalog.fetch.injected_failure");
            return Err(FeedError::Unavailable);
        }

        let len = self.products.len();
        let start = usize::try_from(request.offset).unwrap_or(usize::MAX).min(len);
        let end = start
            .saturating_add(usize::try_from(request.limit).unwrap_or(usize::MAX))
            .min(len);
        tracing::debug!(offset = request.offset, returned = end - start, "demo_catalog.fetch");
        Ok(CatalogBatch {
            products: self.products[start..end].to_vec(),
            total_available: u64::try_from(len).unwrap_or(u64::MAX),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(total: u64) -> DemoCatalog {
        DemoCatalog::new(&DemoCatalogConfig::builder(total).seed(7).build().unwrap())
    }

    #[test]
    fn config_rejects_bad_failure_rate() {
        let cfg = DemoCatalogConfig::builder(10).failure_rate(1.5).build();
        assert!(matches!(cfg, Err(DemoCatalogError::InvalidConfig { .. })));
    }

    #[test]
    fn products_have_unique_ids_and_valid_prices() {
        let c = catalog(50);
        for (i, p) in c.products.iter().enumerate() {
            assert_eq!(p.id, i as u64 + 1);
            assert!(p.price >= 0.99 && p.price <= 499.99, "price {} out of range", p.price);
            assert!(!p.title.is_empty());
        }
    }

    #[test]
    fn seeded_catalogs_are_identical() {
        assert_eq!(catalog(20).products, catalog(20).products);
    }

    #[tokio::test]
    async fn pages_cover_catalog_then_run_empty() {
        let c = catalog(19);
        let mut seen = 0;
        let mut offset = 0;
        loop {
            let batch = c.fetch_page(PageRequest { offset, limit: 8 }).await.unwrap();
            assert_eq!(batch.total_available, 19);
            if batch.products.is_empty() {
                break;
            }
            seen += batch.products.len();
            offset += 8;
        }
        assert_eq!(seen, 19);
        assert_eq!(offset, 24);
    }

    #[tokio::test]
    async fn failure_rate_one_always_fails() {
        let c = DemoCatalog::new(&DemoCatalogConfig::builder(8).failure_rate(1.0).seed(1).build().unwrap());
        let result = c.fetch_page(PageRequest { offset: 0, limit: 8 }).await;
        assert_eq!(result, Err(FeedError::Unavailable));
    }
}
