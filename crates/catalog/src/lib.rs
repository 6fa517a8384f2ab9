// Rust guideline compliant 2026-02-23

//! Incremental catalog loader -- drives sequential page fetches against a
//! `CatalogFeed` hexagonal port and accumulates the products.
//!
//! Entry points: [`CatalogLoader::initialize`], [`CatalogLoader::load_next_page`],
//! [`CatalogLoader::should_load_more`], and the scroll-side [`ScrollTrigger`].
//! Configuration via [`LoaderConfig::builder`].

mod scroll;

pub use scroll::{ScrollOutcome, ScrollTrigger, ViewportMetric};

use domain::{CatalogBatch, CatalogFeed, FeedError, PageRequest, Product};
use std::cell::{Cell, Ref, RefCell};
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// CatalogError
// ---------------------------------------------------------------------------

/// Errors that can occur while loading the catalog.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// The supplied configuration is invalid.
    #[error("invalid loader configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// The catalog feed failed to serve a page.
    #[error("catalog feed error: {0}")]
    Feed(#[from] FeedError),
}

// ---------------------------------------------------------------------------
// LoaderConfig + builder
// ---------------------------------------------------------------------------

/// Page size used by the storefront catalog view.
pub const DEFAULT_PAGE_SIZE: u32 = 8;

/// Runtime configuration for a [`CatalogLoader`].
///
/// Construct via [`LoaderConfig::builder`].
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Products requested per page (`limit`), `>= 1`.
    pub page_size: u32,
    /// Slack, in pixels, under which the viewport counts as "at the bottom".
    pub bottom_tolerance: f64,
    /// Optional cap on pages fetched. `None` means load until an empty batch.
    pub max_pages: Option<u32>,
}

/// Builder for [`LoaderConfig`].
///
/// Obtain via [`LoaderConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct LoaderConfigBuilder {
    page_size: u32,
    bottom_tolerance: f64,
    max_pages: Option<u32>,
}

impl LoaderConfig {
    /// Create a builder. `page_size` is the only required parameter.
    ///
    /// Default values: `bottom_tolerance = 1.0`, `max_pages = None`.
    #[must_use]
    pub fn builder(page_size: u32) -> LoaderConfigBuilder {
        LoaderConfigBuilder {
            page_size,
            // One pixel absorbs sub-pixel scroll offsets reported by browsers.
            bottom_tolerance: 1.0,
            max_pages: None,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE, bottom_tolerance: 1.0, max_pages: None }
    }
}

impl LoaderConfigBuilder {
    /// Override the bottom-of-content tolerance.
    #[must_use]
    pub fn bottom_tolerance(mut self, bottom_tolerance: f64) -> Self {
        self.bottom_tolerance = bottom_tolerance;
        self
    }

    /// Stop after `n` pages even if the feed still returns products.
    #[must_use]
    pub fn max_pages(mut self, n: u32) -> Self {
        self.max_pages = Some(n);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidConfig`] when `page_size` or `max_pages`
    /// is zero, or the tolerance is negative or not finite.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<LoaderConfig, CatalogError> {
        if self.page_size == 0 {
            return Err(CatalogError::InvalidConfig {
                reason: "page_size must be >= 1".to_owned(),
            });
        }
        if self.max_pages == Some(0) {
            return Err(CatalogError::InvalidConfig {
                reason: "max_pages must be >= 1; the first page always loads".to_owned(),
            });
        }
        if !self.bottom_tolerance.is_finite() || self.bottom_tolerance < 0.0 {
            return Err(CatalogError::InvalidConfig {
                reason: format!("bottom_tolerance must be finite and >= 0, got {}", self.bottom_tolerance),
            });
        }
        Ok(LoaderConfig {
            page_size: self.page_size,
            bottom_tolerance: self.bottom_tolerance,
            max_pages: self.max_pages,
        })
    }
}

// ---------------------------------------------------------------------------
// Load state machine
// ---------------------------------------------------------------------------

/// Loader lifecycle: `Idle -> Fetching -> Idle | Exhausted`. `Exhausted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Ready to request the next page.
    Idle,
    /// Exactly one page request is outstanding.
    Fetching,
    /// The feed returned an empty batch; no further requests are issued.
    Exhausted,
}

/// Result of a successful [`CatalogLoader::load_next_page`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A non-empty batch was applied.
    Appended {
        /// Products returned by the feed.
        fetched: usize,
        /// Products actually appended after de-duplication.
        added: usize,
    },
    /// The feed signaled the end of the catalog.
    Exhausted,
    /// The loader was not idle; no request was issued.
    Skipped,
}

/// Puts the loader back to `Idle` if the fetch future is dropped mid-flight.
struct FetchGuard<'a> {
    state: &'a Cell<LoadState>,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if self.state.get() == LoadState::Fetching {
            self.state.set(LoadState::Idle);
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogLoader
// ---------------------------------------------------------------------------

/// Owns the accumulated catalog page state and the re-entrancy guard.
///
/// Generic per call over `F: CatalogFeed` for zero-cost static dispatch.
/// Holds no concrete feed reference -- the dependency is injected per call.
/// All state sits behind `Cell`/`RefCell` because public methods take `&self`;
/// no borrow is held across the feed `.await`.
#[derive(Debug)]
pub struct CatalogLoader {
    config: LoaderConfig,
    state: Cell<LoadState>,
    /// 1-based index of the next page to request.
    page_index: Cell<u32>,
    items: RefCell<Vec<Product>>,
    seen: RefCell<HashSet<u64>>,
    total_available: Cell<Option<u64>>,
    last_error: RefCell<Option<FeedError>>,
}

impl CatalogLoader {
    /// Create an idle loader positioned at page 1 with no products.
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            state: Cell::new(LoadState::Idle),
            page_index: Cell::new(1),
            items: RefCell::new(vec![]),
            seen: RefCell::new(HashSet::new()),
            total_available: Cell::new(None),
            last_error: RefCell::new(None),
        }
    }

    /// Load the first page. Called once when the catalog view starts.
    ///
    /// # Errors
    ///
    /// Same as [`load_next_page`](Self::load_next_page).
    pub async fn initialize<F: CatalogFeed>(&self, feed: &F) -> Result<LoadOutcome, CatalogError> {
        tracing::info!(page_size = self.config.page_size, "catalog.initialize");
        self.load_next_page(feed).await
    }

    /// Request the next page from `feed` and append its products.
    ///
    /// Returns [`LoadOutcome::Skipped`] without touching the feed unless the
    /// loader is [`LoadState::Idle`]. The state flips to `Fetching` before the
    /// first suspension point, so at most one request is ever outstanding and
    /// pages are applied in request order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Feed`] when the feed fails. Products and page
    /// index are left unchanged, the loader returns to `Idle`, and the error is
    /// kept as [`last_error`](Self::last_error) until the next successful load.
    pub async fn load_next_page<F: CatalogFeed>(&self, feed: &F) -> Result<LoadOutcome, CatalogError> {
        if self.state.get() != LoadState::Idle {
            tracing::debug!(state = ?self.state.get(), "catalog.load.skipped");
            return Ok(LoadOutcome::Skipped);
        }

        let page = self.page_index.get();
        if let Some(max) = self.config.max_pages
            && page > max
        {
            tracing::info!(max_pages = max, "catalog.exhausted: page cap reached");
            self.state.set(LoadState::Exhausted);
            return Ok(LoadOutcome::Exhausted);
        }

        self.state.set(LoadState::Fetching);
        let _guard = FetchGuard { state: &self.state };

        let request = PageRequest {
            offset: u64::from(page - 1) * u64::from(self.config.page_size),
            limit: self.config.page_size,
        };
        tracing::debug!(page, offset = request.offset, limit = request.limit, "catalog.fetch.started");

        match feed.fetch_page(request).await {
            Ok(batch) => Ok(self.apply_batch(page, batch)),
            Err(e) => {
                tracing::warn!(page, error = %e, "catalog.fetch.failed");
                *self.last_error.borrow_mut() = Some(e.clone());
                self.state.set(LoadState::Idle);
                Err(CatalogError::Feed(e))
            }
        }
    }

    /// Apply a successful batch for `page`; the caller holds the fetch guard.
    fn apply_batch(&self, page: u32, batch: CatalogBatch) -> LoadOutcome {
        *self.last_error.borrow_mut() = None;
        self.total_available.set(Some(batch.total_available));

        if batch.products.is_empty() {
            tracing::info!(page, loaded = self.len(), "catalog.exhausted");
            self.state.set(LoadState::Exhausted);
            return LoadOutcome::Exhausted;
        }

        let fetched = batch.products.len();
        let mut added = 0;
        {
            let mut seen = self.seen.borrow_mut();
            let mut items = self.items.borrow_mut();
            for product in batch.products {
                if seen.insert(product.id) {
                    items.push(product);
                    added += 1;
                } else {
                    tracing::debug!(product_id = product.id, page, "catalog.product.duplicate_skipped");
                }
            }
        }

        self.page_index.set(page.saturating_add(1));
        self.state.set(LoadState::Idle);
        tracing::info!(page, fetched, added, total = self.len(), "catalog.page.loaded");
        LoadOutcome::Appended { fetched, added }
    }

    /// `true` iff the viewport has reached the bottom of the content and a
    /// load would actually be issued (not fetching, not exhausted).
    #[must_use]
    pub fn should_load_more(&self, metric: ViewportMetric) -> bool {
        self.state.get() == LoadState::Idle && metric.reached_bottom(self.config.bottom_tolerance)
    }

    /// Borrow the accumulated products, in feed order.
    #[must_use]
    pub fn items(&self) -> Ref<'_, Vec<Product>> {
        self.items.borrow()
    }

    /// Number of accumulated products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// `true` when no product has been loaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// 1-based index of the page the next load will request.
    #[must_use]
    pub fn current_page_index(&self) -> u32 {
        self.page_index.get()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state.get()
    }

    /// `true` while a page request is outstanding.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.state.get() == LoadState::Fetching
    }

    /// `true` once the feed has signaled that no further pages remain.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state.get() == LoadState::Exhausted
    }

    /// The most recent feed failure, cleared by the next successful load.
    #[must_use]
    pub fn last_error(&self) -> Option<FeedError> {
        self.last_error.borrow().clone()
    }

    /// Catalog size reported by the last successful batch, if any.
    #[must_use]
    pub fn total_available(&self) -> Option<u64> {
        self.total_available.get()
    }

    /// The configuration this loader was built with.
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn make_product(id: u64) -> Product {
        Product {
            id,
            title: format!("Product {id}"),
            price: 1.00_f64,
            thumbnail: format!("https://cdn.example.test/{id}.webp"),
        }
    }

    fn batch(ids: std::ops::Range<u64>) -> Result<CatalogBatch, FeedError> {
        Ok(CatalogBatch { products: ids.map(make_product).collect(), total_available: 19 })
    }

    /// Feed replaying scripted responses; records every request it receives.
    /// Yields once per call so concurrent callers can interleave.
    struct ScriptedFeed {
        responses: RefCell<VecDeque<Result<CatalogBatch, FeedError>>>,
        requests: RefCell<Vec<PageRequest>>,
    }

    impl ScriptedFeed {
        fn new(responses: Vec<Result<CatalogBatch, FeedError>>) -> Self {
            Self { responses: RefCell::new(responses.into()), requests: RefCell::new(vec![]) }
        }

        fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl CatalogFeed for ScriptedFeed {
        async fn fetch_page(&self, request: PageRequest) -> Result<CatalogBatch, FeedError> {
            self.requests.borrow_mut().push(request);
            tokio::task::yield_now().await;
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(CatalogBatch::default()))
        }
    }

    fn loader() -> CatalogLoader {
        CatalogLoader::new(LoaderConfig::builder(8).build().unwrap())
    }

    fn bottom() -> ViewportMetric {
        ViewportMetric::new(800.0, 1200.0, 2000.0)
    }

    // ------------------------------------------------------------------
    // LoaderConfig builder
    // ------------------------------------------------------------------

    #[test]
    fn config_page_size_zero_returns_err() {
        let cfg = LoaderConfig::builder(0).build();
        assert!(matches!(cfg, Err(CatalogError::InvalidConfig { .. })));
    }

    #[test]
    fn config_max_pages_zero_returns_err() {
        let cfg = LoaderConfig::builder(8).max_pages(0).build();
        assert!(matches!(cfg, Err(CatalogError::InvalidConfig { .. })));
        let capped = LoaderConfig::builder(8).max_pages(1).build().unwrap();
        assert_eq!(capped.max_pages, Some(1));
    }

    #[test]
    fn config_negative_tolerance_returns_err() {
        let cfg = LoaderConfig::builder(8).bottom_tolerance(-1.0).build();
        assert!(matches!(cfg, Err(CatalogError::InvalidConfig { .. })));
        let cfg = LoaderConfig::builder(8).bottom_tolerance(f64::NAN).build();
        assert!(matches!(cfg, Err(CatalogError::InvalidConfig { .. })));
    }

    #[test]
    fn config_defaults() {
        let cfg = LoaderConfig::builder(8).build().unwrap();
        assert_eq!(cfg.page_size, 8);
        assert!(cfg.max_pages.is_none());
        assert!((cfg.bottom_tolerance - 1.0).abs() < f64::EPSILON);
        assert_eq!(LoaderConfig::default().page_size, DEFAULT_PAGE_SIZE);
    }

    // ------------------------------------------------------------------
    // Paging
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn new_loader_is_idle_at_page_one() {
        let l = loader();
        assert_eq!(l.state(), LoadState::Idle);
        assert_eq!(l.current_page_index(), 1);
        assert!(l.is_empty());
        assert!(l.last_error().is_none());
        assert!(l.total_available().is_none());
    }

    #[tokio::test]
    async fn initialize_requests_first_page_at_offset_zero() {
        let feed = ScriptedFeed::new(vec![batch(1..9)]);
        let l = loader();
        let outcome = l.initialize(&feed).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Appended { fetched: 8, added: 8 });
        assert_eq!(feed.requests.borrow()[0], PageRequest { offset: 0, limit: 8 });
        assert_eq!(l.current_page_index(), 2);
        assert_eq!(l.total_available(), Some(19));
    }

    #[tokio::test]
    async fn pages_8_8_3_0_exhaust_with_19_items() {
        let feed = ScriptedFeed::new(vec![
            batch(1..9),
            batch(9..17),
            batch(17..20),
            batch(0..0),
        ]);
        let l = loader();
        for _ in 0..4 {
            l.load_next_page(&feed).await.unwrap();
        }
        assert_eq!(l.len(), 19);
        assert!(l.is_exhausted());
        assert!(!l.is_fetching());

        let offsets: Vec<u64> = feed.requests.borrow().iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![0, 8, 16, 24]);

        // Fifth call: no fetch.
        let outcome = l.load_next_page(&feed).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Skipped);
        assert_eq!(feed.request_count(), 4);
    }

    #[tokio::test]
    async fn short_batch_does_not_exhaust() {
        let feed = ScriptedFeed::new(vec![batch(1..4)]);
        let l = loader();
        l.load_next_page(&feed).await.unwrap();
        assert_eq!(l.state(), LoadState::Idle);
        assert_eq!(l.len(), 3);
        assert_eq!(l.current_page_index(), 2);
    }

    #[tokio::test]
    async fn empty_batch_keeps_page_index() {
        let feed = ScriptedFeed::new(vec![batch(0..0)]);
        let l = loader();
        let outcome = l.load_next_page(&feed).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Exhausted);
        assert_eq!(l.current_page_index(), 1);
        assert!(l.is_empty());
    }

    #[tokio::test]
    async fn items_preserve_feed_order() {
        let feed = ScriptedFeed::new(vec![batch(10..13), batch(1..3)]);
        let l = loader();
        l.load_next_page(&feed).await.unwrap();
        l.load_next_page(&feed).await.unwrap();
        let ids: Vec<u64> = l.items().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 11, 12, 1, 2]);
    }

    #[tokio::test]
    async fn duplicate_products_are_skipped() {
        // Second page overlaps the first by two products (catalog shifted).
        let feed = ScriptedFeed::new(vec![batch(1..9), batch(7..15)]);
        let l = loader();
        l.load_next_page(&feed).await.unwrap();
        let outcome = l.load_next_page(&feed).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Appended { fetched: 8, added: 6 });
        assert_eq!(l.len(), 14);
        assert_eq!(l.current_page_index(), 3);
    }

    #[tokio::test]
    async fn max_pages_cap_exhausts_without_fetch() {
        let feed = ScriptedFeed::new(vec![batch(1..9), batch(9..17)]);
        let l = CatalogLoader::new(LoaderConfig::builder(8).max_pages(1).build().unwrap());
        l.load_next_page(&feed).await.unwrap();
        let outcome = l.load_next_page(&feed).await.unwrap();
        assert_eq!(outcome, LoadOutcome::Exhausted);
        assert!(l.is_exhausted());
        assert_eq!(feed.request_count(), 1);
    }

    // ------------------------------------------------------------------
    // Failure path
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn failure_leaves_state_unchanged_and_allows_retry() {
        let feed = ScriptedFeed::new(vec![
            Err(FeedError::Network { reason: "connection reset".to_owned() }),
            batch(1..9),
        ]);
        let l = loader();
        let result = l.load_next_page(&feed).await;
        assert!(
            matches!(result, Err(CatalogError::Feed(FeedError::Network { .. }))),
            "expected Feed(Network), got {result:?}"
        );
        assert!(l.is_empty());
        assert_eq!(l.current_page_index(), 1);
        assert_eq!(l.state(), LoadState::Idle);
        assert!(!l.is_exhausted());
        assert!(l.last_error().is_some());

        // Retry hits the same offset and clears the error.
        l.load_next_page(&feed).await.unwrap();
        assert_eq!(l.len(), 8);
        assert!(l.last_error().is_none());
        let offsets: Vec<u64> = feed.requests.borrow().iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![0, 0]);
    }

    // ------------------------------------------------------------------
    // Re-entrancy
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn concurrent_loads_issue_exactly_one_fetch() {
        let feed = ScriptedFeed::new(vec![batch(1..9), batch(9..17)]);
        let l = loader();
        let (a, b) = tokio::join!(l.load_next_page(&feed), l.load_next_page(&feed));
        let outcomes = [a.unwrap(), b.unwrap()];
        assert_eq!(feed.request_count(), 1);
        assert!(outcomes.contains(&LoadOutcome::Skipped));
        assert!(outcomes.contains(&LoadOutcome::Appended { fetched: 8, added: 8 }));
        assert_eq!(l.len(), 8);
    }

    #[tokio::test]
    async fn state_is_fetching_while_request_outstanding() {
        let feed = ScriptedFeed::new(vec![batch(1..9)]);
        let l = loader();
        let (outcome, observed) = tokio::join!(l.load_next_page(&feed), async {
            // Polled after the load future has suspended inside the feed.
            (l.is_fetching(), l.should_load_more(bottom()))
        });
        outcome.unwrap();
        assert_eq!(observed, (true, false));
        assert!(!l.is_fetching());
    }

    #[tokio::test]
    async fn dropped_fetch_returns_loader_to_idle() {
        let feed = ScriptedFeed::new(vec![batch(1..9)]);
        let l = loader();
        {
            let fut = std::pin::pin!(l.load_next_page(&feed));
            // Poll once so the request is issued, then drop the future.
            let polled = futures_poll_once(fut).await;
            assert!(polled.is_none());
            assert!(l.is_fetching());
        }
        assert_eq!(l.state(), LoadState::Idle);
        assert!(l.is_empty());
    }

    /// Poll `fut` a single time, returning its output if it completed.
    async fn futures_poll_once<F: std::future::Future + Unpin>(mut fut: F) -> Option<F::Output> {
        std::future::poll_fn(|cx| {
            std::task::Poll::Ready(match std::pin::Pin::new(&mut fut).poll(cx) {
                std::task::Poll::Ready(v) => Some(v),
                std::task::Poll::Pending => None,
            })
        })
        .await
    }

    // ------------------------------------------------------------------
    // should_load_more
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn should_load_more_requires_bottom_and_idle() {
        let l = loader();
        assert!(l.should_load_more(bottom()));
        assert!(!l.should_load_more(ViewportMetric::new(800.0, 100.0, 2000.0)));

        let feed = ScriptedFeed::new(vec![batch(0..0)]);
        l.load_next_page(&feed).await.unwrap();
        assert!(l.is_exhausted());
        assert!(!l.should_load_more(bottom()));
    }
}
