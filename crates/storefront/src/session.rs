// Rust guideline compliant 2026-02-23

//! One storefront session: the catalog loader, the cart, and the pricing
//! rate wired to a concrete feed and store.
//!
//! Both binaries drive the same session; only the adapters differ.

use cart::{Cart, Mutation};
use catalog::{CatalogError, CatalogLoader, LoadOutcome, LoaderConfig, ScrollOutcome, ScrollTrigger, ViewportMetric};
use domain::{CartStore, CatalogFeed};
use pricing::{DiscountRate, PriceSummary};

/// Products per grid row at the widest layout.
const GRID_COLUMNS: usize = 4;

/// Rendered height of one product card row, in pixels.
const ROW_HEIGHT: f64 = 320.0;

/// Shown when the checkout button is pressed.
pub const CHECKOUT_NOTICE: &str = "Checkout functionality to be implemented.";

/// Catalog view and cart view sharing one feed and one cart store.
#[derive(Debug)]
pub struct Storefront<F: CatalogFeed, S: CartStore> {
    feed: F,
    loader: CatalogLoader,
    cart: Cart<S>,
    trigger: ScrollTrigger,
    rate: DiscountRate,
}

impl<F: CatalogFeed, S: CartStore> Storefront<F, S> {
    /// Hydrate the cart from `store` and prepare an idle catalog loader.
    #[must_use]
    pub fn new(feed: F, store: S, loader_config: LoaderConfig, rate: DiscountRate) -> Self {
        Self {
            feed,
            loader: CatalogLoader::new(loader_config),
            cart: Cart::hydrate(store),
            trigger: ScrollTrigger::new(),
            rate,
        }
    }

    /// Load the first catalog page.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Feed`] if the first page cannot be fetched; the
    /// session stays usable and a later scroll retries.
    pub async fn start(&self) -> Result<LoadOutcome, CatalogError> {
        self.loader.initialize(&self.feed).await
    }

    /// Forward one scroll notification to the trigger.
    pub async fn on_scroll(&self, metric: ViewportMetric) -> ScrollOutcome {
        self.trigger.on_scroll(&self.loader, &self.feed, metric).await
    }

    /// The explicit "load more" action.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogLoader::load_next_page`].
    #[allow(dead_code, reason = "driven by the offline binary; dead in storefront_http")]
    pub async fn load_more(&self) -> Result<LoadOutcome, CatalogError> {
        self.loader.load_next_page(&self.feed).await
    }

    /// Viewport measurements for the rendered grid scrolled to `scroll_top`.
    #[must_use]
    pub fn viewport_at(&self, inner_height: f64, scroll_top: f64) -> ViewportMetric {
        let rows = self.loader.len().div_ceil(GRID_COLUMNS);
        #[expect(
            clippy::cast_precision_loss,
            reason = "row counts stay far below 2^52"
        )]
        let content_height = rows as f64 * ROW_HEIGHT;
        ViewportMetric::new(inner_height, scroll_top, content_height)
    }

    /// "Add to Cart" on a product card. `None` if the product is not listed.
    pub fn add_to_cart(&self, product_id: u64) -> Option<Mutation> {
        let product = self.loader.items().iter().find(|p| p.id == product_id).cloned()?;
        Some(self.cart.add_to_cart(&product))
    }

    /// Subtotal, discount and total of the current cart.
    #[must_use]
    pub fn summary(&self) -> PriceSummary {
        PriceSummary::compute(&self.cart.lines(), self.rate)
    }

    /// The checkout button. Not implemented; only reports that.
    pub fn checkout(&self) -> &'static str {
        tracing::info!(lines = self.cart.len(), "checkout.not_implemented");
        CHECKOUT_NOTICE
    }

    /// The catalog loader.
    #[must_use]
    pub fn loader(&self) -> &CatalogLoader {
        &self.loader
    }

    /// The cart.
    #[must_use]
    pub fn cart(&self) -> &Cart<S> {
        &self.cart
    }
}
