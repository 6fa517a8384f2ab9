// Rust guideline compliant 2026-02-23

//! Storefront entry point -- offline demo.
//!
//! Wires the catalog loader and the cart to the synthetic `DemoCatalog` feed
//! and an in-memory key-value store, then plays a scripted user session:
//! scroll to the bottom until the catalog is exhausted while adding products,
//! adjust quantities, and print the cart summary.
//!
//! # Usage
//!
//! ```text
//! RUST_LOG=info cargo run --bin storefront
//!
//! # Also show per-page and per-line debug output
//! RUST_LOG=debug cargo run --bin storefront
//! ```

mod adapters;
mod session;

use adapters::demo_catalog::{DemoCatalog, DemoCatalogConfig};
use adapters::in_memory_store::InMemoryStore;
use anyhow::Context as _;
use cart::SlotCartStore;
use catalog::{DEFAULT_PAGE_SIZE, LoaderConfig};
use pricing::DiscountRate;
use session::Storefront;

/// Products in the synthetic catalog.
const CATALOG_SIZE: u64 = 30;

/// Fixed seed so every demo run lists the same products.
const DEMO_SEED: u64 = 7;

/// Share of catalog fetches that fail, to show the retry-on-scroll path.
const FAILURE_RATE: f64 = 0.2;

/// Cart slot quota in bytes, roughly what a handful of lines needs.
const STORE_QUOTA: usize = 4 * 1024;

/// Viewport height of the simulated browser window, in pixels.
const VIEWPORT_HEIGHT: f64 = 900.0;

/// Upper bound on simulated scroll events.
const MAX_SCROLLS: u64 = 50;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize the tracing subscriber before any async work.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let catalog_config = DemoCatalogConfig::builder(CATALOG_SIZE)
        .failure_rate(FAILURE_RATE)
        .seed(DEMO_SEED)
        .build()
        .context("failed to build demo catalog config")?;
    let loader_config = LoaderConfig::builder(DEFAULT_PAGE_SIZE)
        .build()
        .context("failed to build loader config")?;

    let storefront = Storefront::new(
        DemoCatalog::new(&catalog_config),
        SlotCartStore::new(InMemoryStore::with_quota(STORE_QUOTA)),
        loader_config,
        DiscountRate::STANDARD,
    );

    if let Err(e) = storefront.start().await {
        tracing::warn!(error = %e, "main.first_page.failed: waiting for scroll to retry");
    }

    // Scroll to the bottom of the grid until the feed runs dry. Each scroll
    // races a click on "Add to Cart", as a user would while a page loads.
    let mut scrolls = 0u64;
    while !storefront.loader().is_exhausted() && scrolls < MAX_SCROLLS {
        scrolls += 1;
        let content = storefront.viewport_at(VIEWPORT_HEIGHT, 0.0).scroll_height;
        let metric = storefront.viewport_at(VIEWPORT_HEIGHT, (content - VIEWPORT_HEIGHT).max(0.0));
        let product_id = scrolls % 5 + 1;
        let (outcome, added) = tokio::join!(storefront.on_scroll(metric), async {
            storefront.add_to_cart(product_id)
        });
        tracing::debug!(scrolls, ?outcome, ?added, "main.scroll");
    }
    tracing::info!(
        products = storefront.loader().len(),
        exhausted = storefront.loader().is_exhausted(),
        scrolls,
        "main.catalog.done"
    );

    // The explicit "load more" button is a no-op once the feed is exhausted.
    let load_more = storefront.load_more().await;
    tracing::debug!(?load_more, "main.load_more");

    // Cart view: quantity controls and removal.
    let cart = storefront.cart();
    cart.increment(1);
    cart.decrement(2);
    cart.set_quantity_input(3, "0");
    cart.remove_from_cart(4);
    if !cart.is_persisted() {
        tracing::warn!("main.cart.not_persisted: changes kept in memory only");
    }

    for line in cart.lines().iter() {
        println!(
            "{:>4} x {:<24} ${}",
            line.quantity,
            line.product.title,
            pricing::format_amount(line.line_total())
        );
    }
    println!("{}", storefront.summary());
    println!("{}", storefront.checkout());

    Ok(())
}
