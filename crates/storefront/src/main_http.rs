// Rust guideline compliant 2026-02-27

//! Storefront entry point -- live catalog over HTTP, cart persisted to disk.
//!
//! Identical session to the `storefront` binary except that products come from
//! a dummyjson-style HTTP endpoint and the cart slot lives in a file under
//! `.storefront/` in the current working directory. Run it twice to see the
//! cart survive the restart.
//!
//! # Usage
//!
//! ```text
//! RUST_LOG=info cargo run --bin storefront_http
//!
//! # Point at another catalog
//! STOREFRONT_CATALOG_URL=http://localhost:8080 cargo run --bin storefront_http
//! ```

mod session;

// Load the HTTP-only adapters directly so they only enter this binary's module
// tree, avoiding dead_code warnings in the offline `storefront` binary.
#[path = "adapters/file_store.rs"]
mod file_store;
#[path = "adapters/http_catalog.rs"]
mod http_catalog;

use anyhow::Context as _;
use cart::SlotCartStore;
use catalog::{DEFAULT_PAGE_SIZE, LoaderConfig};
use file_store::FileStore;
use http_catalog::{DEFAULT_BASE_URL, HttpCatalog};
use pricing::DiscountRate;
use session::Storefront;

/// Environment variable overriding the catalog base URL.
const CATALOG_URL_ENV: &str = "STOREFRONT_CATALOG_URL";

/// Directory holding the persisted key-value slots.
const STORE_DIR: &str = ".storefront";

/// Viewport height of the simulated browser window, in pixels.
const VIEWPORT_HEIGHT: f64 = 900.0;

/// Pages to scroll through before showing the cart.
const PAGES_TO_BROWSE: u32 = 3;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let base_url = std::env::var(CATALOG_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
    let store = FileStore::open(STORE_DIR).context("failed to open cart store")?;
    let loader_config = LoaderConfig::builder(DEFAULT_PAGE_SIZE)
        .max_pages(PAGES_TO_BROWSE)
        .build()
        .context("failed to build loader config")?;

    let storefront = Storefront::new(
        HttpCatalog::new(base_url.clone()),
        SlotCartStore::new(store),
        loader_config,
        DiscountRate::STANDARD,
    );
    tracing::info!(%base_url, restored_lines = storefront.cart().len(), "main.session.started");

    let browse = async {
        if let Err(e) = storefront.start().await {
            tracing::warn!(error = %e, "main.first_page.failed: retrying on scroll");
        }
        while !storefront.loader().is_exhausted() {
            let content = storefront.viewport_at(VIEWPORT_HEIGHT, 0.0).scroll_height;
            let metric = storefront.viewport_at(VIEWPORT_HEIGHT, (content - VIEWPORT_HEIGHT).max(0.0));
            if let catalog::ScrollOutcome::Loaded(Err(e)) = storefront.on_scroll(metric).await {
                // No automatic retry: stop browsing, keep what was loaded.
                tracing::warn!(error = %e, "main.catalog.stopped_loading");
                break;
            }
        }
    };

    // The fetch has no timeout of its own; CTRL+C abandons browsing.
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("main.shutdown: ctrl_c received");
            return Ok(());
        }
        () = browse => {}
    }

    // Add the cheapest listed product.
    let cheapest = storefront
        .loader()
        .items()
        .iter()
        .min_by(|a, b| a.price.total_cmp(&b.price))
        .map(|p| p.id);
    if let Some(id) = cheapest {
        storefront.add_to_cart(id);
    }

    let cart = storefront.cart();
    for line in cart.lines().iter() {
        println!(
            "{:>4} x {:<32} ${}",
            line.quantity,
            line.product.title,
            pricing::format_amount(line.line_total())
        );
    }
    println!("{}", storefront.summary());
    println!("{}", storefront.checkout());
    if !cart.is_persisted() {
        tracing::warn!("main.cart.not_persisted: cart will not survive a restart");
    }

    Ok(())
}
