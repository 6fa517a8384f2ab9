// Rust guideline compliant 2026-02-23

//! Scroll-driven trigger for the catalog loader.
//!
//! The bottom-of-content policy is the pure [`ViewportMetric::reached_bottom`]
//! predicate; [`ScrollTrigger`] only forwards to the loader's guarded entry point.

use domain::CatalogFeed;

use crate::{CatalogError, CatalogLoader, LoadOutcome};

/// Viewport measurements taken on a scroll notification, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetric {
    /// Height of the visible viewport.
    pub inner_height: f64,
    /// Distance scrolled from the top of the document.
    pub scroll_top: f64,
    /// Full height of the document content.
    pub scroll_height: f64,
}

impl ViewportMetric {
    /// Bundle one set of measurements.
    #[must_use]
    pub fn new(inner_height: f64, scroll_top: f64, scroll_height: f64) -> Self {
        Self { inner_height, scroll_top, scroll_height }
    }

    /// `true` when the viewport bottom is within `tolerance` of the content end.
    #[must_use]
    pub fn reached_bottom(&self, tolerance: f64) -> bool {
        self.inner_height + self.scroll_top + tolerance >= self.scroll_height
    }
}

/// What a scroll notification led to.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollOutcome {
    /// Not at the bottom, or the loader is busy or exhausted.
    Ignored,
    /// A load was attempted; failures have already been logged by the loader.
    Loaded(Result<LoadOutcome, CatalogError>),
}

/// Stateless observer turning scroll notifications into page loads.
///
/// Performs no debouncing of its own; overlapping notifications are absorbed
/// by the loader's re-entrancy guard.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollTrigger;

impl ScrollTrigger {
    /// Create a trigger.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Handle one scroll notification.
    pub async fn on_scroll<F: CatalogFeed>(
        &self,
        loader: &CatalogLoader,
        feed: &F,
        metric: ViewportMetric,
    ) -> ScrollOutcome {
        if !loader.should_load_more(metric) {
            return ScrollOutcome::Ignored;
        }
        tracing::debug!(scroll_top = metric.scroll_top, "scroll.trigger.load_more");
        ScrollOutcome::Loaded(loader.load_next_page(feed).await)
    }
}
