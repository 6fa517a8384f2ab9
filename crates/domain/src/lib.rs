// Rust guideline compliant 2026-02-23

//! Shared domain types for the storefront state engine.
//!
//! Defines `Product`, `CartLine`, the paging request/batch pair, the error
//! enums, and the hexagonal port traits: `CatalogFeed`, `KeyValueStore`, and
//! `CartStore`. Every component crate depends on this one; it imports no
//! other workspace crate.

use serde::{Deserialize, Deserializer, Serialize};

/// A catalog product. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable, catalog-unique identifier.
    pub id: u64,
    /// Display title.
    pub title: String,
    /// Unit price, non-negative.
    pub price: f64,
    /// Thumbnail image URL.
    pub thumbnail: String,
}

/// One product entry in the cart plus its quantity.
///
/// Serialized flat, i.e. the product fields and `quantity` side by side, which
/// is the shape stored in the cart slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product this line refers to (composition).
    #[serde(flatten)]
    pub product: Product,
    /// Always `>= 1`. Missing, zero, or negative stored values read back as 1.
    #[serde(default = "default_quantity", deserialize_with = "deserialize_quantity")]
    pub quantity: u32,
}

impl CartLine {
    /// Create a line holding a single unit of `product`.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self { product, quantity: 1 }
    }

    /// Return the line identity, delegating to the wrapped product.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.product.id
    }

    /// Unit price times quantity, at full precision.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

fn default_quantity() -> u32 {
    1
}

/// Lenient quantity decoding: anything that is not a number `>= 1` becomes 1.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is finite, >= 1, and clamped to u32::MAX first"
)]
fn deserialize_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(match raw {
        Some(q) if q.is_finite() && q >= 1.0 => q.min(f64::from(u32::MAX)) as u32,
        _ => 1,
    })
}

/// Offset/limit window requested from a [`CatalogFeed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Number of products to skip, `>= 0`.
    pub offset: u64,
    /// Maximum number of products to return, `> 0`.
    pub limit: u32,
}

/// One ordered page of products returned by a [`CatalogFeed`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogBatch {
    /// Products in feed order. An empty vector signals exhaustion.
    pub products: Vec<Product>,
    /// Total number of products the feed claims to hold (informational).
    pub total_available: u64,
}

/// Errors from the `CatalogFeed` hexagonal port.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeedError {
    /// Transport-level failure (connection, HTTP status, ...).
    #[error("catalog request failed: {reason}")]
    Network {
        /// Human-readable description.
        reason: String,
    },
    /// The response could not be decoded into products.
    #[error("catalog response malformed: {reason}")]
    Decode {
        /// Human-readable description.
        reason: String,
    },
    /// The feed is temporarily unavailable.
    #[error("catalog unavailable")]
    Unavailable,
}

/// Errors from the `KeyValueStore` and `CartStore` ports.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    /// The write would exceed the store's quota.
    #[error("storage quota exceeded (limit: {limit} bytes)")]
    QuotaExceeded { limit: usize },
    /// The store cannot be read or written right now.
    #[error("storage unavailable: {reason}")]
    Unavailable {
        /// Human-readable description.
        reason: String,
    },
    /// The value could not be serialized.
    #[error("storage serialization failed: {reason}")]
    Serialization {
        /// Human-readable description.
        reason: String,
    },
}

/// Hexagonal port: paged, read-only product query.
///
/// `CatalogLoader` depends exclusively on this trait -- never on a concrete
/// adapter. Implementations signal exhaustion with an empty batch.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait CatalogFeed {
    /// Fetch the products in the `request` window, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns a [`FeedError`] when the collaborator cannot serve the page.
    async fn fetch_page(&self, request: PageRequest) -> Result<CatalogBatch, FeedError>;
}

/// Hexagonal port: string key-value persistence (browser-storage shaped).
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// Readers observe either the old or the new value, never a partial one.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::QuotaExceeded`] or [`StorageError::Unavailable`].
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Hexagonal port: whole-cart persistence used by the cart reconciler.
pub trait CartStore {
    /// Return the persisted cart, or an empty vector if nothing usable is stored.
    fn load(&self) -> Vec<CartLine>;

    /// Replace the persisted cart with `lines`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the write cannot be completed.
    fn save(&self, lines: &[CartLine]) -> Result<(), StorageError>;
}

impl<T: CartStore + ?Sized> CartStore for &T {
    fn load(&self) -> Vec<CartLine> {
        (**self).load()
    }

    fn save(&self, lines: &[CartLine]) -> Result<(), StorageError> {
        (**self).save(lines)
    }
}
