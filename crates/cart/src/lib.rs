// Rust guideline compliant 2026-02-23

//! Cart reconciler: owns the authoritative in-memory cart and keeps a
//! `CartStore` hexagonal port synchronized on every mutation (write-through).
//!
//! Entry points: [`Cart::hydrate`], [`Cart::add_to_cart`],
//! [`Cart::remove_from_cart`], [`Cart::set_quantity`]. The JSON slot adapter
//! for the `CartStore` port is [`SlotCartStore`].

mod store;

pub use store::{DEFAULT_SLOT_KEY, SlotCartStore};

use domain::{CartLine, CartStore, Product};
use std::cell::{Cell, Ref, RefCell};

// ---------------------------------------------------------------------------
// Quantity input
// ---------------------------------------------------------------------------

/// Clamp a requested quantity into `[1, u32::MAX]`.
#[must_use]
pub fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(1)).unwrap_or(u32::MAX)
}

/// Parse raw quantity text from a numeric input field.
///
/// Fractions are truncated; empty, non-numeric, zero, or negative input
/// yields 1. Never fails.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is integral and clamped into u32 range"
)]
pub fn parse_quantity(raw: &str) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(q) if q.is_finite() => q.trunc().clamp(1.0, f64::from(u32::MAX)) as u32,
        _ => 1,
    }
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

/// What a cart operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    /// The in-memory cart differs from before the call.
    pub changed: bool,
    /// The store holds the current cart after the call.
    pub persisted: bool,
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

/// The cart reconciler.
///
/// Lines are kept in first-add order with at most one line per product id.
/// Every mutating call writes the whole cart to the injected store before
/// returning. A failed write is logged and leaves the in-memory cart
/// authoritative; [`is_persisted`](Self::is_persisted) reports the divergence
/// until a later write succeeds.
///
/// Methods take `&self` so UI handlers can run while a catalog fetch is
/// suspended on the same thread.
#[derive(Debug)]
pub struct Cart<S: CartStore> {
    store: S,
    lines: RefCell<Vec<CartLine>>,
    persisted: Cell<bool>,
}

impl<S: CartStore> Cart<S> {
    /// Build the cart from whatever `store` holds. Called once at startup.
    ///
    /// Never fails: unreadable storage yields an empty cart. Duplicate ids in
    /// stored data are merged into their first occurrence.
    #[must_use]
    pub fn hydrate(store: S) -> Self {
        let stored = store.load();
        let stored_len = stored.len();
        let mut lines: Vec<CartLine> = Vec::with_capacity(stored_len);
        for line in stored {
            match lines.iter_mut().find(|l| l.id() == line.id()) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => lines.push(line),
            }
        }
        if lines.len() != stored_len {
            tracing::warn!(stored = stored_len, merged = lines.len(), "cart.hydrate.duplicates_merged");
        }
        tracing::info!(lines = lines.len(), "cart.hydrated");
        Self { store, lines: RefCell::new(lines), persisted: Cell::new(true) }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line's quantity if the id is already in the
    /// cart (other fields untouched), otherwise appends a new line.
    pub fn add_to_cart(&self, product: &Product) -> Mutation {
        {
            let mut lines = self.lines.borrow_mut();
            match lines.iter_mut().find(|l| l.id() == product.id) {
                Some(line) => {
                    line.quantity = line.quantity.saturating_add(1);
                    tracing::debug!(product_id = product.id, quantity = line.quantity, "cart.line.incremented");
                }
                None => {
                    lines.push(CartLine::new(product.clone()));
                    tracing::debug!(product_id = product.id, "cart.line.added");
                }
            }
        }
        self.write_through(true)
    }

    /// Remove the line for `id`. Removing an absent id leaves the cart unchanged.
    pub fn remove_from_cart(&self, id: u64) -> Mutation {
        let changed = {
            let mut lines = self.lines.borrow_mut();
            let before = lines.len();
            lines.retain(|l| l.id() != id);
            lines.len() != before
        };
        if changed {
            tracing::debug!(product_id = id, "cart.line.removed");
        }
        self.write_through(changed)
    }

    /// Replace the quantity of line `id`, clamping values below 1 to 1.
    pub fn set_quantity(&self, id: u64, new_quantity: i64) -> Mutation {
        let quantity = clamp_quantity(new_quantity);
        let changed = {
            let mut lines = self.lines.borrow_mut();
            match lines.iter_mut().find(|l| l.id() == id) {
                Some(line) => {
                    let changed = line.quantity != quantity;
                    line.quantity = quantity;
                    changed
                }
                None => false,
            }
        };
        if changed {
            tracing::debug!(product_id = id, quantity, "cart.line.quantity_set");
        }
        self.write_through(changed)
    }

    /// Apply raw text from the quantity input of line `id`.
    pub fn set_quantity_input(&self, id: u64, raw: &str) -> Mutation {
        self.set_quantity(id, i64::from(parse_quantity(raw)))
    }

    /// The "+" control: one more unit of line `id`.
    ///
    /// An unknown id touches neither the cart nor the store.
    pub fn increment(&self, id: u64) -> Mutation {
        match self.line(id) {
            Some(line) => self.set_quantity(id, i64::from(line.quantity) + 1),
            None => Mutation { changed: false, persisted: self.persisted.get() },
        }
    }

    /// The "-" control: one fewer unit of line `id`.
    ///
    /// Refused at quantity 1 (the control is disabled there); a refused or
    /// unknown-id call touches neither the cart nor the store.
    pub fn decrement(&self, id: u64) -> Mutation {
        if !self.can_decrement(id) {
            return Mutation { changed: false, persisted: self.persisted.get() };
        }
        match self.line(id) {
            Some(line) => self.set_quantity(id, i64::from(line.quantity) - 1),
            None => Mutation { changed: false, persisted: self.persisted.get() },
        }
    }

    /// `true` when line `id` exists with a quantity above 1.
    #[must_use]
    pub fn can_decrement(&self, id: u64) -> bool {
        self.lines.borrow().iter().any(|l| l.id() == id && l.quantity > 1)
    }

    /// Borrow the cart lines, in first-add order.
    #[must_use]
    pub fn lines(&self) -> Ref<'_, Vec<CartLine>> {
        self.lines.borrow()
    }

    /// Copy of line `id`, if present.
    #[must_use]
    pub fn line(&self, id: u64) -> Option<CartLine> {
        self.lines.borrow().iter().find(|l| l.id() == id).cloned()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.borrow().len()
    }

    /// `true` when the cart holds no line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.borrow().iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// `false` after a failed write, until the next successful one.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.persisted.get()
    }

    /// The injected store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save the whole cart; failures are logged, never propagated.
    fn write_through(&self, changed: bool) -> Mutation {
        let result = self.store.save(&self.lines.borrow());
        let persisted = match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, lines = self.len(), "cart.persist.failed");
                false
            }
        };
        if persisted && !self.persisted.get() {
            tracing::info!("cart.persist.recovered");
        }
        self.persisted.set(persisted);
        Mutation { changed, persisted }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
