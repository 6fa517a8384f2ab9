// Rust guideline compliant 2026-02-23

//! Pricing calculator: pure functions over cart lines.
//!
//! Amounts accumulate at full `f64` precision; rounding to two decimals only
//! happens in [`format_amount`] and the [`PriceSummary`] display.

use domain::CartLine;
use std::fmt;

// ---------------------------------------------------------------------------
// PricingError
// ---------------------------------------------------------------------------

/// Errors raised while configuring pricing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    /// The discount rate is outside `[0, 1)` or not finite.
    #[error("invalid discount rate {rate}: must be in [0, 1)")]
    InvalidRate {
        /// The rejected value.
        rate: f64,
    },
}

// ---------------------------------------------------------------------------
// DiscountRate
// ---------------------------------------------------------------------------

/// A validated fraction in `[0, 1)` applied uniformly to the subtotal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountRate(f64);

impl DiscountRate {
    /// The storefront's flat 10% discount.
    pub const STANDARD: Self = Self(0.10);

    /// No discount.
    pub const NONE: Self = Self(0.0);

    /// Validate `rate`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidRate`] unless `0 <= rate < 1`.
    pub fn new(rate: f64) -> Result<Self, PricingError> {
        if rate.is_finite() && (0.0..1.0).contains(&rate) {
            Ok(Self(rate))
        } else {
            Err(PricingError::InvalidRate { rate })
        }
    }

    /// The fraction as a plain number.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// The rate as a whole percentage, e.g. `10` for `0.10`.
    #[must_use]
    pub fn percent(self) -> f64 {
        (self.0 * 100.0).round()
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        Self::STANDARD
    }
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// `Σ price × quantity` over all lines.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> f64 {
    lines.iter().map(CartLine::line_total).sum()
}

/// `subtotal × rate`.
#[must_use]
pub fn discount_amount(lines: &[CartLine], rate: DiscountRate) -> f64 {
    subtotal(lines) * rate.value()
}

/// `subtotal − discount_amount`.
#[must_use]
pub fn total(lines: &[CartLine], rate: DiscountRate) -> f64 {
    let subtotal = subtotal(lines);
    subtotal - subtotal * rate.value()
}

/// Render an amount with exactly two decimals, for display only.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// The three figures shown under the cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSummary {
    /// Sum of line totals.
    pub subtotal: f64,
    /// Amount taken off by the discount.
    pub discount: f64,
    /// Amount due.
    pub total: f64,
    /// Rate the discount was computed with.
    pub rate: DiscountRate,
}

impl PriceSummary {
    /// Compute all figures from one subtotal pass.
    #[must_use]
    pub fn compute(lines: &[CartLine], rate: DiscountRate) -> Self {
        let subtotal = subtotal(lines);
        let discount = subtotal * rate.value();
        Self { subtotal, discount, total: subtotal - discount, rate }
    }
}

impl fmt::Display for PriceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Subtotal: ${}", format_amount(self.subtotal))?;
        writeln!(f, "Discount ({}%): -${}", self.rate.percent(), format_amount(self.discount))?;
        write!(f, "Total: ${}", format_amount(self.total))
    }
}
