//! Money arithmetic
//!
//! Prices are handled as [`Decimal`] everywhere in code and stored as
//! integer cents in SQLite. Rounding is always 2 decimal places, midpoint
//! away from zero. Tax is rounded before being added, so
//! `total = subtotal + tax` holds exactly on the stored values.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round to 2 decimal places, midpoint away from zero
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Integer cents for a decimal amount.
///
/// Callers validate the amount range first (menu prices are capped well
/// below the i64 ceiling); out-of-range values collapse to 0.
pub fn to_cents(amount: Decimal) -> i64 {
    (round2(amount) * Decimal::ONE_HUNDRED)
        .trunc()
        .to_i64()
        .unwrap_or(0)
}

/// Decimal amount for integer cents
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Computed order totals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Compute subtotal / tax / total for `(unit_price, quantity)` lines.
///
/// `subtotal = Σ price × qty`, `tax = round2(subtotal × rate)`,
/// `total = subtotal + tax`.
pub fn order_totals<I>(lines: I, tax_rate: Decimal) -> OrderTotals
where
    I: IntoIterator<Item = (Decimal, i64)>,
{
    let subtotal: Decimal = lines
        .into_iter()
        .map(|(price, qty)| price * Decimal::from(qty))
        .sum();
    let subtotal = round2(subtotal);
    let tax = round2(subtotal * tax_rate);
    OrderTotals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}
