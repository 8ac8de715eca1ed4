//! Monetary rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to two decimal places, half-up.
///
/// Midpoints round away from zero, so `0.005` becomes `0.01`. Each
/// sub-amount is rounded once, when it is finalized, and totals are summed
/// from the rounded parts.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("2083.245").unwrap()), Decimal::from_str("2083.25").unwrap());
/// assert_eq!(round_money(Decimal::from_str("4426.8").unwrap()), Decimal::from_str("4426.80").unwrap());
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
