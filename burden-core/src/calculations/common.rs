//! Common utility functions for burden calculations.
//!
//! Every calculator rounds intermediate products to the currency subunit
//! (two decimal places) before summing, and the aggregator rounds exposed
//! figures to whole currency units. Both policies live here.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use tracing::warn;

/// Smallest currency denomination.
pub const SUBUNIT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds a decimal value to the currency subunit using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use burden_core::calculations::common::round_subunit;
///
/// assert_eq!(round_subunit(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_subunit(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_subunit(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_subunit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a decimal value to whole currency units using half-up rounding.
///
/// ```
/// use rust_decimal_macros::dec;
/// use burden_core::calculations::common::round_to_unit;
///
/// assert_eq!(round_to_unit(dec!(327000.49)), dec!(327000));
/// assert_eq!(round_to_unit(dec!(327000.50)), dec!(327001));
/// ```
pub fn round_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use burden_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps a caller-supplied amount to zero when it is negative.
///
/// Negative amounts have a safe default, so they are logged and replaced
/// rather than rejected.
pub fn clamp_non_negative(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, value = %value, "negative amount clamped to zero");
        Decimal::ZERO
    } else {
        value
    }
}

/// An amount grew past what a `Decimal` can hold.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{field} is too large to calculate with")]
pub struct AmountOutOfRange {
    pub field: &'static str,
}

/// `a × b`, or [`AmountOutOfRange`] naming `field` on overflow.
pub fn checked_mul(
    field: &'static str,
    a: Decimal,
    b: Decimal,
) -> Result<Decimal, AmountOutOfRange> {
    a.checked_mul(b).ok_or(AmountOutOfRange { field })
}

/// `a + b`, or [`AmountOutOfRange`] naming `field` on overflow.
pub fn checked_add(
    field: &'static str,
    a: Decimal,
    b: Decimal,
) -> Result<Decimal, AmountOutOfRange> {
    a.checked_add(b).ok_or(AmountOutOfRange { field })
}

/// Sum of `values`, or [`AmountOutOfRange`] naming `field` on overflow.
pub fn checked_sum(
    field: &'static str,
    values: impl IntoIterator<Item = Decimal>,
) -> Result<Decimal, AmountOutOfRange> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| checked_add(field, acc, v))
}

/// Returns `true` when `rate` lies within `[0, 1]`.
pub(crate) fn is_fraction(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= Decimal::ONE
}
