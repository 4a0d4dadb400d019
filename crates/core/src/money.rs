//! Monetary helpers.
//!
//! Amounts are `rust_decimal::Decimal` in currency units (not cents). Every
//! amount that leaves a calculation step is rounded to two decimal places,
//! half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for currency amounts.
pub const DECIMAL_PLACES: u32 = 2;

/// Round a currency amount to two decimal places (half away from zero).
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// `amount * percentage / 100`, unrounded.
///
/// `percentage` is clamped to `0..=100`, so the result never exceeds
/// `amount` in magnitude and the multiplication cannot overflow.
#[inline]
pub fn percent_of(amount: Decimal, percentage: Decimal) -> Decimal {
    let share = percentage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED) / Decimal::ONE_HUNDRED;
    amount * share
}

/// Share of `part` in `whole` as a percentage rounded to two places.
///
/// Returns zero when `whole` is zero.
pub fn ratio_percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    round_money(part / whole * Decimal::ONE_HUNDRED)
}
