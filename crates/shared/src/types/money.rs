//! Currency amount helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` persisted with two fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits kept for currency amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Largest accepted tax rate, in percent.
pub const MAX_TAX_RATE: Decimal = Decimal::ONE_HUNDRED;

/// Exclusive upper bound of a line quantity, the range of a `NUMERIC(10,2)` column.
pub const QUANTITY_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Exclusive upper bound of a stored amount, the range of a `NUMERIC(12,2)` column.
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// Rounds an amount to whole cents, half away from zero, and pads it to two places.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_SCALE);
    rounded
}

/// Returns `rate` percent of `amount`, unrounded, or `None` on overflow.
#[must_use]
pub fn percent_of(amount: Decimal, rate: Decimal) -> Option<Decimal> {
    amount.checked_mul(rate)?.checked_div(Decimal::ONE_HUNDRED)
}

/// Returns true if `rate` is a percentage in `0..=100`.
#[must_use]
pub fn is_valid_tax_rate(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= MAX_TAX_RATE
}
