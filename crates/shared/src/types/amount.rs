//! Amount helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount in the journal is a `rust_decimal::Decimal` kept to
//! [`AMOUNT_SCALE`] decimal places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places carried by posted amounts.
pub const AMOUNT_SCALE: u32 = 2;

/// Rounds an amount to [`AMOUNT_SCALE`] places, half away from zero.
#[must_use]
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with exactly two decimal places (`200` -> `"200.00"`).
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = round_amount(amount);
    rounded.rescale(AMOUNT_SCALE);
    rounded.to_string()
}

/// Computes `amount × rate / 100`, rounded to [`AMOUNT_SCALE`] places.
///
/// `rate` is a percentage (`16` means 16 %). Returns `None` when the
/// product does not fit in a `Decimal`.
#[must_use]
pub fn percentage_of(amount: Decimal, rate: Decimal) -> Option<Decimal> {
    amount
        .checked_mul(rate)
        .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
        .map(round_amount)
}
