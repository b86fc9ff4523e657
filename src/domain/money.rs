//! Conversions between stored integer cents and decimal amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places reported for every monetary amount.
pub const MONEY_SCALE: u32 = 2;

/// Interpret an amount stored in the smallest currency unit.
pub fn cents_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, MONEY_SCALE)
}

/// Round half-up (away from zero) to [`MONEY_SCALE`] places.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Round `amount` and express it in the smallest currency unit.
///
/// Returns `None` when the value does not fit into an `i64`.
pub fn decimal_to_cents(amount: Decimal) -> Option<i64> {
    i64::try_from(round_money(amount).mantissa()).ok()
}
