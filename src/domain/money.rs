use crate::error::{PaymentError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Currencies without a fractional unit. Everything else uses two decimals.
pub const ZERO_DECIMAL_CURRENCIES: [&str; 4] = ["JPY", "KRW", "CLP", "VND"];

pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Currency assumed for refunds when the session does not record one.
pub const FALLBACK_CURRENCY: &str = "GBP";

/// Number of decimal places of the minor unit for `currency` (case-insensitive).
pub fn decimal_places(currency: &str) -> u32 {
    let code = currency.trim();
    if ZERO_DECIMAL_CURRENCIES
        .iter()
        .any(|zero| zero.eq_ignore_ascii_case(code))
    {
        0
    } else {
        DEFAULT_DECIMAL_PLACES
    }
}

/// Converts a major-unit amount (e.g. `160.00` GBP) into gateway minor units (`16000`).
///
/// Rounds to the nearest integer, midpoints away from zero.
pub fn to_minor_units(amount: Decimal, currency: &str) -> Result<i64> {
    let factor = Decimal::from(10_i64.pow(decimal_places(currency)));
    amount
        .checked_mul(factor)
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_i64())
        .ok_or_else(|| {
            PaymentError::InvalidInput(format!(
                "amount {amount} {currency} does not fit in minor units"
            ))
        })
}

/// Converts gateway minor units back into a major-unit amount.
pub fn from_minor_units(minor: i64, currency: &str) -> Decimal {
    Decimal::new(minor, decimal_places(currency))
}
