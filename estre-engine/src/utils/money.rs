//! Money and measurement helpers
//!
//! All arithmetic runs on `rust_decimal::Decimal`; stored values stay `f64`
//! (meters, fabric costs) or `i64` (final prices).

use rust_decimal::prelude::*;

/// Rounding precision for stored currency amounts
const DECIMAL_PLACES: u32 = 2;
/// Fabric is ordered in tenths of a meter
const METER_PLACES: u32 = 1;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Final price: nearest whole currency unit (half away from zero), never negative
pub fn round_price(value: Decimal) -> i64 {
    value
        .max(Decimal::ZERO)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}

/// Meters rounded up to the next 0.1, never negative
pub fn ceil_meters(value: Decimal) -> f64 {
    value
        .max(Decimal::ZERO)
        .round_dp_with_strategy(METER_PLACES, RoundingStrategy::ToPositiveInfinity)
        .to_f64()
        .unwrap_or_default()
}

/// Indian digit grouping: `1234567` -> `12,34,567`
pub fn format_inr(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };

    if digits.len() <= 3 {
        return format!("{}{}", sign, digits);
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{}{},{}", sign, groups.join(","), tail)
}
