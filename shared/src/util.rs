//! Time and money helpers

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Current UTC time as Unix milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Today's date (local time) formatted as `yyyyMMdd`
pub fn today_compact() -> String {
    chrono::Local::now().format("%Y%m%d").to_string()
}

/// Minor currency units per major unit (paise per rupee)
const MINOR_UNITS: i64 = 100;

/// Convert an amount to integer minor units, rounding half-up to 2 places.
///
/// Returns `None` when the amount does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::from(MINOR_UNITS))?
        .to_i64()
}

/// Convert integer minor units back to a 2-place decimal amount
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_minor_units_roundtrip() {
        let price = Decimal::from_str("5999.50").unwrap();
        let minor = to_minor_units(price).unwrap();
        assert_eq!(minor, 599_950);
        assert_eq!(from_minor_units(minor), price);
    }

    #[test]
    fn test_minor_units_rounds_half_up() {
        let price = Decimal::from_str("10.005").unwrap();
        assert_eq!(to_minor_units(price), Some(1001));
    }

    #[test]
    fn test_from_minor_units_scale() {
        assert_eq!(from_minor_units(500_000).to_string(), "5000.00");
    }

    #[test]
    fn test_today_compact_shape() {
        let today = today_compact();
        assert_eq!(today.len(), 8);
        assert!(today.chars().all(|c| c.is_ascii_digit()));
    }
}
