//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for multi-currency:
//! - Base amounts are stored with `BASE_AMOUNT_SCALE` decimal places
//! - Use banker's rounding (round half to even)
//! - Store both original and converted amounts

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Decimal places kept on base-currency amounts.
pub const BASE_AMOUNT_SCALE: u32 = 4;

/// Decimal places accepted on exchange rates.
pub const RATE_SCALE: u32 = 10;

/// Exclusive bound on stored amounts (`NUMERIC(19, 4)`): 10^15.
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Exclusive bound on stored rates (`NUMERIC(20, 10)`): 10^10.
pub const RATE_LIMIT: Decimal = Decimal::from_parts(0x540B_E400, 0x2, 0, false, 0);

/// Converts an amount using the given exchange rate.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
/// Returns `None` if the product overflows.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal, decimal_places: u32) -> Option<Decimal> {
    amount.checked_mul(rate).map(|converted| {
        converted.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
    })
}

/// Converts a foreign amount into base currency at `BASE_AMOUNT_SCALE`.
#[must_use]
pub fn to_base(amount: Decimal, rate_to_base: Decimal) -> Option<Decimal> {
    convert_amount(amount, rate_to_base, BASE_AMOUNT_SCALE)
}

/// True if the amount can be stored without rounding or overflow.
#[must_use]
pub fn is_storable_amount(value: Decimal) -> bool {
    value.abs() < AMOUNT_LIMIT && value.normalize().scale() <= BASE_AMOUNT_SCALE
}

/// True if the rate can be stored without rounding or overflow.
#[must_use]
pub fn is_storable_rate(value: Decimal) -> bool {
    value.abs() < RATE_LIMIT && value.normalize().scale() <= RATE_SCALE
}

/// Normalizes an ISO 4217 style code: trimmed, upper-cased, three ASCII letters.
///
/// Returns `None` when the input is not a plausible currency code.
#[must_use]
pub fn normalize_code(raw: &str) -> Option<String> {
    let code = raw.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_convert_amount() {
        // 100 USD * 15000 = 1,500,000 IDR
        let result = convert_amount(dec!(100), dec!(15000), 0);
        assert_eq!(result, Some(dec!(1500000)));
    }

    #[test]
    fn test_bankers_rounding() {
        // 2.5 rounds to 2, 3.5 rounds to 4
        assert_eq!(convert_amount(dec!(1), dec!(2.5), 0), Some(dec!(2)));
        assert_eq!(convert_amount(dec!(1), dec!(3.5), 0), Some(dec!(4)));
    }

    #[test]
    fn test_to_base_keeps_four_places() {
        // 100.00 EUR at 1.08345 = 108.345 exactly
        assert_eq!(to_base(dec!(100.00), dec!(1.08345)), Some(dec!(108.3450)));
        // 0.333333 * 3 = 0.999999 -> 1.0000
        assert_eq!(to_base(dec!(0.333333), dec!(3)), Some(dec!(1.0000)));
        // midpoint at the fifth place rounds to even
        assert_eq!(to_base(dec!(1), dec!(0.00005)), Some(dec!(0.0000)));
        assert_eq!(to_base(dec!(1), dec!(0.00015)), Some(dec!(0.0002)));
    }

    #[test]
    fn test_to_base_with_unit_rate_is_identity() {
        assert_eq!(to_base(dec!(1234.5678), Decimal::ONE), Some(dec!(1234.5678)));
    }

    #[test]
    fn test_to_base_overflow_is_none() {
        assert_eq!(to_base(Decimal::MAX, dec!(3.6725)), None);
    }

    #[test]
    fn test_limits() {
        assert_eq!(AMOUNT_LIMIT, dec!(1_000_000_000_000_000));
        assert_eq!(RATE_LIMIT, dec!(10_000_000_000));
    }

    #[rstest]
    #[case(dec!(999_999_999_999_999.9999), true)]
    #[case(dec!(1_000_000_000_000_000), false)]
    #[case(dec!(0.0001), true)]
    #[case(dec!(0.00001), false)]
    #[case(dec!(12.340000), true)]
    #[case(dec!(-5.5), true)]
    fn test_is_storable_amount(#[case] value: Decimal, #[case] expected: bool) {
        assert_eq!(is_storable_amount(value), expected);
    }

    #[rstest]
    #[case(dec!(3.6725), true)]
    #[case(dec!(0.0000000001), true)]
    #[case(dec!(0.00000000001), false)]
    #[case(dec!(10_000_000_000), false)]
    fn test_is_storable_rate(#[case] value: Decimal, #[case] expected: bool) {
        assert_eq!(is_storable_rate(value), expected);
    }

    #[rstest]
    #[case("usd", Some("USD"))]
    #[case(" EUR ", Some("EUR"))]
    #[case("Idr", Some("IDR"))]
    #[case("", None)]
    #[case("US", None)]
    #[case("USDT", None)]
    #[case("U5D", None)]
    fn test_normalize_code(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_code(raw).as_deref(), expected);
    }
}
