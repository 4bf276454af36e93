//! Property-based tests for base currency conversion.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::conversion::{BASE_AMOUNT_SCALE, to_base};

/// Strategy to generate positive decimal amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.000001 to 100.000000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 6))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Base amounts never carry more than four decimal places.
    #[test]
    fn prop_to_base_rounds_to_scale(amount in positive_amount(), rate in positive_rate()) {
        let base = to_base(amount, rate).unwrap();
        prop_assert!(base.scale() <= BASE_AMOUNT_SCALE);
    }

    /// Rounding moves the product by at most half a unit in the last place.
    #[test]
    fn prop_to_base_error_is_bounded(amount in positive_amount(), rate in positive_rate()) {
        let exact = amount * rate;
        let base = to_base(amount, rate).unwrap();
        let half_unit = Decimal::new(5, BASE_AMOUNT_SCALE + 1);
        prop_assert!((exact - base).abs() <= half_unit);
    }

    /// Converting at a unit rate returns the amount unchanged.
    #[test]
    fn prop_unit_rate_is_identity(amount in positive_amount()) {
        prop_assert_eq!(to_base(amount, Decimal::ONE), Some(amount));
    }
}
