//! Property-based tests for monetary values.

use proptest::prelude::*;

use ducat_shared::{DecimalAmount, RoundingMode};

use super::{BigMoney, MonetaryAmount, Money};
use crate::currency::Currency;

fn currency() -> impl Strategy<Value = Currency> {
    prop_oneof![Just("GBP"), Just("USD"), Just("JPY"), Just("BHD")]
        .prop_map(|code| Currency::of(code).unwrap())
}

/// Strategy to generate fixed money that never nears the `i64` limits.
fn money() -> impl Strategy<Value = Money> {
    (currency(), -1_000_000_000_000i64..1_000_000_000_000i64)
        .prop_map(|(currency, minor)| Money::of_minor(currency, minor))
}

/// Strategy to generate big money with 0 to 8 decimal places.
fn big_money() -> impl Strategy<Value = BigMoney> {
    (currency(), -1_000_000_000_000i64..1_000_000_000_000i64, 0i64..=8)
        .prop_map(|(currency, unscaled, scale)| {
            BigMoney::of(currency, DecimalAmount::new(unscaled, scale))
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Fixed money survives a trip through arbitrary precision.
    #[test]
    fn prop_money_big_money_round_trip(value in money()) {
        let back = value.to_big_money().to_money(RoundingMode::Unnecessary).unwrap();
        prop_assert_eq!(back, value);
    }

    /// Display then parse gives back the same fixed money.
    #[test]
    fn prop_money_text_round_trip(value in money()) {
        let parsed = Money::parse(&value.to_string()).unwrap();
        prop_assert_eq!(parsed, value);
    }

    /// Display then parse keeps the big money scale.
    #[test]
    fn prop_big_money_text_round_trip(value in big_money()) {
        let parsed = BigMoney::parse(&value.to_string()).unwrap();
        prop_assert_eq!(parsed.scale(), value.scale());
        prop_assert_eq!(parsed, value);
    }

    /// Subtraction undoes addition for both representations.
    #[test]
    fn prop_plus_minus_inverse(value in money(), minor in -1_000_000i64..1_000_000) {
        let other = Money::of_minor(value.currency(), minor);
        let back = value.plus(&other).unwrap().minus(&other).unwrap();
        prop_assert_eq!(back, value);

        let big = value.to_big_money();
        let big_back = big.plus(&other.to_big_money()).unwrap()
            .minus(&other.to_big_money()).unwrap();
        prop_assert_eq!(big_back, big);
    }

    /// Negating twice is the identity.
    #[test]
    fn prop_double_negation(value in money()) {
        prop_assert_eq!(value.negated().unwrap().negated().unwrap(), value);
    }

    /// Rounding to a coarser scale keeps the scale and moves by less than one unit.
    #[test]
    fn prop_rounded_keeps_scale(value in big_money(), drop in 0i64..=3) {
        let target = value.scale() - drop;
        let rounded = value.rounded(target, RoundingMode::HalfEven).unwrap();
        prop_assert_eq!(rounded.scale(), value.scale());
        let unit = DecimalAmount::new(1, target);
        prop_assert!(rounded.amount().checked_sub(value.amount()).unwrap().abs() < unit);
    }

    /// Fixed and big money agree on rounded multiplication.
    #[test]
    fn prop_multiplication_agrees(
        value in money(),
        factor in (1i64..10_000_000).prop_map(|v| DecimalAmount::new(v, 4)),
    ) {
        let fixed = value.multiplied_by(&factor, RoundingMode::HalfUp).unwrap();
        let big = value.to_big_money().multiplied_by(&factor, RoundingMode::HalfUp).unwrap();
        prop_assert_eq!(fixed.to_big_money(), big);
    }
}
