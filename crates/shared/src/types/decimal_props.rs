//! Property-based tests for decimal arithmetic.

use proptest::prelude::*;

use super::decimal::DecimalAmount;
use super::rounding::RoundingMode;

/// Strategy to generate amounts with 0 to 6 decimal places.
fn amount() -> impl Strategy<Value = DecimalAmount> {
    (-1_000_000_000_000i64..1_000_000_000_000i64, 0i64..=6)
        .prop_map(|(unscaled, scale)| DecimalAmount::new(unscaled, scale))
}

/// Strategy to generate every rounding mode except `Unnecessary`.
fn rounding_mode() -> impl Strategy<Value = RoundingMode> {
    prop_oneof![
        Just(RoundingMode::Up),
        Just(RoundingMode::Down),
        Just(RoundingMode::Ceiling),
        Just(RoundingMode::Floor),
        Just(RoundingMode::HalfUp),
        Just(RoundingMode::HalfDown),
        Just(RoundingMode::HalfEven),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Display then parse gives back the same value and scale.
    #[test]
    fn prop_display_parse_round_trip(value in amount()) {
        let parsed: DecimalAmount = value.to_string().parse().unwrap();
        prop_assert_eq!(parsed.scale(), value.scale());
        prop_assert_eq!(parsed, value);
    }

    /// Subtraction undoes addition exactly.
    #[test]
    fn prop_add_sub_inverse(a in amount(), b in amount()) {
        let sum = a.checked_add(&b).unwrap();
        prop_assert_eq!(sum.checked_sub(&b).unwrap(), a);
    }

    /// Rounding moves the value by less than one unit of the target scale.
    #[test]
    fn prop_rounding_error_bounded(
        value in amount(),
        scale in -2i64..=4,
        mode in rounding_mode(),
    ) {
        let rounded = value.with_scale(scale, mode).unwrap();
        prop_assert_eq!(rounded.scale(), scale);
        let unit = DecimalAmount::new(1, scale);
        prop_assert!(rounded.checked_sub(&value).unwrap().abs() < unit);
    }

    /// Floor never exceeds the value and ceiling never falls below it.
    #[test]
    fn prop_floor_ceiling_bracket(value in amount(), scale in -2i64..=4) {
        let floor = value.with_scale(scale, RoundingMode::Floor).unwrap();
        let ceiling = value.with_scale(scale, RoundingMode::Ceiling).unwrap();
        prop_assert!(floor <= value);
        prop_assert!(ceiling >= value);
    }

    /// Ordering agrees with subtraction's sign.
    #[test]
    fn prop_ordering_matches_difference(a in amount(), b in amount()) {
        let difference = a.checked_sub(&b).unwrap();
        prop_assert_eq!(a.cmp(&b), difference.signum().cmp(&0));
    }

    /// Quotient times divisor lands within one unit of the dividend.
    #[test]
    fn prop_divide_then_multiply(
        a in amount(),
        divisor in (1i64..1_000_000).prop_map(|v| DecimalAmount::new(v, 3)),
    ) {
        let quotient = a.divide(&divisor, 12, RoundingMode::HalfEven).unwrap();
        let back = quotient
            .checked_mul(&divisor)
            .and_then(|product| product.with_scale(6, RoundingMode::HalfEven))
            .unwrap();
        prop_assert!(back.checked_sub(&a).unwrap().abs() <= DecimalAmount::new(1, 6));
    }
}
