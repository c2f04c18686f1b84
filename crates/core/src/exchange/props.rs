//! Property-based tests for the exchange-rate algebra.

use proptest::prelude::*;

use ducat_shared::DecimalAmount;

use super::ExchangeRate;
use crate::currency::Currency;
use crate::money::{BigMoney, Money};

const CODES: [&str; 5] = ["GBP", "USD", "EUR", "JPY", "PLN"];

/// Strategy to generate two distinct currencies.
fn currency_pair() -> impl Strategy<Value = (Currency, Currency)> {
    (0..CODES.len(), 1..CODES.len()).prop_map(|(first, offset)| {
        let second = (first + offset) % CODES.len();
        (
            Currency::of(CODES[first]).unwrap(),
            Currency::of(CODES[second]).unwrap(),
        )
    })
}

/// Strategy to generate rates between 0.0001 and 1000 at scale 6.
fn rate_value() -> impl Strategy<Value = DecimalAmount> {
    (100i64..=1_000_000_000).prop_map(|unscaled| DecimalAmount::new(unscaled, 6))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Inverting twice restores the rate within the rounding precision.
    #[test]
    fn prop_double_inversion((base, counter) in currency_pair(), value in rate_value()) {
        let rate = ExchangeRate::of(base, counter, value.clone()).unwrap();
        let back = rate.invert().unwrap().invert().unwrap();
        prop_assert_eq!(back.base(), base);
        prop_assert_eq!(back.counter(), counter);

        // Relative error of two reciprocals at scale 16.
        let tolerance = value
            .checked_mul(&value)
            .and_then(|squared| squared.checked_mul(&DecimalAmount::new(1, 15)))
            .and_then(|relative| relative.checked_add(&DecimalAmount::new(1, 12)))
            .unwrap();
        prop_assert!(back.rate().checked_sub(&value).unwrap().abs() <= tolerance);
    }

    /// The identity rate leaves any value untouched.
    #[test]
    fn prop_identity_exchange(
        code in prop::sample::select(CODES.to_vec()),
        minor in -1_000_000_000i64..1_000_000_000,
        scale in 0i64..=6,
    ) {
        let currency = Currency::of(code).unwrap();
        let identity = ExchangeRate::identity(currency);

        let big = BigMoney::of(currency, DecimalAmount::new(minor, scale));
        prop_assert_eq!(identity.exchange(&big).unwrap(), big.clone());

        let fixed = Money::of_minor(currency, minor);
        prop_assert_eq!(identity.exchange(&fixed).unwrap(), fixed);
    }

    /// Exchanging moves the value into the other currency of the pair.
    #[test]
    fn prop_exchange_switches_currency(
        (base, counter) in currency_pair(),
        value in rate_value(),
        minor in -1_000_000_000i64..1_000_000_000,
    ) {
        let rate = ExchangeRate::of(base, counter, value).unwrap();
        let forward = rate.exchange(&Money::of_minor(base, minor)).unwrap();
        prop_assert_eq!(forward.currency(), counter);
        let backward = rate.exchange(&Money::of_minor(counter, minor)).unwrap();
        prop_assert_eq!(backward.currency(), base);
    }

    /// A rate combined with its own inverse collapses to the identity.
    #[test]
    fn prop_combine_with_inverse((base, counter) in currency_pair(), value in rate_value()) {
        let rate = ExchangeRate::of(base, counter, value).unwrap();
        let combined = rate.combine(&rate.invert().unwrap()).unwrap();
        prop_assert!(combined.is_identity());
        prop_assert_eq!(combined.base(), base);
    }

    /// The text form parses back to the same rate.
    #[test]
    fn prop_text_round_trip((base, counter) in currency_pair(), value in rate_value()) {
        let rate = ExchangeRate::of(base, counter, value).unwrap();
        let parsed: ExchangeRate = rate.to_string().parse().unwrap();
        prop_assert_eq!(parsed, rate);
    }

    /// Encoded rates decode to the same rate.
    #[test]
    fn prop_bytes_round_trip((base, counter) in currency_pair(), value in rate_value()) {
        let rate = ExchangeRate::of(base, counter, value).unwrap();
        let back = ExchangeRate::from_bytes(&rate.to_bytes().unwrap()).unwrap();
        prop_assert_eq!(back, rate);
    }
}
