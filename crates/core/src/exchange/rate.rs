//! The exchange rate value and its operations.

use serde::{Deserialize, Serialize};
use tracing::debug;

use ducat_shared::{DecimalAmount, MoneyError, MoneyResult, RatePolicy, RoundingMode};

use super::persist::PersistedExchangeRate;
use crate::currency::{Currency, CurrencyLookup, CurrencyRegistry};
use crate::money::MonetaryAmount;
use crate::money::text::is_currency_code;

/// A positive rate between two currencies: 1 `base` = `rate` `counter`.
///
/// A rate whose base equals its counter is always the identity rate 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PersistedExchangeRate", into = "PersistedExchangeRate")]
pub struct ExchangeRate {
    base: Currency,
    counter: Currency,
    rate: DecimalAmount,
}

/// Checks the rate invariants shared by construction and decoding.
fn validate(base: Currency, counter: Currency, rate: &DecimalAmount) -> MoneyResult<()> {
    if !rate.is_positive() {
        return Err(MoneyError::InvalidRate(format!(
            "rate {rate} for {base}/{counter} must be positive"
        )));
    }
    if base == counter && !rate.is_one() {
        return Err(MoneyError::InvalidRate(format!(
            "rate {rate} for {base}/{counter} must be 1"
        )));
    }
    Ok(())
}

/// Rounds a derived rate and drops redundant trailing zeros.
fn derived_rate(rate: &DecimalAmount, policy: &RatePolicy) -> MoneyResult<DecimalAmount> {
    let rounded = rate.with_scale(policy.scale, policy.rounding)?.strip_trailing_zeros();
    if rounded.scale() < 0 {
        rounded.with_scale(0, RoundingMode::Unnecessary)
    } else {
        Ok(rounded)
    }
}

impl ExchangeRate {
    /// The rate 1 between a currency and itself.
    #[must_use]
    pub fn identity(currency: Currency) -> Self {
        Self {
            base: currency,
            counter: currency,
            rate: DecimalAmount::one(),
        }
    }

    /// Creates a validated rate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRate` if the rate is not positive, or if base and
    /// counter are equal and the rate is not 1.
    pub fn of(base: Currency, counter: Currency, rate: DecimalAmount) -> MoneyResult<Self> {
        validate(base, counter, &rate)?;
        Ok(Self {
            base,
            counter,
            rate,
        })
    }

    /// Same currencies, different rate.
    ///
    /// # Errors
    ///
    /// Same as [`ExchangeRate::of`].
    pub fn with_rate(&self, rate: DecimalAmount) -> MoneyResult<Self> {
        Self::of(self.base, self.counter, rate)
    }

    /// The base currency.
    #[must_use]
    pub const fn base(&self) -> Currency {
        self.base
    }

    /// The counter currency.
    #[must_use]
    pub const fn counter(&self) -> Currency {
        self.counter
    }

    /// The numeric rate.
    #[must_use]
    pub const fn rate(&self) -> &DecimalAmount {
        &self.rate
    }

    /// Returns true if base and counter are the same currency.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.base == self.counter
    }

    /// The `BASE/COUNTER` pair.
    #[must_use]
    pub fn pair(&self) -> String {
        format!("{}/{}", self.base, self.counter)
    }

    // ========== Algebra ==========

    /// Swaps base and counter using the default rate policy.
    ///
    /// # Errors
    ///
    /// Same as [`ExchangeRate::invert_with`].
    pub fn invert(&self) -> MoneyResult<Self> {
        self.invert_with(&RatePolicy::default())
    }

    /// Swaps base and counter; the rate becomes its reciprocal at the policy's
    /// scale and rounding.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRate` if the reciprocal rounds to zero, and
    /// `ScaleOutOfRange` if the policy scale is outside `MAX_SCALE`.
    pub fn invert_with(&self, policy: &RatePolicy) -> MoneyResult<Self> {
        if self.is_identity() {
            return Ok(self.clone());
        }
        let reciprocal = self.rate.reciprocal(policy.scale, policy.rounding)?;
        Self::of(self.counter, self.base, derived_rate(&reciprocal, policy)?)
    }

    /// Combines with another rate using the default rate policy.
    ///
    /// # Errors
    ///
    /// Same as [`ExchangeRate::combine_with`].
    pub fn combine(&self, other: &Self) -> MoneyResult<Self> {
        self.combine_with(other, &RatePolicy::default())
    }

    /// Derives the rate from this base to the currency of `other` that is
    /// not this counter.
    ///
    /// `EUR/USD` with `USD/PLN` multiplies the rates; `EUR/USD` with
    /// `PLN/USD` divides them.
    ///
    /// A result whose ends are the same currency is the identity rate 1,
    /// whatever value the two rates imply: `EUR/PLN 3.22` with
    /// `PLN/EUR 0.1` gives `EUR/EUR 1`. The implied value is only logged at
    /// debug level.
    ///
    /// # Errors
    ///
    /// Returns `NoCommonCurrency` unless this counter is either currency of
    /// `other`, `InvalidRate` if the derived rate rounds to zero, and
    /// `ScaleOutOfRange` if the policy scale is outside `MAX_SCALE`.
    pub fn combine_with(&self, other: &Self, policy: &RatePolicy) -> MoneyResult<Self> {
        let (counter, raw) = if self.counter == other.base {
            (other.counter, self.rate.checked_mul(&other.rate)?)
        } else if self.counter == other.counter {
            (
                other.base,
                self.rate.divide(&other.rate, policy.scale, policy.rounding)?,
            )
        } else {
            return Err(MoneyError::NoCommonCurrency {
                left: self.pair(),
                right: other.pair(),
            });
        };

        if counter == self.base {
            debug!(
                left = %self,
                right = %other,
                discarded = %raw,
                "Rate combination collapsed to identity"
            );
            return Ok(Self::identity(self.base));
        }

        Self::of(self.base, counter, derived_rate(&raw, policy)?)
    }

    /// Applies the rate with the default exchange rounding.
    ///
    /// # Errors
    ///
    /// Same as [`ExchangeRate::exchange_with`].
    pub fn exchange<M: MonetaryAmount>(&self, value: &M) -> MoneyResult<M> {
        self.exchange_with(value, RatePolicy::default().exchange_rounding)
    }

    /// Applies the rate to a value in either currency of the pair.
    ///
    /// Base values are multiplied and become counter values. Counter values
    /// are divided and become base values. The result is rounded to the
    /// canonical scale of its currency. The identity rate returns the value
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns `NotExchangeable` if the value's currency is neither base nor
    /// counter, plus rounding and overflow errors of the target type.
    pub fn exchange_with<M: MonetaryAmount>(
        &self,
        value: &M,
        mode: RoundingMode,
    ) -> MoneyResult<M> {
        let currency = value.currency();
        if self.is_identity() && currency == self.base {
            return Ok(value.clone());
        }

        if currency == self.base {
            M::from_decimal(self.counter, &value.amount().checked_mul(&self.rate)?, mode)
        } else if currency == self.counter {
            let amount = value.amount().divide(&self.rate, self.base.scale(), mode)?;
            M::from_decimal(self.base, &amount, mode)
        } else {
            Err(MoneyError::NotExchangeable {
                currency: currency.to_string(),
                pair: self.pair(),
            })
        }
    }

    // ========== Text ==========

    /// Parses `"BASE/COUNTER RATE"` against the process-wide registry.
    ///
    /// # Errors
    ///
    /// Same as [`ExchangeRate::parse_with`].
    pub fn parse(text: &str) -> MoneyResult<Self> {
        Self::parse_with(text, CurrencyRegistry::global())
    }

    /// Parses `"BASE/COUNTER RATE"` against `lookup`.
    ///
    /// Surrounding whitespace is rejected, not trimmed.
    ///
    /// # Errors
    ///
    /// Returns `MissingArgument` for empty text, `InvalidFormat` if the text
    /// does not match the grammar, `UnknownCurrency` for unregistered codes
    /// and `InvalidRate` if the rate breaks the invariants.
    pub fn parse_with<L: CurrencyLookup + ?Sized>(text: &str, lookup: &L) -> MoneyResult<Self> {
        if text.is_empty() {
            return Err(MoneyError::MissingArgument("exchange rate text"));
        }
        if text.trim() != text {
            return Err(MoneyError::invalid_format(text, "surrounding whitespace"));
        }

        let (pair, rate) = text
            .split_once(' ')
            .ok_or_else(|| MoneyError::invalid_format(text, "expected 'BASE/COUNTER RATE'"))?;
        let (base, counter) = pair
            .split_once('/')
            .ok_or_else(|| MoneyError::invalid_format(text, "expected 'BASE/COUNTER'"))?;
        if !is_currency_code(base) || !is_currency_code(counter) {
            return Err(MoneyError::invalid_format(
                text,
                "expected three-letter currency codes",
            ));
        }

        let rate: DecimalAmount = rate
            .parse()
            .map_err(|_| MoneyError::invalid_format(text, "expected a decimal rate"))?;
        Self::of(lookup.lookup(base)?, lookup.lookup(counter)?, rate)
    }
}

impl std::fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} {}", self.base, self.counter, self.rate)
    }
}

impl std::str::FromStr for ExchangeRate {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{BigMoney, Money};
    use rstest::rstest;

    fn ccy(code: &str) -> Currency {
        Currency::of(code).unwrap()
    }

    fn dec(text: &str) -> DecimalAmount {
        text.parse().unwrap()
    }

    fn rate(text: &str) -> ExchangeRate {
        ExchangeRate::parse(text).unwrap()
    }

    // ========== Construction ==========

    #[test]
    fn test_identity() {
        let identity = ExchangeRate::identity(ccy("GBP"));
        assert!(identity.is_identity());
        assert!(identity.rate().is_one());
        assert_eq!(identity.to_string(), "GBP/GBP 1");
    }

    #[test]
    fn test_of_validates() {
        assert!(ExchangeRate::of(ccy("GBP"), ccy("USD"), dec("1.5485")).is_ok());
        assert!(ExchangeRate::of(ccy("GBP"), ccy("GBP"), dec("1.000")).is_ok());
        assert!(matches!(
            ExchangeRate::of(ccy("GBP"), ccy("USD"), dec("0")),
            Err(MoneyError::InvalidRate(_))
        ));
        assert!(matches!(
            ExchangeRate::of(ccy("GBP"), ccy("USD"), dec("-1.2")),
            Err(MoneyError::InvalidRate(_))
        ));
        assert!(matches!(
            ExchangeRate::of(ccy("GBP"), ccy("GBP"), dec("1.01")),
            Err(MoneyError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_with_rate() {
        let updated = rate("GBP/USD 1.5485").with_rate(dec("1.6")).unwrap();
        assert_eq!(updated.to_string(), "GBP/USD 1.6");
        assert!(rate("GBP/USD 1.5485").with_rate(dec("0")).is_err());
    }

    // ========== Inversion ==========

    #[test]
    fn test_invert() {
        let inverted = rate("GBP/USD 2").invert().unwrap();
        assert_eq!(inverted.to_string(), "USD/GBP 0.5");

        let inverted = rate("GBP/USD 1.5485").invert().unwrap();
        assert_eq!(inverted.base(), ccy("USD"));
        assert_eq!(inverted.counter(), ccy("GBP"));
        assert_eq!(inverted.rate(), &dec("0.6457862447529868"));
    }

    #[test]
    fn test_invert_with_policy() {
        let policy = RatePolicy {
            scale: 4,
            rounding: RoundingMode::Down,
            ..RatePolicy::default()
        };
        let inverted = rate("EUR/USD 3").invert_with(&policy).unwrap();
        assert_eq!(inverted.rate(), &dec("0.3333"));
    }

    #[test]
    fn test_policy_scale_out_of_range() {
        let policy = RatePolicy {
            scale: 1i64 << 33,
            ..RatePolicy::default()
        };
        assert_eq!(
            rate("GBP/USD 1.5485").invert_with(&policy),
            Err(MoneyError::ScaleOutOfRange(1i64 << 33))
        );
        assert_eq!(
            rate("EUR/USD 1.2").combine_with(&rate("PLN/USD 0.25"), &policy),
            Err(MoneyError::ScaleOutOfRange(1i64 << 33))
        );
    }

    #[test]
    fn test_invert_identity_is_itself() {
        let identity = ExchangeRate::identity(ccy("EUR"));
        assert_eq!(identity.invert().unwrap(), identity);
    }

    #[test]
    fn test_invert_rejects_vanishing_reciprocal() {
        let huge = rate("GBP/USD 100000000000000000000");
        assert!(matches!(huge.invert(), Err(MoneyError::InvalidRate(_))));
    }

    // ========== Combination ==========

    #[test]
    fn test_combine_through_other_base() {
        let combined = rate("EUR/USD 1.2").combine(&rate("USD/PLN 3.5")).unwrap();
        assert_eq!(combined.to_string(), "EUR/PLN 4.2");
    }

    #[test]
    fn test_combine_through_other_counter() {
        let combined = rate("EUR/USD 1.2").combine(&rate("PLN/USD 0.25")).unwrap();
        assert_eq!(combined.to_string(), "EUR/PLN 4.8");
    }

    #[test]
    fn test_combine_collapses_to_identity() {
        let reverse = rate("EUR/PLN 3.22").combine(&rate("PLN/EUR 0.3135")).unwrap();
        let same = rate("EUR/PLN 3.22").combine(&rate("EUR/PLN 3.19")).unwrap();
        assert_eq!(reverse.counter(), ccy("EUR"));
        assert!(reverse.is_identity());
        assert!(reverse.rate().is_one());
        assert_eq!(reverse, same);
    }

    #[test]
    fn test_combine_collapse_ignores_implied_value() {
        let collapsed = rate("EUR/PLN 3.22").combine(&rate("PLN/EUR 0.1")).unwrap();
        assert_eq!(collapsed, ExchangeRate::identity(ccy("EUR")));
    }

    #[test]
    fn test_combine_without_common_currency() {
        assert_eq!(
            rate("JPY/NOK 0.07").combine(&rate("USD/PLN 3.9")),
            Err(MoneyError::NoCommonCurrency {
                left: "JPY/NOK".to_string(),
                right: "USD/PLN".to_string(),
            })
        );
    }

    #[test]
    fn test_combine_rounds_to_policy() {
        let policy = RatePolicy {
            scale: 2,
            rounding: RoundingMode::HalfUp,
            ..RatePolicy::default()
        };
        let combined = rate("EUR/USD 1.234")
            .combine_with(&rate("USD/PLN 1.1"), &policy)
            .unwrap();
        assert_eq!(combined.rate(), &dec("1.36"));
    }

    // ========== Exchange ==========

    #[test]
    fn test_exchange_base_value() {
        let value = BigMoney::parse("GBP 2.34").unwrap();
        let exchanged = rate("GBP/USD 1.5485").exchange(&value).unwrap();
        assert_eq!(exchanged.to_string(), "USD 3.62");
    }

    #[test]
    fn test_exchange_counter_value() {
        let value = Money::parse("USD 3.62").unwrap();
        let exchanged = rate("GBP/USD 1.5485").exchange(&value).unwrap();
        assert_eq!(exchanged.to_string(), "GBP 2.34");
    }

    #[rstest]
    #[case(RoundingMode::HalfUp, "JPY 235")]
    #[case(RoundingMode::Floor, "JPY 234")]
    fn test_exchange_with_rounding(#[case] mode: RoundingMode, #[case] expected: &str) {
        let value = Money::parse("GBP 1.00").unwrap();
        let exchanged = rate("GBP/JPY 234.5").exchange_with(&value, mode).unwrap();
        assert_eq!(exchanged.to_string(), expected);
    }

    #[test]
    fn test_exchange_identity_keeps_value() {
        let value = BigMoney::parse("GBP 2.34567").unwrap();
        let exchanged = ExchangeRate::identity(ccy("GBP")).exchange(&value).unwrap();
        assert_eq!(exchanged.scale(), 5);
        assert_eq!(exchanged, value);
    }

    #[test]
    fn test_exchange_unrelated_currency() {
        let value = Money::parse("EUR 1.00").unwrap();
        assert_eq!(
            rate("GBP/USD 1.5485").exchange(&value),
            Err(MoneyError::NotExchangeable {
                currency: "EUR".to_string(),
                pair: "GBP/USD".to_string(),
            })
        );
    }

    // ========== Text ==========

    #[test]
    fn test_parse_and_display() {
        let parsed = rate("GBP/USD 1.5485");
        assert_eq!(parsed.base(), ccy("GBP"));
        assert_eq!(parsed.counter(), ccy("USD"));
        assert_eq!(parsed.rate(), &dec("1.5485"));
        assert_eq!(parsed.to_string(), "GBP/USD 1.5485");
        assert_eq!("GBP/USD 1.5485".parse::<ExchangeRate>().unwrap(), parsed);
    }

    #[rstest]
    #[case(" GBP/USD 1.5485")]
    #[case("GBP/USD 1.5485 ")]
    #[case("GBP/USD  1.5485")]
    #[case("GBPUSD 1.5485")]
    #[case("GBP/USD")]
    #[case("GBP-USD 1.5485")]
    #[case("gbp/usd 1.5485")]
    #[case("GBP/USD 1,5485")]
    #[case("GBP/USD abc")]
    fn test_parse_rejects_format(#[case] text: &str) {
        assert!(matches!(
            ExchangeRate::parse(text),
            Err(MoneyError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_parse_other_failures() {
        assert_eq!(
            ExchangeRate::parse(""),
            Err(MoneyError::MissingArgument("exchange rate text"))
        );
        assert_eq!(
            ExchangeRate::parse("GBP/ZZZ 1.2"),
            Err(MoneyError::UnknownCurrency("ZZZ".to_string()))
        );
        assert!(matches!(
            ExchangeRate::parse("GBP/USD -1.2"),
            Err(MoneyError::InvalidRate(_))
        ));
        assert!(matches!(
            ExchangeRate::parse("GBP/GBP 2"),
            Err(MoneyError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_equality_is_numeric() {
        assert_eq!(rate("GBP/USD 1.50"), rate("GBP/USD 1.5"));
        assert_ne!(rate("GBP/USD 1.5"), rate("USD/GBP 1.5"));
    }
}
