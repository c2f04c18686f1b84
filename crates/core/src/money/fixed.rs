//! Fixed-point monetary value over `i64` minor units.

use std::cmp::Ordering;

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use ducat_shared::{DecimalAmount, MoneyError, MoneyResult, RoundingMode};

use super::big::BigMoney;
use super::text::parse_money_text;
use super::{MonetaryAmount, check_conversion, ensure_currency};
use crate::currency::{Currency, CurrencyLookup, CurrencyRegistry};

/// A currency and a signed count of minor units.
///
/// The scale is always the currency's canonical scale. Every operation that
/// could leave the `i64` range fails with `ArithmeticOverflow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    currency: Currency,
    amount_minor: i64,
}

/// `10^places` as `i64`.
fn minor_factor(currency: Currency) -> MoneyResult<i64> {
    10i64
        .checked_pow(currency.decimal_places())
        .ok_or(MoneyError::ArithmeticOverflow("minor unit factor"))
}

/// Narrows a decimal at canonical scale to minor units.
fn to_minor(amount: &DecimalAmount, op: &'static str) -> MoneyResult<i64> {
    amount
        .unscaled()
        .to_i64()
        .ok_or(MoneyError::ArithmeticOverflow(op))
}

impl Money {
    /// Minor units at the canonical scale.
    #[must_use]
    pub const fn of_minor(currency: Currency, amount_minor: i64) -> Self {
        Self {
            currency,
            amount_minor,
        }
    }

    /// Whole units.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the minor amount does not fit in `i64`.
    pub fn of_major(currency: Currency, major: i64) -> MoneyResult<Self> {
        let minor = major
            .checked_mul(minor_factor(currency)?)
            .ok_or(MoneyError::ArithmeticOverflow("of_major"))?;
        Ok(Self::of_minor(currency, minor))
    }

    /// Rounds a decimal into minor units.
    ///
    /// # Errors
    ///
    /// Returns `RoundingNecessary` under `Unnecessary` if digits are dropped,
    /// or `ArithmeticOverflow` if the result does not fit in `i64`.
    pub fn of(currency: Currency, amount: &DecimalAmount, mode: RoundingMode) -> MoneyResult<Self> {
        let scaled = amount.with_scale(currency.scale(), mode)?;
        Ok(Self::of_minor(currency, to_minor(&scaled, "of")?))
    }

    /// Zero.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self::of_minor(currency, 0)
    }

    /// Sums values that all share one currency.
    ///
    /// # Errors
    ///
    /// Returns `MissingArgument` for no values, `CurrencyMismatch` if the
    /// currencies differ and `ArithmeticOverflow` if the sum leaves `i64`.
    pub fn total<'a, I>(values: I) -> MoneyResult<Self>
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut values = values.into_iter();
        let first = *values
            .next()
            .ok_or(MoneyError::MissingArgument("values to total"))?;
        values.try_fold(first, |sum, value| sum.plus(value))
    }

    /// Parses `"<CODE> <AMOUNT>"` against the process-wide registry.
    ///
    /// # Errors
    ///
    /// See [`parse_money_text`]; additionally `RoundingNecessary` if the text
    /// has more decimals than the currency allows.
    pub fn parse(text: &str) -> MoneyResult<Self> {
        Self::parse_with(text, CurrencyRegistry::global())
    }

    /// Parses `"<CODE> <AMOUNT>"` against `lookup`.
    ///
    /// # Errors
    ///
    /// Same as [`Money::parse`].
    pub fn parse_with<L: CurrencyLookup + ?Sized>(text: &str, lookup: &L) -> MoneyResult<Self> {
        let (currency, amount) = parse_money_text(text, lookup)?;
        Self::of(currency, &amount, RoundingMode::Unnecessary)
    }

    /// The currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// The amount in minor units.
    #[must_use]
    pub const fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    /// The amount as a decimal at the canonical scale.
    #[must_use]
    pub fn amount(&self) -> DecimalAmount {
        DecimalAmount::new(self.amount_minor, self.currency.scale())
    }

    /// Whole units, truncated toward zero.
    #[must_use]
    pub fn amount_major(&self) -> i64 {
        minor_factor(self.currency).map_or(0, |factor| self.amount_minor / factor)
    }

    /// The minor units beyond the whole units, carrying the amount's sign.
    ///
    /// `GBP -2.34` has a minor part of -34.
    #[must_use]
    pub fn minor_part(&self) -> i64 {
        minor_factor(self.currency).map_or(self.amount_minor, |factor| self.amount_minor % factor)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Returns true if the amount is greater than zero.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.amount_minor > 0
    }

    /// Returns true if the amount is zero or greater.
    #[must_use]
    pub const fn is_positive_or_zero(&self) -> bool {
        self.amount_minor >= 0
    }

    /// Returns true if the amount is less than zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.amount_minor < 0
    }

    /// Returns true if the amount is zero or less.
    #[must_use]
    pub const fn is_negative_or_zero(&self) -> bool {
        self.amount_minor <= 0
    }

    fn with_minor(self, amount_minor: Option<i64>, op: &'static str) -> MoneyResult<Self> {
        amount_minor
            .map(|minor| Self::of_minor(self.currency, minor))
            .ok_or(MoneyError::ArithmeticOverflow(op))
    }

    /// Adds minor units.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow`.
    pub fn plus_minor(&self, minor: i64) -> MoneyResult<Self> {
        self.with_minor(self.amount_minor.checked_add(minor), "plus")
    }

    /// Adds whole units.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow`.
    pub fn plus_major(&self, major: i64) -> MoneyResult<Self> {
        let minor = Self::of_major(self.currency, major)
            .map_err(|_| MoneyError::ArithmeticOverflow("plus"))?
            .amount_minor;
        self.plus_minor(minor)
    }

    /// Adds a decimal amount, rounding it to the canonical scale.
    ///
    /// # Errors
    ///
    /// Returns `RoundingNecessary` or `ArithmeticOverflow`.
    pub fn plus_amount(&self, amount: &DecimalAmount, mode: RoundingMode) -> MoneyResult<Self> {
        Self::of(self.currency, &self.amount().checked_add(amount)?, mode)
    }

    /// Subtracts minor units.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow`.
    pub fn minus_minor(&self, minor: i64) -> MoneyResult<Self> {
        self.with_minor(self.amount_minor.checked_sub(minor), "minus")
    }

    /// Subtracts whole units.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow`.
    pub fn minus_major(&self, major: i64) -> MoneyResult<Self> {
        let minor = Self::of_major(self.currency, major)
            .map_err(|_| MoneyError::ArithmeticOverflow("minus"))?
            .amount_minor;
        self.minus_minor(minor)
    }

    /// Subtracts a decimal amount, rounding it to the canonical scale.
    ///
    /// # Errors
    ///
    /// Returns `RoundingNecessary` or `ArithmeticOverflow`.
    pub fn minus_amount(&self, amount: &DecimalAmount, mode: RoundingMode) -> MoneyResult<Self> {
        Self::of(self.currency, &self.amount().checked_sub(amount)?, mode)
    }

    /// Multiplies by an integer.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow`.
    pub fn multiplied_by_i64(&self, factor: i64) -> MoneyResult<Self> {
        self.with_minor(self.amount_minor.checked_mul(factor), "multiply")
    }

    /// Divides by an integer, rounding toward zero.
    ///
    /// # Errors
    ///
    /// Returns `DivisionByZero`, or `ArithmeticOverflow` for `i64::MIN / -1`.
    pub fn divided_by_i64(&self, divisor: i64) -> MoneyResult<Self> {
        if divisor == 0 {
            return Err(MoneyError::DivisionByZero);
        }
        self.with_minor(self.amount_minor.checked_div(divisor), "divide")
    }

    /// Divides by an integer with an explicit rounding mode.
    ///
    /// # Errors
    ///
    /// Returns `DivisionByZero`, `RoundingNecessary` or `ArithmeticOverflow`.
    pub fn divided_by_i64_rounded(&self, divisor: i64, mode: RoundingMode) -> MoneyResult<Self> {
        self.divided_by(&DecimalAmount::from(divisor), mode)
    }

    /// Absolute value.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` for `i64::MIN` minor units.
    pub fn abs(&self) -> MoneyResult<Self> {
        self.with_minor(self.amount_minor.checked_abs(), "abs")
    }

    /// Rounds to a coarser scale, keeping the canonical scale.
    ///
    /// # Errors
    ///
    /// Returns `ScaleIncrease` if `scale` is above the canonical scale,
    /// `RoundingNecessary` under `Unnecessary` if digits are dropped, and
    /// `ScaleOutOfRange` if `scale` is below `-MAX_SCALE`.
    pub fn rounded(&self, scale: i64, mode: RoundingMode) -> MoneyResult<Self> {
        let current = self.currency.scale();
        if scale > current {
            return Err(MoneyError::ScaleIncrease {
                requested: scale,
                current,
            });
        }
        let coarse = self.amount().with_scale(scale, mode)?;
        Self::of(self.currency, &coarse, RoundingMode::Unnecessary)
    }

    /// The same value as arbitrary-precision money at the canonical scale.
    #[must_use]
    pub fn to_big_money(&self) -> BigMoney {
        BigMoney::of(self.currency, self.amount())
    }

    /// Returns true if both amounts are equal.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch`.
    pub fn is_equal(&self, other: &Self) -> MoneyResult<bool> {
        Ok(self.compare_to(other)? == Ordering::Equal)
    }

    /// Returns true if this amount is greater.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch`.
    pub fn is_greater_than(&self, other: &Self) -> MoneyResult<bool> {
        Ok(self.compare_to(other)? == Ordering::Greater)
    }

    /// Returns true if this amount is less.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch`.
    pub fn is_less_than(&self, other: &Self) -> MoneyResult<bool> {
        Ok(self.compare_to(other)? == Ordering::Less)
    }
}

impl MonetaryAmount for Money {
    fn currency(&self) -> Currency {
        self.currency
    }

    fn amount(&self) -> DecimalAmount {
        DecimalAmount::new(self.amount_minor, self.currency.scale())
    }

    fn from_decimal(
        currency: Currency,
        amount: &DecimalAmount,
        mode: RoundingMode,
    ) -> MoneyResult<Self> {
        Self::of(currency, amount, mode)
    }

    fn plus(&self, other: &Self) -> MoneyResult<Self> {
        self.ensure_same_currency(other)?;
        self.plus_minor(other.amount_minor)
    }

    fn minus(&self, other: &Self) -> MoneyResult<Self> {
        self.ensure_same_currency(other)?;
        self.minus_minor(other.amount_minor)
    }

    fn multiplied_by(&self, factor: &DecimalAmount, mode: RoundingMode) -> MoneyResult<Self> {
        Self::of(self.currency, &Self::amount(self).checked_mul(factor)?, mode)
            .map_err(|err| overflow_as(err, "multiply"))
    }

    fn divided_by(&self, divisor: &DecimalAmount, mode: RoundingMode) -> MoneyResult<Self> {
        let quotient = Self::amount(self).divide(divisor, self.currency.scale(), mode)?;
        Ok(Self::of_minor(self.currency, to_minor(&quotient, "divide")?))
    }

    fn negated(&self) -> MoneyResult<Self> {
        self.with_minor(self.amount_minor.checked_neg(), "negate")
    }

    fn compare_to(&self, other: &Self) -> MoneyResult<Ordering> {
        ensure_currency(self.currency, other.currency)?;
        Ok(self.amount_minor.cmp(&other.amount_minor))
    }

    fn converted_to(
        &self,
        currency: Currency,
        multiplier: &DecimalAmount,
        mode: RoundingMode,
    ) -> MoneyResult<Self> {
        check_conversion(self.currency, currency, multiplier)?;
        Self::of(currency, &Self::amount(self).checked_mul(multiplier)?, mode)
            .map_err(|err| overflow_as(err, "convert"))
    }
}

/// Renames the operation reported by an overflow.
fn overflow_as(err: MoneyError, op: &'static str) -> MoneyError {
    match err {
        MoneyError::ArithmeticOverflow(_) => MoneyError::ArithmeticOverflow(op),
        other => other,
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.currency, self.amount())
    }
}

impl std::str::FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&BigMoney> for Money {
    type Error = MoneyError;

    /// Converts without rounding.
    fn try_from(value: &BigMoney) -> Result<Self, Self::Error> {
        value.to_money(RoundingMode::Unnecessary)
    }
}
