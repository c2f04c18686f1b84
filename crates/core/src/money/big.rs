//! Arbitrary-precision monetary value.

use std::cmp::Ordering;
use std::ops::Neg;

use serde::{Deserialize, Serialize};

use ducat_shared::{DecimalAmount, MoneyError, MoneyResult, RoundingMode};

use super::fixed::Money;
use super::text::parse_money_text;
use super::{MonetaryAmount, check_conversion, ensure_currency};
use crate::currency::{Currency, CurrencyLookup, CurrencyRegistry};

/// A currency and a decimal amount of any scale.
///
/// Addition, subtraction and exact multiplication never round. The scale
/// only changes through explicit rescaling or rounding. Equality compares the
/// currency and the numeric value, so `GBP 1.0 == GBP 1.00`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BigMoney {
    currency: Currency,
    amount: DecimalAmount,
}

impl BigMoney {
    /// Creates a value without any rounding.
    #[must_use]
    pub fn of(currency: Currency, amount: impl Into<DecimalAmount>) -> Self {
        Self {
            currency,
            amount: amount.into(),
        }
    }

    /// Creates a value rescaled to `scale`.
    ///
    /// # Errors
    ///
    /// Returns `RoundingNecessary` under `Unnecessary` if digits are dropped.
    pub fn of_scale(
        currency: Currency,
        amount: &DecimalAmount,
        scale: i64,
        mode: RoundingMode,
    ) -> MoneyResult<Self> {
        Ok(Self::of(currency, amount.with_scale(scale, mode)?))
    }

    /// Whole units at scale 0.
    #[must_use]
    pub fn of_major(currency: Currency, major: i64) -> Self {
        Self::of(currency, major)
    }

    /// Minor units at the currency's canonical scale.
    #[must_use]
    pub fn of_minor(currency: Currency, minor: i64) -> Self {
        Self::of(currency, DecimalAmount::new(minor, currency.scale()))
    }

    /// Zero at scale 0.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self::of(currency, DecimalAmount::zero())
    }

    /// Zero at `scale`.
    #[must_use]
    pub fn zero_scale(currency: Currency, scale: i64) -> Self {
        Self::of(currency, DecimalAmount::new(0, scale))
    }

    /// Sums values that all share one currency.
    ///
    /// # Errors
    ///
    /// Returns `MissingArgument` for no values and `CurrencyMismatch` if the
    /// currencies differ.
    pub fn total<'a, I>(values: I) -> MoneyResult<Self>
    where
        I: IntoIterator<Item = &'a Self>,
    {
        let mut values = values.into_iter();
        let first = values
            .next()
            .ok_or(MoneyError::MissingArgument("values to total"))?;
        values.try_fold(first.clone(), |sum, value| sum.plus(value))
    }

    /// Parses `"<CODE> <AMOUNT>"` against the process-wide registry.
    ///
    /// # Errors
    ///
    /// See [`parse_money_text`].
    pub fn parse(text: &str) -> MoneyResult<Self> {
        Self::parse_with(text, CurrencyRegistry::global())
    }

    /// Parses `"<CODE> <AMOUNT>"` against `lookup`.
    ///
    /// # Errors
    ///
    /// See [`parse_money_text`].
    pub fn parse_with<L: CurrencyLookup + ?Sized>(text: &str, lookup: &L) -> MoneyResult<Self> {
        let (currency, amount) = parse_money_text(text, lookup)?;
        Ok(Self::of(currency, amount))
    }

    /// The currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// The amount at its current scale.
    #[must_use]
    pub const fn amount(&self) -> &DecimalAmount {
        &self.amount
    }

    /// The scale of the amount.
    #[must_use]
    pub const fn scale(&self) -> i64 {
        self.amount.scale()
    }

    /// Whole units, truncated toward zero.
    #[must_use]
    pub fn amount_major(&self) -> DecimalAmount {
        self.truncated_units(0)
    }

    /// Amount in minor units, truncated toward zero.
    #[must_use]
    pub fn amount_minor(&self) -> DecimalAmount {
        self.truncated_units(self.currency.scale())
    }

    fn truncated_units(&self, scale: i64) -> DecimalAmount {
        // Truncation never needs rounding permission.
        self.amount
            .with_scale(scale, RoundingMode::Down)
            .map(|units| DecimalAmount::new(units.unscaled().clone(), 0))
            .unwrap_or_default()
    }

    /// Returns true if the scale equals the currency's canonical scale.
    #[must_use]
    pub fn is_currency_scale(&self) -> bool {
        self.scale() == self.currency.scale()
    }

    /// Rescales to the canonical scale of the currency.
    ///
    /// # Errors
    ///
    /// Returns `RoundingNecessary` under `Unnecessary` if digits are dropped.
    pub fn with_currency_scale(&self, mode: RoundingMode) -> MoneyResult<Self> {
        self.with_scale(self.currency.scale(), mode)
    }

    /// Rescales to `scale`; increasing the scale pads with zeros.
    ///
    /// # Errors
    ///
    /// Returns `RoundingNecessary` under `Unnecessary` if digits are dropped.
    pub fn with_scale(&self, scale: i64, mode: RoundingMode) -> MoneyResult<Self> {
        Ok(Self::of(self.currency, self.amount.with_scale(scale, mode)?))
    }

    /// Same currency, different amount.
    #[must_use]
    pub fn with_amount(&self, amount: impl Into<DecimalAmount>) -> Self {
        Self::of(self.currency, amount)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount.is_positive()
    }

    /// Returns true if the amount is zero or greater.
    #[must_use]
    pub fn is_positive_or_zero(&self) -> bool {
        !self.amount.is_negative()
    }

    /// Returns true if the amount is less than zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_negative()
    }

    /// Returns true if the amount is zero or less.
    #[must_use]
    pub fn is_negative_or_zero(&self) -> bool {
        !self.amount.is_positive()
    }

    /// Adds a decimal amount exactly; the scale becomes the larger one.
    ///
    /// # Errors
    ///
    /// Returns `ScaleOutOfRange` if either scale is outside `MAX_SCALE`.
    pub fn plus_amount(&self, amount: &DecimalAmount) -> MoneyResult<Self> {
        Ok(Self::of(self.currency, self.amount.checked_add(amount)?))
    }

    /// Adds whole units.
    ///
    /// # Errors
    ///
    /// Same as [`BigMoney::plus_amount`].
    pub fn plus_major(&self, major: i64) -> MoneyResult<Self> {
        self.plus_amount(&DecimalAmount::from(major))
    }

    /// Adds minor units.
    ///
    /// # Errors
    ///
    /// Same as [`BigMoney::plus_amount`].
    pub fn plus_minor(&self, minor: i64) -> MoneyResult<Self> {
        self.plus_amount(&DecimalAmount::new(minor, self.currency.scale()))
    }

    /// Subtracts a decimal amount exactly.
    ///
    /// # Errors
    ///
    /// Returns `ScaleOutOfRange` if either scale is outside `MAX_SCALE`.
    pub fn minus_amount(&self, amount: &DecimalAmount) -> MoneyResult<Self> {
        Ok(Self::of(self.currency, self.amount.checked_sub(amount)?))
    }

    /// Subtracts whole units.
    ///
    /// # Errors
    ///
    /// Same as [`BigMoney::minus_amount`].
    pub fn minus_major(&self, major: i64) -> MoneyResult<Self> {
        self.minus_amount(&DecimalAmount::from(major))
    }

    /// Subtracts minor units.
    ///
    /// # Errors
    ///
    /// Same as [`BigMoney::minus_amount`].
    pub fn minus_minor(&self, minor: i64) -> MoneyResult<Self> {
        self.minus_amount(&DecimalAmount::new(minor, self.currency.scale()))
    }

    /// Multiplies exactly; the scales add up.
    ///
    /// # Errors
    ///
    /// Returns `ScaleOutOfRange` if the product's scale is outside `MAX_SCALE`.
    pub fn multiplied_exact(&self, factor: &DecimalAmount) -> MoneyResult<Self> {
        Ok(Self::of(self.currency, self.amount.checked_mul(factor)?))
    }

    /// Multiplies by an integer; the scale is unchanged.
    #[must_use]
    pub fn multiplied_by_i64(&self, factor: i64) -> Self {
        Self::of(self.currency, &self.amount * factor)
    }

    /// Divides by an integer, keeping the current scale.
    ///
    /// # Errors
    ///
    /// Returns `DivisionByZero` or `RoundingNecessary`.
    pub fn divided_by_i64(&self, divisor: i64, mode: RoundingMode) -> MoneyResult<Self> {
        self.divided_by(&DecimalAmount::from(divisor), mode)
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self::of(self.currency, self.amount.abs())
    }

    /// Rounds to `scale` while keeping the current scale.
    ///
    /// `GBP 432.34` rounded to scale -1 with `Down` is `GBP 430.00`.
    ///
    /// # Errors
    ///
    /// Returns `ScaleIncrease` if `scale` is above the current scale,
    /// `RoundingNecessary` under `Unnecessary` if digits are dropped, and
    /// `ScaleOutOfRange` if `scale` is below `-MAX_SCALE`.
    pub fn rounded(&self, scale: i64, mode: RoundingMode) -> MoneyResult<Self> {
        let current = self.scale();
        if scale > current {
            return Err(MoneyError::ScaleIncrease {
                requested: scale,
                current,
            });
        }
        let amount = self
            .amount
            .with_scale(scale, mode)?
            .with_scale(current, RoundingMode::Unnecessary)?;
        Ok(Self::of(self.currency, amount))
    }

    /// Converts to another currency without rounding.
    ///
    /// # Errors
    ///
    /// Returns `SameCurrency`, `NegativeMultiplier` or `ScaleOutOfRange`.
    pub fn converted_to_exact(
        &self,
        currency: Currency,
        multiplier: &DecimalAmount,
    ) -> MoneyResult<Self> {
        check_conversion(self.currency, currency, multiplier)?;
        Ok(Self::of(currency, self.amount.checked_mul(multiplier)?))
    }

    /// Converts to fixed-point money at the canonical scale.
    ///
    /// # Errors
    ///
    /// Returns `RoundingNecessary` or `ArithmeticOverflow`.
    pub fn to_money(&self, mode: RoundingMode) -> MoneyResult<Money> {
        Money::of(self.currency, &self.amount, mode)
    }

    /// Returns true if both amounts are numerically equal.
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

impl MonetaryAmount for BigMoney {
    fn currency(&self) -> Currency {
        self.currency
    }

    fn amount(&self) -> DecimalAmount {
        self.amount.clone()
    }

    fn from_decimal(
        currency: Currency,
        amount: &DecimalAmount,
        mode: RoundingMode,
    ) -> MoneyResult<Self> {
        Self::of_scale(currency, amount, currency.scale(), mode)
    }

    fn plus(&self, other: &Self) -> MoneyResult<Self> {
        self.ensure_same_currency(other)?;
        self.plus_amount(&other.amount)
    }

    fn minus(&self, other: &Self) -> MoneyResult<Self> {
        self.ensure_same_currency(other)?;
        self.minus_amount(&other.amount)
    }

    fn multiplied_by(&self, factor: &DecimalAmount, mode: RoundingMode) -> MoneyResult<Self> {
        let amount = self.amount.checked_mul(factor)?.with_scale(self.scale(), mode)?;
        Ok(Self::of(self.currency, amount))
    }

    fn divided_by(&self, divisor: &DecimalAmount, mode: RoundingMode) -> MoneyResult<Self> {
        let amount = self.amount.divide(divisor, self.scale(), mode)?;
        Ok(Self::of(self.currency, amount))
    }

    fn negated(&self) -> MoneyResult<Self> {
        Ok(-self)
    }

    fn compare_to(&self, other: &Self) -> MoneyResult<Ordering> {
        ensure_currency(self.currency, other.currency)?;
        Ok(self.amount.cmp(&other.amount))
    }

    fn converted_to(
        &self,
        currency: Currency,
        multiplier: &DecimalAmount,
        mode: RoundingMode,
    ) -> MoneyResult<Self> {
        check_conversion(self.currency, currency, multiplier)?;
        let amount = self
            .amount
            .checked_mul(multiplier)?
            .with_scale(self.scale(), mode)?;
        Ok(Self::of(currency, amount))
    }
}

impl Neg for &BigMoney {
    type Output = BigMoney;

    fn neg(self) -> BigMoney {
        BigMoney::of(self.currency, -&self.amount)
    }
}

impl Neg for BigMoney {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}

impl From<Money> for BigMoney {
    fn from(money: Money) -> Self {
        money.to_big_money()
    }
}

impl std::fmt::Display for BigMoney {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.currency, self.amount)
    }
}

impl std::str::FromStr for BigMoney {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
