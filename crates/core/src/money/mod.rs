//! Monetary values: arbitrary precision and fixed point.
//!
//! Two distinct types share one capability set, [`MonetaryAmount`]:
//! - [`BigMoney`] - currency plus an unbounded decimal at any scale
//! - [`Money`] - currency plus `i64` minor units at the canonical scale,
//!   failing on overflow instead of wrapping

pub mod big;
pub mod fixed;
pub mod text;

#[cfg(test)]
mod props;

use std::cmp::Ordering;

use ducat_shared::{DecimalAmount, MoneyError, MoneyResult, RoundingMode};

use crate::currency::Currency;

pub use big::BigMoney;
pub use fixed::Money;

/// Arithmetic shared by both monetary value types.
///
/// Every binary operation checks that both operands use the same currency.
pub trait MonetaryAmount: Sized + Clone {
    /// The currency of the value.
    fn currency(&self) -> Currency;

    /// The numeric amount.
    fn amount(&self) -> DecimalAmount;

    /// Builds a value at the currency's canonical scale.
    ///
    /// # Errors
    ///
    /// Returns `RoundingNecessary` under `Unnecessary` if digits are dropped,
    /// or `ArithmeticOverflow` if the value does not fit the representation.
    fn from_decimal(
        currency: Currency,
        amount: &DecimalAmount,
        mode: RoundingMode,
    ) -> MoneyResult<Self>;

    /// Adds a value of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch` or `ArithmeticOverflow`.
    fn plus(&self, other: &Self) -> MoneyResult<Self>;

    /// Subtracts a value of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch` or `ArithmeticOverflow`.
    fn minus(&self, other: &Self) -> MoneyResult<Self>;

    /// Multiplies, keeping the current scale.
    ///
    /// # Errors
    ///
    /// Returns `RoundingNecessary` or `ArithmeticOverflow`.
    fn multiplied_by(&self, factor: &DecimalAmount, mode: RoundingMode) -> MoneyResult<Self>;

    /// Divides, keeping the current scale.
    ///
    /// # Errors
    ///
    /// Returns `DivisionByZero`, `RoundingNecessary` or `ArithmeticOverflow`.
    fn divided_by(&self, divisor: &DecimalAmount, mode: RoundingMode) -> MoneyResult<Self>;

    /// Flips the sign.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the negation is unrepresentable.
    fn negated(&self) -> MoneyResult<Self>;

    /// Compares numerically with a value of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch`.
    fn compare_to(&self, other: &Self) -> MoneyResult<Ordering>;

    /// Converts to another currency by a positive multiplier.
    ///
    /// # Errors
    ///
    /// Returns `SameCurrency` if `currency` is the current currency,
    /// `NegativeMultiplier` if `multiplier <= 0`, plus rounding and overflow
    /// errors.
    fn converted_to(
        &self,
        currency: Currency,
        multiplier: &DecimalAmount,
        mode: RoundingMode,
    ) -> MoneyResult<Self>;

    /// Returns true if both values use the same currency.
    fn is_same_currency(&self, other: &Self) -> bool {
        self.currency() == other.currency()
    }

    /// Fails with `CurrencyMismatch` unless `other` uses this currency.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyMismatch`.
    fn ensure_same_currency(&self, other: &Self) -> MoneyResult<()> {
        ensure_currency(self.currency(), other.currency())
    }
}

/// Fails with `CurrencyMismatch` unless both currencies are equal.
pub(crate) fn ensure_currency(expected: Currency, actual: Currency) -> MoneyResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(MoneyError::CurrencyMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}

/// Checks the preconditions shared by every currency conversion.
pub(crate) fn check_conversion(
    from: Currency,
    to: Currency,
    multiplier: &DecimalAmount,
) -> MoneyResult<()> {
    if from == to {
        return Err(MoneyError::SameCurrency(to.to_string()));
    }
    if !multiplier.is_positive() {
        return Err(MoneyError::NegativeMultiplier(multiplier.to_string()));
    }
    Ok(())
}
