//! Error types shared by every Ducat crate.
//!
//! All errors are local and synchronous: the caller has to fix the input,
//! nothing is retried or recovered internally.

use thiserror::Error;

/// Result type alias using `MoneyError`.
pub type MoneyResult<T> = Result<T, MoneyError>;

/// Errors raised by currency, money and exchange-rate operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    // ========== Input Errors ==========
    /// A required input was empty.
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// Text did not match the expected grammar.
    #[error("Invalid format: '{input}' ({reason})")]
    InvalidFormat {
        /// The rejected text.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    // ========== Registry Errors ==========
    /// No currency is registered under the code.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// No currency is mapped to the country.
    #[error("No currency found for country: {0}")]
    UnknownCountry(String),

    /// A currency record was malformed or conflicted with another record.
    #[error("Invalid currency data: {0}")]
    InvalidCurrencyData(String),

    /// The process-wide registry was already initialized.
    #[error("Currency registry is already initialized")]
    RegistryAlreadyInitialized,

    // ========== Rate Errors ==========
    /// The exchange rate violates the rate invariants.
    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    /// The rate combination shares no currency.
    #[error("No common currency between {left} and {right}")]
    NoCommonCurrency {
        /// Pair of the receiving rate.
        left: String,
        /// Pair of the argument rate.
        right: String,
    },

    /// The rate cannot be applied to a value of this currency.
    #[error("Cannot exchange {currency} using rate {pair}")]
    NotExchangeable {
        /// Currency of the value.
        currency: String,
        /// Pair of the rate.
        pair: String,
    },

    // ========== Money Errors ==========
    /// Conversion target equals the source currency.
    #[error("Cannot convert to the same currency: {0}")]
    SameCurrency(String),

    /// Conversion multiplier must be positive.
    #[error("Conversion multiplier must be positive, got {0}")]
    NegativeMultiplier(String),

    /// Arithmetic or comparison between different currencies.
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch {
        /// Currency of the receiving value.
        expected: String,
        /// Currency of the argument.
        actual: String,
    },

    /// A fixed-point operation left the 64-bit range.
    #[error("Arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    /// Division by zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// Rounding was required but the rounding mode forbids it.
    #[error("Rounding necessary to fit scale {0}")]
    RoundingNecessary(i64),

    /// Rounding to a scale finer than the current one.
    #[error("Cannot round to scale {requested}, current scale is {current}")]
    ScaleIncrease {
        /// Requested scale.
        requested: i64,
        /// Scale of the value.
        current: i64,
    },

    /// A scale outside the supported range.
    #[error("Scale {0} is outside the supported range")]
    ScaleOutOfRange(i64),

    // ========== Persistence Errors ==========
    /// Decoded state failed re-validation.
    #[error("Invalid persisted state: {0}")]
    InvalidPersistedState(String),

    /// A value could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MoneyError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingArgument(_) => "MISSING_ARGUMENT",
            Self::InvalidFormat { .. } => "INVALID_FORMAT",
            Self::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            Self::UnknownCountry(_) => "UNKNOWN_COUNTRY",
            Self::InvalidCurrencyData(_) => "INVALID_CURRENCY_DATA",
            Self::RegistryAlreadyInitialized => "REGISTRY_ALREADY_INITIALIZED",
            Self::InvalidRate(_) => "INVALID_RATE",
            Self::NoCommonCurrency { .. } => "NO_COMMON_CURRENCY",
            Self::NotExchangeable { .. } => "NOT_EXCHANGEABLE",
            Self::SameCurrency(_) => "SAME_CURRENCY",
            Self::NegativeMultiplier(_) => "NEGATIVE_MULTIPLIER",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::ArithmeticOverflow(_) => "ARITHMETIC_OVERFLOW",
            Self::DivisionByZero => "DIVISION_BY_ZERO",
            Self::RoundingNecessary(_) => "ROUNDING_NECESSARY",
            Self::ScaleIncrease { .. } => "SCALE_INCREASE",
            Self::ScaleOutOfRange(_) => "SCALE_OUT_OF_RANGE",
            Self::InvalidPersistedState(_) => "INVALID_PERSISTED_STATE",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Builds an `InvalidFormat` error for the given input.
    #[must_use]
    pub fn invalid_format(input: &str, reason: &'static str) -> Self {
        Self::InvalidFormat {
            input: input.to_string(),
            reason,
        }
    }
}
