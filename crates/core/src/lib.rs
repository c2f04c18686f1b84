//! Core money logic for Ducat.
//!
//! This crate contains pure, synchronous domain logic with no I/O.
//! Currencies come from an immutable registry, money values never round
//! silently, and exchange rates are validated whenever they are built.
//!
//! # Modules
//!
//! - `currency` - Currency values and the process-wide registry
//! - `money` - Arbitrary-precision and fixed-point monetary values
//! - `exchange` - Exchange-rate algebra and rate persistence

pub mod currency;
pub mod exchange;
pub mod money;

/// Commonly used types.
pub mod prelude {
    pub use crate::currency::{Currency, CurrencyLookup, CurrencyRegistry};
    pub use crate::exchange::{ExchangeRate, PersistedExchangeRate};
    pub use crate::money::{BigMoney, MonetaryAmount, Money};
    pub use ducat_shared::{
        DecimalAmount, MAX_SCALE, MoneyError, MoneyResult, RatePolicy, RoundingMode,
    };
}
