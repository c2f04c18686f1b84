//! Common types used across the workspace.

pub mod currency;
pub mod decimal;
pub mod rounding;

#[cfg(test)]
mod decimal_props;

pub use currency::{CurrencyRecord, PSEUDO_DECIMAL_PLACES};
pub use decimal::{DecimalAmount, MAX_SCALE};
pub use rounding::RoundingMode;
