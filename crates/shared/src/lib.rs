//! Shared types, errors, and configuration for Ducat.
//!
//! This crate provides the pieces every other crate builds on:
//! - `DecimalAmount`, the arbitrary-precision numeric engine
//! - `RoundingMode`, the closed set of rounding rules
//! - Raw currency data records
//! - The `MoneyError` type
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, RatePolicy, RegistryConfig};
pub use error::{MoneyError, MoneyResult};
pub use types::{CurrencyRecord, DecimalAmount, MAX_SCALE, RoundingMode};
