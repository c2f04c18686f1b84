//! Currencies and the process-wide currency registry.

pub mod data;
pub mod registry;
pub mod unit;

pub use data::baseline_records;
pub use registry::{CurrencyLookup, CurrencyRegistry};
pub use unit::{Currency, MAX_DECIMAL_PLACES};
