//! Raw currency data records.
//!
//! Records are the already-parsed input of the currency registry. They are
//! plain data: validation happens when a registry is built from them.

use serde::{Deserialize, Serialize};

/// Decimal places value marking a pseudo-currency (no minor unit).
pub const PSEUDO_DECIMAL_PLACES: i32 = -1;

/// One row of a baseline or extension currency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyRecord {
    /// Three-letter uppercase code (e.g. "GBP").
    pub code: String,
    /// ISO 4217 numeric code, if the currency has one.
    #[serde(default)]
    pub numeric_code: Option<u16>,
    /// Canonical decimal places, or -1 for a pseudo-currency.
    pub decimal_places: i32,
    /// Two-letter country codes using this currency.
    #[serde(default)]
    pub countries: Vec<String>,
}

impl CurrencyRecord {
    /// Creates a record without country associations.
    #[must_use]
    pub fn new(code: &str, numeric_code: Option<u16>, decimal_places: i32) -> Self {
        Self {
            code: code.to_string(),
            numeric_code,
            decimal_places,
            countries: Vec::new(),
        }
    }

    /// Adds country associations.
    #[must_use]
    pub fn with_countries(mut self, countries: &[&str]) -> Self {
        self.countries = countries.iter().map(|c| (*c).to_string()).collect();
        self
    }
}
