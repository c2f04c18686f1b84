//! The currency value type.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use ducat_shared::types::PSEUDO_DECIMAL_PLACES;
use ducat_shared::{CurrencyRecord, MoneyError, MoneyResult};

use super::registry::{CurrencyLookup, CurrencyRegistry};

/// Largest decimal-place count a currency may declare.
pub const MAX_DECIMAL_PLACES: u8 = 30;

/// A currency: ISO-style code, optional numeric code and canonical scale.
///
/// Currencies are small `Copy` values that compare, hash and order by code
/// only. Obtain them from a [`CurrencyRegistry`].
#[derive(Clone, Copy)]
pub struct Currency {
    code: [u8; 3],
    numeric_code: Option<u16>,
    /// `None` marks a pseudo-currency.
    decimal_places: Option<u8>,
}

impl Currency {
    /// Builds a currency, validating every field.
    ///
    /// `decimal_places` of -1 marks a pseudo-currency.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrencyData` if the code is not three uppercase ASCII
    /// letters, the numeric code exceeds 999, or the decimal places are out of
    /// range.
    pub fn new(code: &str, numeric_code: Option<u16>, decimal_places: i32) -> MoneyResult<Self> {
        let bytes: [u8; 3] = code
            .as_bytes()
            .try_into()
            .ok()
            .filter(|b: &[u8; 3]| b.iter().all(u8::is_ascii_uppercase))
            .ok_or_else(|| {
                MoneyError::InvalidCurrencyData(format!("invalid currency code '{code}'"))
            })?;

        if let Some(numeric) = numeric_code {
            if numeric > 999 {
                return Err(MoneyError::InvalidCurrencyData(format!(
                    "numeric code {numeric} of {code} is outside 0..=999"
                )));
            }
        }

        let decimal_places = match decimal_places {
            PSEUDO_DECIMAL_PLACES => None,
            places => Some(
                u8::try_from(places)
                    .ok()
                    .filter(|p| *p <= MAX_DECIMAL_PLACES)
                    .ok_or_else(|| {
                        MoneyError::InvalidCurrencyData(format!(
                            "decimal places {places} of {code} are out of range"
                        ))
                    })?,
            ),
        };

        Ok(Self {
            code: bytes,
            numeric_code,
            decimal_places,
        })
    }

    /// Builds a currency from a data record.
    ///
    /// # Errors
    ///
    /// Same as [`Currency::new`].
    pub fn from_record(record: &CurrencyRecord) -> MoneyResult<Self> {
        Self::new(&record.code, record.numeric_code, record.decimal_places)
    }

    /// Looks the code up in the process-wide registry.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` if the code is not registered.
    pub fn of(code: &str) -> MoneyResult<Self> {
        CurrencyRegistry::global().lookup(code)
    }

    /// Looks up the currency of a country in the process-wide registry.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCountry` if no currency is mapped to the country.
    pub fn of_country(country: &str) -> MoneyResult<Self> {
        CurrencyRegistry::global().for_country(country)
    }

    /// The three-letter code.
    #[must_use]
    pub fn code(&self) -> &str {
        // Validated as ASCII at construction.
        std::str::from_utf8(&self.code).unwrap_or_default()
    }

    /// The ISO numeric code, if any.
    #[must_use]
    pub const fn numeric_code(&self) -> Option<u16> {
        self.numeric_code
    }

    /// The numeric code zero-padded to three digits, or empty.
    #[must_use]
    pub fn numeric_3_code(&self) -> String {
        self.numeric_code
            .map(|n| format!("{n:03}"))
            .unwrap_or_default()
    }

    /// Canonical decimal places; pseudo-currencies report 0.
    #[must_use]
    pub fn decimal_places(&self) -> u32 {
        self.decimal_places.map_or(0, u32::from)
    }

    /// Canonical scale as a decimal scale.
    #[must_use]
    pub fn scale(&self) -> i64 {
        i64::from(self.decimal_places())
    }

    /// Returns true for codes with no minor unit definition.
    #[must_use]
    pub const fn is_pseudo_currency(&self) -> bool {
        self.decimal_places.is_none()
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl PartialOrd for Currency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Currency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code.cmp(&other.code)
    }
}

impl std::fmt::Debug for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Currency")
            .field("code", &self.code())
            .field("numeric_code", &self.numeric_code)
            .field("decimal_places", &self.decimal_places)
            .finish()
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::of(s)
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Self::of(&code).map_err(serde::de::Error::custom)
    }
}
