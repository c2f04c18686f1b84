//! Currency registry: code, numeric code and country lookups.
//!
//! A registry is built once from a baseline table and an optional extension
//! overlay, then only read. The process-wide instance lives in a one-time
//! initialization cell, so lookups never take a lock.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::OnceCell;
use tracing::{debug, error, info};

use ducat_shared::{CurrencyRecord, MoneyError, MoneyResult};

use super::data::baseline_records;
use super::unit::Currency;

static GLOBAL: OnceCell<CurrencyRegistry> = OnceCell::new();

/// Read access to currency metadata.
///
/// Parsers and other callers depend on this trait rather than on the
/// concrete registry, so hosts can supply their own source of currencies.
pub trait CurrencyLookup {
    /// Finds a currency by its three-letter code.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` if the code is not registered.
    fn lookup(&self, code: &str) -> MoneyResult<Currency>;

    /// Finds the currency used by a two-letter country code.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCountry` if no currency is mapped to the country.
    fn for_country(&self, country: &str) -> MoneyResult<Currency>;

    /// All registered currencies, ordered by code.
    fn currencies(&self) -> Vec<Currency>;
}

/// Immutable table of registered currencies.
#[derive(Debug, Clone, Default)]
pub struct CurrencyRegistry {
    by_code: BTreeMap<String, Currency>,
    by_numeric: HashMap<u16, Currency>,
    by_country: BTreeMap<String, Currency>,
}

/// A merged record: currency, its countries, and whether the extension set it.
type MergedEntry = (Currency, Vec<String>, bool);

fn validate_country(code: &str, country: &str) -> MoneyResult<()> {
    if country.len() == 2 && country.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(MoneyError::InvalidCurrencyData(format!(
            "invalid country code '{country}' for {code}"
        )))
    }
}

/// Layers one table over the merged entries. Later tables win.
fn merge_table(
    merged: &mut BTreeMap<String, MergedEntry>,
    records: &[CurrencyRecord],
    extension: bool,
) -> MoneyResult<()> {
    let table = if extension { "extension" } else { "baseline" };
    let mut seen = HashSet::new();

    for record in records {
        let currency = Currency::from_record(record)?;
        if !seen.insert(record.code.as_str()) {
            return Err(MoneyError::InvalidCurrencyData(format!(
                "duplicate code {} in {table} table",
                record.code
            )));
        }
        for country in &record.countries {
            validate_country(&record.code, country)?;
        }

        let countries = match merged.remove(&record.code) {
            Some((previous, countries, _)) => {
                debug!(
                    code = %record.code,
                    old_places = previous.decimal_places(),
                    new_places = currency.decimal_places(),
                    table,
                    "Currency overridden"
                );
                if record.countries.is_empty() {
                    countries
                } else {
                    record.countries.clone()
                }
            }
            None => record.countries.clone(),
        };
        merged.insert(record.code.clone(), (currency, countries, extension));
    }

    Ok(())
}

impl CurrencyRegistry {
    /// Builds a registry from a baseline table and an extension overlay.
    ///
    /// Extension records replace baseline records with the same code. An
    /// extension record without countries keeps the baseline's countries.
    /// Country mappings set by the extension take precedence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrencyData` for malformed records, duplicate codes
    /// within one table, or a numeric code shared by two currencies.
    pub fn from_records(
        baseline: &[CurrencyRecord],
        extension: &[CurrencyRecord],
    ) -> MoneyResult<Self> {
        let mut merged = BTreeMap::new();
        merge_table(&mut merged, baseline, false)?;
        merge_table(&mut merged, extension, true)?;

        let mut registry = Self::default();
        for (code, (currency, _, _)) in &merged {
            if let Some(numeric) = currency.numeric_code() {
                if let Some(other) = registry.by_numeric.insert(numeric, *currency) {
                    return Err(MoneyError::InvalidCurrencyData(format!(
                        "numeric code {numeric} used by both {other} and {code}"
                    )));
                }
            }
            registry.by_code.insert(code.clone(), *currency);
        }

        // Baseline mappings first so extension mappings overwrite them.
        for from_extension in [false, true] {
            for (currency, countries, _) in merged.values().filter(|e| e.2 == from_extension) {
                for country in countries {
                    registry.by_country.insert(country.clone(), *currency);
                }
            }
        }

        Ok(registry)
    }

    /// The built-in ISO baseline with no extension.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCurrencyData` if the built-in table is inconsistent.
    pub fn builtin() -> MoneyResult<Self> {
        Self::from_records(&baseline_records(), &[])
    }

    /// The built-in ISO baseline layered with `extension`.
    ///
    /// # Errors
    ///
    /// Same as [`CurrencyRegistry::from_records`].
    pub fn with_extension(extension: &[CurrencyRecord]) -> MoneyResult<Self> {
        Self::from_records(&baseline_records(), extension)
    }

    /// Makes this registry the process-wide one.
    ///
    /// # Errors
    ///
    /// Returns `RegistryAlreadyInitialized` if a registry was installed or
    /// lazily created by an earlier lookup.
    pub fn install(self) -> MoneyResult<&'static Self> {
        let count = self.len();
        GLOBAL
            .set(self)
            .map_err(|_| MoneyError::RegistryAlreadyInitialized)?;
        info!(currencies = count, "Currency registry installed");
        GLOBAL.get().ok_or(MoneyError::RegistryAlreadyInitialized)
    }

    /// The process-wide registry.
    ///
    /// Falls back to the built-in baseline when nothing was installed.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| {
            Self::builtin().unwrap_or_else(|err| {
                error!(error = %err, "Built-in currency table rejected");
                Self::default()
            })
        })
    }

    /// Finds a currency by ISO numeric code.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCurrency` if no currency has the numeric code.
    pub fn lookup_numeric(&self, numeric: u16) -> MoneyResult<Currency> {
        self.by_numeric
            .get(&numeric)
            .copied()
            .ok_or_else(|| MoneyError::UnknownCurrency(format!("{numeric:03}")))
    }

    /// Iterates over all currencies in code order. Can be called repeatedly.
    pub fn all(&self) -> impl Iterator<Item = Currency> + '_ {
        self.by_code.values().copied()
    }

    /// Countries mapped to `currency`, sorted.
    #[must_use]
    pub fn countries_of(&self, currency: Currency) -> Vec<&str> {
        self.by_country
            .iter()
            .filter(|(_, c)| **c == currency)
            .map(|(country, _)| country.as_str())
            .collect()
    }

    /// Number of registered currencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Returns true if no currency is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl CurrencyLookup for CurrencyRegistry {
    fn lookup(&self, code: &str) -> MoneyResult<Currency> {
        self.by_code
            .get(code)
            .copied()
            .ok_or_else(|| MoneyError::UnknownCurrency(code.to_string()))
    }

    fn for_country(&self, country: &str) -> MoneyResult<Currency> {
        self.by_country
            .get(country)
            .copied()
            .ok_or_else(|| MoneyError::UnknownCountry(country.to_string()))
    }

    fn currencies(&self) -> Vec<Currency> {
        self.all().collect()
    }
}
