//! Binary persistence of exchange rates.
//!
//! Rates are stored as a raw record of strings. Decoding first reads the raw
//! fields, then rebuilds the rate through the same validation as
//! [`ExchangeRate::of`], so corrupted or crafted bytes never produce a rate.

use bincode::Options;
use serde::{Deserialize, Serialize};
use tracing::warn;

use ducat_shared::{DecimalAmount, MoneyError, MoneyResult};

use super::rate::ExchangeRate;
use crate::currency::{CurrencyLookup, CurrencyRegistry};

/// Upper bound on an encoded rate; longer input is rejected before decoding.
const MAX_ENCODED_LEN: u64 = 64 * 1024;

/// Fixed-width little-endian encoding that rejects bytes past the record.
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_ENCODED_LEN)
        .reject_trailing_bytes()
}

/// Undecoded exchange-rate fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedExchangeRate {
    /// Base currency code.
    pub base: String,
    /// Counter currency code.
    pub counter: String,
    /// Rate as a plain decimal string.
    pub rate: String,
}

impl PersistedExchangeRate {
    /// Rebuilds the rate against the process-wide registry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPersistedState` if any field fails validation.
    pub fn restore(&self) -> MoneyResult<ExchangeRate> {
        self.restore_with(CurrencyRegistry::global())
    }

    /// Rebuilds the rate against `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPersistedState` if any field fails validation.
    pub fn restore_with<L: CurrencyLookup + ?Sized>(
        &self,
        lookup: &L,
    ) -> MoneyResult<ExchangeRate> {
        self.rebuild(lookup).map_err(|err| {
            warn!(
                base = %self.base,
                counter = %self.counter,
                rate = %self.rate,
                error = %err,
                "Rejected persisted exchange rate"
            );
            MoneyError::InvalidPersistedState(err.to_string())
        })
    }

    fn rebuild<L: CurrencyLookup + ?Sized>(&self, lookup: &L) -> MoneyResult<ExchangeRate> {
        let base = lookup.lookup(&self.base)?;
        let counter = lookup.lookup(&self.counter)?;
        let rate: DecimalAmount = self.rate.parse()?;
        ExchangeRate::of(base, counter, rate)
    }
}

impl From<ExchangeRate> for PersistedExchangeRate {
    fn from(rate: ExchangeRate) -> Self {
        Self::from(&rate)
    }
}

impl From<&ExchangeRate> for PersistedExchangeRate {
    fn from(rate: &ExchangeRate) -> Self {
        Self {
            base: rate.base().code().to_string(),
            counter: rate.counter().code().to_string(),
            rate: rate.rate().to_string(),
        }
    }
}

impl TryFrom<PersistedExchangeRate> for ExchangeRate {
    type Error = MoneyError;

    fn try_from(raw: PersistedExchangeRate) -> Result<Self, Self::Error> {
        raw.restore()
    }
}

impl ExchangeRate {
    /// Encodes the rate with `bincode`.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn to_bytes(&self) -> MoneyResult<Vec<u8>> {
        codec()
            .serialize(&PersistedExchangeRate::from(self))
            .map_err(|err| MoneyError::Serialization(err.to_string()))
    }

    /// Decodes and re-validates a rate produced by [`ExchangeRate::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidPersistedState` for undecodable bytes, bytes after
    /// the record, unknown codes, an unparsable rate or a rate that breaks
    /// the invariants.
    pub fn from_bytes(bytes: &[u8]) -> MoneyResult<Self> {
        let raw: PersistedExchangeRate = codec().deserialize(bytes).map_err(|err| {
            warn!(error = %err, "Undecodable persisted exchange rate");
            MoneyError::InvalidPersistedState(err.to_string())
        })?;
        raw.restore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn raw(base: &str, counter: &str, rate: &str) -> PersistedExchangeRate {
        PersistedExchangeRate {
            base: base.to_string(),
            counter: counter.to_string(),
            rate: rate.to_string(),
        }
    }

    #[test]
    fn test_bytes_round_trip() {
        let rate = ExchangeRate::parse("GBP/USD 1.5485").unwrap();
        let bytes = rate.to_bytes().unwrap();
        let back = ExchangeRate::from_bytes(&bytes).unwrap();
        assert_eq!(back, rate);
        assert_eq!(back.rate().scale(), 4);
    }

    #[rstest]
    #[case::zero_rate(raw("GBP", "USD", "0"))]
    #[case::negative_rate(raw("GBP", "USD", "-1.5"))]
    #[case::same_currency(raw("GBP", "GBP", "2"))]
    #[case::unknown_code(raw("GBP", "ZZZ", "1.5"))]
    #[case::bad_rate(raw("GBP", "USD", "1.5e3"))]
    #[case::lowercase_code(raw("gbp", "USD", "1.5"))]
    fn test_from_bytes_rejects_invalid_state(#[case] state: PersistedExchangeRate) {
        let bytes = bincode::serialize(&state).unwrap();
        assert!(matches!(
            ExchangeRate::from_bytes(&bytes),
            Err(MoneyError::InvalidPersistedState(_))
        ));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(matches!(
            ExchangeRate::from_bytes(&[0xFF, 0x01]),
            Err(MoneyError::InvalidPersistedState(_))
        ));
        assert!(matches!(
            ExchangeRate::from_bytes(&[]),
            Err(MoneyError::InvalidPersistedState(_))
        ));
    }

    #[test]
    fn test_from_bytes_rejects_trailing_garbage() {
        let rate = ExchangeRate::parse("GBP/USD 1.5485").unwrap();
        let mut bytes = rate.to_bytes().unwrap();
        bytes.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF, 0xFF, 0xFF]);
        assert!(matches!(
            ExchangeRate::from_bytes(&bytes),
            Err(MoneyError::InvalidPersistedState(_))
        ));
    }

    #[test]
    fn test_from_bytes_rejects_oversized_length() {
        // A base code claiming to be u64::MAX bytes long.
        let bytes = u64::MAX.to_le_bytes();
        assert!(matches!(
            ExchangeRate::from_bytes(&bytes),
            Err(MoneyError::InvalidPersistedState(_))
        ));
    }

    #[test]
    fn test_encoding_matches_plain_bincode() {
        let rate = ExchangeRate::parse("EUR/PLN 4.2").unwrap();
        let plain = bincode::serialize(&PersistedExchangeRate::from(&rate)).unwrap();
        assert_eq!(rate.to_bytes().unwrap(), plain);
    }

    #[test]
    fn test_serde_json_revalidates() {
        let rate = ExchangeRate::parse("EUR/PLN 4.2").unwrap();
        let json = serde_json::to_string(&rate).unwrap();
        assert_eq!(json, r#"{"base":"EUR","counter":"PLN","rate":"4.2"}"#);
        assert_eq!(serde_json::from_str::<ExchangeRate>(&json).unwrap(), rate);

        let tampered = r#"{"base":"EUR","counter":"PLN","rate":"-4.2"}"#;
        let err = serde_json::from_str::<ExchangeRate>(tampered).unwrap_err();
        assert!(err.to_string().contains("Invalid persisted state"));
    }

    #[test]
    fn test_restore_with_custom_lookup() {
        let registry = CurrencyRegistry::with_extension(&[
            ducat_shared::CurrencyRecord::new("BTC", None, 8),
        ])
        .unwrap();
        let rate = raw("BTC", "USD", "65000.5").restore_with(&registry).unwrap();
        assert_eq!(rate.base().decimal_places(), 8);
    }
}
