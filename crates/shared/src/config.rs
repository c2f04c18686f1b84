//! Application configuration management.

use serde::Deserialize;

use crate::types::{CurrencyRecord, MAX_SCALE, RoundingMode};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Exchange-rate arithmetic policy.
    #[serde(default)]
    pub rates: RatePolicy,
    /// Currency registry configuration.
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Scale and rounding used by exchange-rate arithmetic.
///
/// Reciprocals and quotients of decimal rates rarely terminate, so the
/// rounding policy decides the result and must be applied consistently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RatePolicy {
    /// Scale of inverted and combined rates, `0..=MAX_SCALE`.
    #[serde(default = "default_rate_scale")]
    pub scale: i64,
    /// Rounding of inverted and combined rates.
    #[serde(default = "default_rate_rounding")]
    pub rounding: RoundingMode,
    /// Rounding of exchanged amounts to the result currency's scale.
    #[serde(default = "default_exchange_rounding")]
    pub exchange_rounding: RoundingMode,
}

fn default_rate_scale() -> i64 {
    16
}

fn default_rate_rounding() -> RoundingMode {
    RoundingMode::HalfEven
}

fn default_exchange_rounding() -> RoundingMode {
    RoundingMode::HalfUp
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self {
            scale: default_rate_scale(),
            rounding: default_rate_rounding(),
            exchange_rounding: default_exchange_rounding(),
        }
    }
}

impl RatePolicy {
    /// Checks that the scale is usable for rate arithmetic.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` if the scale is negative or above
    /// `MAX_SCALE`.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if !(0..=MAX_SCALE).contains(&self.scale) {
            return Err(config::ConfigError::Message(format!(
                "rates.scale must be between 0 and {MAX_SCALE}, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

/// Currency registry configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    /// Records layered over the built-in table; same code overrides.
    #[serde(default)]
    pub extension: Vec<CurrencyRecord>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the rate policy
    /// is out of range.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DUCAT").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.rates.validate()?;
        Ok(config)
    }
}
