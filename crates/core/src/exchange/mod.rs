//! Exchange-rate algebra.
//!
//! An [`ExchangeRate`] reads "1 base = rate counter". Rates invert, combine
//! through a shared currency and apply to any [`crate::money::MonetaryAmount`].
//! Decoded rates are re-validated before they exist, see [`persist`].

pub mod persist;
pub mod rate;

#[cfg(test)]
mod props;

pub use persist::PersistedExchangeRate;
pub use rate::ExchangeRate;
