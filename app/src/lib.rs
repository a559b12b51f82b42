//! FitCoin session core library modules.

pub mod domain;
pub mod outbound;

#[cfg(test)]
pub(crate) mod test_support;

/// Re-exported marketplace catalogue so screens depend on one crate.
pub use fitcoin_catalog as catalog;
