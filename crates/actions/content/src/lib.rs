//! Data-driven action content and loaders.
//!
//! This crate houses the authored action definitions and provides loaders for
//! RON/TOML data files:
//! - Action definitions (data-driven via RON, with an embedded default set)
//! - Engine configuration (data-driven via TOML)
//!
//! All loaders use actions-core types directly with serde for deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ActionFile, ActionLoader, ConfigLoader};
