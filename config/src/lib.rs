//! # Verdant Config
//!
//! Versioned runtime configuration.  A YAML document holds one section per
//! component (`pricing`, `compensation`, `oracle`); missing keys take their
//! defaults.  [`ConfigHandle`] shares the current revision across the
//! process and only ever moves it forward.

pub mod config;
pub mod error;
pub mod handle;

pub use config::VerdantConfig;
pub use error::ConfigError;
pub use handle::ConfigHandle;
