//! # Verdant Price Oracle
//!
//! Converts local-currency prices into native-token amounts using two public
//! rate endpoints: USD per native token, and local-currency units per USD.
//! A fetch failure never blocks a purchase; the affected rate falls back to
//! a configured constant and the snapshot records that it did.
//!
//! ```
//! use verdant_price_oracle::RateSnapshot;
//!
//! let rates = RateSnapshot::fixed(0.5, 20.0);
//! assert_eq!(rates.local_to_native(3_240.0), 324.0);
//! ```

pub mod config;
pub mod error;
pub mod oracle;
pub mod source;

pub use config::OracleConfig;
pub use error::OracleError;
pub use oracle::{PriceOracle, RateSnapshot};
pub use source::{HttpRateSource, RateSource};
