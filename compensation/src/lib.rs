//! # Verdant Compensation
//!
//! Aggregates gram-sized CO2 offsets per project and retires them with the
//! external registry one whole ton at a time.
//!
//! ## Architecture
//!
//! ```text
//!   provider webhook ──▶ CompensationWebhook::into_request()
//!                                   │
//!                                   ▼
//!                 CompensationAggregator::record_compensation()
//!                     │                              │
//!      conditional writes (version)          signal_retirement()
//!                     ▼                              ▼
//!              dyn PoolStore               dyn LiquidationRegistry
//! ```
//!
//! ## Crate modules
//!
//! | Module         | Purpose |
//! |----------------|---------|
//! | [`pool`]       | Pool state, the gram→ton step, state transitions |
//! | [`store`]      | `PoolStore` seam and the in-memory store |
//! | [`registry`]   | `LiquidationRegistry` seam and event types |
//! | [`aggregator`] | The compensation step and liquidation flow |
//! | [`webhook`]    | Payment-provider callback parsing |
//! | [`config`]     | Retry and dedupe tunables |
//! | [`error`]      | Crate-wide error enums |

pub mod aggregator;
pub mod config;
pub mod error;
pub mod pool;
pub mod registry;
pub mod store;
pub mod webhook;


pub use aggregator::{
    CompensationAggregator, CompensationOutcome, CompensationRequest, CompensationStatus,
};
pub use config::CompensationConfig;
pub use error::{CompensationError, RegistryError, StoreError};
pub use pool::{CompensationPool, PoolStatus, GRAMS_PER_TON};
pub use registry::{LiquidationEvent, LiquidationRegistry, RegistryReceipt};
pub use store::{InMemoryPoolStore, PoolStore};
