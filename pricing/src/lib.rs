//! # Verdant Pricing
//!
//! Pure pricing rules for **pixel adoption** inside conservation regions.
//!
//! A region is priced per square metre per year.  That yearly price decides
//! the region's ownership **tier** (Diamond, Gold, Silver, Basic) and, combined
//! with one of the five catalog **adoption plans**, the final charge the buyer
//! pays.  Nothing in this crate performs I/O: every function is a plain
//! calculation that can be unit-tested without a store, wallet or network.
//!
//! ## Quick start
//!
//! ```rust
//! use verdant_pricing::{calculator, tier, PlanId};
//!
//! // A region priced at 1 200 per m² per year, adopted on the 36-month plan.
//! let plan = PlanId::Months36.plan();
//! let charge = calculator::calculate_plan_price(1_200.0, &plan).unwrap();
//! assert_eq!(charge, 3_240.0);
//! assert!(calculator::travel_benefit_unlocked(charge));
//!
//! // Its tier is derived from the yearly price, never stored.
//! assert_eq!(tier::classify(1_200.0).label(), "Diamond");
//! ```
//!
//! See [`calculator`] for the plan formula and [`quote`] for the value that
//! travels from the pricing screen to settlement unchanged.

pub mod calculator;
pub mod config;
pub mod error;
pub mod plan;
pub mod quote;
pub mod tier;

#[cfg(test)]
mod tests;

// Re-exports for convenience.
pub use config::PricingConfig;
pub use error::PricingError;
pub use plan::{AdoptionPlan, PlanDuration, PlanId};
pub use quote::{PriceQuote, QuoteId, Region};
pub use tier::{Benefit, Tier};
