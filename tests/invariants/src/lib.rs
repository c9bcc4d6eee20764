//! Verdant Property-Based Invariant Tests
//!
//! Uses proptest to verify invariants that must hold for any input:
//! - Tier classification and benefit visibility
//! - Plan pricing, fee split and the travel threshold
//! - Compensation pool mass conservation and at-most-once liquidation

pub mod compensation_invariants;
pub mod pricing_invariants;
