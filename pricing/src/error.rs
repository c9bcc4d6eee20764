use thiserror::Error;

/// Errors produced by the pricing subsystem.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// The yearly base price is negative, NaN or infinite.
    #[error("Invalid price: {price} (must be a finite, non-negative amount)")]
    InvalidPrice { price: f64 },

    /// A plan discount lies outside 0–100 %.
    #[error("Invalid discount on plan {plan}: {discount_pct}% (must be 0–100)")]
    InvalidDiscount { plan: String, discount_pct: f64 },

    /// The configuration is invalid (e.g. fee above 100 %, empty treasury wallet).
    #[error("Invalid pricing configuration: {reason}")]
    InvalidConfig { reason: String },
}
