use crate::{
    config::PricingConfig,
    error::PricingError,
    plan::{AdoptionPlan, PlanDuration},
};

/// Charges at or above this amount unlock the travel benefit.
pub const TRAVEL_BENEFIT_THRESHOLD: f64 = 1_000.0;

/// Months priced into the perpetual plan's reference period.
pub const PERPETUAL_REFERENCE_MONTHS: f64 = 60.0;

/// Discount applied to the perpetual plan's reference period (20 %).
pub const PERPETUAL_REFERENCE_DISCOUNT: f64 = 0.20;

/// Perpetual price as a multiple of the discounted reference period.
pub const PERPETUAL_MULTIPLIER: f64 = 5.0;

/// Calculate the final charge for adopting on `plan` a region priced at
/// `base_price_per_year`.
///
/// # Formula
///
/// ```text
/// monthly = base_price_per_year / 12
///
/// months plan:
///     final = monthly × months × (1 − discount_pct / 100)
///
/// perpetual plan:
///     five_year = monthly × 60 × 0.8
///     final     = five_year × 5
/// ```
///
/// The result is rounded to two decimals.
///
/// The perpetual charge is deliberately not a continuation of the
/// proportional formula: it is always five times the discounted five-year
/// price, whatever duration or discount the plan record carries.
pub fn calculate_plan_price(
    base_price_per_year: f64,
    plan: &AdoptionPlan,
) -> Result<f64, PricingError> {
    validate_base_price(base_price_per_year)?;

    let monthly = base_price_per_year / 12.0;

    let raw = match plan.duration {
        PlanDuration::Months(months) => {
            validate_discount(plan)?;
            monthly * f64::from(months) * (1.0 - plan.discount_pct / 100.0)
        }
        PlanDuration::Perpetual => {
            let five_year =
                monthly * PERPETUAL_REFERENCE_MONTHS * (1.0 - PERPETUAL_REFERENCE_DISCOUNT);
            five_year * PERPETUAL_MULTIPLIER
        }
    };

    Ok(round_to_cents(raw))
}

/// Whether a final charge unlocks the travel benefit.
#[inline]
pub fn travel_benefit_unlocked(final_price: f64) -> bool {
    final_price >= TRAVEL_BENEFIT_THRESHOLD
}

/// Split `final_price` into the platform fee and the amount left for the
/// project, both rounded to two decimals.  `fee + net == final_price`.
pub fn split_platform_fee(final_price: f64, platform_fee_pct: f64) -> (f64, f64) {
    let fee = round_to_cents(final_price * platform_fee_pct / 100.0);
    let net = round_to_cents(final_price - fee);
    (fee, net)
}

/// Reject prices the pricing formula has no meaning for.
pub fn validate_base_price(price: f64) -> Result<(), PricingError> {
    if !price.is_finite() || price < 0.0 {
        return Err(PricingError::InvalidPrice { price });
    }
    Ok(())
}

fn validate_discount(plan: &AdoptionPlan) -> Result<(), PricingError> {
    if !(0.0..=100.0).contains(&plan.discount_pct) {
        return Err(PricingError::InvalidDiscount {
            plan: plan.id.clone(),
            discount_pct: plan.discount_pct,
        });
    }
    Ok(())
}

/// Validate that a `PricingConfig` is internally consistent.
pub fn validate_config(config: &PricingConfig) -> Result<(), PricingError> {
    if !(0.0..=100.0).contains(&config.platform_fee_pct) {
        return Err(PricingError::InvalidConfig {
            reason: format!(
                "platform_fee_pct ({}) must be 0–100",
                config.platform_fee_pct
            ),
        });
    }
    if config.treasury_wallet.trim().is_empty() {
        return Err(PricingError::InvalidConfig {
            reason: "treasury_wallet must be set".to_string(),
        });
    }
    if config.quote_ttl_secs == 0 {
        return Err(PricingError::InvalidConfig {
            reason: "quote_ttl_secs must be > 0".to_string(),
        });
    }
    Ok(())
}

#[inline]
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
