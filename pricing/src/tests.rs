//! Scenario tests for the Verdant pricing engine.

use {
    crate::{
        calculator::{
            calculate_plan_price, round_to_cents, split_platform_fee, travel_benefit_unlocked,
            validate_config,
        },
        config::PricingConfig,
        error::PricingError,
        plan::{AdoptionPlan, PlanDuration, PlanId},
    },
    assert_matches::assert_matches,
    test_case::test_case,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn six_month_plan() -> AdoptionPlan {
    AdoptionPlan::custom("plan_6m", PlanDuration::Months(6), 0.0)
}

fn price(base: f64, id: PlanId) -> f64 {
    calculate_plan_price(base, &id.plan()).unwrap()
}

// ===========================================================================
// 1. Proportional plans
// ===========================================================================

#[test]
fn plan_36m_known_value() {
    // monthly = 1200 / 12 = 100
    // final   = 100 * 36 * 0.9 = 3240
    assert_eq!(price(1_200.0, PlanId::Months36), 3_240.0);
}

#[test]
fn plan_24m_known_value() {
    // 100 * 24 * 1.0 = 2400
    assert_eq!(price(1_200.0, PlanId::Months24), 2_400.0);
}

#[test]
fn plan_60m_known_value() {
    // 100 * 60 * 0.8 = 4800
    assert_eq!(price(1_200.0, PlanId::Months60), 4_800.0);
}

#[test]
fn custom_six_month_plan() {
    assert_eq!(calculate_plan_price(1_200.0, &six_month_plan()).unwrap(), 600.0);
}

#[test_case(PlanId::Months12, 1_234.56 => 1_234.56; "12m equals yearly price")]
#[test_case(PlanId::Months24, 333.33 => 666.66; "24m rounds to cents")]
#[test_case(PlanId::Months36, 100.0 => 270.0; "36m small region")]
fn proportional_prices(id: PlanId, base: f64) -> f64 {
    price(base, id)
}

// ===========================================================================
// 2. Perpetual plan
// ===========================================================================

#[test]
fn perpetual_known_value() {
    // five_year = 100 * 60 * 0.8 = 4800
    // final     = 4800 * 5       = 24000
    assert_eq!(price(1_200.0, PlanId::Perpetual), 24_000.0);
}

#[test]
fn perpetual_ignores_duration_and_discount_fields() {
    let mut plan = PlanId::Perpetual.plan();
    plan.discount_pct = 95.0;
    assert_eq!(calculate_plan_price(1_200.0, &plan).unwrap(), 24_000.0);

    let odd = AdoptionPlan::custom("perpetual_promo", PlanDuration::Perpetual, 0.0);
    assert_eq!(calculate_plan_price(1_200.0, &odd).unwrap(), 24_000.0);
}

#[test]
fn perpetual_is_five_times_discounted_five_year() {
    let five_year = price(2_400.0, PlanId::Months60);
    assert_eq!(price(2_400.0, PlanId::Perpetual), five_year * 5.0);
}

// ===========================================================================
// 3. Edge cases
// ===========================================================================

#[test]
fn zero_base_price_is_free_on_every_plan() {
    for id in PlanId::ALL {
        assert_eq!(price(0.0, id), 0.0, "plan {id}");
    }
}

#[test]
fn negative_base_price_rejected() {
    for id in PlanId::ALL {
        assert_matches!(
            calculate_plan_price(-0.01, &id.plan()),
            Err(PricingError::InvalidPrice { .. })
        );
    }
}

#[test]
fn non_finite_base_price_rejected() {
    let plan = PlanId::Months12.plan();
    assert_matches!(
        calculate_plan_price(f64::NAN, &plan),
        Err(PricingError::InvalidPrice { .. })
    );
    assert_matches!(
        calculate_plan_price(f64::INFINITY, &plan),
        Err(PricingError::InvalidPrice { .. })
    );
}

#[test]
fn out_of_range_discount_rejected() {
    let plan = AdoptionPlan::custom("bad", PlanDuration::Months(12), 120.0);
    assert_matches!(
        calculate_plan_price(1_200.0, &plan),
        Err(PricingError::InvalidDiscount { discount_pct, .. }) if discount_pct == 120.0
    );
    let plan = AdoptionPlan::custom("bad", PlanDuration::Months(12), -1.0);
    assert!(calculate_plan_price(1_200.0, &plan).is_err());
}

#[test]
fn zero_month_plan_costs_nothing() {
    let plan = AdoptionPlan::custom("trial", PlanDuration::Months(0), 0.0);
    assert_eq!(calculate_plan_price(1_200.0, &plan).unwrap(), 0.0);
}

// ===========================================================================
// 4. Travel benefit
// ===========================================================================

#[test]
fn travel_benefit_unlocked_on_24m() {
    let final_price = price(1_200.0, PlanId::Months24);
    assert_eq!(final_price, 2_400.0);
    assert!(travel_benefit_unlocked(final_price));
}

#[test]
fn travel_benefit_locked_on_six_months() {
    let final_price = calculate_plan_price(1_200.0, &six_month_plan()).unwrap();
    assert_eq!(final_price, 600.0);
    assert!(!travel_benefit_unlocked(final_price));
}

#[test_case(999.99 => false)]
#[test_case(1_000.0 => true)]
#[test_case(1_000.01 => true)]
fn travel_benefit_threshold(final_price: f64) -> bool {
    travel_benefit_unlocked(final_price)
}

// ===========================================================================
// 5. Fee split and config validation
// ===========================================================================

#[test]
fn fee_split_adds_back_to_total() {
    let (fee, net) = split_platform_fee(3_240.0, 5.0);
    assert_eq!(fee, 162.0);
    assert_eq!(net, 3_078.0);

    let (fee, net) = split_platform_fee(99.99, 7.5);
    assert_eq!(fee, 7.5);
    assert_eq!(round_to_cents(fee + net), 99.99);
}

#[test]
fn fee_split_zero_pct() {
    assert_eq!(split_platform_fee(500.0, 0.0), (0.0, 500.0));
}

#[test]
fn default_config_is_valid() {
    assert!(validate_config(&PricingConfig::default()).is_ok());
}

#[test]
fn config_rejects_fee_above_100() {
    let cfg = PricingConfig {
        platform_fee_pct: 100.5,
        ..PricingConfig::default()
    };
    assert_matches!(validate_config(&cfg), Err(PricingError::InvalidConfig { .. }));
}

#[test]
fn config_rejects_empty_treasury() {
    let cfg = PricingConfig {
        treasury_wallet: "  ".to_string(),
        ..PricingConfig::default()
    };
    assert_matches!(validate_config(&cfg), Err(PricingError::InvalidConfig { .. }));
}

#[test]
fn config_rejects_zero_ttl() {
    let cfg = PricingConfig {
        quote_ttl_secs: 0,
        ..PricingConfig::default()
    };
    assert!(validate_config(&cfg).is_err());
}
