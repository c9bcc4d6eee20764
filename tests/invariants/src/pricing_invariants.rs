//! Property-based tests for tiers and plan pricing.
//!
//! Properties tested:
//! 1. Every price lands in exactly one tier, and tiers never improve as the
//!    price drops
//! 2. A benefit visible to a tier is visible to every more exclusive tier
//! 3. Plan prices are non-negative and monotonic in the base price
//! 4. The perpetual price is five times the 60-month price
//! 5. Platform fee and net amount always add back up to the charge
//! 6. The travel benefit is unlocked exactly at the threshold

#[cfg(test)]
mod tests {
    use {
        proptest::prelude::*,
        verdant_pricing::{
            calculator::{
                calculate_plan_price, split_platform_fee, travel_benefit_unlocked,
                TRAVEL_BENEFIT_THRESHOLD,
            },
            tier::{self, Benefit, Tier},
            AdoptionPlan, PlanDuration, PlanId,
        },
    };

    fn plan_id() -> impl Strategy<Value = PlanId> {
        prop::sample::select(PlanId::ALL.to_vec())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1. Tier partition
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn every_price_has_exactly_one_tier(price in prop::num::f64::ANY) {
            let tier = tier::classify(price);
            let matching = Tier::ALL.iter().filter(|t| **t == tier).count();
            prop_assert_eq!(matching, 1);
            prop_assert_eq!(Tier::from_level(tier.level()), Some(tier));
        }

        #[test]
        fn cheaper_never_means_better_tier(a in 0.0..1_000.0f64, b in 0.0..1_000.0f64) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                tier::classify(low).level() >= tier::classify(high).level(),
                "{} -> {}, {} -> {}",
                low, tier::classify(low), high, tier::classify(high)
            );
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 2. Benefit visibility is inherited upward
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #[test]
        fn visibility_is_monotonic(required in 1u8..=4, holder in 1u8..=4) {
            let benefit = Benefit {
                id: "b".to_string(),
                title: "Benefit".to_string(),
                tier_level: required,
            };
            let holder = Tier::from_level(holder).unwrap();
            if benefit.is_visible_to(holder) {
                for better in Tier::ALL.iter().filter(|t| t.level() < holder.level()) {
                    prop_assert!(benefit.is_visible_to(*better));
                }
            }
            prop_assert!(benefit.is_visible_to(Tier::Diamond));
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 3-4. Plan prices
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn plan_price_is_non_negative(base in 0.0..100_000.0f64, id in plan_id()) {
            let price = calculate_plan_price(base, &id.plan()).unwrap();
            prop_assert!(price >= 0.0 && price.is_finite());
        }

        #[test]
        fn plan_price_grows_with_base(
            a in 0.0..100_000.0f64,
            b in 0.0..100_000.0f64,
            id in plan_id(),
        ) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let plan = id.plan();
            prop_assert!(
                calculate_plan_price(low, &plan).unwrap()
                    <= calculate_plan_price(high, &plan).unwrap()
            );
        }

        #[test]
        fn custom_plan_discount_never_raises_price(
            base in 0.0..100_000.0f64,
            months in 0u32..=120,
            discount in 0.0..=100.0f64,
        ) {
            let full = calculate_plan_price(
                base,
                &AdoptionPlan::custom("full", PlanDuration::Months(months), 0.0),
            )
            .unwrap();
            let discounted = calculate_plan_price(
                base,
                &AdoptionPlan::custom("disc", PlanDuration::Months(months), discount),
            )
            .unwrap();
            prop_assert!(discounted <= full);
        }

        #[test]
        fn perpetual_is_five_times_sixty_months(base in 0.0..100_000.0f64) {
            let five_year = calculate_plan_price(base, &PlanId::Months60.plan()).unwrap();
            let perpetual = calculate_plan_price(base, &PlanId::Perpetual.plan()).unwrap();
            // Each side is rounded to cents on its own.
            prop_assert!(
                (perpetual - five_year * 5.0).abs() <= 0.05,
                "perpetual {} vs 5 x {}", perpetual, five_year
            );
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 5-6. Fee split and travel threshold
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn fee_split_adds_up(base in 0.0..100_000.0f64, id in plan_id(), pct in 0.0..=100.0f64) {
            let price = calculate_plan_price(base, &id.plan()).unwrap();
            let (fee, net) = split_platform_fee(price, pct);
            prop_assert!(fee >= 0.0 && net >= -1e-9);
            prop_assert!(fee <= price + 1e-9);
            prop_assert!(
                (fee + net - price).abs() < 1e-6,
                "{} + {} != {}", fee, net, price
            );
        }

        #[test]
        fn travel_benefit_matches_threshold(price in 0.0..5_000.0f64) {
            prop_assert_eq!(travel_benefit_unlocked(price), price >= TRAVEL_BENEFIT_THRESHOLD);
        }
    }
}
