//! Property-based tests for compensation pools.
//!
//! Properties tested:
//! 1. Mass conservation: retired tons + pooled grams == lifetime grams
//! 2. The pool never holds a whole ton once a step settles
//! 3. One liquidation event per ton-crossing step, with gapless sequences
//! 4. Replaying already-applied requests changes nothing
//! 5. A rejected liquidation leaves the pool exactly as before

#[cfg(test)]
mod tests {
    use {
        proptest::prelude::*,
        std::sync::Arc,
        verdant_compensation::{
            registry::MockRegistry, CompensationAggregator, CompensationConfig,
            CompensationError, CompensationRequest, CompensationStatus, InMemoryPoolStore,
            RegistryError, GRAMS_PER_TON,
        },
    };

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
    }

    fn setup() -> (Arc<MockRegistry>, CompensationAggregator) {
        let registry = Arc::new(MockRegistry::new());
        let aggregator = CompensationAggregator::new(
            Arc::new(InMemoryPoolStore::new()),
            registry.clone(),
            CompensationConfig::dev_default(),
        )
        .unwrap();
        (registry, aggregator)
    }

    fn request(i: usize, grams: u64) -> CompensationRequest {
        CompensationRequest {
            request_id: format!("r{i}"),
            project_id: "p".to_string(),
            grams,
            buyer: "0xbuyer".to_string(),
        }
    }

    /// Mostly sub-ton amounts with the occasional multi-ton one.
    fn grams() -> impl Strategy<Value = u64> {
        prop_oneof![
            8 => 1u64..GRAMS_PER_TON,
            1 => GRAMS_PER_TON..5 * GRAMS_PER_TON,
        ]
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 1-3. Conservation and event accounting
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn mass_is_conserved(amounts in prop::collection::vec(grams(), 1..40)) {
            let rt = runtime();
            let (registry, aggregator) = setup();

            let mut crossings = 0u64;
            let mut previous_lifetime = 0u64;
            for (i, grams) in amounts.iter().enumerate() {
                let out = rt
                    .block_on(aggregator.record_compensation(&request(i, *grams)))
                    .unwrap();
                prop_assert!(out.pool_grams < GRAMS_PER_TON);
                prop_assert!(out.lifetime_grams >= previous_lifetime);
                previous_lifetime = out.lifetime_grams;
                if out.status == CompensationStatus::Liquidated {
                    crossings += 1;
                    prop_assert!(out.tons_liquidated >= 1);
                }
            }

            let pool = aggregator.pool("p").unwrap();
            let total: u64 = amounts.iter().sum();
            prop_assert_eq!(pool.lifetime_grams, total);
            prop_assert_eq!(pool.tons_liquidated, total / GRAMS_PER_TON);
            prop_assert_eq!(pool.pool_grams, total % GRAMS_PER_TON);
            prop_assert_eq!(registry.total_tons() * GRAMS_PER_TON + pool.pool_grams, total);

            let events = registry.events();
            prop_assert_eq!(events.len() as u64, crossings);
            for (expected, event) in (1u64..).zip(&events) {
                prop_assert_eq!(event.sequence, expected);
            }
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 4. Replays
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn replays_change_nothing(
            amounts in prop::collection::vec(grams(), 1..20),
            replay_picks in prop::collection::vec(any::<prop::sample::Index>(), 1..10),
        ) {
            let rt = runtime();
            let (registry, aggregator) = setup();
            for (i, grams) in amounts.iter().enumerate() {
                rt.block_on(aggregator.record_compensation(&request(i, *grams)))
                    .unwrap();
            }
            let settled = aggregator.pool("p").unwrap();
            let events = registry.events();

            for pick in replay_picks {
                let i = pick.index(amounts.len());
                let out = rt
                    .block_on(aggregator.record_compensation(&request(i, amounts[i])))
                    .unwrap();
                prop_assert_eq!(out.status, CompensationStatus::Duplicate);
            }

            prop_assert_eq!(aggregator.pool("p").unwrap(), settled);
            prop_assert_eq!(registry.events(), events);
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // 5. Rejected liquidations roll back
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn rejected_liquidation_leaves_balances(
            before in 0u64..GRAMS_PER_TON,
            crossing in GRAMS_PER_TON..3 * GRAMS_PER_TON,
        ) {
            let rt = runtime();
            let (registry, aggregator) = setup();
            if before > 0 {
                rt.block_on(aggregator.record_compensation(&request(0, before)))
                    .unwrap();
            }
            let snapshot = aggregator.pool("p").unwrap();

            registry.fail_next(RegistryError::Rejected("not verified".to_string()));
            let result = rt.block_on(aggregator.record_compensation(&request(1, crossing)));
            let rejected = matches!(result, Err(CompensationError::LiquidationFailed { .. }));
            prop_assert!(rejected);

            let pool = aggregator.pool("p").unwrap();
            prop_assert_eq!(pool.pool_grams, snapshot.pool_grams);
            prop_assert_eq!(pool.lifetime_grams, snapshot.lifetime_grams);
            prop_assert_eq!(pool.tons_liquidated, snapshot.tons_liquidated);
            prop_assert!(pool.pending.is_none());
            prop_assert!(registry.events().is_empty());
        }
    }
}
