//! Shared helpers for Verdant benchmarks.

use {
    rand::Rng,
    std::sync::Arc,
    verdant_compensation::{
        registry::MockRegistry, CompensationAggregator, CompensationConfig,
        CompensationRequest, InMemoryPoolStore,
    },
    verdant_pricing::Region,
};

/// `n` regions with yearly prices spread across every tier.
pub fn make_regions(n: usize) -> Vec<Region> {
    let mut rng = rand::rng();
    (0..n)
        .map(|i| Region {
            id: format!("region-{i}"),
            name: format!("Region {i}"),
            country: "BR".to_string(),
            biome_key: "amazon".to_string(),
            m2_price: rng.random_range(50.0..1_500.0),
        })
        .collect()
}

/// Aggregator over an in-memory store and an always-accepting registry.
pub fn make_aggregator() -> CompensationAggregator {
    let aggregator = CompensationAggregator::new(
        Arc::new(InMemoryPoolStore::new()),
        Arc::new(MockRegistry::new()),
        CompensationConfig::dev_default(),
    );
    match aggregator {
        Ok(aggregator) => aggregator,
        Err(err) => panic!("dev config rejected: {err}"),
    }
}

/// `n` requests of `grams` each for `project_id`, with distinct ids.
pub fn make_requests(project_id: &str, n: usize, grams: u64) -> Vec<CompensationRequest> {
    (0..n)
        .map(|i| CompensationRequest {
            request_id: format!("{project_id}-{i}"),
            project_id: project_id.to_string(),
            grams,
            buyer: "0xbench".to_string(),
        })
        .collect()
}
