//! Pricing benchmarks.
//!
//! Measures:
//! - Tier classification throughput
//! - Plan price calculation per catalog plan
//! - Quote issuance over a batch of regions

use {
    chrono::Utc,
    criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput},
    std::hint::black_box,
    verdant_bench::helpers::make_regions,
    verdant_pricing::{calculator, tier, PlanId, PriceQuote, PricingConfig},
};

// ---------------------------------------------------------------------------
// Tier classification
// ---------------------------------------------------------------------------

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("pricing/classify");
    let regions = make_regions(1_000);

    group.throughput(Throughput::Elements(regions.len() as u64));
    group.bench_function("1k_regions", |b| {
        b.iter(|| {
            regions
                .iter()
                .map(|r| tier::classify(black_box(r.m2_price)).level() as u64)
                .sum::<u64>()
        })
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Plan price
// ---------------------------------------------------------------------------

fn bench_plan_price(c: &mut Criterion) {
    let mut group = c.benchmark_group("pricing/plan_price");
    group.throughput(Throughput::Elements(1));

    for id in PlanId::ALL {
        let plan = id.plan();
        group.bench_with_input(BenchmarkId::new("plan", id.as_str()), &plan, |b, plan| {
            b.iter(|| calculator::calculate_plan_price(black_box(1_200.0), plan))
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Quote issuance
// ---------------------------------------------------------------------------

fn bench_issue_quotes(c: &mut Criterion) {
    let mut group = c.benchmark_group("pricing/issue_quote");
    let config = PricingConfig::default();
    let plan = PlanId::Months36.plan();
    let now = Utc::now();

    for &n in &[100usize, 1_000] {
        let regions = make_regions(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("regions", n), &regions, |b, regions| {
            b.iter(|| {
                regions
                    .iter()
                    .filter_map(|r| PriceQuote::issue(&config, 1, r, &plan, now).ok())
                    .count()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_plan_price, bench_issue_quotes);
criterion_main!(benches);
