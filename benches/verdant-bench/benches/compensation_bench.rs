//! Compensation benchmarks.
//!
//! Measures:
//! - The pure gram-to-ton step
//! - Sustained micro-compensation through the aggregator, with and
//!   without ton crossings

use {
    criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput},
    std::hint::black_box,
    verdant_bench::helpers::{make_aggregator, make_requests},
    verdant_compensation::pool::CompensationStep,
};

// ---------------------------------------------------------------------------
// Pool step
// ---------------------------------------------------------------------------

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("compensation/step");
    group.throughput(Throughput::Elements(1));

    group.bench_function("below_ton", |b| {
        b.iter(|| CompensationStep::compute(black_box(600_000), black_box(1_250)))
    });
    group.bench_function("crossing_ton", |b| {
        b.iter(|| CompensationStep::compute(black_box(999_000), black_box(1_250)))
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("compensation/record");
    group.sample_size(20);
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    // 1 250 g per purchase crosses a ton every 800 requests; 250 000 g every 4.
    for &(label, grams) in &[("small_purchases", 1_250u64), ("large_purchases", 250_000)] {
        let n = 1_000usize;
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new(label, n), &grams, |b, &grams| {
            b.iter(|| {
                let aggregator = make_aggregator();
                let requests = make_requests("bench", n, grams);
                rt.block_on(async {
                    for request in &requests {
                        let _ = aggregator.record_compensation(request).await;
                    }
                });
                aggregator.pool("bench").map(|pool| pool.tons_liquidated)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_step, bench_record);
criterion_main!(benches);
