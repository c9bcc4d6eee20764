//! Verdant Benchmark Suite
//!
//! Run all benchmarks:
//! ```bash
//! cargo bench -p verdant-bench
//! ```
//!
//! Run a specific benchmark group:
//! ```bash
//! cargo bench -p verdant-bench --bench pricing_bench
//! cargo bench -p verdant-bench --bench compensation_bench
//! ```

pub mod helpers;
