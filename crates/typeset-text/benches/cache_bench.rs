//! Benchmarks comparing unbounded and LRU-bounded measurement caches.
//!
//! Run with: cargo bench -p typeset-text --bench cache_bench
//!
//! Workloads:
//! - **Zipfian**: Power-law access (80/20 rule). Hot strings accessed often.
//! - **Scan**: Sequential unique strings, simulating one-time layout of new text.
//! - **Mixed**: Hot working set + scan noise.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use typeset_text::{CachePolicy, Dimensions, MeasurementCache};

// ── Workload Generators ─────────────────────────────────────────────────

/// Strings following a Zipfian-like distribution (hot keys hit often).
fn zipfian_workload(size: usize) -> Vec<String> {
    (0..size)
        .map(|i| {
            if i % 5 == 0 {
                format!("cold_string_{i}")
            } else {
                format!("hot_key_{}", i % 20)
            }
        })
        .collect()
}

/// Sequential unique strings (worst case for LRU).
fn scan_workload(size: usize) -> Vec<String> {
    (0..size).map(|i| format!("scan_unique_{i}")).collect()
}

/// Hot working set + scan noise.
fn mixed_workload(size: usize) -> Vec<String> {
    (0..size)
        .map(|i| {
            if i % 3 == 0 {
                format!("noise_{i}")
            } else {
                format!("working_set_{}", i % 50)
            }
        })
        .collect()
}

/// Stand-in for a backend measurement.
fn measure(text: &str) -> Dimensions {
    Dimensions::new(text.len() as f64 * 7.5, 16.0)
}

const WORKLOADS: [(&str, fn(usize) -> Vec<String>); 3] = [
    ("zipfian", zipfian_workload),
    ("scan", scan_workload),
    ("mixed", mixed_workload),
];

// ── Benchmark Functions ─────────────────────────────────────────────────

fn bench_policy(c: &mut Criterion, group_name: &str, policy: fn(usize) -> CachePolicy) {
    let mut group = c.benchmark_group(group_name);

    for (name, workload_fn) in WORKLOADS {
        for &size in &[1_000, 10_000, 100_000] {
            let work = workload_fn(size);
            group.bench_with_input(BenchmarkId::new(name, size), &work, |b, work| {
                b.iter(|| {
                    let mut cache = MeasurementCache::<Dimensions>::with_policy(policy(size));
                    for s in work {
                        black_box(cache.get_or_compute(s, measure));
                    }
                    black_box(cache.stats())
                });
            });
        }
    }
    group.finish();
}

fn bench_unbounded(c: &mut Criterion) {
    bench_policy(c, "measurement_cache/unbounded", |_| CachePolicy::Unbounded);
}

fn bench_lru(c: &mut Criterion) {
    bench_policy(c, "measurement_cache/lru", |size| {
        CachePolicy::bounded(size / 10)
    });
}

/// Hit rate comparison (reports hit rates for analysis, timing is secondary).
fn bench_hit_rates(c: &mut Criterion) {
    let mut group = c.benchmark_group("measurement_cache/hit_rate_comparison");
    group.sample_size(10);

    for &size in &[1_000, 10_000] {
        for (name, workload_fn) in WORKLOADS {
            let work = workload_fn(size);
            group.bench_with_input(
                BenchmarkId::new(format!("all/{name}"), size),
                &work,
                |b, work| {
                    b.iter(|| {
                        let mut unbounded = MeasurementCache::<Dimensions>::new();
                        let mut lru =
                            MeasurementCache::<Dimensions>::with_policy(CachePolicy::bounded(
                                size / 10,
                            ));

                        for s in work {
                            unbounded.get_or_compute(s, measure);
                            lru.get_or_compute(s, measure);
                        }

                        black_box((unbounded.stats().hit_rate(), lru.stats().hit_rate()))
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_unbounded, bench_lru, bench_hit_rates);
criterion_main!(benches);
