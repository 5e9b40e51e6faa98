//! Criterion benchmarks for tree building and proofs
//!
//! Run with: cargo bench -p telemetry-merkle

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use telemetry_merkle::{build, prove, verify, TelemetrySegment};

fn segments(n: usize) -> Vec<TelemetrySegment> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let start = base + Duration::seconds(30 * i as i64);
            TelemetrySegment::new(start, start + Duration::seconds(30), 0.4, Some(format!("raw/{i}"))).unwrap()
        })
        .collect()
}

fn build_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for n in [16usize, 1_024, 16_384] {
        let input = segments(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, input| {
            b.iter(|| build(black_box(input)).unwrap())
        });
    }
    group.finish();
}

fn proof_benchmark(c: &mut Criterion) {
    let tree = build(&segments(16_384)).unwrap();
    let index = 9_999;
    let leaf_hash = tree.leaf(index).unwrap().hash();
    let proof = prove(&tree, index).unwrap();
    let root = tree.root();

    c.bench_function("prove/16384", |b| b.iter(|| prove(&tree, black_box(index)).unwrap()));
    c.bench_function("verify/16384", |b| {
        b.iter(|| verify(black_box(&leaf_hash), &proof.siblings, &root))
    });
}

criterion_group!(benches, build_benchmark, proof_benchmark);
criterion_main!(benches);
