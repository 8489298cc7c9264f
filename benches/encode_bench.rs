//! Criterion benchmark untuk gcda encoder dan reset
//!
//! Run dengan: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gcda_writer::model::{CounterGroup, CounterKind, CoverageUnit, FunctionRecord};
use gcda_writer::protocol::GcdaEncoder;
use gcda_writer::{encode, encoded_len, reset};

fn unit_with(functions: u32, counters: usize) -> CoverageUnit {
    CoverageUnit::builder("bench.gcda")
        .version(0x4233_332a)
        .stamp(1)
        .checksum(2)
        .counter_kind(CounterKind::Arcs)
        .functions((0..functions).map(|i| {
            let values = (0..counters as u64).map(|v| v * 1_000_003 + i as u64);
            FunctionRecord::new(i, i, !i, vec![CounterGroup::from_values(values.collect())])
        }))
        .build()
        .expect("valid bench unit")
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for functions in [16u32, 256, 4096].iter() {
        let unit = unit_with(*functions, 8);
        let size = encoded_len(&unit);
        group.throughput(Throughput::Bytes(size as u64));

        // Size-only pass
        let id = BenchmarkId::new("size_only", functions);
        group.bench_with_input(id, &unit, |b, unit| {
            b.iter(|| encode(black_box(unit), None).unwrap());
        });

        // Full encode ke pre-allocated buffer
        let id = BenchmarkId::new("fill", functions);
        group.bench_with_input(id, &unit, |b, unit| {
            let mut buffer = vec![0u32; size / 4];
            b.iter(|| encode(black_box(unit), Some(&mut buffer[..])).unwrap());
        });

        let id = BenchmarkId::new("encoder_reuse", functions);
        group.bench_with_input(id, &unit, |b, unit| {
            let mut encoder = GcdaEncoder::for_unit(unit);
            b.iter(|| {
                black_box(encoder.encode(black_box(unit)).unwrap().len());
            });
        });
    }

    group.finish();
}

fn bench_reset(c: &mut Criterion) {
    let mut group = c.benchmark_group("reset");

    for functions in [16u32, 256, 4096].iter() {
        let mut unit = unit_with(*functions, 8);
        group.throughput(Throughput::Elements(unit.counter_count() as u64));
        group.bench_function(format!("functions_{}", functions), |b| {
            b.iter(|| reset(black_box(&mut unit)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_reset);
criterion_main!(benches);
