//! Benchmarks for the quantization table.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};
use lumitone::quantize::{Octaves, QuantizationTable};
use strum::VariantArray;

pub fn bench_quantize(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize");
    group.throughput(Throughput::Elements(256));

    for &octaves in Octaves::VARIANTS {
        group.bench_with_input(
            BenchmarkId::new("build", octaves.count()),
            &octaves,
            |b, &octaves| b.iter(|| QuantizationTable::new(black_box(octaves))),
        );

        let table = QuantizationTable::new(octaves);
        group.bench_with_input(
            BenchmarkId::new("note_for_all_values", octaves.count()),
            &table,
            |b, table| {
                b.iter(|| {
                    (0..=u8::MAX)
                        .map(|v| table.note_for(black_box(v)) as u32)
                        .sum::<u32>()
                })
            },
        );
    }

    group.finish();
}
