//! Benchmarks for the debouncer.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};
use lumitone::{
    detect::{DebounceConfig, Debouncer, Gate, NoteSample},
    sequencing::Tempo,
};
use strum::VariantArray;

/// One hour of 30fps footage
const SAMPLES: usize = 30 * 60 * 60;

/// Notes that hold for a while and occasionally flicker
fn samples() -> Vec<NoteSample> {
    let mut state = 0x2545_f491_u32;
    (0..SAMPLES)
        .map(|i| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let base = 59 + ((i / 45) % 12) as u8;
            let note = if state >> 28 == 0 { base + 1 } else { base };
            NoteSample {
                timestamp: i as f64 / 30.0,
                note,
                velocity: 110,
            }
        })
        .collect()
}

pub fn bench_debounce(c: &mut Criterion) {
    let mut group = c.benchmark_group("debounce");
    group.throughput(Throughput::Elements(SAMPLES as u64));
    let samples = samples();

    for &gate in Gate::VARIANTS {
        let config = DebounceConfig {
            gate,
            ..DebounceConfig::default()
        };
        group.bench_with_input(BenchmarkId::new("hour_at_30fps", gate), &config, |b, &config| {
            b.iter(|| {
                let mut debouncer = Debouncer::new(config, Tempo::default()).unwrap();
                let mut events = 0usize;
                for &sample in &samples {
                    events += debouncer.process(black_box(sample)).is_some() as usize;
                }
                events + debouncer.finish(SAMPLES as f64 / 30.0).is_some() as usize
            })
        });
    }

    group.finish();
}
