//! Benchmarks for frame sampling and the full conversion loop.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput};
use image::{Rgb, RgbImage};
use lumitone::{
    io::VecSource,
    sample::{RegionSize, SampleMode},
    ConvertConfig, Converter, StopSignal,
};

use crate::FRAME_SIZES;

/// Horizontal gradient so the region sees some variation
fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let v = (x * 255 / width) as u8;
        Rgb([v, (y * 255 / height) as u8, 255 - v])
    })
}

pub fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    for &(width, height) in FRAME_SIZES {
        let frame = gradient(width, height);
        let label = format!("{width}x{height}");

        for (mode, size) in [
            (SampleMode::Mono, RegionSize::Small),
            (SampleMode::All, RegionSize::Large),
        ] {
            let converter = Converter::new(ConvertConfig {
                mode,
                region_size: size,
                ..ConvertConfig::default()
            })
            .unwrap();

            group.throughput(Throughput::Elements(1));
            group.bench_with_input(
                BenchmarkId::new(format!("read_frame/{mode}/{size}"), &label),
                &frame,
                |b, frame| b.iter(|| converter.read_frame(black_box(frame))),
            );
        }

        // one second of footage through the whole loop
        let converter = Converter::new(ConvertConfig::default()).unwrap();
        let frames = vec![frame; 30];
        group.throughput(Throughput::Elements(frames.len() as u64));
        group.bench_with_input(BenchmarkId::new("run_one_second", &label), &frames, |b, frames| {
            b.iter(|| {
                let mut source = VecSource::new(frames.clone(), 30.0);
                converter
                    .run(&mut source, &StopSignal::new(), &mut ())
                    .unwrap()
            })
        });
    }

    group.finish();
}
