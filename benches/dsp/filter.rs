//! Benchmarks for the FFT low-pass kernel.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polychain::dsp::filter::SpectralLowPass;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // white-ish input so no bin is trivially empty
        let input: Vec<f32> = (0..size).map(|i| ((i * 7919) % 113) as f32 / 56.5 - 1.0).collect();
        let mut buffer = input.clone();
        let mut kernel = SpectralLowPass::new(size);

        for cutoff in [500.0, 16_384.0] {
            group.bench_with_input(
                BenchmarkId::new(format!("lowpass_{cutoff}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        kernel.process(black_box(&mut buffer), cutoff, SAMPLE_RATE);
                    })
                },
            );
        }
    }

    group.finish();
}
