//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polychain::graph::{node::GraphNode, oscillator::Oscillator};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - f64 phase accumulator and sin()
        let mut osc = Oscillator::sine(SAMPLE_RATE, size).with_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| osc.render_block(black_box(&mut buffer)))
        });

        // Square - sine plus a sign per sample
        let mut osc = Oscillator::square(SAMPLE_RATE, size).with_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("square", size), &size, |b, _| {
            b.iter(|| osc.render_block(black_box(&mut buffer)))
        });

        // Sawtooth - closed form from the sample clock
        let mut osc = Oscillator::sawtooth(SAMPLE_RATE, size).with_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("sawtooth", size), &size, |b, _| {
            b.iter(|| osc.render_block(black_box(&mut buffer)))
        });

        let mut osc = Oscillator::triangle(SAMPLE_RATE, size).with_frequency(440.0);
        group.bench_with_input(BenchmarkId::new("triangle", size), &size, |b, _| {
            b.iter(|| osc.render_block(black_box(&mut buffer)))
        });
    }

    group.finish();
}
