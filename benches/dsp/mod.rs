//! Benchmarks for low-level signal primitives.

mod filter;
mod oscillator;

pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
