//! Real-world scenario benchmarks.
//!
//! These render the default patch as the binary plays it, alone and as a
//! full pool of sounding voices.

mod voices;

pub use voices::bench_voices;
