pub mod dsp; // Allocation-free signal math
pub mod engine; // Control thread, dispatch, configuration
pub mod error;
pub mod graph; // Signal nodes and chains
pub mod io;
pub mod synth; // Voices, allocation and mixdown

pub use engine::{config::SynthConfig, Engine};
pub use error::{Error, Result};

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_FRAMES_PER_CHUNK: usize = 512;
pub const MAX_BLOCK_SIZE: usize = 8192;
