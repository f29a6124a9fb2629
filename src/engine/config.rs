#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Result, DEFAULT_FRAMES_PER_CHUNK, DEFAULT_SAMPLE_RATE, MAX_BLOCK_SIZE};

/// Which controller numbers drive the two built-in effects.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerMap {
    /// Crossfade between the `gain_a` and `gain_b` stages (mod wheel).
    pub oscillator_mix: u8,
    /// Cutoff of every `lpf` stage (brightness).
    pub lpf_cutoff: u8,
}

impl Default for ControllerMap {
    fn default() -> Self {
        Self {
            oscillator_mix: 1,
            lpf_cutoff: 74,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthConfig {
    pub sample_rate: u32,
    pub frames_per_chunk: usize,
    /// Polyphony limit; fixed for the life of the engine.
    pub num_voices: usize,
    /// Slots in the control-to-audio message ring.
    pub message_capacity: usize,
    pub controllers: ControllerMap,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            frames_per_chunk: DEFAULT_FRAMES_PER_CHUNK,
            num_voices: 4,
            message_capacity: 256,
            controllers: ControllerMap::default(),
        }
    }
}

impl SynthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidConfig("sample rate must be positive".into()));
        }
        if self.frames_per_chunk == 0 || self.frames_per_chunk > MAX_BLOCK_SIZE {
            return Err(Error::InvalidConfig(format!(
                "frames per chunk must be between 1 and {MAX_BLOCK_SIZE}, got {}",
                self.frames_per_chunk
            )));
        }
        if self.num_voices == 0 {
            return Err(Error::InvalidConfig("at least one voice is required".into()));
        }
        if self.message_capacity == 0 {
            return Err(Error::InvalidConfig("message capacity must be positive".into()));
        }
        if self.controllers.oscillator_mix == self.controllers.lpf_cutoff {
            return Err(Error::InvalidConfig(format!(
                "controller {} is mapped twice",
                self.controllers.lpf_cutoff
            )));
        }
        Ok(())
    }

    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate as f32
    }
}
