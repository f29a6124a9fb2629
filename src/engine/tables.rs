//! Precomputed controller-value lookups, built once on the control thread.

use crate::io::midi::MAX_CONTROL_VALUE;

const ENTRIES: usize = MAX_CONTROL_VALUE as usize + 1;

/// Lowest cutoff reachable from a controller: 2^4 Hz.
const MIN_CUTOFF_EXPONENT: f32 = 4.0;

/// Linear map from controller value to the `gain_b` level of a two-way
/// crossfade; `gain_a` takes the complement.
#[derive(Debug, Clone)]
pub struct MixTable {
    levels: [f32; ENTRIES],
}

impl MixTable {
    pub fn new() -> Self {
        let mut levels = [0.0; ENTRIES];
        for (i, level) in levels.iter_mut().enumerate() {
            *level = i as f32 / MAX_CONTROL_VALUE as f32;
        }
        Self { levels }
    }

    /// `(gain_a, gain_b)` for a controller value. Values past 127 saturate.
    pub fn crossfade(&self, value: u8) -> (f32, f32) {
        let b = self.levels[(value as usize).min(ENTRIES - 1)];
        (1.0 - b, b)
    }
}

impl Default for MixTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Logarithmic map from controller value to filter cutoff in Hz.
///
/// Spans 16 Hz up to the largest power of two at or below Nyquist, which
/// is 16384 Hz for both 44.1 and 48 kHz.
#[derive(Debug, Clone)]
pub struct CutoffTable {
    cutoffs: [f32; ENTRIES],
}

impl CutoffTable {
    pub fn new(sample_rate: f32) -> Self {
        let nyquist = (sample_rate / 2.0).max(2.0_f32.powf(MIN_CUTOFF_EXPONENT));
        let top = nyquist.log2().floor();
        let step = (top - MIN_CUTOFF_EXPONENT) / (ENTRIES - 1) as f32;

        let mut cutoffs = [0.0; ENTRIES];
        for (i, cutoff) in cutoffs.iter_mut().enumerate() {
            *cutoff = 2.0_f32.powf(MIN_CUTOFF_EXPONENT + step * i as f32);
        }
        Self { cutoffs }
    }

    pub fn get(&self, value: u8) -> f32 {
        self.cutoffs[(value as usize).min(ENTRIES - 1)]
    }

    pub fn max(&self) -> f32 {
        self.cutoffs[ENTRIES - 1]
    }

    pub fn min(&self) -> f32 {
        self.cutoffs[0]
    }
}
