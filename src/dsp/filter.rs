use std::{fmt, sync::Arc};

use rustfft::{
    num_complex::Complex,
    num_traits::Zero,
    Fft, FftPlanner,
};

/*
Spectral Low-Pass
=================

Each chunk is taken to the frequency domain, every bin above the cutoff is
zeroed, and the chunk is transformed back:

  bin k  ->  k * sample_rate / len   (Hz), mirrored for k > len / 2

The cutoff is read fresh on every call and nothing is carried between
chunks, so changing it never leaves stale history behind. The plans are
immutable and may be shared between clones; the working buffers are not.
*/

#[derive(Clone)]
pub struct SpectralLowPass {
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl SpectralLowPass {
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(len);
        let inverse = planner.plan_fft_inverse(len);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Self {
            forward,
            inverse,
            spectrum: vec![Complex::zero(); len],
            scratch: vec![Complex::zero(); scratch_len],
        }
    }

    pub fn len(&self) -> usize {
        self.spectrum.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spectrum.is_empty()
    }

    /// Highest bin index that still passes at `cutoff_hz`.
    #[inline]
    pub fn cutoff_bin(&self, cutoff_hz: f32, sample_rate: f32) -> usize {
        // negative and NaN cutoffs saturate to 0 (DC only)
        (cutoff_hz as f64 * self.len() as f64 / sample_rate as f64).floor() as usize
    }

    /// Filter `buffer` in place. Shorter buffers are zero-padded to the
    /// planned length. Longer ones are a caller bug: debug builds panic,
    /// release builds filter the first `len` samples and zero the rest.
    pub fn process(&mut self, buffer: &mut [f32], cutoff_hz: f32, sample_rate: f32) {
        let len = self.len();
        debug_assert!(buffer.len() <= len, "buffer longer than the planned length");
        let frames = buffer.len().min(len);
        buffer[frames..].fill(0.0);
        if len == 0 {
            return;
        }

        for (bin, &sample) in self.spectrum.iter_mut().zip(&buffer[..frames]) {
            *bin = Complex::new(sample, 0.0);
        }
        self.spectrum[frames..].fill(Complex::zero());

        self.forward
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);

        let keep = self.cutoff_bin(cutoff_hz, sample_rate);
        for (k, bin) in self.spectrum.iter_mut().enumerate() {
            if k.min(len - k) > keep {
                *bin = Complex::zero();
            }
        }

        self.inverse
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);

        let scale = 1.0 / len as f32;
        for (sample, bin) in buffer[..frames].iter_mut().zip(&self.spectrum) {
            *sample = bin.re * scale;
        }
    }

    pub fn reset(&mut self) {
        self.spectrum.fill(Complex::zero());
    }
}

impl fmt::Debug for SpectralLowPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralLowPass")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::SineWave;

    fn sine_block(frequency: f64, sample_rate: f64, len: usize) -> Vec<f32> {
        let mut sine = SineWave::new();
        (0..len)
            .map(|_| sine.next(frequency, sample_rate) as f32)
            .collect()
    }

    fn peak(buffer: &[f32]) -> f32 {
        buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn passes_everything_below_nyquist_cutoff() {
        let sample_rate = 48_000.0;
        let mut filter = SpectralLowPass::new(256);
        let original = sine_block(750.0, sample_rate as f64, 256);
        let mut buffer = original.clone();

        filter.process(&mut buffer, sample_rate / 2.0, sample_rate);

        for (a, b) in original.iter().zip(&buffer) {
            assert!((a - b).abs() < 1e-4, "expected {a}, got {b}");
        }
    }

    #[test]
    fn removes_bin_aligned_tone_above_cutoff() {
        // 256 frames at 48 kHz: bins are 187.5 Hz apart, 3000 Hz is bin 16
        let sample_rate = 48_000.0;
        let mut filter = SpectralLowPass::new(256);
        let mut buffer = sine_block(3_000.0, sample_rate as f64, 256);

        filter.process(&mut buffer, 1_000.0, sample_rate);

        assert!(peak(&buffer) < 1e-3, "got peak {}", peak(&buffer));
    }

    #[test]
    fn keeps_bin_aligned_tone_below_cutoff() {
        let sample_rate = 48_000.0;
        let mut filter = SpectralLowPass::new(256);
        let mut buffer = sine_block(375.0, sample_rate as f64, 256);

        filter.process(&mut buffer, 1_000.0, sample_rate);

        assert!(peak(&buffer) > 0.99, "got peak {}", peak(&buffer));
    }

    #[test]
    fn cutoff_bin_saturates_for_negative_cutoff() {
        let filter = SpectralLowPass::new(512);
        assert_eq!(filter.cutoff_bin(-100.0, 44_100.0), 0);
        assert_eq!(filter.cutoff_bin(44_100.0, 44_100.0), 512);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "planned length")]
    fn rejects_buffers_longer_than_the_plan() {
        let mut filter = SpectralLowPass::new(64);
        filter.process(&mut [0.5f32; 128], 1_000.0, 48_000.0);
    }

    #[test]
    fn clones_do_not_share_working_buffers() {
        let sample_rate = 48_000.0;
        let mut a = SpectralLowPass::new(128);
        let mut b = a.clone();
        let mut loud = vec![1.0f32; 128];
        let mut quiet = vec![0.0f32; 128];

        a.process(&mut loud, 500.0, sample_rate);
        b.process(&mut quiet, 500.0, sample_rate);

        assert!(quiet.iter().all(|&s| s == 0.0));
    }
}
