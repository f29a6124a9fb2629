use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Waveform Generators
===================

All generators here are stateful sample sources: each call to `next` returns
the value at the current position and then advances by one sample. Rendering
a chunk is therefore just `frames` calls in a row, and two consecutive chunks
line up exactly with one chunk of twice the length. That property is what
keeps voices click-free across chunk boundaries.

Sine: phase accumulator in cycles, advanced by `frequency / sample_rate`
  per sample and wrapped into [0, 1).

Square: a hard-clipped sine. It owns a sine generator and keeps only the sign
  of its output, so it is not independently phase-tracked.

Sawtooth: closed form over elapsed time t, with period p = 1/f:
  2 * (t/p - floor(0.5 + t/p))

Triangle: folded sawtooth, shifted a quarter period so it starts at zero and
  rises like the sine does.

Values are returned unscaled in [-1, 1]; the owning node applies amplitude.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SineWave {
    phase: f64,
}

impl SineWave {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Current phase in cycles, always in `[0, 1)`.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    #[inline]
    pub fn next(&mut self, frequency: f64, sample_rate: f64) -> f64 {
        let value = (TAU * self.phase).sin();
        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();
        value
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SquareWave {
    sine: SineWave,
}

impl SquareWave {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.sine.reset();
    }

    #[inline]
    pub fn next(&mut self, frequency: f64, sample_rate: f64) -> f64 {
        let value = self.sine.next(frequency, sample_rate);
        if value > 0.0 {
            1.0
        } else if value < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}

/// Counts rendered samples so closed-form waveforms can derive elapsed time
/// exactly instead of accumulating floating-point seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleClock {
    elapsed: u64,
}

impl SampleClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Seconds at the current sample, then advance by one.
    #[inline]
    pub fn tick(&mut self, sample_rate: f64) -> f64 {
        let t = self.elapsed as f64 / sample_rate;
        self.elapsed += 1;
        t
    }

    pub fn advance(&mut self, samples: usize) {
        self.elapsed += samples as u64;
    }
}

#[inline]
pub fn sawtooth(t: f64, frequency: f64) -> f64 {
    let cycles = t * frequency;
    2.0 * (cycles - (0.5 + cycles).floor())
}

#[inline]
pub fn triangle(t: f64, frequency: f64) -> f64 {
    let cycles = t * frequency + 0.25;
    2.0 * (2.0 * (cycles - (0.5 + cycles).floor())).abs() - 1.0
}

#[derive(Debug, Clone, Copy)]
pub enum WaveGenerator {
    Sine(SineWave),
    Square(SquareWave),
    Sawtooth(SampleClock),
    Triangle(SampleClock),
}

impl WaveGenerator {
    pub fn new(waveform: Waveform) -> Self {
        match waveform {
            Waveform::Sine => Self::Sine(SineWave::new()),
            Waveform::Square => Self::Square(SquareWave::new()),
            Waveform::Sawtooth => Self::Sawtooth(SampleClock::new()),
            Waveform::Triangle => Self::Triangle(SampleClock::new()),
        }
    }

    pub fn waveform(&self) -> Waveform {
        match self {
            Self::Sine(_) => Waveform::Sine,
            Self::Square(_) => Waveform::Square,
            Self::Sawtooth(_) => Waveform::Sawtooth,
            Self::Triangle(_) => Waveform::Triangle,
        }
    }

    pub fn reset(&mut self) {
        match self {
            Self::Sine(sine) => sine.reset(),
            Self::Square(square) => square.reset(),
            Self::Sawtooth(clock) | Self::Triangle(clock) => clock.reset(),
        }
    }

    #[inline]
    pub fn next(&mut self, frequency: f64, sample_rate: f64) -> f64 {
        match self {
            Self::Sine(sine) => sine.next(frequency, sample_rate),
            Self::Square(square) => square.next(frequency, sample_rate),
            Self::Sawtooth(clock) => sawtooth(clock.tick(sample_rate), frequency),
            Self::Triangle(clock) => triangle(clock.tick(sample_rate), frequency),
        }
    }

    /// Advance over `samples` of silence. Time-based generators keep counting;
    /// phase accumulators hold still, as they would at zero frequency.
    pub fn skip(&mut self, samples: usize) {
        match self {
            Self::Sine(_) | Self::Square(_) => {}
            Self::Sawtooth(clock) | Self::Triangle(clock) => clock.advance(samples),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sine_advances_by_frequency_over_sample_rate() {
        let mut sine = SineWave::new();
        sine.next(440.0, 44_100.0);
        assert_abs_diff_eq!(sine.phase(), 440.0 / 44_100.0, epsilon = 1e-12);
    }

    #[test]
    fn sine_phase_wraps_into_unit_interval() {
        let mut sine = SineWave::new();
        for _ in 0..10_000 {
            sine.next(1_000.0, 48_000.0);
            assert!((0.0..1.0).contains(&sine.phase()));
        }
    }

    #[test]
    fn square_is_sign_of_sine() {
        let mut sine = SineWave::new();
        let mut square = SquareWave::new();
        for _ in 0..512 {
            let s = sine.next(330.0, 48_000.0);
            let q = square.next(330.0, 48_000.0);
            assert_eq!(q, if s > 0.0 { 1.0 } else if s < 0.0 { -1.0 } else { 0.0 });
        }
    }

    #[test]
    fn sawtooth_matches_closed_form() {
        // quarter period into a 1 Hz ramp
        assert_abs_diff_eq!(sawtooth(0.25, 1.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(sawtooth(0.0, 1.0), 0.0, epsilon = 1e-12);
        // just past the half period the ramp wraps to the bottom
        assert!(sawtooth(0.5001, 1.0) < -0.99);
    }

    #[test]
    fn triangle_starts_at_zero_and_peaks_at_quarter_period() {
        assert_abs_diff_eq!(triangle(0.0, 1.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(triangle(0.25, 1.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(triangle(0.5, 1.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(triangle(0.75, 1.0), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn skip_keeps_closed_form_generators_on_the_clock() {
        let mut skipped = WaveGenerator::new(Waveform::Sawtooth);
        skipped.skip(100);
        let mut stepped = WaveGenerator::new(Waveform::Sawtooth);
        for _ in 0..100 {
            stepped.next(220.0, 48_000.0);
        }
        assert_eq!(skipped.next(220.0, 48_000.0), stepped.next(220.0, 48_000.0));
    }
}
