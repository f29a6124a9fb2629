use tracing::warn;

use crate::{
    dsp::oscillator::{WaveGenerator, Waveform},
    graph::node::{check_range, GraphNode, NodeInfo, NodeKind, Param, ParamError},
};

/*
Oscillator Node
===============

The leaf of every chain. An oscillator owns a waveform generator plus the two
parameters the control path can change: frequency (Hz) and amplitude.

Frequency 0 is the idle state and renders silence. Voices hold their
oscillators at 0 while inactive, so a pulled idle voice contributes nothing.
A negative frequency is treated as a mistake: it is logged and coerced to 0.

Output is deterministic: the same frequency, amplitude, starting phase,
sample rate and chunk size always produce the same samples.

Example usage:
  let mut osc = Oscillator::sawtooth(44_100.0, 512);
  osc.set_frequency(220.0);
*/

#[derive(Debug, Clone)]
pub struct Oscillator {
    info: NodeInfo,
    generator: WaveGenerator,
    frequency: f32,
    amplitude: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, sample_rate: f32, frames_per_chunk: usize) -> Self {
        let name = match waveform {
            Waveform::Sine => "SineOscillator",
            Waveform::Square => "SquareOscillator",
            Waveform::Sawtooth => "SawtoothOscillator",
            Waveform::Triangle => "TriangleOscillator",
        };

        Self {
            info: NodeInfo::new(name, sample_rate, frames_per_chunk),
            generator: WaveGenerator::new(waveform),
            frequency: 0.0,
            amplitude: 1.0,
        }
    }

    pub fn sine(sample_rate: f32, frames_per_chunk: usize) -> Self {
        Self::new(Waveform::Sine, sample_rate, frames_per_chunk)
    }

    pub fn square(sample_rate: f32, frames_per_chunk: usize) -> Self {
        Self::new(Waveform::Square, sample_rate, frames_per_chunk)
    }

    pub fn sawtooth(sample_rate: f32, frames_per_chunk: usize) -> Self {
        Self::new(Waveform::Sawtooth, sample_rate, frames_per_chunk)
    }

    pub fn triangle(sample_rate: f32, frames_per_chunk: usize) -> Self {
        Self::new(Waveform::Triangle, sample_rate, frames_per_chunk)
    }

    /// Builder form of [`Oscillator::set_frequency`].
    pub fn with_frequency(mut self, hz: f32) -> Self {
        self.set_frequency(hz);
        self
    }

    pub fn waveform(&self) -> Waveform {
        self.generator.waveform()
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Negative and non-finite frequencies are replaced with 0 (silence).
    pub fn set_frequency(&mut self, hz: f32) {
        if !hz.is_finite() || hz < 0.0 {
            warn!(node = %self.info.name, frequency = hz, "overriding invalid frequency to 0");
            self.frequency = 0.0;
        } else {
            self.frequency = hz;
        }
    }

    pub fn set_amplitude(&mut self, amplitude: f32) -> Result<(), ParamError> {
        match check_range("amplitude", amplitude, 0.0, 1.0) {
            Ok(value) => {
                self.amplitude = value;
                Ok(())
            }
            Err(err) => {
                warn!(node = %self.info.name, %err, "rejected oscillator amplitude");
                Err(err)
            }
        }
    }
}

impl GraphNode for Oscillator {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut NodeInfo {
        &mut self.info
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Oscillator
    }

    fn reset(&mut self) {
        self.generator.reset();
    }

    fn render_block(&mut self, out: &mut [f32]) {
        if self.frequency <= 0.0 {
            out.fill(0.0);
            self.generator.skip(out.len());
            return;
        }

        let frequency = self.frequency as f64;
        let sample_rate = self.info.sample_rate as f64;
        let amplitude = self.amplitude as f64;
        for sample in out.iter_mut() {
            *sample = (amplitude * self.generator.next(frequency, sample_rate)) as f32;
        }
    }

    fn set_param(&mut self, param: Param) -> Result<(), ParamError> {
        match param {
            Param::Frequency(hz) => {
                self.set_frequency(hz);
                Ok(())
            }
            Param::Amplitude(amplitude) => self.set_amplitude(amplitude),
            Param::Cutoff(_) => Err(ParamError::Unsupported {
                kind: NodeKind::Oscillator,
                param: param.name(),
            }),
        }
    }
}
