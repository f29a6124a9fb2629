use tracing::warn;

use crate::{
    dsp::filter::SpectralLowPass,
    graph::node::{GraphNode, NodeInfo, NodeKind, Param, ParamError, SignalNode},
};

/*
Low-Pass Filter Node
====================

Passes frequencies BELOW the cutoff and removes everything above it. The
heavy lifting happens in `dsp::filter::SpectralLowPass`, which works on one
whole chunk at a time in the frequency domain.

Cutoff (Hz):
  - 16 Hz:      practically closed, only the lowest partials survive
  - 1000 Hz:    warm, muffled
  - Nyquist+:   fully open, the input passes unchanged

The cutoff has no upper bound. Any finite value is accepted and takes effect
on the next chunk.

Example usage:
  let dark = Oscillator::sawtooth(sr, frames).low_pass().with_cutoff(800.0);
*/

/// Cutoff a fresh filter starts at. High enough to leave audio untouched.
pub const DEFAULT_CUTOFF: f32 = 16_384.0;

#[derive(Debug, Clone)]
pub struct LowPassFilter {
    info: NodeInfo,
    cutoff: f32,
    kernel: SpectralLowPass,
    input: Box<SignalNode>,
}

impl LowPassFilter {
    pub fn new(input: impl Into<SignalNode>) -> Self {
        let input = input.into();
        let info = NodeInfo::derived("LowPassFilter", input.info());
        Self {
            kernel: SpectralLowPass::new(info.frames_per_chunk),
            info,
            cutoff: DEFAULT_CUTOFF,
            input: Box::new(input),
        }
    }

    pub fn with_cutoff(mut self, cutoff_hz: f32) -> Self {
        // invalid cutoffs are logged and ignored
        let _ = self.set_cutoff(cutoff_hz);
        self
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) -> Result<(), ParamError> {
        if !cutoff_hz.is_finite() {
            let err = ParamError::NotFinite {
                param: "cutoff",
                value: cutoff_hz,
            };
            warn!(node = %self.info.name, %err, "rejected filter cutoff");
            return Err(err);
        }
        self.cutoff = cutoff_hz;
        Ok(())
    }
}

impl GraphNode for LowPassFilter {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut NodeInfo {
        &mut self.info
    }

    fn kind(&self) -> NodeKind {
        NodeKind::LowPass
    }

    fn reset(&mut self) {
        self.kernel.reset();
        self.input.reset();
    }

    fn render_block(&mut self, out: &mut [f32]) {
        debug_assert!(
            out.len() <= self.info.frames_per_chunk,
            "buffer longer than frames_per_chunk"
        );
        self.input.render_block(out);
        self.kernel
            .process(out, self.cutoff, self.info.sample_rate);
    }

    fn set_param(&mut self, param: Param) -> Result<(), ParamError> {
        match param {
            Param::Cutoff(hz) => self.set_cutoff(hz),
            _ => Err(ParamError::Unsupported {
                kind: NodeKind::LowPass,
                param: param.name(),
            }),
        }
    }

    fn inputs(&self) -> &[SignalNode] {
        std::slice::from_ref(&*self.input)
    }

    fn inputs_mut(&mut self) -> &mut [SignalNode] {
        std::slice::from_mut(&mut *self.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{extensions::NodeExt, oscillator::Oscillator};

    fn peak(buffer: &[f32]) -> f32 {
        buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn open_filter_passes_signal() {
        let mut filter = Oscillator::sine(48_000.0, 256)
            .with_frequency(375.0)
            .low_pass();

        let mut buffer = vec![0.0f32; 256];
        filter.render_block(&mut buffer);

        assert!(peak(&buffer) > 0.99);
    }

    #[test]
    fn lowering_cutoff_attenuates_tone() {
        // 3 kHz sits exactly on bin 16 of a 256-point frame at 48 kHz
        let mut filter = Oscillator::sine(48_000.0, 256)
            .with_frequency(3_000.0)
            .low_pass();

        let mut open = vec![0.0f32; 256];
        filter.render_block(&mut open);
        filter.set_cutoff(1_000.0).unwrap();
        let mut closed = vec![0.0f32; 256];
        filter.render_block(&mut closed);

        assert!(peak(&open) > 0.99);
        assert!(peak(&closed) < 1e-3, "got {}", peak(&closed));
    }

    #[test]
    fn rejects_non_finite_cutoff() {
        let mut filter = Oscillator::sine(48_000.0, 256).low_pass().with_cutoff(500.0);

        assert!(filter.set_param(Param::Cutoff(f32::INFINITY)).is_err());
        assert!(filter.set_param(Param::Cutoff(f32::NAN)).is_err());
        assert_eq!(filter.cutoff(), 500.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "frames_per_chunk")]
    fn rejects_buffers_longer_than_a_chunk() {
        let mut filter = Oscillator::sine(48_000.0, 64).with_frequency(440.0).low_pass();
        filter.render_block(&mut [0.0f32; 128]);
    }

    #[test]
    fn gain_is_not_a_filter_param() {
        let mut filter = Oscillator::sine(48_000.0, 256).low_pass();
        assert!(filter.set_param(Param::Amplitude(0.5)).is_err());
    }
}
