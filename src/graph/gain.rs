use tracing::warn;

use crate::graph::node::{
    check_range, GraphNode, NodeInfo, NodeKind, Param, ParamError, SignalNode,
};

/// Amplitude every new gain node starts at.
pub const DEFAULT_GAIN: f32 = 0.1;

/// Scales its single input by a factor in `[0.0, 1.0]`.
///
/// Out-of-range factors are refused rather than clamped; the previous
/// factor stays in effect.
#[derive(Debug, Clone)]
pub struct Gain {
    info: NodeInfo,
    amplitude: f32,
    input: Box<SignalNode>,
}

impl Gain {
    pub fn new(input: impl Into<SignalNode>) -> Self {
        let input = input.into();
        Self {
            info: NodeInfo::derived("Gain", input.info()),
            amplitude: DEFAULT_GAIN,
            input: Box::new(input),
        }
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn set_amplitude(&mut self, amplitude: f32) -> Result<(), ParamError> {
        match check_range("gain", amplitude, 0.0, 1.0) {
            Ok(value) => {
                self.amplitude = value;
                Ok(())
            }
            Err(err) => {
                warn!(node = %self.info.name, %err, "gain must be between 0.0 and 1.0");
                Err(err)
            }
        }
    }

    pub fn input(&self) -> &SignalNode {
        &self.input
    }
}

impl GraphNode for Gain {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut NodeInfo {
        &mut self.info
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Gain
    }

    fn reset(&mut self) {
        self.input.reset();
    }

    fn render_block(&mut self, out: &mut [f32]) {
        self.input.render_block(out);
        for sample in out.iter_mut() {
            *sample *= self.amplitude;
        }
    }

    fn set_param(&mut self, param: Param) -> Result<(), ParamError> {
        match param {
            Param::Amplitude(amplitude) => self.set_amplitude(amplitude),
            _ => Err(ParamError::Unsupported {
                kind: NodeKind::Gain,
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
