use std::fmt;

use thiserror::Error;

use crate::graph::{filter::LowPassFilter, gain::Gain, mixer::Mixer, oscillator::Oscillator};

/// Identity and fixed configuration carried by every node.
///
/// `sample_rate` and `frames_per_chunk` never change after construction;
/// composite nodes copy them from their inputs so a whole tree agrees.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub name: String,
    pub control_tag: Option<String>,
    pub sample_rate: f32,
    pub frames_per_chunk: usize,
}

impl NodeInfo {
    pub fn new(name: impl Into<String>, sample_rate: f32, frames_per_chunk: usize) -> Self {
        Self {
            name: name.into(),
            control_tag: None,
            sample_rate,
            frames_per_chunk,
        }
    }

    /// Inherit rate and chunk size from an input node.
    pub fn derived(name: impl Into<String>, input: &NodeInfo) -> Self {
        Self::new(name, input.sample_rate, input.frames_per_chunk)
    }

    pub fn tag(&self) -> Option<&str> {
        self.control_tag.as_deref()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag() == Some(tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Oscillator,
    Gain,
    Mixer,
    LowPass,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Oscillator => "oscillator",
            NodeKind::Gain => "gain",
            NodeKind::Mixer => "mixer",
            NodeKind::LowPass => "low-pass filter",
        };
        f.write_str(name)
    }
}

/// A runtime parameter change addressed to a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Param {
    /// Oscillator frequency in Hz
    Frequency(f32),
    /// Linear amplitude factor in `[0.0, 1.0]`
    Amplitude(f32),
    /// Filter cutoff in Hz
    Cutoff(f32),
}

impl Param {
    pub fn name(&self) -> &'static str {
        match self {
            Param::Frequency(_) => "frequency",
            Param::Amplitude(_) => "amplitude",
            Param::Cutoff(_) => "cutoff",
        }
    }
}

/// Why a node refused a parameter change. The node keeps its previous value.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ParamError {
    #[error("{param} must be between {min} and {max}, got {value}")]
    OutOfRange {
        param: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{param} must be finite, got {value}")]
    NotFinite { param: &'static str, value: f32 },

    #[error("{kind} has no {param} parameter")]
    Unsupported { kind: NodeKind, param: &'static str },
}

/// Production protocol shared by every node kind.
///
/// `render_block` fills one chunk (at most `frames_per_chunk` samples) and
/// advances internal state so the next call continues the waveform. Nodes
/// with chunk-sized working buffers assert the length in debug builds and
/// leave anything past the chunk silent in release builds. `reset`
/// returns that state to its origin and must run before a new episode.
pub trait GraphNode: Send {
    fn info(&self) -> &NodeInfo;

    fn info_mut(&mut self) -> &mut NodeInfo;

    fn kind(&self) -> NodeKind;

    fn reset(&mut self);

    fn render_block(&mut self, out: &mut [f32]);

    /// Default: no runtime parameters.
    fn set_param(&mut self, param: Param) -> Result<(), ParamError> {
        Err(ParamError::Unsupported {
            kind: self.kind(),
            param: param.name(),
        })
    }

    /// Owned inputs, in pull order. Leaves have none.
    fn inputs(&self) -> &[SignalNode] {
        &[]
    }

    fn inputs_mut(&mut self) -> &mut [SignalNode] {
        &mut []
    }
}

/// The closed set of node kinds a chain can be built from.
#[derive(Debug, Clone)]
pub enum SignalNode {
    Oscillator(Oscillator),
    Gain(Gain),
    Mixer(Mixer),
    LowPass(LowPassFilter),
}

impl SignalNode {
    fn as_node(&self) -> &dyn GraphNode {
        match self {
            SignalNode::Oscillator(node) => node,
            SignalNode::Gain(node) => node,
            SignalNode::Mixer(node) => node,
            SignalNode::LowPass(node) => node,
        }
    }

    fn as_node_mut(&mut self) -> &mut dyn GraphNode {
        match self {
            SignalNode::Oscillator(node) => node,
            SignalNode::Gain(node) => node,
            SignalNode::Mixer(node) => node,
            SignalNode::LowPass(node) => node,
        }
    }

    /// Depth-first, pre-order walk over this node and everything it owns.
    pub fn visit<F: FnMut(&SignalNode)>(&self, f: &mut F) {
        f(self);
        for input in self.inputs() {
            input.visit(f);
        }
    }

    /// Mutable counterpart of [`SignalNode::visit`], same order.
    pub fn visit_mut<F: FnMut(&mut SignalNode)>(&mut self, f: &mut F) {
        f(self);
        for input in self.inputs_mut() {
            input.visit_mut(f);
        }
    }

    pub fn as_oscillator(&self) -> Option<&Oscillator> {
        match self {
            SignalNode::Oscillator(osc) => Some(osc),
            _ => None,
        }
    }

    pub fn as_gain(&self) -> Option<&Gain> {
        match self {
            SignalNode::Gain(gain) => Some(gain),
            _ => None,
        }
    }

    pub fn as_low_pass(&self) -> Option<&LowPassFilter> {
        match self {
            SignalNode::LowPass(filter) => Some(filter),
            _ => None,
        }
    }
}

impl GraphNode for SignalNode {
    fn info(&self) -> &NodeInfo {
        self.as_node().info()
    }

    fn info_mut(&mut self) -> &mut NodeInfo {
        self.as_node_mut().info_mut()
    }

    fn kind(&self) -> NodeKind {
        self.as_node().kind()
    }

    fn reset(&mut self) {
        self.as_node_mut().reset()
    }

    fn render_block(&mut self, out: &mut [f32]) {
        self.as_node_mut().render_block(out)
    }

    fn set_param(&mut self, param: Param) -> Result<(), ParamError> {
        self.as_node_mut().set_param(param)
    }

    fn inputs(&self) -> &[SignalNode] {
        self.as_node().inputs()
    }

    fn inputs_mut(&mut self) -> &mut [SignalNode] {
        self.as_node_mut().inputs_mut()
    }
}

impl From<Oscillator> for SignalNode {
    fn from(node: Oscillator) -> Self {
        SignalNode::Oscillator(node)
    }
}

impl From<Gain> for SignalNode {
    fn from(node: Gain) -> Self {
        SignalNode::Gain(node)
    }
}

impl From<Mixer> for SignalNode {
    fn from(node: Mixer) -> Self {
        SignalNode::Mixer(node)
    }
}

impl From<LowPassFilter> for SignalNode {
    fn from(node: LowPassFilter) -> Self {
        SignalNode::LowPass(node)
    }
}

/// Check a value against an inclusive range, rejecting NaN.
pub(crate) fn check_range(
    param: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<f32, ParamError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ParamError::OutOfRange {
            param,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::extensions::NodeExt;

    #[test]
    fn visit_is_depth_first_preorder() {
        let tree: SignalNode = Oscillator::sine(48_000.0, 64)
            .named("a")
            .gain()
            .named("g")
            .mix(Oscillator::square(48_000.0, 64).named("b"))
            .expect("matching rates")
            .named("m")
            .into();

        let mut names = Vec::new();
        tree.visit(&mut |node| names.push(node.info().name.clone()));

        assert_eq!(names, ["m", "g", "a", "b"]);
    }

    #[test]
    fn unsupported_param_names_the_node_kind() {
        let mut mixer: SignalNode = Oscillator::sine(48_000.0, 64)
            .mix(Oscillator::sine(48_000.0, 64))
            .expect("matching rates")
            .into();

        let err = mixer.set_param(Param::Cutoff(100.0)).unwrap_err();
        assert_eq!(
            err,
            ParamError::Unsupported {
                kind: NodeKind::Mixer,
                param: "cutoff"
            }
        );
    }

    #[test]
    fn check_range_rejects_nan() {
        assert!(check_range("amplitude", f32::NAN, 0.0, 1.0).is_err());
        assert_eq!(check_range("amplitude", 1.0, 0.0, 1.0), Ok(1.0));
    }
}
