use crate::{
    graph::{
        filter::LowPassFilter,
        gain::Gain,
        mixer::Mixer,
        node::{GraphNode, SignalNode},
    },
    Result,
};

/// Fluent helpers for building chains, e.g.
/// `Oscillator::sawtooth(sr, n).gain().tagged("gain_a")`.
pub trait NodeExt: GraphNode + Into<SignalNode> + Sized {
    fn named(mut self, name: impl Into<String>) -> Self {
        self.info_mut().name = name.into();
        self
    }

    fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.info_mut().control_tag = Some(tag.into());
        self
    }

    fn gain(self) -> Gain {
        Gain::new(self)
    }

    fn low_pass(self) -> LowPassFilter {
        LowPassFilter::new(self)
    }

    fn mix<M: Into<SignalNode>>(self, other: M) -> Result<Mixer> {
        Mixer::new(vec![self.into(), other.into()])
    }
}

impl<T: GraphNode + Into<SignalNode>> NodeExt for T {}
