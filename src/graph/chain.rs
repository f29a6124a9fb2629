use std::fmt;

use crate::{
    graph::{
        extensions::NodeExt,
        node::{GraphNode, Param, ParamError, SignalNode},
        oscillator::Oscillator,
    },
    Result,
};

/// Tag of the gain stage after the sawtooth in [`Chain::default_patch`].
pub const GAIN_A_TAG: &str = "gain_a";
/// Tag of the gain stage after the square in [`Chain::default_patch`].
pub const GAIN_B_TAG: &str = "gain_b";
/// Tag of the output filter in [`Chain::default_patch`].
pub const LPF_TAG: &str = "lpf";

/// Owns one root node and, through it, the whole tree.
///
/// Tagged nodes are found by a depth-first, pre-order walk, so lookups are
/// deterministic and every clone of a chain answers in the same order.
#[derive(Debug, Clone)]
pub struct Chain {
    root: SignalNode,
}

impl Chain {
    pub fn new(root: impl Into<SignalNode>) -> Self {
        Self { root: root.into() }
    }

    /// The two-oscillator patch every voice plays by default:
    ///
    /// ```text
    /// LowPassFilter [lpf]
    ///   Mixer
    ///     Gain [gain_a] <- Sawtooth
    ///     Gain [gain_b] <- Square
    /// ```
    pub fn default_patch(sample_rate: f32, frames_per_chunk: usize) -> Result<Self> {
        let osc_a = Oscillator::sawtooth(sample_rate, frames_per_chunk);
        let osc_b = Oscillator::square(sample_rate, frames_per_chunk);

        let gain_a = osc_a.gain().tagged(GAIN_A_TAG);
        let gain_b = osc_b.gain().tagged(GAIN_B_TAG);

        let lpf = gain_a.mix(gain_b)?.low_pass().tagged(LPF_TAG);
        Ok(Self::new(lpf))
    }

    pub fn root(&self) -> &SignalNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SignalNode {
        &mut self.root
    }

    pub fn sample_rate(&self) -> f32 {
        self.root.info().sample_rate
    }

    pub fn frames_per_chunk(&self) -> usize {
        self.root.info().frames_per_chunk
    }

    /// Every node whose control tag equals `tag`, in depth-first order.
    pub fn find_by_tag(&self, tag: &str) -> Vec<&SignalNode> {
        fn collect<'a>(node: &'a SignalNode, tag: &str, found: &mut Vec<&'a SignalNode>) {
            if node.info().has_tag(tag) {
                found.push(node);
            }
            for input in node.inputs() {
                collect(input, tag, found);
            }
        }

        let mut found = Vec::new();
        collect(&self.root, tag, &mut found);
        found
    }

    /// Allocation-free counterpart of [`Chain::find_by_tag`] for the render
    /// thread.
    pub fn for_each_tagged_mut<F: FnMut(&mut SignalNode)>(&mut self, tag: &str, mut f: F) {
        self.root.visit_mut(&mut |node: &mut SignalNode| {
            if node.info().has_tag(tag) {
                f(node);
            }
        });
    }

    /// Apply `param` to every node tagged `tag`. Returns how many nodes took
    /// the change; the first refusal is reported after all were tried.
    pub fn set_tagged(&mut self, tag: &str, param: Param) -> std::result::Result<usize, ParamError> {
        let mut applied = 0;
        let mut refused = None;
        self.for_each_tagged_mut(tag, |node| match node.set_param(param) {
            Ok(()) => applied += 1,
            Err(err) => {
                refused.get_or_insert(err);
            }
        });
        match refused {
            Some(err) => Err(err),
            None => Ok(applied),
        }
    }

    /// Set the frequency of every oscillator in the chain.
    pub fn set_frequency(&mut self, hz: f32) {
        self.root.visit_mut(&mut |node: &mut SignalNode| {
            if let SignalNode::Oscillator(osc) = node {
                osc.set_frequency(hz);
            }
        });
    }

    pub fn reset(&mut self) {
        self.root.reset();
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        self.root.render_block(out);
    }
}

/// Deep-copy `prototype` into an independent chain with fresh production
/// state. The copy shares no mutable state with the prototype.
pub fn clone_chain(prototype: &Chain) -> Chain {
    let mut chain = prototype.clone();
    chain.reset();
    chain
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(f: &mut fmt::Formatter<'_>, node: &SignalNode, depth: usize) -> fmt::Result {
            let info = node.info();
            write!(f, "{:indent$}{}", "", info.name, indent = depth * 2)?;
            if let Some(tag) = info.tag() {
                write!(f, " [{tag}]")?;
            }
            writeln!(f)?;
            for input in node.inputs() {
                write_node(f, input, depth + 1)?;
            }
            Ok(())
        }

        write_node(f, &self.root, 0)
    }
}
