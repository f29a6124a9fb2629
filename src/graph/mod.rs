//! Composable building blocks for constructing signal chains.
//!
//! Every node follows the same production protocol (`reset`, then repeated
//! `render_block` calls that each yield one chunk). Oscillators are the
//! leaves; gain, mixer and low-pass filter wrap the nodes they own. A
//! [`Chain`] owns a whole tree and finds nodes by control tag so the control
//! path can address the same parameter in every voice's copy.

/// Root-owning wrapper with tag lookup, plus the default patch.
pub mod chain;
/// Fluent combinators (`.gain()`, `.mix()`, `.low_pass()`, `.tagged()`).
pub mod extensions;
/// Frequency-domain low-pass node.
pub mod filter;
/// Scalar amplitude stage.
pub mod gain;
/// Summing mixer for one or more inputs.
pub mod mixer;
/// Core trait, node identity and typed parameters.
pub mod node;
/// Sine, square, sawtooth and triangle leaves.
pub mod oscillator;

pub use chain::{clone_chain, Chain};
pub use node::{GraphNode, NodeInfo, NodeKind, Param, ParamError, SignalNode};
