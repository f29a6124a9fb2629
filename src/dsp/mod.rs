//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components carry no node identity and never allocate after
//! construction, so graph nodes can embed them directly and call them from
//! the render thread.

/// FFT-based brick-wall low-pass kernel.
pub mod filter;
/// Oscillator waveforms and their sample clocks.
pub mod oscillator;

pub use oscillator::Waveform;
