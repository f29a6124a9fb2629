use crate::{
    graph::node::{GraphNode, NodeInfo, NodeKind, SignalNode},
    Error, Result,
};

/*
Summing Mixer
=============

Pulls every input once per chunk, in the order they were given, and adds the
chunks sample by sample. Nothing is normalized here: two full-scale inputs
can sum to 2.0. Keeping the sum in range is the job of whoever sits at the
end of the line (the polyphonic mixdown clamps its output).

The scratch buffer is sized once at construction so rendering never
allocates.

Example usage:
  let layered = Mixer::new(vec![saw.gain().into(), square.gain().into()])?;
*/

#[derive(Debug, Clone)]
pub struct Mixer {
    info: NodeInfo,
    inputs: Vec<SignalNode>,
    scratch: Vec<f32>,
}

impl Mixer {
    /// Needs at least one input, and all inputs must agree on sample rate
    /// and chunk size.
    pub fn new(inputs: Vec<SignalNode>) -> Result<Self> {
        let first = inputs
            .first()
            .ok_or_else(|| Error::InvalidConfig("mixer needs at least one input".into()))?
            .info()
            .clone();

        if let Some(odd) = inputs.iter().find(|input| {
            let info = input.info();
            info.sample_rate != first.sample_rate
                || info.frames_per_chunk != first.frames_per_chunk
        }) {
            let info = odd.info();
            return Err(Error::InvalidConfig(format!(
                "mixer input `{}` runs at {} Hz / {} frames, expected {} Hz / {} frames",
                info.name,
                info.sample_rate,
                info.frames_per_chunk,
                first.sample_rate,
                first.frames_per_chunk
            )));
        }

        Ok(Self {
            info: NodeInfo::derived("Mixer", &first),
            inputs,
            scratch: vec![0.0; first.frames_per_chunk],
        })
    }
}

impl GraphNode for Mixer {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut NodeInfo {
        &mut self.info
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Mixer
    }

    fn reset(&mut self) {
        for input in &mut self.inputs {
            input.reset();
        }
    }

    fn render_block(&mut self, out: &mut [f32]) {
        debug_assert!(
            out.len() <= self.scratch.len(),
            "buffer longer than frames_per_chunk"
        );
        out.fill(0.0);

        let frames = out.len().min(self.scratch.len());
        let scratch = &mut self.scratch[..frames];
        for input in &mut self.inputs {
            scratch.fill(0.0);
            input.render_block(scratch);
            for (o, s) in out.iter_mut().zip(scratch.iter()) {
                *o += *s;
            }
        }
    }

    fn inputs(&self) -> &[SignalNode] {
        &self.inputs
    }

    fn inputs_mut(&mut self) -> &mut [SignalNode] {
        &mut self.inputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::oscillator::Oscillator;

    #[test]
    fn sums_inputs_without_normalizing() {
        let a = Oscillator::sine(48_000.0, 256).with_frequency(440.0);
        let b = Oscillator::sine(48_000.0, 256).with_frequency(440.0);
        let mut reference = Oscillator::sine(48_000.0, 256).with_frequency(440.0);
        let mut mixer = Mixer::new(vec![a.into(), b.into()]).unwrap();

        let mut single = vec![0.0f32; 256];
        let mut mixed = vec![0.0f32; 256];
        reference.render_block(&mut single);
        mixer.render_block(&mut mixed);

        for (s, m) in single.iter().zip(&mixed) {
            assert_eq!(s * 2.0, *m);
        }
        assert!(mixed.iter().any(|s| s.abs() > 1.0));
    }

    #[test]
    fn requires_at_least_one_input() {
        assert!(matches!(Mixer::new(Vec::new()), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_mismatched_chunk_sizes() {
        let a = Oscillator::sine(48_000.0, 256);
        let b = Oscillator::sine(48_000.0, 128);
        assert!(Mixer::new(vec![a.into(), b.into()]).is_err());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "frames_per_chunk")]
    fn rejects_buffers_longer_than_a_chunk() {
        let mut mixer =
            Mixer::new(vec![Oscillator::sine(48_000.0, 64).with_frequency(440.0).into()]).unwrap();
        mixer.render_block(&mut [0.0f32; 128]);
    }

    #[test]
    fn single_input_passes_through() {
        let mut reference = Oscillator::sawtooth(44_100.0, 64).with_frequency(200.0);
        let mut mixer =
            Mixer::new(vec![Oscillator::sawtooth(44_100.0, 64).with_frequency(200.0).into()])
                .unwrap();

        let mut expected = vec![0.0f32; 64];
        let mut actual = vec![0.0f32; 64];
        reference.render_block(&mut expected);
        mixer.render_block(&mut actual);

        assert_eq!(expected, actual);
    }
}
