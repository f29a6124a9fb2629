use crate::{graph::Chain, io::midi::NoteId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,               // Silent, free for allocation
    Sounding(NoteId),   // Bound to a note until note-off or steal
}

/// One polyphonic slot playing a private copy of the prototype chain.
#[derive(Debug, Clone)]
pub struct Voice {
    id: usize,
    state: VoiceState,
    chain: Chain,
}

impl Voice {
    pub fn new(id: usize, chain: Chain) -> Self {
        Self {
            id,
            state: VoiceState::Idle,
            chain,
        }
    }

    /// Bind the voice to `note` and retune every oscillator. Phase is not
    /// reset, so a retriggered voice continues from where it was.
    pub fn note_on(&mut self, frequency: f32, note: NoteId) {
        self.state = VoiceState::Sounding(note);
        self.chain.set_frequency(frequency);
    }

    /// Abrupt silence: no release tail.
    pub fn note_off(&mut self) {
        self.state = VoiceState::Idle;
        self.chain.set_frequency(0.0);
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Sounding(_))
    }

    /// The bound note; `None` while idle.
    pub fn note_id(&self) -> Option<NoteId> {
        match self.state {
            VoiceState::Sounding(note) => Some(note),
            VoiceState::Idle => None,
        }
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }

    pub fn render(&mut self, out: &mut [f32]) {
        self.chain.render_block(out);
    }
}
