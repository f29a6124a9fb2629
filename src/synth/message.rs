use crate::{
    graph::{Param, ParamError},
    io::midi::NoteId,
};

/// Control-to-audio messages, applied at the start of the next chunk.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: NoteId, frequency: f32 },
    NoteOff { note: NoteId },
    /// Apply `param` to every node tagged `tag` in every voice.
    SetParam { tag: &'static str, param: Param },
    /// Levels for the `gain_a` and `gain_b` stages. They travel together so
    /// a chunk never renders with only one side of the crossfade applied.
    Crossfade { gain_a: f32, gain_b: f32 },
    AllNotesOff,
}

/// Audio-to-control notifications. The render thread never logs; it pushes
/// these instead and the control thread reports them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthEvent {
    VoiceStolen {
        voice: usize,
        previous: NoteId,
        next: NoteId,
    },
    ParamRejected {
        tag: &'static str,
        error: ParamError,
    },
}
