use std::fmt;

/// Highest MIDI note number.
pub const MAX_NOTE: u8 = 127;
/// Highest MIDI channel number (channels are zero-based).
pub const MAX_CHANNEL: u8 = 15;
/// Highest controller value.
pub const MAX_CONTROL_VALUE: u8 = 127;

const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Equal-tempered pitch of `note` in Hz, tuned so note 69 (A4) sounds at
/// 440 Hz and each step is one semitone.
#[inline]
pub fn note_to_frequency(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Human-readable pitch name, e.g. `C4` for note 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteName {
    pub pitch_class: &'static str,
    pub octave: i8,
}

pub fn note_name(note: u8) -> NoteName {
    NoteName {
        pitch_class: PITCH_CLASSES[(note % 12) as usize],
        octave: (note / 12) as i8 - 1,
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}

/// Identity of a sounding note: the same key on two channels is two notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteId {
    pub note: u8,
    pub channel: u8,
}

impl NoteId {
    pub fn new(note: u8, channel: u8) -> Self {
        Self { note, channel }
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}), chan {}", note_name(self.note), self.note, self.channel)
    }
}
