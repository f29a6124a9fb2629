// Purpose: Voice management, polyphony, note identity
// This layer sits above graph nodes and owns every voice on the audio thread

pub mod allocator;
pub mod message;
pub mod poly;
pub mod voice;

pub use allocator::{Allocation, VoicePool};
pub use message::{SynthEvent, SynthMessage};
pub use poly::PolySynth;
pub use voice::{Voice, VoiceState};
