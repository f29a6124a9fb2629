use rtrb::{Consumer, Producer};

use crate::{
    graph::{
        chain::{GAIN_A_TAG, GAIN_B_TAG},
        Chain, Param,
    },
    synth::{
        allocator::{Allocation, VoicePool},
        message::{SynthEvent, SynthMessage},
    },
};

/// Render-side owner of every voice.
///
/// Lives on the audio thread. Control changes arrive through `rx` and are
/// applied at the start of each chunk; stealing and rejected parameters go
/// back out through `events`. Nothing here locks, logs or allocates after
/// construction.
pub struct PolySynth {
    voices: VoicePool,
    rx: Consumer<SynthMessage>,
    events: Producer<SynthEvent>,
    voice_buffer: Vec<f32>,
}

impl PolySynth {
    pub fn new(
        prototype: &Chain,
        num_voices: usize,
        rx: Consumer<SynthMessage>,
        events: Producer<SynthEvent>,
    ) -> Self {
        Self {
            voices: VoicePool::from_prototype(prototype, num_voices),
            rx,
            events,
            voice_buffer: vec![0.0; prototype.frames_per_chunk()],
        }
    }

    pub fn frames_per_chunk(&self) -> usize {
        self.voice_buffer.len()
    }

    pub fn voices(&self) -> &VoicePool {
        &self.voices
    }

    pub fn handle_message(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::NoteOn { note, frequency } => {
                if let Some(Allocation::Stolen { voice, previous }) =
                    self.voices.note_on(note, frequency)
                {
                    self.notify(SynthEvent::VoiceStolen {
                        voice,
                        previous,
                        next: note,
                    });
                }
            }
            SynthMessage::NoteOff { note } => {
                self.voices.note_off(note);
            }
            SynthMessage::SetParam { tag, param } => self.set_tagged(tag, param),
            SynthMessage::Crossfade { gain_a, gain_b } => {
                self.set_tagged(GAIN_A_TAG, Param::Amplitude(gain_a));
                self.set_tagged(GAIN_B_TAG, Param::Amplitude(gain_b));
            }
            SynthMessage::AllNotesOff => self.voices.all_notes_off(),
        }
    }

    fn set_tagged(&mut self, tag: &'static str, param: Param) {
        if let Err(error) = self.voices.set_tagged(tag, param) {
            self.notify(SynthEvent::ParamRejected { tag, error });
        }
    }

    /// Apply pending messages, then mix one chunk into `out`.
    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Ok(msg) = self.rx.pop() {
            self.handle_message(msg);
        }
        self.mixdown(out);
    }

    /// Sum every sounding voice into `out` and clamp to `[-1.0, 1.0]`.
    ///
    /// `out` must not be longer than the chain's chunk size; in release
    /// builds anything past it comes out silent.
    pub fn mixdown(&mut self, out: &mut [f32]) {
        debug_assert!(out.len() <= self.voice_buffer.len());
        out.fill(0.0);
        let frames = out.len().min(self.voice_buffer.len());
        let scratch = &mut self.voice_buffer[..frames];

        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.render(scratch);
            for (o, v) in out.iter_mut().zip(scratch.iter()) {
                *o += v;
            }
        }

        for sample in out.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }

    fn notify(&mut self, event: SynthEvent) {
        // A full event ring only loses telemetry.
        let _ = self.events.push(event);
    }
}
