use crate::{
    graph::{clone_chain, Chain, Param, ParamError},
    io::midi::NoteId,
    synth::voice::Voice,
};

/// What a note-on did to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    /// An idle voice took the note.
    Idle { voice: usize },
    /// Every voice was sounding; the least recently assigned one was taken.
    Stolen { voice: usize, previous: NoteId },
}

/// Fixed-size pool of voices kept in least-recently-assigned order.
///
/// Position 0 holds the voice assigned longest ago, the tail the most
/// recent one. Note-on scans front to back for an idle voice, falls back
/// to stealing position 0, and moves the chosen voice to the tail.
#[derive(Debug, Clone)]
pub struct VoicePool {
    voices: Vec<Voice>,
}

impl VoicePool {
    /// Instantiate `size` independent copies of `prototype`.
    pub fn from_prototype(prototype: &Chain, size: usize) -> Self {
        let voices = (0..size)
            .map(|id| Voice::new(id, clone_chain(prototype)))
            .collect();
        Self { voices }
    }

    /// Returns `None` only for an empty pool.
    pub fn note_on(&mut self, note: NoteId, frequency: f32) -> Option<Allocation> {
        if self.voices.is_empty() {
            return None;
        }

        let (index, allocation) = match self.voices.iter().position(|v| !v.is_active()) {
            Some(index) => (
                index,
                Allocation::Idle {
                    voice: self.voices[index].id(),
                },
            ),
            None => {
                let oldest = &mut self.voices[0];
                let previous = oldest.note_id()?;
                oldest.note_off();
                (
                    0,
                    Allocation::Stolen {
                        voice: oldest.id(),
                        previous,
                    },
                )
            }
        };

        self.voices[index].note_on(frequency, note);
        // move to the tail without reallocating
        self.voices[index..].rotate_left(1);
        Some(allocation)
    }

    /// Silence every voice bound to exactly `note`. Returns how many stopped.
    pub fn note_off(&mut self, note: NoteId) -> usize {
        let mut stopped = 0;
        for voice in self.voices.iter_mut() {
            if voice.note_id() == Some(note) {
                voice.note_off();
                stopped += 1;
            }
        }
        stopped
    }

    pub fn all_notes_off(&mut self) {
        for voice in self.voices.iter_mut().filter(|v| v.is_active()) {
            voice.note_off();
        }
    }

    /// Apply `param` to the tagged nodes of every voice, reporting the
    /// first refusal once all voices were tried.
    pub fn set_tagged(&mut self, tag: &str, param: Param) -> Result<usize, ParamError> {
        let mut applied = 0;
        let mut refused = None;
        for voice in self.voices.iter_mut() {
            match voice.chain_mut().set_tagged(tag, param) {
                Ok(count) => applied += count,
                Err(err) => {
                    refused.get_or_insert(err);
                }
            }
        }
        match refused {
            Some(err) => Err(err),
            None => Ok(applied),
        }
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Voice> {
        self.voices.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::oscillator::Oscillator;

    fn pool(size: usize) -> VoicePool {
        VoicePool::from_prototype(&Chain::new(Oscillator::sine(48_000.0, 64)), size)
    }

    fn order(pool: &VoicePool) -> Vec<usize> {
        pool.voices().iter().map(Voice::id).collect()
    }

    #[test]
    fn idle_voices_are_taken_front_to_back() {
        let mut pool = pool(3);

        assert_eq!(
            pool.note_on(NoteId::new(60, 0), 261.6),
            Some(Allocation::Idle { voice: 0 })
        );
        assert_eq!(
            pool.note_on(NoteId::new(64, 0), 329.6),
            Some(Allocation::Idle { voice: 1 })
        );
        assert_eq!(order(&pool), [2, 0, 1]);
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn steals_least_recently_assigned() {
        let mut pool = pool(2);
        let (a, b, c) = (NoteId::new(60, 0), NoteId::new(62, 0), NoteId::new(64, 0));

        pool.note_on(a, 261.6);
        pool.note_on(b, 293.7);
        let stolen = pool.note_on(c, 329.6);

        assert_eq!(
            stolen,
            Some(Allocation::Stolen {
                voice: 0,
                previous: a
            })
        );
        let notes: Vec<_> = pool.voices().iter().map(Voice::note_id).collect();
        assert_eq!(notes, [Some(b), Some(c)]);
    }

    #[test]
    fn released_voice_is_reused_before_stealing() {
        let mut pool = pool(2);
        let (a, b, c) = (NoteId::new(60, 0), NoteId::new(62, 0), NoteId::new(64, 0));

        pool.note_on(a, 261.6);
        pool.note_on(b, 293.7);
        assert_eq!(pool.note_off(a), 1);

        assert_eq!(pool.note_on(c, 329.6), Some(Allocation::Idle { voice: 0 }));
        assert_eq!(pool.active_count(), 2);
    }

    #[test]
    fn note_off_matches_channel_too() {
        let mut pool = pool(2);
        pool.note_on(NoteId::new(60, 0), 261.6);

        assert_eq!(pool.note_off(NoteId::new(60, 1)), 0);
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.note_off(NoteId::new(60, 0)), 1);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn all_notes_off_idles_the_pool() {
        let mut pool = pool(4);
        for note in 60..64 {
            pool.note_on(NoteId::new(note, 0), 440.0);
        }
        pool.all_notes_off();
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn empty_pool_allocates_nothing() {
        let mut pool = pool(0);
        assert!(pool.is_empty());
        assert_eq!(pool.note_on(NoteId::new(60, 0), 261.6), None);
    }
}
