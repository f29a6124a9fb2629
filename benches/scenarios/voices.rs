//! Benchmarks for the default patch and the polyphonic mixdown.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use polychain::{
    graph::Chain,
    io::midi::{note_to_frequency, NoteId},
    synth::{PolySynth, SynthMessage},
};
use rtrb::RingBuffer;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

const VOICES: usize = 8;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let prototype = Chain::default_patch(SAMPLE_RATE, size).unwrap();

        // === SINGLE VOICE ===
        // saw + square -> gains -> mixer -> low-pass
        let mut chain = prototype.clone();
        chain.set_frequency(110.0);
        group.bench_with_input(BenchmarkId::new("default_patch", size), &size, |b, _| {
            b.iter(|| chain.render_block(black_box(&mut buffer)))
        });

        // === FULL POOL ===
        // every voice sounding, summed and clamped
        let (mut tx, rx) = RingBuffer::new(VOICES);
        let (events, _events_rx) = RingBuffer::new(VOICES);
        let mut synth = PolySynth::new(&prototype, VOICES, rx, events);
        for note in 0..VOICES as u8 {
            let note = NoteId::new(48 + note * 3, 0);
            tx.push(SynthMessage::NoteOn {
                note,
                frequency: note_to_frequency(note.note),
            })
            .unwrap();
        }

        group.bench_with_input(BenchmarkId::new("poly_mixdown", size), &size, |b, _| {
            b.iter(|| synth.render_block(black_box(&mut buffer)))
        });
    }

    group.finish();
}
