//! Control side of the synthesizer.
//!
//! The [`Engine`] owns the control thread's half of the system: it hands a
//! [`PolySynth`] to the audio sink, then blocks on the inbound command queue
//! and forwards every decoded command through the [`Dispatcher`]. The loop
//! ends on `exit`, when every command sender is gone, or when the sink
//! stops delivering.

pub mod config;
pub mod dispatch;
pub mod tables;

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use rtrb::{Consumer, RingBuffer};
use tracing::{debug, info, warn};

use crate::{
    graph::Chain,
    io::{protocol::Command, sink::AudioSink},
    synth::{PolySynth, SynthEvent},
    Error, Result,
};

pub use config::{ControllerMap, SynthConfig};
pub use dispatch::{Dispatcher, Flow};

/// How often the control loop wakes to check the sink, re-send held
/// releases and report events.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Event ring size; stealing reports beyond this between polls are lost.
const EVENT_CAPACITY: usize = 64;

pub struct Engine<S: AudioSink> {
    sink: S,
    synth: PolySynth,
    dispatcher: Dispatcher,
    events: Consumer<SynthEvent>,
}

impl<S: AudioSink> Engine<S> {
    /// Instantiate `config.num_voices` copies of `prototype` and wire the
    /// control and audio halves together. Nothing plays until [`Engine::run`].
    pub fn new(config: SynthConfig, prototype: &Chain, sink: S) -> Result<Self> {
        config.validate()?;

        if prototype.sample_rate() != config.sample_rate_hz()
            || prototype.frames_per_chunk() != config.frames_per_chunk
        {
            return Err(Error::InvalidConfig(format!(
                "prototype runs at {} Hz / {} frames, engine at {} Hz / {} frames",
                prototype.sample_rate(),
                prototype.frames_per_chunk(),
                config.sample_rate,
                config.frames_per_chunk
            )));
        }

        let (tx, rx) = RingBuffer::new(config.message_capacity);
        let (events_tx, events) = RingBuffer::new(EVENT_CAPACITY);

        info!(
            voices = config.num_voices,
            sample_rate = config.sample_rate,
            frames_per_chunk = config.frames_per_chunk,
            "voice prototype:\n{prototype}"
        );

        Ok(Self {
            sink,
            synth: PolySynth::new(prototype, config.num_voices, rx, events_tx),
            dispatcher: Dispatcher::new(&config, tx),
            events,
        })
    }

    /// Start the sink and serve commands until told to stop. The sink is
    /// stopped on every exit path and handed back to the caller.
    pub fn run(self, inbox: Receiver<Command>) -> Result<S> {
        let Self {
            mut sink,
            synth,
            mut dispatcher,
            mut events,
        } = self;

        sink.start(synth)?;
        info!("engine running");

        while sink.is_active() {
            dispatcher.flush();
            match inbox.recv_timeout(POLL_INTERVAL) {
                Ok(command) => {
                    if dispatcher.dispatch(command) == Flow::Exit {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    info!("command source closed");
                    break;
                }
            }
            report(&mut events);
        }

        if !sink.is_active() {
            warn!("audio sink stopped delivering");
        }

        let held = dispatcher.flush();
        if held > 0 {
            debug!(held, "messages still held at shutdown");
        }
        sink.stop()?;
        report(&mut events);
        info!("engine stopped");
        Ok(sink)
    }
}

fn report(events: &mut Consumer<SynthEvent>) {
    while let Ok(event) = events.pop() {
        match event {
            SynthEvent::VoiceStolen {
                voice,
                previous,
                next,
            } => debug!("Voice {voice} stolen from {previous} for {next}"),
            SynthEvent::ParamRejected { tag, error } => {
                warn!(tag, %error, "parameter change rejected")
            }
        }
    }
}
