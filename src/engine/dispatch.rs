use std::collections::VecDeque;

use rtrb::Producer;
use tracing::{debug, info, warn};

use crate::{
    engine::{
        config::{ControllerMap, SynthConfig},
        tables::{CutoffTable, MixTable},
    },
    graph::{chain::LPF_TAG, Param},
    io::{
        midi::{note_to_frequency, NoteId},
        protocol::Command,
    },
    synth::SynthMessage,
    Error, Result,
};

/// Held messages past this many start dropping again, releases excepted.
const BACKLOG_LIMIT: usize = 1024;

/// Whether the control loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Turns decoded commands into render-side messages.
///
/// Runs on the control thread. Controller values are resolved through the
/// lookup tables here so the audio thread only ever sees final parameter
/// values.
///
/// When the ring is full, note-ons and controller changes are dropped but
/// releases are held in a backlog and re-sent by [`Dispatcher::flush`].
/// Once anything is held, later messages queue behind it so a note never
/// overtakes its own release.
pub struct Dispatcher {
    tx: Producer<SynthMessage>,
    backlog: VecDeque<SynthMessage>,
    controllers: ControllerMap,
    mix: MixTable,
    cutoff: CutoffTable,
}

impl Dispatcher {
    pub fn new(config: &SynthConfig, tx: Producer<SynthMessage>) -> Self {
        Self {
            tx,
            backlog: VecDeque::new(),
            controllers: config.controllers,
            mix: MixTable::new(),
            cutoff: CutoffTable::new(config.sample_rate_hz()),
        }
    }

    pub fn dispatch(&mut self, command: Command) -> Flow {
        match command {
            Command::NoteOn { note, channel } => {
                let note = NoteId::new(note, channel);
                info!("Note on {note}");
                self.send(SynthMessage::NoteOn {
                    note,
                    frequency: note_to_frequency(note.note),
                });
            }
            Command::NoteOff { note, channel } => {
                let note = NoteId::new(note, channel);
                info!("Note off {note}");
                self.send(SynthMessage::NoteOff { note });
            }
            Command::ControlChange {
                channel,
                controller,
                value,
            } => {
                info!("Control change: channel {channel}, number {controller}, value {value}");
                self.control_change(controller, value);
            }
            Command::Exit => {
                info!("Exit requested");
                self.send(SynthMessage::AllNotesOff);
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    fn control_change(&mut self, controller: u8, value: u8) {
        if controller == self.controllers.oscillator_mix {
            let (gain_a, gain_b) = self.mix.crossfade(value);
            self.send(SynthMessage::Crossfade { gain_a, gain_b });
            info!("Gain A: {gain_a}");
            info!("Gain B: {gain_b}");
        } else if controller == self.controllers.lpf_cutoff {
            let cutoff = self.cutoff.get(value);
            self.send(SynthMessage::SetParam {
                tag: LPF_TAG,
                param: Param::Cutoff(cutoff),
            });
            info!("LPF cutoff: {cutoff}");
        } else {
            debug!(controller, "ignoring unmapped controller");
        }
    }

    /// Queue a message for the render thread without waiting on it.
    pub fn try_send(&mut self, msg: SynthMessage) -> Result<()> {
        self.tx
            .push(msg)
            .map_err(|_| Error::QueueFull)
    }

    /// Push held messages, oldest first, until the ring fills up again.
    /// Returns how many are still waiting.
    pub fn flush(&mut self) -> usize {
        while let Some(&msg) = self.backlog.front() {
            if self.try_send(msg).is_err() {
                break;
            }
            self.backlog.pop_front();
        }
        self.backlog.len()
    }

    pub fn pending(&self) -> usize {
        self.backlog.len()
    }

    fn send(&mut self, msg: SynthMessage) {
        if self.flush() == 0 && self.try_send(msg).is_ok() {
            return;
        }

        let release = matches!(msg, SynthMessage::NoteOff { .. } | SynthMessage::AllNotesOff);
        if release || (!self.backlog.is_empty() && self.backlog.len() < BACKLOG_LIMIT) {
            debug!(?msg, held = self.backlog.len() + 1, "message ring full, holding message");
            self.backlog.push_back(msg);
        } else {
            warn!(?msg, err = %Error::QueueFull, "dropping message");
        }
    }
}
