//! Textual control protocol spoken by external controllers.
//!
//! ```text
//! note_on -n <0..127> -c <0..15>
//! note_off -n <0..127> -c <0..15>
//! control_change -c <0..15> -n <controller> -v <0..127>
//! exit
//! ```
//!
//! Text exists only at this boundary. Everything past [`parse`] works with
//! the structured [`Command`].

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::io::midi::{MAX_CHANNEL, MAX_CONTROL_VALUE, MAX_NOTE};

const NOTE_ON_USAGE: &str = "note_on -n <note> -c <channel>";
const NOTE_OFF_USAGE: &str = "note_off -n <note> -c <channel>";
const CONTROL_CHANGE_USAGE: &str = "control_change -c <channel> -n <controller> -v <value>";

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NoteOn { note: u8, channel: u8 },
    NoteOff { note: u8, channel: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("empty message")]
    Empty,

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("malformed message, expected `{usage}`")]
    Malformed { usage: &'static str },

    #[error("{field} `{value}` is not a number")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} {value} is out of range 0..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        max: u8,
    },

    #[error("{0} was never set")]
    Missing(&'static str),
}

/// Decode one line of the textual grammar.
pub fn parse(message: &str) -> Result<Command, ProtocolError> {
    let tokens: Vec<&str> = message.split_whitespace().collect();

    match tokens.as_slice() {
        [] => Err(ProtocolError::Empty),
        ["exit"] => Ok(Command::Exit),
        ["note_on", "-n", note, "-c", channel] => Ok(Command::NoteOn {
            note: field("note", note, MAX_NOTE)?,
            channel: field("channel", channel, MAX_CHANNEL)?,
        }),
        ["note_off", "-n", note, "-c", channel] => Ok(Command::NoteOff {
            note: field("note", note, MAX_NOTE)?,
            channel: field("channel", channel, MAX_CHANNEL)?,
        }),
        ["control_change", "-c", channel, "-n", controller, "-v", value] => {
            Ok(Command::ControlChange {
                channel: field("channel", channel, MAX_CHANNEL)?,
                controller: field("controller", controller, MAX_CONTROL_VALUE)?,
                value: field("value", value, MAX_CONTROL_VALUE)?,
            })
        }
        ["note_on", ..] => Err(ProtocolError::Malformed {
            usage: NOTE_ON_USAGE,
        }),
        ["note_off", ..] => Err(ProtocolError::Malformed {
            usage: NOTE_OFF_USAGE,
        }),
        ["control_change", ..] => Err(ProtocolError::Malformed {
            usage: CONTROL_CHANGE_USAGE,
        }),
        ["exit", ..] => Err(ProtocolError::Malformed { usage: "exit" }),
        [command, ..] => Err(ProtocolError::UnknownCommand(command.to_string())),
    }
}

fn field(name: &'static str, token: &str, max: u8) -> Result<u8, ProtocolError> {
    let value: i64 = token.parse().map_err(|_| ProtocolError::NotANumber {
        field: name,
        value: token.to_string(),
    })?;
    checked(name, value, max)
}

fn checked(name: &'static str, value: i64, max: u8) -> Result<u8, ProtocolError> {
    if (0..=max as i64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ProtocolError::OutOfRange {
            field: name,
            value,
            max,
        })
    }
}

impl std::str::FromStr for Command {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::NoteOn { note, channel } => write!(f, "note_on -n {note} -c {channel}"),
            Command::NoteOff { note, channel } => write!(f, "note_off -n {note} -c {channel}"),
            Command::ControlChange {
                channel,
                controller,
                value,
            } => write!(f, "control_change -c {channel} -n {controller} -v {value}"),
            Command::Exit => f.write_str("exit"),
        }
    }
}

/// Start building a validated command.
///
/// ```
/// use polychain::io::protocol::{builder, Command};
///
/// let cmd = builder().note_on().with_note(60)?.on_channel(0)?.build()?;
/// assert_eq!(cmd, Command::NoteOn { note: 60, channel: 0 });
/// assert_eq!(cmd.to_string(), "note_on -n 60 -c 0");
/// # Ok::<(), polychain::io::protocol::ProtocolError>(())
/// ```
pub fn builder() -> CommandBuilder {
    CommandBuilder
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CommandBuilder;

impl CommandBuilder {
    pub fn note_on(self) -> NoteBuilder {
        NoteBuilder {
            on: true,
            note: None,
            channel: None,
        }
    }

    pub fn note_off(self) -> NoteBuilder {
        NoteBuilder {
            on: false,
            note: None,
            channel: None,
        }
    }

    pub fn control_change(self) -> ControlChangeBuilder {
        ControlChangeBuilder::default()
    }

    pub fn exit(self) -> Command {
        Command::Exit
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NoteBuilder {
    on: bool,
    note: Option<u8>,
    channel: Option<u8>,
}

impl NoteBuilder {
    pub fn with_note(mut self, note: i64) -> Result<Self, ProtocolError> {
        self.note = Some(checked("note", note, MAX_NOTE)?);
        Ok(self)
    }

    pub fn on_channel(mut self, channel: i64) -> Result<Self, ProtocolError> {
        self.channel = Some(checked("channel", channel, MAX_CHANNEL)?);
        Ok(self)
    }

    pub fn build(self) -> Result<Command, ProtocolError> {
        let note = self.note.ok_or(ProtocolError::Missing("note"))?;
        let channel = self.channel.ok_or(ProtocolError::Missing("channel"))?;
        Ok(if self.on {
            Command::NoteOn { note, channel }
        } else {
            Command::NoteOff { note, channel }
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ControlChangeBuilder {
    channel: Option<u8>,
    controller: Option<u8>,
    value: Option<u8>,
}

impl ControlChangeBuilder {
    pub fn on_channel(mut self, channel: i64) -> Result<Self, ProtocolError> {
        self.channel = Some(checked("channel", channel, MAX_CHANNEL)?);
        Ok(self)
    }

    pub fn with_controller(mut self, controller: i64) -> Result<Self, ProtocolError> {
        self.controller = Some(checked("controller", controller, MAX_CONTROL_VALUE)?);
        Ok(self)
    }

    pub fn with_value(mut self, value: i64) -> Result<Self, ProtocolError> {
        self.value = Some(checked("value", value, MAX_CONTROL_VALUE)?);
        Ok(self)
    }

    pub fn build(self) -> Result<Command, ProtocolError> {
        Ok(Command::ControlChange {
            channel: self.channel.ok_or(ProtocolError::Missing("channel"))?,
            controller: self.controller.ok_or(ProtocolError::Missing("controller"))?,
            value: self.value.ok_or(ProtocolError::Missing("value"))?,
        })
    }
}
