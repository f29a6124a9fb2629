//! Error types for polychain.

use thiserror::Error;

use crate::{graph::ParamError, io::protocol::ProtocolError};

/// Result type alias for polychain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can surface from the engine and its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration parameter.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A node rejected a parameter change.
    #[error(transparent)]
    Param(#[from] ParamError),

    /// A textual control message could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The audio device or stream failed.
    #[error("audio error: {0}")]
    Audio(String),

    /// The message ring to the render thread had no free slot.
    #[error("synth message queue is full")]
    QueueFull,
}

impl From<cpal::BuildStreamError> for Error {
    fn from(err: cpal::BuildStreamError) -> Self {
        Error::Audio(err.to_string())
    }
}

impl From<cpal::PlayStreamError> for Error {
    fn from(err: cpal::PlayStreamError) -> Self {
        Error::Audio(err.to_string())
    }
}

impl From<cpal::PauseStreamError> for Error {
    fn from(err: cpal::PauseStreamError) -> Self {
        Error::Audio(err.to_string())
    }
}

impl From<cpal::DefaultStreamConfigError> for Error {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        Error::Audio(err.to_string())
    }
}
