//! Error types for hcs-home
//!
//! Only startup configuration errors are fatal. Everything raised by the
//! media path is logged and swallowed by the cue registry.

use thiserror::Error;

/// Main error type for hcs-home
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or catalogue validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors bubbled up from the shared library
    #[error(transparent)]
    Common(#[from] hcs_common::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cue file decoding errors
    #[error("Audio decode error: {0}")]
    Decode(String),

    /// Audio output device errors
    #[error("Audio output error: {0}")]
    AudioOutput(String),

    /// The media engine declined to play a cue
    #[error("Playback rejected for cue '{cue}': {reason}")]
    PlaybackRejected { cue: String, reason: String },

    /// Terminal setup or painting errors
    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Convenience Result type using hcs-home Error
pub type Result<T> = std::result::Result<T, Error>;
