//! Error types for Morse synthesis and audio output.

use thiserror::Error;

/// Errors produced while timing, rendering or emitting a message.
#[derive(Debug, Error)]
pub enum MorseError {
    /// A speed parameter was zero, negative or not a number.
    #[error("invalid speed: {name} must be a positive number, got {value}")]
    InvalidSpeed {
        /// Which parameter was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Band-pass filter parameters cannot be realised at the sample rate.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// A unit of the message has no Morse representation.
    #[error("unknown symbol {unit:?} at position {index}")]
    UnknownSymbol {
        /// The offending unit as written in the message.
        unit: String,
        /// Zero-based position of the unit within the message.
        index: usize,
    },

    /// The playback device could not be opened or failed mid-stream.
    #[error("audio device error: {0}")]
    AudioDevice(String),

    /// Reading a word list or writing an output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WAV encoding failed.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// A word drill had no words matching the active character set.
    #[error("no words of {min}..={max} characters can be built from the active characters")]
    EmptyWordList {
        /// Minimum word length requested.
        min: usize,
        /// Maximum word length requested.
        max: usize,
    },
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, MorseError>;
