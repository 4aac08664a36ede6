//! Audio sinks for synthesized Morse.
//!
//! A sink consumes one sample stream exactly once, start to end:
//! - [`export::WavFileSink`] encodes it to a mono 16-bit WAV file
//! - [`engine::LivePlaybackSink`] plays it on the default output device

pub mod engine;
pub mod export;

pub use engine::{LivePlaybackSink, PlaybackHandle};
pub use export::{export_to_wav, WavFileSink};

use crate::error::Result;

/// What a sink did with its stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SinkReport {
    /// Samples consumed from the stream.
    pub samples: u64,
    /// True if consumption stopped early on an external interrupt.
    pub interrupted: bool,
}

impl SinkReport {
    /// Consumed duration in seconds at the given sample rate.
    pub fn seconds(&self, sample_rate: u32) -> f64 {
        self.samples as f64 / sample_rate as f64
    }
}

/// A destination for a mono sample stream.
///
/// Taking `self` by value makes each sink single-use.
pub trait AudioSink {
    /// Consumes `samples` at `sample_rate` until exhausted.
    fn consume<S>(self, samples: S, sample_rate: u32) -> Result<SinkReport>
    where
        S: Iterator<Item = f32> + Send + 'static;
}

/// Converts a float sample in `[-1.0, 1.0]` to 16-bit PCM.
pub fn to_pcm16(sample: f32) -> i16 {
    (sample * 32767.0).clamp(-32768.0, 32767.0) as i16
}
