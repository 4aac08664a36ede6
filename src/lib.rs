//! koch-trainer - Koch method Morse code trainer.
//!
//! This library provides Farnsworth-timed Morse synthesis, practice
//! drill generation, and WAV/live audio output.

pub mod audio;
pub mod drill;
pub mod error;
pub mod morse;
pub mod trainer;

// Re-export commonly used types
pub use audio::{export_to_wav, AudioSink, LivePlaybackSink, SinkReport, WavFileSink};
pub use error::{MorseError, Result};
pub use morse::{
    tokenize, MessageSynthesizer, Prosign, SpeedParameters, SymbolicUnit, SynthesisParams,
    TimingConstants, SAMPLE_RATE,
};
pub use trainer::{DrillMode, Trainer, TrainerOptions};
