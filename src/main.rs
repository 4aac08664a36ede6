//! koch-trainer - Koch method Morse code trainer.
//!
//! Plays (or writes to a WAV file) Morse practice text with adjustable
//! character and effective (Farnsworth) speed.
//!
//! # Usage
//!
//! ```bash
//! koch-trainer -l 5                       # random characters, Koch level 5
//! koch-trainer --word-mode -l 20          # words from the first 20 characters
//! koch-trainer --callsign-mode            # callsign practice
//! koch-trainer -f out.wav cq cq de w1aw   # fixed message to a WAV file
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use koch_trainer::morse::filter::DEFAULT_BANDWIDTH;
use koch_trainer::morse::synth::DEFAULT_TONE_FREQUENCY;
use koch_trainer::morse::timing::{DEFAULT_CHARACTER_SPEED, DEFAULT_EFFECTIVE_SPEED};
use koch_trainer::{DrillMode, SpeedParameters, SynthesisParams, Trainer, TrainerOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command-line options for the trainer.
#[derive(Debug, Parser)]
#[command(name = "koch-trainer", version, about)]
struct CliOptions {
    /// Morse words per minute.
    #[arg(long, default_value_t = DEFAULT_CHARACTER_SPEED)]
    character_speed: f64,

    /// Effective words per minute (Farnsworth speed).
    #[arg(long, default_value_t = DEFAULT_EFFECTIVE_SPEED)]
    effective_speed: f64,

    /// Save audio to a WAV file instead of playing it.
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// Frequency in Hertz to use for practice tones.
    #[arg(short = 'H', long, default_value_t = DEFAULT_TONE_FREQUENCY)]
    hertz: f64,

    /// Audio bandwidth in Hertz, centered on the tone frequency.
    #[arg(short = 'B', long, default_value_t = DEFAULT_BANDWIDTH)]
    bandwidth: f64,

    /// Koch training level (one character added per level, 0 for all).
    #[arg(short = 'l', long, default_value_t = 1)]
    level: usize,

    /// Custom alphabet to use in place of the Koch ordering.
    #[arg(short = 'a', long)]
    custom_alphabet: Option<String>,

    /// In random character mode, the number of characters to send.
    #[arg(long, default_value_t = 100)]
    character_count: usize,

    /// Practice callsign recognition.
    #[arg(long)]
    callsign_mode: bool,

    /// Number of callsigns to send.
    #[arg(long, default_value_t = 20)]
    callsign_count: usize,

    /// Callsign file, one per line. Callsigns are generated if omitted.
    #[arg(long)]
    callsign_file: Option<PathBuf>,

    /// Practice real word recognition.
    #[arg(long)]
    word_mode: bool,

    /// Use words with at least this many characters.
    #[arg(long, default_value_t = 1)]
    word_char_min: usize,

    /// Use words with at most this many characters.
    #[arg(long, default_value_t = 5)]
    word_char_max: usize,

    /// Number of words to send.
    #[arg(long, default_value_t = 20)]
    word_count: usize,

    /// Word file, one word per line. A built-in list of common English
    /// words is used if omitted.
    #[arg(long)]
    word_file: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Message to send instead of a generated drill. Prosigns are written
    /// in angle brackets, e.g. <BT>.
    message: Vec<String>,
}

impl CliOptions {
    /// Converts parsed arguments into trainer options.
    fn into_trainer_options(self) -> Result<TrainerOptions> {
        let speeds = SpeedParameters::new(self.character_speed, self.effective_speed)
            .context("Invalid speed")?;
        let params = SynthesisParams {
            speeds,
            tone_frequency: self.hertz,
            bandwidth: self.bandwidth,
            ..SynthesisParams::default()
        };

        let mode = if !self.message.is_empty() {
            DrillMode::Message(self.message.join(" "))
        } else if self.callsign_mode {
            DrillMode::Callsigns {
                count: self.callsign_count,
                file: self.callsign_file,
            }
        } else if self.word_mode {
            DrillMode::Words {
                count: self.word_count,
                min_len: self.word_char_min,
                max_len: self.word_char_max,
                file: self.word_file,
            }
        } else {
            DrillMode::Characters {
                count: self.character_count,
            }
        };

        Ok(TrainerOptions {
            params,
            level: self.level,
            custom_alphabet: self.custom_alphabet,
            mode,
            output: self.file,
        })
    }
}

/// Main entry point.
fn main() -> Result<()> {
    let cli = CliOptions::parse();

    let filter = if cli.verbose {
        EnvFilter::new("koch_trainer=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = cli.into_trainer_options()?;
    if let Err(e) = Trainer::new(options).run() {
        tracing::error!("Training run failed: {:?}", e);
        return Err(e);
    }

    Ok(())
}
