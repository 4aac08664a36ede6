//! Training session orchestration.
//!
//! Picks or generates the practice message, synthesizes it once, and
//! hands the stream to either the WAV exporter or live playback.

use crate::audio::{AudioSink, LivePlaybackSink, SinkReport, WavFileSink};
use crate::drill::{self, DrillGenerator, BUILTIN_WORDS};
use crate::morse::{self, MessageSynthesizer, SymbolicUnit, SynthesisParams};
use anyhow::{Context, Result};
use rand::Rng;
use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Seconds counted down before live playback starts.
const COUNTDOWN_SECS: u64 = 3;

/// Where practice text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillMode {
    /// A fixed message given by the user.
    Message(String),
    /// Random characters from the active set.
    Characters {
        /// Number of characters, not counting spaces.
        count: usize,
    },
    /// Random words spelled with the active set.
    Words {
        /// Number of words.
        count: usize,
        /// Shortest word length.
        min_len: usize,
        /// Longest word length.
        max_len: usize,
        /// Word list file; built-in list if `None`.
        file: Option<PathBuf>,
    },
    /// Random callsigns.
    Callsigns {
        /// Number of callsigns.
        count: usize,
        /// Callsign list file; generated callsigns if `None`.
        file: Option<PathBuf>,
    },
}

impl DrillMode {
    fn label(&self) -> &'static str {
        match self {
            DrillMode::Message(_) => "Message Mode",
            DrillMode::Characters { .. } => "Random Character Mode",
            DrillMode::Words { .. } => "Word Mode",
            DrillMode::Callsigns { .. } => "Callsign Mode",
        }
    }
}

/// Everything a training session needs.
#[derive(Debug, Clone)]
pub struct TrainerOptions {
    /// Synthesis parameters.
    pub params: SynthesisParams,
    /// Koch level; 0 selects every character.
    pub level: usize,
    /// Replaces the Koch order when set.
    pub custom_alphabet: Option<String>,
    /// Source of the practice text.
    pub mode: DrillMode,
    /// Write a WAV file here instead of playing live.
    pub output: Option<PathBuf>,
}

/// A message ready to be synthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedMessage {
    /// Banner describing mode and speeds.
    pub banner: String,
    /// Units to send.
    pub units: Vec<SymbolicUnit>,
}

impl PreparedMessage {
    /// The message as text, prosigns in angle brackets.
    pub fn text(&self) -> String {
        morse::units_to_text(&self.units).trim_end().to_string()
    }
}

/// One Koch-method training run.
pub struct Trainer {
    options: TrainerOptions,
}

impl Trainer {
    /// Creates a trainer.
    pub fn new(options: TrainerOptions) -> Self {
        Self { options }
    }

    /// Builds the practice message for the configured mode.
    ///
    /// # Errors
    ///
    /// Returns error if the message or custom alphabet holds an unknown
    /// symbol, or a word/callsign list cannot be used.
    pub fn prepare<R: Rng>(&self, rng: R) -> Result<PreparedMessage> {
        let speeds = &self.options.params.speeds;
        let mut banner = format!(
            "{}: Effective Speed: {} | Character Speed {}",
            self.options.mode.label(),
            speeds.effective_speed(),
            speeds.character_speed()
        );

        let units = match &self.options.mode {
            DrillMode::Message(text) => {
                morse::tokenize(text).context("Failed to read message")?
            }
            DrillMode::Callsigns { count, file } => {
                let list = file
                    .as_ref()
                    .map(|path| {
                        drill::load_list(path).with_context(|| {
                            format!("Failed to read callsign file: {}", path.display())
                        })
                    })
                    .transpose()?;
                DrillGenerator::new(rng, Vec::new()).callsigns(list.as_deref(), *count)?
            }
            DrillMode::Characters { count } => self
                .generator(rng, &mut banner)?
                .random_characters(*count),
            DrillMode::Words {
                count,
                min_len,
                max_len,
                file,
            } => {
                let list = match file {
                    Some(path) => drill::load_list(path).with_context(|| {
                        format!("Failed to read word file: {}", path.display())
                    })?,
                    None => BUILTIN_WORDS.iter().map(|w| w.to_string()).collect(),
                };
                self.generator(rng, &mut banner)?
                    .words(&list, *count, *min_len, *max_len)?
            }
        };

        Ok(PreparedMessage { banner, units })
    }

    /// Drill generator over the active characters, noting them in the banner.
    fn generator<R: Rng>(&self, rng: R, banner: &mut String) -> Result<DrillGenerator<R>> {
        let characters = match &self.options.custom_alphabet {
            Some(alphabet) => {
                drill::custom_characters(alphabet).context("Failed to read custom alphabet")?
            }
            None => drill::koch_characters(self.options.level),
        };
        let listed: Vec<String> = characters.iter().map(|c| c.to_string()).collect();
        banner.push_str(&format!(" | Characters {}", listed.join("·")));

        Ok(DrillGenerator::new(rng, characters))
    }

    /// Runs the session: prepare, synthesize, then write or play.
    pub fn run(&self) -> Result<()> {
        let message = self.prepare(rand::thread_rng())?;
        println!("\n\n{}", message.banner);

        let mut synth = MessageSynthesizer::new(self.options.params)
            .context("Invalid synthesis parameters")?;
        let stream = synth
            .synthesize(&message.units)
            .context("Failed to synthesize message")?;
        let (hits, misses) = synth.cache_stats();
        tracing::debug!(hits, misses, "render cache");

        let sample_rate = self.options.params.sample_rate;
        match &self.options.output {
            Some(path) => {
                let report = WavFileSink::new(path)
                    .consume(stream, sample_rate)
                    .with_context(|| format!("Failed to write WAV file: {}", path.display()))?;
                tracing::info!(
                    seconds = report.seconds(sample_rate),
                    "wrote {}",
                    path.display()
                );
            }
            None => {
                countdown()?;
                let report = play_live(stream, sample_rate)?;
                if report.interrupted {
                    // Keep the following output off the "^C" line.
                    println!();
                }
                println!("\n{}", message.text());
            }
        }

        Ok(())
    }
}

fn countdown() -> io::Result<()> {
    let mut stdout = io::stdout();
    println!("Audio beginning in:");
    stdout.flush()?;
    thread::sleep(Duration::from_secs(1));
    for n in (1..=COUNTDOWN_SECS).rev() {
        if n == 1 {
            println!("{}...", n);
        } else {
            print!("{}... ", n);
        }
        stdout.flush()?;
        thread::sleep(Duration::from_secs(1));
    }
    Ok(())
}

/// Plays a stream on the default device, stopping early on Ctrl-C.
fn play_live<S>(samples: S, sample_rate: u32) -> Result<SinkReport>
where
    S: Iterator<Item = f32> + Send + 'static,
{
    let sink = LivePlaybackSink::new();
    let handle = sink.handle();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start signal handling runtime")?;

    runtime.block_on(async move {
        let mut playback =
            tokio::task::spawn_blocking(move || sink.consume(samples, sample_rate));

        let joined = tokio::select! {
            joined = &mut playback => joined,
            Ok(()) = tokio::signal::ctrl_c() => {
                handle.interrupt();
                playback.await
            }
        };

        let report = joined
            .context("Playback thread failed")?
            .context("Audio playback failed")?;
        Ok::<_, anyhow::Error>(report)
    })
}
