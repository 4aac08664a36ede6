//! WAV file export.
//!
//! Streams samples straight into a WAV writer; the message is never held
//! in memory as a whole.

use super::{to_pcm16, AudioSink, SinkReport};
use crate::error::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::{Path, PathBuf};

/// Samples written between progress log lines.
const PROGRESS_INTERVAL: u64 = 44100 * 10;

/// Sink that encodes a stream to a mono 16-bit PCM WAV file.
///
/// The file is created when consumption starts. If writing fails part
/// way through, the error is returned and whatever was already written
/// stays on disk with a best-effort header.
#[derive(Debug, Clone)]
pub struct WavFileSink {
    path: PathBuf,
}

impl WavFileSink {
    /// Creates a sink writing to `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl AudioSink for WavFileSink {
    fn consume<S>(self, samples: S, sample_rate: u32) -> Result<SinkReport>
    where
        S: Iterator<Item = f32> + Send + 'static,
    {
        export_to_wav(samples, sample_rate, &self.path)
    }
}

/// Writes a sample stream to a mono 16-bit WAV file.
///
/// # Errors
///
/// Returns error if the file cannot be created, or if writing or
/// finalizing the WAV data fails.
pub fn export_to_wav<S, P>(samples: S, sample_rate: u32, output_path: P) -> Result<SinkReport>
where
    S: Iterator<Item = f32>,
    P: AsRef<Path>,
{
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(output_path.as_ref(), spec)?;
    tracing::debug!(path = %output_path.as_ref().display(), "opened WAV output");

    let mut written = 0u64;
    for sample in samples {
        writer.write_sample(to_pcm16(sample))?;
        written += 1;
        if written % PROGRESS_INTERVAL == 0 {
            tracing::debug!(samples = written, "WAV export progress");
        }
    }

    writer.finalize()?;
    tracing::info!(
        path = %output_path.as_ref().display(),
        samples = written,
        "WAV export finished"
    );

    Ok(SinkReport {
        samples: written,
        interrupted: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MorseError;
    use crate::morse::{tokenize, MessageSynthesizer, SynthesisParams, SAMPLE_RATE};

    #[test]
    fn test_export_sample_count_matches_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paris.wav");

        let mut synth = MessageSynthesizer::new(SynthesisParams::default()).unwrap();
        let units = tokenize("PARIS PARIS").unwrap();
        let seconds = synth.render_message(&units).unwrap().seconds();
        let stream = synth.synthesize(&units).unwrap();

        let report = WavFileSink::new(&path).consume(stream, SAMPLE_RATE).unwrap();
        assert!(!report.interrupted);

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, SAMPLE_RATE);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len() as u64, report.samples);

        let expected = seconds * SAMPLE_RATE as f64;
        assert!((reader.len() as f64 - expected).abs() <= 1.0);
    }

    #[test]
    fn test_export_contains_tone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.wav");

        let mut synth = MessageSynthesizer::new(SynthesisParams::default()).unwrap();
        let stream = synth.synthesize(&tokenize("T").unwrap()).unwrap();
        export_to_wav(stream, SAMPLE_RATE, &path).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
        assert!(peak > 10000, "peak {}", peak);
        assert!(
            !samples.iter().any(|&s| s == i16::MAX || s == i16::MIN),
            "clipped samples in output"
        );
    }

    #[test]
    fn test_unknown_symbol_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.wav");

        let mut synth = MessageSynthesizer::new(SynthesisParams::default()).unwrap();
        let result = synth
            .synthesize(&tokenize("AB%").unwrap())
            .and_then(|stream| WavFileSink::new(&path).consume(stream, SAMPLE_RATE));

        assert!(matches!(
            result,
            Err(MorseError::UnknownSymbol { index: 2, .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.wav");
        let result = export_to_wav(std::iter::repeat(0.0).take(10), SAMPLE_RATE, &path);
        assert!(result.is_err());
    }
}
