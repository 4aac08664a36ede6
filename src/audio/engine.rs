//! Live playback of a sample stream through rodio.
//!
//! Playback blocks the calling thread for the length of the message.
//! Another thread can stop it early through a [`PlaybackHandle`]; the
//! device is released in either case.

use super::{AudioSink, SinkReport};
use crate::error::{MorseError, Result};
use crate::morse::renderer::{db_to_amplitude, TONE_GAIN_DB};
use rodio::{OutputStream, Sink, Source};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How often the blocking loop checks for completion or interruption.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Frequency of the end-of-message beep in Hz.
pub const BEEP_FREQUENCY: f64 = 440.0;

/// Length of the end-of-message beep in seconds.
pub const BEEP_SECONDS: f64 = 0.25;

/// State shared between the playback loop, the audio thread and any
/// thread that wants to interrupt.
#[derive(Debug, Default)]
struct SharedState {
    /// Set once playback should stop.
    interrupted: AtomicBool,
    /// Message samples handed to the device so far.
    played: AtomicU64,
}

/// Cloneable handle for stopping a running playback.
#[derive(Debug, Clone, Default)]
pub struct PlaybackHandle {
    state: Arc<SharedState>,
}

impl PlaybackHandle {
    /// Asks the playback to stop as soon as possible.
    pub fn interrupt(&self) {
        self.state.interrupted.store(true, Ordering::Relaxed);
    }

    /// Returns whether an interrupt was requested.
    pub fn is_interrupted(&self) -> bool {
        self.state.interrupted.load(Ordering::Relaxed)
    }

    /// Message samples handed to the device so far.
    pub fn samples_played(&self) -> u64 {
        self.state.played.load(Ordering::Relaxed)
    }
}

/// Mono audio source feeding a sample iterator to rodio.
/// Ends early once an interrupt is requested.
struct MorseSource<S> {
    samples: S,
    sample_rate: u32,
    state: Arc<SharedState>,
    /// Whether samples count toward the played total.
    counted: bool,
}

impl<S> MorseSource<S> {
    fn new(samples: S, sample_rate: u32, state: Arc<SharedState>, counted: bool) -> Self {
        Self {
            samples,
            sample_rate,
            state,
            counted,
        }
    }
}

impl<S> Iterator for MorseSource<S>
where
    S: Iterator<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.state.interrupted.load(Ordering::Relaxed) {
            return None;
        }
        let sample = self.samples.next()?;
        if self.counted {
            self.state.played.fetch_add(1, Ordering::Relaxed);
        }
        Some(sample)
    }
}

impl<S> Source for MorseSource<S>
where
    S: Iterator<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Short tone marking the end of a message.
pub fn completion_beep(sample_rate: u32) -> impl Iterator<Item = f32> + Send + 'static {
    let amplitude = db_to_amplitude(TONE_GAIN_DB);
    let len = (BEEP_SECONDS * sample_rate as f64).round() as u64;
    (0..len).map(move |n| {
        let t = n as f64 / sample_rate as f64;
        amplitude * (std::f64::consts::TAU * BEEP_FREQUENCY * t).sin() as f32
    })
}

/// Sink that plays a stream on the default output device in real time.
#[derive(Debug, Clone)]
pub struct LivePlaybackSink {
    handle: PlaybackHandle,
    beep: bool,
}

impl LivePlaybackSink {
    /// Creates a sink that plays the completion beep after the message.
    pub fn new() -> Self {
        Self {
            handle: PlaybackHandle::default(),
            beep: true,
        }
    }

    /// Disables the completion beep.
    pub fn without_beep(mut self) -> Self {
        self.beep = false;
        self
    }

    /// Handle for interrupting this sink from another thread.
    pub fn handle(&self) -> PlaybackHandle {
        self.handle.clone()
    }
}

impl Default for LivePlaybackSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for LivePlaybackSink {
    /// Plays the stream, blocking until it ends or is interrupted.
    ///
    /// # Errors
    ///
    /// Returns `AudioDevice` if no output device can be opened.
    fn consume<S>(self, samples: S, sample_rate: u32) -> Result<SinkReport>
    where
        S: Iterator<Item = f32> + Send + 'static,
    {
        let (_stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| MorseError::AudioDevice(format!("failed to open audio output: {}", e)))?;
        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| MorseError::AudioDevice(format!("failed to start playback: {}", e)))?;
        tracing::debug!(sample_rate, "opened audio output");

        let state = Arc::clone(&self.handle.state);
        sink.append(MorseSource::new(samples, sample_rate, Arc::clone(&state), true));
        if self.beep {
            sink.append(MorseSource::new(
                completion_beep(sample_rate),
                sample_rate,
                Arc::clone(&state),
                false,
            ));
        }

        while !sink.empty() {
            if self.handle.is_interrupted() {
                sink.stop();
                break;
            }
            std::thread::sleep(POLL_INTERVAL);
        }

        let report = SinkReport {
            samples: self.handle.samples_played(),
            interrupted: self.handle.is_interrupted(),
        };
        if report.interrupted {
            tracing::warn!(samples = report.samples, "playback interrupted");
        } else {
            tracing::info!(samples = report.samples, "playback finished");
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_counts_samples() {
        let handle = PlaybackHandle::default();
        let source = MorseSource::new(
            std::iter::repeat(0.25).take(100),
            8000,
            Arc::clone(&handle.state),
            true,
        );
        assert_eq!(source.channels(), 1);
        assert_eq!(source.sample_rate(), 8000);
        assert_eq!(source.total_duration(), None);

        assert_eq!(source.count(), 100);
        assert_eq!(handle.samples_played(), 100);
    }

    #[test]
    fn test_source_stops_on_interrupt() {
        let handle = PlaybackHandle::default();
        let mut source = MorseSource::new(
            std::iter::repeat(0.25),
            8000,
            Arc::clone(&handle.state),
            true,
        );

        for _ in 0..10 {
            assert_eq!(source.next(), Some(0.25));
        }
        handle.interrupt();
        assert_eq!(source.next(), None);
        assert!(handle.is_interrupted());
        assert_eq!(handle.samples_played(), 10);
    }

    #[test]
    fn test_beep_not_counted() {
        let handle = PlaybackHandle::default();
        let source = MorseSource::new(
            completion_beep(8000),
            8000,
            Arc::clone(&handle.state),
            false,
        );
        assert_eq!(source.count(), 2000);
        assert_eq!(handle.samples_played(), 0);
    }

    #[test]
    fn test_sink_handles_share_state() {
        let sink = LivePlaybackSink::new().without_beep();
        let handle = sink.handle();
        sink.handle().interrupt();
        assert!(handle.is_interrupted());
        assert!(!sink.beep);
    }
}
