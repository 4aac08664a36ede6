//! Message synthesis: units in, lazily generated samples out.
//!
//! A message is first rendered unit by unit (through the renderer's
//! cache) into a [`RenderedMessage`]. Every unit is resolved before any
//! sample exists, so an unknown symbol fails the whole message up front.
//! The rendered message is then turned into a [`SampleStream`], which
//! produces samples segment by segment on demand.

use super::alphabet::SymbolicUnit;
use super::filter::{self, FilterChain, DEFAULT_BANDWIDTH};
use super::renderer::{LetterRenderer, RenderedUnit, Segment};
use super::timing::SpeedParameters;
use crate::error::{MorseError, Result};
use std::sync::Arc;
use std::vec;

/// Output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44100;

/// Default tone frequency in Hz.
pub const DEFAULT_TONE_FREQUENCY: f64 = 770.0;

/// Everything that shapes the synthesized audio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisParams {
    /// Character and effective speed.
    pub speeds: SpeedParameters,
    /// Tone frequency in Hz, also the filter center.
    pub tone_frequency: f64,
    /// Filter bandwidth in Hz.
    pub bandwidth: f64,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl SynthesisParams {
    /// Checks that the filter can be realised at the configured sample rate.
    pub fn validate(&self) -> Result<()> {
        filter::validate_filter(self.tone_frequency, self.bandwidth, self.sample_rate)
    }
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            speeds: SpeedParameters::default(),
            tone_frequency: DEFAULT_TONE_FREQUENCY,
            bandwidth: DEFAULT_BANDWIDTH,
            sample_rate: SAMPLE_RATE,
        }
    }
}

/// A filtered message ready for a sink.
pub type FilteredStream = FilterChain<SampleStream>;

/// Synthesizes messages for one fixed set of parameters.
///
/// Owns its render cache; create one per session.
#[derive(Debug)]
pub struct MessageSynthesizer {
    params: SynthesisParams,
    renderer: LetterRenderer,
}

impl MessageSynthesizer {
    /// Creates a synthesizer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFilter` if the tone frequency and bandwidth cannot
    /// be realised at the sample rate.
    pub fn new(params: SynthesisParams) -> Result<Self> {
        params.validate()?;

        let timing = params.speeds.timing();
        tracing::debug!(
            character_speed = params.speeds.character_speed(),
            effective_speed = params.speeds.effective_speed(),
            dot = timing.dot_seconds,
            inter_letter = timing.inter_letter_gap_seconds,
            inter_word = timing.inter_word_gap_seconds,
            "derived timing"
        );

        Ok(Self {
            params,
            renderer: LetterRenderer::new(timing, params.tone_frequency),
        })
    }

    /// The parameters this synthesizer was built with.
    pub fn params(&self) -> &SynthesisParams {
        &self.params
    }

    /// Render cache (hits, misses) so far.
    pub fn cache_stats(&self) -> (usize, usize) {
        self.renderer.cache_stats()
    }

    /// Resolves and times every unit of a message.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSymbol` for the first unit without a Morse code.
    pub fn render_message(&mut self, units: &[SymbolicUnit]) -> Result<RenderedMessage> {
        let mut rendered = Vec::with_capacity(units.len());
        for (index, &unit) in units.iter().enumerate() {
            let unit_audio = self
                .renderer
                .render(unit)
                .ok_or_else(|| MorseError::UnknownSymbol {
                    unit: unit.to_string(),
                    index,
                })?;
            rendered.push(unit_audio);
        }
        Ok(RenderedMessage { units: rendered })
    }

    /// Synthesizes a message into an unfiltered sample stream.
    pub fn raw_samples(&mut self, units: &[SymbolicUnit]) -> Result<SampleStream> {
        let message = self.render_message(units)?;
        Ok(message.into_samples(self.params.sample_rate))
    }

    /// Synthesizes a message into its filtered sample stream.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSymbol` if any unit has no Morse code; no stream is
    /// produced in that case.
    pub fn synthesize(&mut self, units: &[SymbolicUnit]) -> Result<FilteredStream> {
        let message = self.render_message(units)?;
        tracing::info!(
            units = units.len(),
            seconds = message.seconds(),
            "synthesizing message"
        );

        let samples = message.into_samples(self.params.sample_rate);
        filter::filter_chain(
            samples,
            self.params.tone_frequency,
            self.params.bandwidth,
            self.params.sample_rate,
        )
    }
}

/// A message whose units are all resolved and timed.
#[derive(Debug, Clone)]
pub struct RenderedMessage {
    units: Vec<Arc<RenderedUnit>>,
}

impl RenderedMessage {
    /// The rendered units in message order.
    pub fn units(&self) -> &[Arc<RenderedUnit>] {
        &self.units
    }

    /// Iterates every segment of the message in order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.units.iter().flat_map(|unit| unit.segments.iter())
    }

    /// Total duration in seconds.
    ///
    /// Summed segment by segment in playback order, the same way
    /// [`SampleStream`] advances its clock.
    pub fn seconds(&self) -> f64 {
        self.segments().fold(0.0, |total, s| total + s.seconds())
    }

    /// Converts the message into a lazy sample stream.
    pub fn into_samples(self, sample_rate: u32) -> SampleStream {
        let total_samples = seconds_to_samples(self.seconds(), sample_rate);
        SampleStream {
            segments: SegmentCursor {
                units: self.units.into_iter(),
                current: None,
                next_segment: 0,
            },
            sample_rate,
            segment: Segment::Silence { seconds: 0.0 },
            clock_seconds: 0.0,
            position: 0,
            segment_start: 0,
            segment_end: 0,
            total_samples,
        }
    }
}

/// Walks the segments of shared rendered units without copying them out.
#[derive(Debug)]
struct SegmentCursor {
    units: vec::IntoIter<Arc<RenderedUnit>>,
    current: Option<Arc<RenderedUnit>>,
    next_segment: usize,
}

impl Iterator for SegmentCursor {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        loop {
            if let Some(unit) = &self.current {
                if let Some(segment) = unit.segments.get(self.next_segment) {
                    self.next_segment += 1;
                    return Some(*segment);
                }
            }
            self.current = Some(self.units.next()?);
            self.next_segment = 0;
        }
    }
}

/// Single-pass stream of mono samples for a rendered message.
///
/// Segment boundaries are placed on a running clock, rounded to the
/// nearest sample, so the total length never drifts from the message
/// duration by more than one sample. Each tone starts at zero phase.
#[derive(Debug)]
pub struct SampleStream {
    segments: SegmentCursor,
    sample_rate: u32,
    segment: Segment,
    clock_seconds: f64,
    position: u64,
    segment_start: u64,
    segment_end: u64,
    total_samples: u64,
}

impl SampleStream {
    /// Number of samples the stream yields in total.
    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    fn sample_at(&self, offset: u64) -> f32 {
        match self.segment {
            Segment::Tone {
                frequency,
                amplitude,
                ..
            } => {
                let t = offset as f64 / self.sample_rate as f64;
                amplitude * (std::f64::consts::TAU * frequency * t).sin() as f32
            }
            Segment::Silence { .. } => 0.0,
        }
    }
}

impl Iterator for SampleStream {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        while self.position >= self.segment_end {
            self.segment = self.segments.next()?;
            self.clock_seconds += self.segment.seconds();
            self.segment_start = self.position;
            self.segment_end = seconds_to_samples(self.clock_seconds, self.sample_rate);
        }

        let sample = self.sample_at(self.position - self.segment_start);
        self.position += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total_samples.saturating_sub(self.position) as usize;
        (remaining, Some(remaining))
    }
}

fn seconds_to_samples(seconds: f64, sample_rate: u32) -> u64 {
    (seconds * sample_rate as f64).round() as u64
}
