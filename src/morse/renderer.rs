//! Timed rendering of single units with a per-instance cache.

use super::alphabet::{self, Mark, MarkSequence, SymbolicUnit};
use super::timing::TimingConstants;
use std::collections::HashMap;
use std::sync::Arc;

/// Gain applied to every tone, in dB below full scale.
///
/// Leaves headroom for the band-pass cascade, which rings slightly at
/// tone edges.
pub const TONE_GAIN_DB: f32 = -3.0;

/// One timed piece of a rendered unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// A sine tone.
    Tone {
        /// Length in seconds.
        seconds: f64,
        /// Tone frequency in Hz.
        frequency: f64,
        /// Linear peak amplitude.
        amplitude: f32,
    },
    /// Silence.
    Silence {
        /// Length in seconds.
        seconds: f64,
    },
}

impl Segment {
    /// Length of the segment in seconds.
    pub fn seconds(&self) -> f64 {
        match *self {
            Segment::Tone { seconds, .. } | Segment::Silence { seconds } => seconds,
        }
    }

    /// Returns true for tone segments.
    pub fn is_tone(&self) -> bool {
        matches!(self, Segment::Tone { .. })
    }
}

/// A unit fully timed out, including its trailing gap.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedUnit {
    /// The unit this was rendered from.
    pub unit: SymbolicUnit,
    /// Tones and silences in playback order.
    pub segments: Vec<Segment>,
}

/// Cache key. Timing and frequency are part of it so that entries from
/// one configuration can never be served for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RenderKey {
    unit: SymbolicUnit,
    timing: [u64; 5],
    frequency: u64,
}

/// Renders units into tone/silence segments for one fixed timing and
/// tone frequency, memoizing each distinct unit.
#[derive(Debug)]
pub struct LetterRenderer {
    timing: TimingConstants,
    frequency: f64,
    amplitude: f32,
    cache: HashMap<RenderKey, Arc<RenderedUnit>>,
    hits: usize,
    misses: usize,
}

impl LetterRenderer {
    /// Creates a renderer with an empty cache.
    pub fn new(timing: TimingConstants, frequency: f64) -> Self {
        Self {
            timing,
            frequency,
            amplitude: db_to_amplitude(TONE_GAIN_DB),
            cache: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Timing this renderer was built for.
    pub fn timing(&self) -> &TimingConstants {
        &self.timing
    }

    /// Renders a unit, returning `None` if it has no Morse code.
    ///
    /// Repeated calls for the same unit return the same shared value.
    pub fn render(&mut self, unit: SymbolicUnit) -> Option<Arc<RenderedUnit>> {
        let key = RenderKey {
            unit,
            timing: self.timing.cache_key(),
            frequency: self.frequency.to_bits(),
        };

        if let Some(rendered) = self.cache.get(&key) {
            self.hits += 1;
            tracing::trace!(%unit, "render cache hit");
            return Some(Arc::clone(rendered));
        }

        let rendered = Arc::new(self.render_uncached(unit)?);
        self.misses += 1;
        tracing::trace!(%unit, segments = rendered.segments.len(), "render cache miss");
        self.cache.insert(key, Arc::clone(&rendered));
        Some(rendered)
    }

    /// Number of (hits, misses) served so far.
    pub fn cache_stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }

    fn render_uncached(&self, unit: SymbolicUnit) -> Option<RenderedUnit> {
        let segments = match alphabet::lookup(unit)? {
            MarkSequence::WordSpace => vec![Segment::Silence {
                seconds: self.timing.inter_word_gap_seconds,
            }],
            MarkSequence::Marks(marks) => {
                let mut segments = Vec::with_capacity(marks.len() * 2);
                for (i, mark) in marks.iter().enumerate() {
                    let seconds = match mark {
                        Mark::Dot => self.timing.dot_seconds,
                        Mark::Dash => self.timing.dash_seconds,
                    };
                    segments.push(Segment::Tone {
                        seconds,
                        frequency: self.frequency,
                        amplitude: self.amplitude,
                    });

                    let gap = if i + 1 < marks.len() {
                        self.timing.intra_letter_gap_seconds
                    } else {
                        self.timing.inter_letter_gap_seconds
                    };
                    segments.push(Segment::Silence { seconds: gap });
                }
                segments
            }
        };

        Some(RenderedUnit { unit, segments })
    }
}

/// Converts a gain in dB to a linear amplitude factor.
pub fn db_to_amplitude(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}
