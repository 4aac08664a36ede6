//! Morse timing and audio synthesis.
//!
//! This module turns a sequence of symbolic units into a filtered,
//! lazily generated stream of audio samples:
//! - [`alphabet`]: the static unit-to-marks table
//! - [`timing`]: Farnsworth timing derived from two speeds
//! - [`renderer`]: per-unit tone/silence segments with a cache
//! - [`synth`]: whole-message synthesis into a sample stream
//! - [`filter`]: the band-pass cascade applied to that stream

pub mod alphabet;
pub mod filter;
pub mod renderer;
pub mod synth;
pub mod timing;

pub use alphabet::{lookup, lookup_token, Mark, MarkSequence, Prosign, SymbolicUnit};
pub use renderer::{LetterRenderer, RenderedUnit, Segment};
pub use synth::{
    FilteredStream, MessageSynthesizer, RenderedMessage, SampleStream, SynthesisParams,
    SAMPLE_RATE,
};
pub use timing::{SpeedParameters, TimingConstants};

use crate::error::{MorseError, Result};

/// Splits free text into symbolic units.
///
/// Text is uppercased. A prosign is written by name in angle brackets,
/// e.g. `<BT>`. Runs of whitespace become a single word space, and
/// leading or trailing whitespace is dropped. Characters without a Morse
/// code are kept as units; synthesis reports them.
///
/// # Errors
///
/// Returns `UnknownSymbol` for a bracketed name that is not a prosign or
/// an unterminated bracket.
///
/// # Examples
///
/// ```
/// use koch_trainer::morse::{tokenize, Prosign, SymbolicUnit};
///
/// let units = tokenize("cq <bt>").unwrap();
/// assert_eq!(
///     units,
///     vec![
///         SymbolicUnit::Char('C'),
///         SymbolicUnit::Char('Q'),
///         SymbolicUnit::SPACE,
///         SymbolicUnit::Prosign(Prosign::BT),
///     ]
/// );
/// ```
pub fn tokenize(text: &str) -> Result<Vec<SymbolicUnit>> {
    let mut units = Vec::new();
    let mut pending_space = false;
    let text = text.trim();
    let mut chars = text.char_indices();

    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            units.push(SymbolicUnit::SPACE);
            pending_space = false;
        }

        if c == '<' {
            let rest = &text[start + 1..];
            let name = match rest.find('>') {
                Some(end) => &rest[..end],
                None => {
                    return Err(MorseError::UnknownSymbol {
                        unit: format!("<{}", rest),
                        index: units.len(),
                    })
                }
            };
            let prosign = Prosign::from_name(name).ok_or_else(|| MorseError::UnknownSymbol {
                unit: format!("<{}>", name),
                index: units.len(),
            })?;
            units.push(SymbolicUnit::Prosign(prosign));
            // Skip the name and the closing bracket.
            for _ in 0..name.chars().count() + 1 {
                chars.next();
            }
            continue;
        }

        units.push(SymbolicUnit::from(c));
    }

    Ok(units)
}

/// Writes units back as text, prosigns in angle brackets.
pub fn units_to_text(units: &[SymbolicUnit]) -> String {
    units.iter().map(|u| u.to_string()).collect()
}
