//! Farnsworth timing derived from character and effective speed.
//!
//! Both speeds are in words per minute using the standard "PARIS" word
//! of 50 units. Marks are always sent at the character speed; when the
//! effective speed is lower, the extra time is spread over the gaps
//! between letters and words.

use crate::error::{MorseError, Result};

/// Default character speed in words per minute.
pub const DEFAULT_CHARACTER_SPEED: f64 = 20.0;

/// Default effective (Farnsworth) speed in words per minute.
pub const DEFAULT_EFFECTIVE_SPEED: f64 = 20.0;

/// Character and effective speed for one synthesis session.
///
/// The effective speed never exceeds the character speed: if it does at
/// construction, the character speed is raised to match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedParameters {
    character_speed: f64,
    effective_speed: f64,
}

impl SpeedParameters {
    /// Creates validated speed parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSpeed` if either speed is not a positive finite number.
    pub fn new(character_speed: f64, effective_speed: f64) -> Result<Self> {
        check_speed("character speed", character_speed)?;
        check_speed("effective speed", effective_speed)?;

        Ok(Self {
            character_speed: character_speed.max(effective_speed),
            effective_speed,
        })
    }

    /// Mark speed in words per minute.
    pub fn character_speed(&self) -> f64 {
        self.character_speed
    }

    /// Overall speed in words per minute.
    pub fn effective_speed(&self) -> f64 {
        self.effective_speed
    }

    /// Derives the timing constants for these speeds.
    pub fn timing(&self) -> TimingConstants {
        TimingConstants::compute(self.character_speed, self.effective_speed)
    }
}

impl Default for SpeedParameters {
    fn default() -> Self {
        Self {
            character_speed: DEFAULT_CHARACTER_SPEED,
            effective_speed: DEFAULT_EFFECTIVE_SPEED,
        }
    }
}

fn check_speed(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MorseError::InvalidSpeed { name, value })
    }
}

/// All durations, in seconds, needed to time out a message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingConstants {
    /// Length of a dot.
    pub dot_seconds: f64,
    /// Length of a dash (three dots).
    pub dash_seconds: f64,
    /// Silence between marks of the same unit.
    pub intra_letter_gap_seconds: f64,
    /// Silence after the last mark of a unit.
    pub inter_letter_gap_seconds: f64,
    /// Silence emitted for a word space.
    pub inter_word_gap_seconds: f64,
}

impl TimingConstants {
    /// Computes timing for the given speeds.
    ///
    /// The caller is responsible for `effective_speed <= character_speed`;
    /// use [`SpeedParameters`] to get that clamping.
    pub fn compute(character_speed: f64, effective_speed: f64) -> Self {
        let dot = 1.2 / character_speed;
        let farnsworth_unit = (60.0 * character_speed - 37.2 * effective_speed)
            / (character_speed * effective_speed);

        Self {
            dot_seconds: dot,
            dash_seconds: dot * 3.0,
            intra_letter_gap_seconds: dot,
            inter_letter_gap_seconds: (farnsworth_unit * 3.0) / 19.0,
            inter_word_gap_seconds: (farnsworth_unit * 7.0) / 19.0,
        }
    }

    /// Bit-exact key used to tell timing configurations apart in caches.
    pub(crate) fn cache_key(&self) -> [u64; 5] {
        [
            self.dot_seconds.to_bits(),
            self.dash_seconds.to_bits(),
            self.intra_letter_gap_seconds.to_bits(),
            self.inter_letter_gap_seconds.to_bits(),
            self.inter_word_gap_seconds.to_bits(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_dot_length_at_twenty_wpm() {
        let timing = TimingConstants::compute(20.0, 20.0);
        assert_eq!(timing.dot_seconds, 1.2 / 20.0);
        assert!(approx_eq(timing.dot_seconds, 0.06));
        assert_eq!(timing.dash_seconds, timing.dot_seconds * 3.0);
        assert_eq!(timing.intra_letter_gap_seconds, timing.dot_seconds);
    }

    #[test]
    fn test_equal_speeds_give_standard_ratios() {
        for wpm in [5.0, 12.5, 20.0, 35.0, 60.0] {
            let timing = TimingConstants::compute(wpm, wpm);
            assert!(approx_eq(
                timing.inter_letter_gap_seconds,
                3.0 * timing.dot_seconds
            ));
            assert!(approx_eq(
                timing.inter_word_gap_seconds,
                7.0 * timing.dot_seconds
            ));
        }
    }

    #[test]
    fn test_farnsworth_gaps_match_formula() {
        let timing = TimingConstants::compute(20.0, 10.0);
        let unit = (60.0 * 20.0 - 37.2 * 10.0) / (20.0 * 10.0);
        assert_eq!(timing.inter_letter_gap_seconds, unit * 3.0 / 19.0);
        assert_eq!(timing.inter_word_gap_seconds, unit * 7.0 / 19.0);
        assert!(approx_eq(timing.dot_seconds, 0.06));
    }

    #[test]
    fn test_slower_effective_speed_widens_gaps() {
        let normal = SpeedParameters::new(20.0, 20.0).unwrap().timing();
        let slow = SpeedParameters::new(20.0, 10.0).unwrap();
        assert_eq!(slow.effective_speed(), 10.0);
        assert_eq!(slow.character_speed(), 20.0);

        let slow = slow.timing();
        assert!(slow.inter_letter_gap_seconds > normal.inter_letter_gap_seconds);
        assert!(slow.inter_word_gap_seconds > normal.inter_word_gap_seconds);
        assert_eq!(slow.dot_seconds, normal.dot_seconds);
    }

    #[test]
    fn test_character_speed_raised_to_effective() {
        let speeds = SpeedParameters::new(10.0, 25.0).unwrap();
        assert_eq!(speeds.character_speed(), 25.0);
        assert_eq!(speeds.effective_speed(), 25.0);
    }

    #[test]
    fn test_rejects_non_positive_speeds() {
        assert!(matches!(
            SpeedParameters::new(0.0, 10.0),
            Err(MorseError::InvalidSpeed {
                name: "character speed",
                ..
            })
        ));
        assert!(matches!(
            SpeedParameters::new(20.0, -5.0),
            Err(MorseError::InvalidSpeed {
                name: "effective speed",
                ..
            })
        ));
        assert!(SpeedParameters::new(f64::NAN, 10.0).is_err());
    }
}
