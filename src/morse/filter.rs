//! Band-pass filtering of a sample stream.
//!
//! A single second-order band-pass stage is cheap but leaves audible
//! key clicks at tone edges, so the stream is passed through three
//! identical stages in series. Each stage is normalized to unity gain
//! at the center frequency, so the cascade does not change the tone level.

use crate::error::{MorseError, Result};
use biquad::{Biquad, Coefficients, DirectForm2Transposed, ToHertz};

/// Default filter bandwidth in Hz, centered on the tone.
pub const DEFAULT_BANDWIDTH: f64 = 200.0;

/// One band-pass stage pulling from an upstream sample iterator.
pub struct BandPass<I> {
    upstream: I,
    filter: DirectForm2Transposed<f32>,
}

impl<I> BandPass<I>
where
    I: Iterator<Item = f32>,
{
    /// Wraps `upstream` with a band-pass filter.
    ///
    /// The filter Q is `center / bandwidth`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFilter` if the center frequency or bandwidth is not
    /// positive, or the center lies at or above the Nyquist frequency.
    pub fn new(upstream: I, center: f64, bandwidth: f64, sample_rate: u32) -> Result<Self> {
        let coeffs = band_pass_coefficients(center, bandwidth, sample_rate)?;
        Ok(Self {
            upstream,
            filter: DirectForm2Transposed::<f32>::new(coeffs),
        })
    }
}

impl<I> Iterator for BandPass<I>
where
    I: Iterator<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.upstream.next()?;
        Some(self.filter.run(sample))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.upstream.size_hint()
    }
}

/// The full cascade: three band-pass stages in series.
pub type FilterChain<I> = BandPass<BandPass<BandPass<I>>>;

/// Builds the three-stage cascade around `upstream`.
pub fn filter_chain<I>(
    upstream: I,
    center: f64,
    bandwidth: f64,
    sample_rate: u32,
) -> Result<FilterChain<I>>
where
    I: Iterator<Item = f32>,
{
    let first = BandPass::new(upstream, center, bandwidth, sample_rate)?;
    let second = BandPass::new(first, center, bandwidth, sample_rate)?;
    BandPass::new(second, center, bandwidth, sample_rate)
}

/// Checks that a filter with these parameters can be built.
pub fn validate_filter(center: f64, bandwidth: f64, sample_rate: u32) -> Result<()> {
    band_pass_coefficients(center, bandwidth, sample_rate).map(|_| ())
}

fn band_pass_coefficients(
    center: f64,
    bandwidth: f64,
    sample_rate: u32,
) -> Result<Coefficients<f32>> {
    if !(center.is_finite() && center > 0.0) {
        return Err(MorseError::InvalidFilter(format!(
            "center frequency must be positive, got {}",
            center
        )));
    }
    if !(bandwidth.is_finite() && bandwidth > 0.0) {
        return Err(MorseError::InvalidFilter(format!(
            "bandwidth must be positive, got {}",
            bandwidth
        )));
    }
    let nyquist = sample_rate as f64 / 2.0;
    if center >= nyquist {
        return Err(MorseError::InvalidFilter(format!(
            "center frequency {} Hz is not below the Nyquist frequency {} Hz",
            center, nyquist
        )));
    }

    let q = (center / bandwidth) as f32;
    let mut coeffs = Coefficients::<f32>::from_params(
        biquad::Type::BandPass,
        (sample_rate as f32).hz(),
        (center as f32).hz(),
        q,
    )
    .map_err(|e| MorseError::InvalidFilter(format!("{:?}", e)))?;

    // The constant-skirt band-pass peaks at Q; scale to 0 dB at center.
    coeffs.b0 /= q;
    coeffs.b1 /= q;
    coeffs.b2 /= q;
    Ok(coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 44100;

    fn sine(frequency: f64, samples: usize) -> impl Iterator<Item = f32> {
        (0..samples).map(move |n| {
            (std::f64::consts::TAU * frequency * n as f64 / RATE as f64).sin() as f32
        })
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn test_preserves_length() {
        let chain = filter_chain(sine(770.0, 1000), 770.0, 200.0, RATE).unwrap();
        assert_eq!(chain.size_hint(), (1000, Some(1000)));
        assert_eq!(chain.count(), 1000);
    }

    #[test]
    fn test_passes_center_rejects_far_tone() {
        let n = RATE as usize / 2;
        let pass: Vec<f32> = filter_chain(sine(770.0, n), 770.0, 200.0, RATE)
            .unwrap()
            .collect();
        let stop: Vec<f32> = filter_chain(sine(5000.0, n), 770.0, 200.0, RATE)
            .unwrap()
            .collect();

        // Skip the settling time of the cascade.
        let pass = rms(&pass[n / 2..]);
        let stop = rms(&stop[n / 2..]);
        assert!(pass > 0.5, "center tone attenuated to {}", pass);
        assert!(stop < pass / 100.0, "far tone leaked at {}", stop);
    }

    #[test]
    fn test_center_tone_keeps_its_level() {
        let n = RATE as usize / 2;
        let input: Vec<f32> = sine(770.0, n).collect();
        let single: Vec<f32> = BandPass::new(input.iter().copied(), 770.0, 200.0, RATE)
            .unwrap()
            .collect();
        let chain: Vec<f32> = filter_chain(input.iter().copied(), 770.0, 200.0, RATE)
            .unwrap()
            .collect();

        let expected = rms(&input[n / 2..]);
        let single = rms(&single[n / 2..]);
        let chain = rms(&chain[n / 2..]);
        assert!((single / expected - 1.0).abs() < 0.03, "one stage at {}", single);
        assert!((chain / expected - 1.0).abs() < 0.03, "cascade at {}", chain);

        let peak = filter_chain(sine(770.0, n), 770.0, 200.0, RATE)
            .unwrap()
            .fold(0.0f32, |peak, s| peak.max(s.abs()));
        assert!(peak < 1.05, "peak {}", peak);
    }

    #[test]
    fn test_silence_stays_silent() {
        let mut chain = filter_chain(std::iter::repeat(0.0).take(512), 770.0, 200.0, RATE).unwrap();
        assert!(chain.all(|s| s == 0.0));
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(matches!(
            validate_filter(770.0, 0.0, RATE),
            Err(MorseError::InvalidFilter(_))
        ));
        assert!(matches!(
            validate_filter(-1.0, 200.0, RATE),
            Err(MorseError::InvalidFilter(_))
        ));
        assert!(matches!(
            validate_filter(30000.0, 200.0, RATE),
            Err(MorseError::InvalidFilter(_))
        ));
        assert!(validate_filter(770.0, 200.0, RATE).is_ok());
    }
}
