//! Aliasing measurement for periodic test tones.
//!
//! A memoryless nonlinearity applied to a tone at bin `k0` of an `n`-point
//! period produces energy only at multiples `h·k0`. Harmonics with
//! `h·k0 ≤ n/2` land where they belong; the rest fold back around Nyquist
//! into bins that are not harmonics of the tone. For a bin-centered tone
//! every output bin is therefore either a harmonic bin or an alias bin, and
//!
//! ```text
//! ratio_db = 10·log10( Σ alias power / Σ harmonic power )
//! ```
//!
//! measures how much of the output is aliasing. DC is excluded from both
//! sums. Choose `k0` coprime to `n` so that folded images never land on a
//! harmonic bin.

use crate::error::{AnalysisError, Result};
use crate::spectrum::Spectrum;

/// Harmonic and aliased power of one signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AliasingReport {
    /// Power in the harmonic bins `h·k0 ≤ n/2`.
    pub harmonic_power: f64,
    /// Power in every other non-DC bin.
    pub alias_power: f64,
}

impl AliasingReport {
    /// Measure `signal`, one period of a tone whose fundamental sits in
    /// real-FFT bin `fundamental_bin`.
    pub fn measure(signal: &[f64], fundamental_bin: usize) -> Result<Self> {
        if signal.is_empty() {
            return Err(AnalysisError::EmptySignal);
        }
        let nyquist = signal.len() / 2;
        if fundamental_bin == 0 || fundamental_bin > nyquist {
            return Err(AnalysisError::InvalidBin {
                bin: fundamental_bin,
                nyquist,
            });
        }

        let spectrum = Spectrum::of(signal, 1.0);
        let mut harmonic_power = 0.0;
        let mut alias_power = 0.0;
        for (k, m) in spectrum.magnitude().iter().enumerate().skip(1) {
            if k % fundamental_bin == 0 {
                harmonic_power += m * m;
            } else {
                alias_power += m * m;
            }
        }
        Ok(Self {
            harmonic_power,
            alias_power,
        })
    }

    /// Alias-to-harmonic power ratio in dB.
    pub fn ratio_db(&self) -> f64 {
        10.0 * (self.alias_power.max(f64::MIN_POSITIVE) / self.harmonic_power).log10()
    }
}

/// Bin of the tone nearest to `freq` (cycles per sample) in an `n`-point
/// period.
pub fn nearest_bin(freq: f64, n: usize) -> usize {
    (freq.abs() * n as f64).round() as usize
}

/// Alias-to-harmonic ratio of `signal` in dB.
pub fn alias_ratio_db(signal: &[f64], fundamental_bin: usize) -> Result<f64> {
    AliasingReport::measure(signal, fundamental_bin).map(|r| r.ratio_db())
}
