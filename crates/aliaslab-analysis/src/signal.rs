//! Test-signal generation.
//!
//! Sample indices are normalized (`fs = 1`), so a tone frequency is given
//! in cycles per sample and must lie in `[-1, 1]`.
//!
//! [`DelayedSine`] produces a sine with `history` extra samples before
//! `t = 0` and arranges it as a [`TapMatrix`]: row 0 covers `t = 0..samples`
//! and row `k` the same span delayed by `k`, which is the input layout of
//! the ADAA operators and the LUT model.

use aliaslab_core::TapMatrix;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::f64::consts::PI;

use crate::error::{AnalysisError, Result};

/// Number of whole samples in `duration_sec` at `fs_hz` (truncating).
pub fn sample_count(duration_sec: f64, fs_hz: f64) -> usize {
    (duration_sec * fs_hz) as usize
}

/// Sample times from `-history / fs_hz` up to (excluding) `duration_sec`.
pub fn time_vector(duration_sec: f64, fs_hz: f64, history: usize) -> Vec<f64> {
    let step = 1.0 / fs_hz;
    let start = -(history as f64) * step;
    let n = ((duration_sec - start) / step).ceil().max(0.0) as usize;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Builder for a sine test tone and its delayed copies.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayedSine {
    samples: usize,
    freq: f64,
    mag: f64,
    history: usize,
    noise_level: f64,
    seed: u64,
}

impl DelayedSine {
    /// A noiseless tone of `samples` samples at normalized frequency `freq`
    /// and amplitude `mag`, with no history.
    pub fn new(samples: usize, freq: f64, mag: f64) -> Self {
        Self {
            samples,
            freq,
            mag,
            history: 0,
            noise_level: 0.0,
            seed: 0,
        }
    }

    /// Samples generated before `t = 0`; the matrix gets `history + 1` taps.
    pub fn with_history(mut self, history: usize) -> Self {
        self.history = history;
        self
    }

    /// Add Gaussian noise with standard deviation `level`, drawn from a
    /// generator seeded with `seed`.
    pub fn with_noise(mut self, level: f64, seed: u64) -> Self {
        self.noise_level = level;
        self.seed = seed;
        self
    }

    /// Number of output samples per row.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Normalized tone frequency.
    pub fn freq(&self) -> f64 {
        self.freq
    }

    /// The raw signal over `t = -history..samples`.
    pub fn signal(&self) -> Result<Vec<f64>> {
        if self.freq.is_nan() || self.freq.abs() > 1.0 {
            return Err(AnalysisError::InvalidFrequency(self.freq));
        }

        let start = -(self.history as i64);
        let mut sig: Vec<f64> = (start..self.samples as i64)
            .map(|t| self.mag * (2.0 * PI * self.freq * t as f64).sin())
            .collect();

        if !(self.noise_level.is_finite() && self.noise_level >= 0.0) {
            return Err(AnalysisError::InvalidNoise(self.noise_level));
        }
        if self.noise_level > 0.0 {
            let noise = Normal::new(0.0, self.noise_level)
                .map_err(|_| AnalysisError::InvalidNoise(self.noise_level))?;
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
            for s in &mut sig {
                *s += noise.sample(&mut rng);
            }
        }
        Ok(sig)
    }

    /// The tone as a tap matrix with `history + 1` rows.
    pub fn matrix(&self) -> Result<TapMatrix> {
        let sig = self.signal()?;
        Ok(TapMatrix::sliding(&sig, self.history + 1)?)
    }

    /// Row 0 only: the tone over `t = 0..samples`.
    pub fn current(&self) -> Result<Vec<f64>> {
        let sig = self.signal()?;
        Ok(sig[self.history..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_truncates() {
        assert_eq!(sample_count(1.0, 48000.0), 48000);
        assert_eq!(sample_count(0.0105, 1000.0), 10);
    }

    #[test]
    fn time_vector_includes_history() {
        let t = time_vector(1.0, 4.0, 2);
        assert_eq!(t, vec![-0.5, -0.25, 0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn rows_are_delayed_copies() {
        let tone = DelayedSine::new(32, 0.05, 2.0).with_history(3);
        let x = tone.matrix().unwrap();
        assert_eq!(x.taps(), 4);
        assert_eq!(x.samples(), 32);
        for k in 1..4 {
            assert_eq!(&x.row(k)[k..], &x.row(0)[..32 - k]);
        }
        // row k starts k samples before t = 0
        let expected = 2.0 * (2.0 * PI * 0.05 * -3.0).sin();
        assert!((x.row(3)[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn current_matches_row_zero() {
        let tone = DelayedSine::new(16, 0.2, 1.0).with_history(2);
        assert_eq!(tone.current().unwrap(), tone.matrix().unwrap().row(0));
    }

    #[test]
    fn amplitude_is_respected() {
        let sig = DelayedSine::new(400, 0.01, 3.0).signal().unwrap();
        let peak = sig.iter().fold(0.0f64, |a, v| a.max(v.abs()));
        assert!((peak - 3.0).abs() < 1e-3);
    }

    #[test]
    fn noise_is_seeded() {
        let a = DelayedSine::new(64, 0.1, 1.0).with_noise(0.1, 7);
        let b = DelayedSine::new(64, 0.1, 1.0).with_noise(0.1, 7);
        let clean = DelayedSine::new(64, 0.1, 1.0).signal().unwrap();
        let noisy = a.signal().unwrap();
        assert_eq!(noisy, b.signal().unwrap());
        assert!(noisy.iter().zip(&clean).any(|(n, c)| n != c));
    }

    #[test]
    fn rejects_bad_parameters() {
        assert_eq!(
            DelayedSine::new(8, 1.5, 1.0).signal(),
            Err(AnalysisError::InvalidFrequency(1.5))
        );
        assert_eq!(
            DelayedSine::new(8, 0.1, 1.0).with_noise(-1.0, 0).signal(),
            Err(AnalysisError::InvalidNoise(-1.0))
        );
        let nan = DelayedSine::new(8, 0.1, 1.0)
            .with_noise(f64::NAN, 0)
            .signal();
        assert!(matches!(nan, Err(AnalysisError::InvalidNoise(v)) if v.is_nan()));
        assert_eq!(
            DelayedSine::new(8, 0.1, 1.0)
                .with_noise(f64::INFINITY, 0)
                .signal(),
            Err(AnalysisError::InvalidNoise(f64::INFINITY))
        );
    }

    #[test]
    fn zero_noise_matches_clean_tone() {
        let clean = DelayedSine::new(32, 0.1, 1.0).signal().unwrap();
        let quiet = DelayedSine::new(32, 0.1, 1.0)
            .with_noise(0.0, 9)
            .signal()
            .unwrap();
        assert_eq!(quiet, clean);
    }
}
