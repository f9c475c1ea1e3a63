//! FFT wrapper and magnitude spectra of real signals.

use rustfft::{FftPlanner, num_complex::Complex};
use std::sync::Arc;

/// Floor applied before taking logarithms, in linear magnitude.
const MAG_FLOOR: f64 = 1e-300;

/// Forward and inverse FFT plans for one length.
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f64>>,
    ifft: Arc<dyn rustfft::Fft<f64>>,
    size: usize,
}

impl Fft {
    /// Plan transforms of length `size`.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            fft: planner.plan_fft_forward(size),
            ifft: planner.plan_fft_inverse(size),
            size,
        }
    }

    /// Transform length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Full complex spectrum of a real input, zero-padded or truncated to
    /// the transform length.
    pub fn forward_full(&self, input: &[f64]) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> =
            input.iter().map(|&x| Complex::new(x, 0.0)).collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));
        self.fft.process(&mut buffer);
        buffer
    }

    /// Positive-frequency half of the spectrum (`size / 2 + 1` bins).
    pub fn forward(&self, input: &[f64]) -> Vec<Complex<f64>> {
        let mut buffer = self.forward_full(input);
        buffer.truncate(self.size / 2 + 1);
        buffer
    }

    /// Real signal from a full complex spectrum, normalized by `1 / size`.
    pub fn inverse_full(&self, spectrum: &[Complex<f64>]) -> Vec<f64> {
        let mut buffer = spectrum.to_vec();
        buffer.resize(self.size, Complex::new(0.0, 0.0));
        self.ifft.process(&mut buffer);
        let scale = 1.0 / self.size as f64;
        buffer.iter().map(|c| c.re * scale).collect()
    }

    /// Real signal from a positive-frequency half spectrum.
    ///
    /// The negative frequencies are rebuilt by conjugate symmetry.
    pub fn inverse(&self, half: &[Complex<f64>]) -> Vec<f64> {
        let mut full = vec![Complex::new(0.0, 0.0); self.size];
        let kept = half.len().min(self.size / 2 + 1);
        full[..kept].copy_from_slice(&half[..kept]);
        for k in kept..self.size {
            let mirror = self.size - k;
            if mirror < kept {
                full[k] = half[mirror].conj();
            }
        }
        self.inverse_full(&full)
    }
}

/// Magnitude spectrum of a real signal with its frequency axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    freqs: Vec<f64>,
    magnitude: Vec<f64>,
}

impl Spectrum {
    /// Real-FFT spectrum of `signal` sampled at `fs`.
    ///
    /// Bin `k` sits at `k · fs / n` for `k = 0..=n/2`; magnitudes are
    /// unnormalized `|X[k]|`.
    pub fn of(signal: &[f64], fs: f64) -> Self {
        let n = signal.len();
        if n == 0 {
            return Self {
                freqs: Vec::new(),
                magnitude: Vec::new(),
            };
        }
        let bins = Fft::new(n).forward(signal);
        Self {
            freqs: rfft_freqs(n, fs),
            magnitude: bins.iter().map(|c| c.norm()).collect(),
        }
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.magnitude.len()
    }

    /// `true` for the spectrum of an empty signal.
    pub fn is_empty(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// Bin frequencies.
    pub fn freqs(&self) -> &[f64] {
        &self.freqs
    }

    /// Linear magnitudes.
    pub fn magnitude(&self) -> &[f64] {
        &self.magnitude
    }

    /// Magnitudes as `20·log10|X|`.
    pub fn magnitude_db(&self) -> Vec<f64> {
        magnitude_db(&self.magnitude)
    }

    /// Bin with the largest magnitude, ignoring DC.
    pub fn peak_bin(&self) -> Option<usize> {
        self.magnitude
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k)
    }

    /// Up to `count` local maxima as `(frequency, dB)`, loudest first.
    pub fn peaks(&self, count: usize) -> Vec<(f64, f64)> {
        let m = &self.magnitude;
        let mut found: Vec<usize> = (1..m.len())
            .filter(|&k| {
                let left = m[k - 1];
                let right = m.get(k + 1).copied().unwrap_or(0.0);
                m[k] > left && m[k] >= right
            })
            .collect();
        found.sort_by(|&a, &b| m[b].total_cmp(&m[a]));
        found.truncate(count);
        found
            .into_iter()
            .map(|k| (self.freqs[k], to_db(m[k])))
            .collect()
    }
}

/// Frequencies of the `n / 2 + 1` real-FFT bins.
pub fn rfft_freqs(n: usize, fs: f64) -> Vec<f64> {
    let df = fs / n as f64;
    (0..=n / 2).map(|k| k as f64 * df).collect()
}

/// `20·log10` of each magnitude.
pub fn magnitude_db(magnitude: &[f64]) -> Vec<f64> {
    magnitude.iter().map(|&m| to_db(m)).collect()
}

fn to_db(m: f64) -> f64 {
    20.0 * m.max(MAG_FLOOR).log10()
}
