//! Fourier-domain resampling and the oversampling combinator.
//!
//! [`resample`] treats its input as one period of a periodic signal: the
//! spectrum is zero-padded (upsampling) or truncated (downsampling) and
//! transformed back. Content above the new Nyquist frequency is removed
//! exactly, so down-conversion acts as an ideal brick-wall lowpass.
//!
//! For an even-length spectrum cut, the Nyquist bin is split between the
//! positive and negative halves on upsampling and folded onto itself on
//! downsampling, which keeps real signals real.
//!
//! [`oversampled`] wraps a tap-matrix transform so that it runs at `factor`
//! times the sample rate: row 0 is upsampled, the delayed rows are rebuilt
//! at the new rate, the transform runs, and its output is downsampled back.
//!
//! # Example
//!
//! ```rust
//! use aliaslab_analysis::resample::{downsample, upsample};
//!
//! let signal: Vec<f64> = (0..64)
//!     .map(|i| (2.0 * std::f64::consts::PI * 3.0 * i as f64 / 64.0).sin())
//!     .collect();
//!
//! let up = upsample(&signal, 4);
//! assert_eq!(up.len(), 256);
//!
//! let back = downsample(&up, 4);
//! assert!(back.iter().zip(&signal).all(|(a, b)| (a - b).abs() < 1e-9));
//! ```

use aliaslab_core::{CoreError, TapMatrix};
use rustfft::num_complex::Complex;

use crate::spectrum::Fft;

/// Resample one period of `signal` to `num` samples.
pub fn resample(signal: &[f64], num: usize) -> Vec<f64> {
    let n = signal.len();
    if n == 0 || num == 0 {
        return vec![0.0; num];
    }
    if num == n {
        return signal.to_vec();
    }

    let x = Fft::new(n).forward_full(signal);
    let mut y = vec![Complex::new(0.0, 0.0); num];

    let shared = n.min(num);
    let nyq = shared / 2 + 1;
    y[..nyq].copy_from_slice(&x[..nyq]);
    if shared > 2 {
        let neg = shared - nyq;
        y[num - neg..].copy_from_slice(&x[n - neg..]);
    }
    if shared % 2 == 0 {
        let h = shared / 2;
        if num < n {
            y[h] += x[n - h];
        } else {
            y[h] *= 0.5;
            y[num - h] = y[h];
        }
    }

    let scale = num as f64 / n as f64;
    Fft::new(num)
        .inverse_full(&y)
        .into_iter()
        .map(|v| v * scale)
        .collect()
}

/// Resample to `factor` times the length.
pub fn upsample(signal: &[f64], factor: usize) -> Vec<f64> {
    resample(signal, signal.len() * factor)
}

/// Resample to `1 / factor` of the length (rounded down).
///
/// # Panics
///
/// Panics if `factor` is zero.
pub fn downsample(signal: &[f64], factor: usize) -> Vec<f64> {
    assert!(factor > 0, "downsampling factor must be at least 1");
    resample(signal, signal.len() / factor)
}

/// Run `f` at `factor` times the sample rate of its input.
///
/// The returned closure has the same signature as `f`. Row 0 of the input
/// is treated as one period of a periodic signal; delayed rows at the high
/// rate are circular shifts of the upsampled row 0. A `factor` of 1 calls
/// `f` unchanged.
///
/// # Panics
///
/// Panics if `factor` is zero.
pub fn oversampled<F, E>(factor: usize, f: F) -> impl Fn(&TapMatrix) -> Result<Vec<f64>, E>
where
    F: Fn(&TapMatrix) -> Result<Vec<f64>, E>,
    E: From<CoreError>,
{
    assert!(factor > 0, "oversampling factor must be at least 1");
    move |x: &TapMatrix| {
        if factor == 1 {
            return f(x);
        }
        let n = x.samples();
        let up = resample(x.row(0), n * factor);
        let fast = TapMatrix::circular(&up, x.taps())?;
        let y = f(&fast)?;
        Ok(resample(&y, n))
    }
}
