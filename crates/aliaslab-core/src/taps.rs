//! Delayed-signal (tap) matrices.
//!
//! A [`TapMatrix`] holds `taps` time-shifted copies of one signal, each
//! `samples` long, stored row-major. Row `k` is the signal delayed by `k`
//! samples relative to row 0, so column `n` reads
//!
//! ```text
//! [x[n], x[n-1], x[n-2], ..., x[n-taps+1]]
//! ```
//!
//! This is the shape consumed by both the ADAA engine (which needs the
//! current sample plus up to three past samples) and the memory LUT model.
//!
//! # Example
//!
//! ```rust
//! use aliaslab_core::TapMatrix;
//!
//! let signal = [0.0, 1.0, 2.0, 3.0, 4.0];
//! let x = TapMatrix::sliding(&signal, 2).unwrap();
//!
//! assert_eq!(x.samples(), 4);
//! assert_eq!(x.row(0), &[1.0, 2.0, 3.0, 4.0]);
//! assert_eq!(x.row(1), &[0.0, 1.0, 2.0, 3.0]);
//! ```

use crate::error::{CoreError, Result};

/// Row-major matrix of delayed copies of a signal.
#[derive(Debug, Clone, PartialEq)]
pub struct TapMatrix {
    data: Vec<f64>,
    taps: usize,
    samples: usize,
}

impl TapMatrix {
    /// Build a matrix from explicit rows.
    ///
    /// All rows must have the length of row 0.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let first = rows.first().ok_or(CoreError::Empty)?;
        let samples = first.as_ref().len();
        let mut data = Vec::with_capacity(samples * rows.len());

        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != samples {
                return Err(CoreError::ShapeMismatch {
                    row,
                    expected: samples,
                    found: values.len(),
                });
            }
            data.extend_from_slice(values);
        }

        Ok(Self {
            data,
            taps: rows.len(),
            samples,
        })
    }

    /// Repeat the same signal across `taps` rows.
    ///
    /// Useful for fitting a memoryless target: every tap sees the current
    /// sample.
    pub fn repeat(signal: &[f64], taps: usize) -> Result<Self> {
        if taps == 0 {
            return Err(CoreError::Empty);
        }
        let mut data = Vec::with_capacity(signal.len() * taps);
        for _ in 0..taps {
            data.extend_from_slice(signal);
        }
        Ok(Self {
            data,
            taps,
            samples: signal.len(),
        })
    }

    /// Sliding-window view of a signal.
    ///
    /// The first `taps - 1` samples act as history, so the result has
    /// `signal.len() - taps + 1` columns and column `n` corresponds to
    /// `signal[n + taps - 1]`.
    pub fn sliding(signal: &[f64], taps: usize) -> Result<Self> {
        if taps == 0 {
            return Err(CoreError::Empty);
        }
        if signal.len() < taps {
            return Err(CoreError::SignalTooShort {
                len: signal.len(),
                taps,
            });
        }

        let samples = signal.len() - taps + 1;
        let mut data = Vec::with_capacity(samples * taps);
        for k in 0..taps {
            let start = taps - 1 - k;
            data.extend_from_slice(&signal[start..start + samples]);
        }
        Ok(Self {
            data,
            taps,
            samples,
        })
    }

    /// Circular tap matrix of a periodic signal.
    ///
    /// Row `k` is the signal rotated right by `k`, so the output keeps the
    /// signal's length and periodicity. Intended for one period of a
    /// bin-centered test tone.
    pub fn circular(signal: &[f64], taps: usize) -> Result<Self> {
        if taps == 0 {
            return Err(CoreError::Empty);
        }
        let n = signal.len();
        if n < taps {
            return Err(CoreError::SignalTooShort { len: n, taps });
        }

        let mut data = Vec::with_capacity(n * taps);
        for k in 0..taps {
            data.extend_from_slice(&signal[n - k..]);
            data.extend_from_slice(&signal[..n - k]);
        }
        Ok(Self {
            data,
            taps,
            samples: n,
        })
    }

    /// Number of taps (rows).
    pub fn taps(&self) -> usize {
        self.taps
    }

    /// Number of samples per tap (columns).
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Row `k`: the signal delayed by `k` samples.
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.taps()`.
    pub fn row(&self, k: usize) -> &[f64] {
        assert!(k < self.taps, "tap {k} out of range (taps = {})", self.taps);
        &self.data[k * self.samples..(k + 1) * self.samples]
    }

    /// Iterate over rows, current sample first.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact(0) panics; a zero-column matrix yields no rows
        self.data.chunks_exact(self.samples.max(1))
    }

    /// Keep only the first `taps` rows.
    pub fn truncated(&self, taps: usize) -> Self {
        let taps = taps.min(self.taps);
        Self {
            data: self.data[..taps * self.samples].to_vec(),
            taps,
            samples: self.samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let err = TapMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            CoreError::ShapeMismatch {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn from_rows_rejects_empty() {
        let rows: [Vec<f64>; 0] = [];
        assert_eq!(TapMatrix::from_rows(&rows).unwrap_err(), CoreError::Empty);
    }

    #[test]
    fn sliding_rows_are_delayed() {
        let signal: Vec<f64> = (0..10).map(f64::from).collect();
        let x = TapMatrix::sliding(&signal, 4).unwrap();

        assert_eq!(x.taps(), 4);
        assert_eq!(x.samples(), 7);
        for n in 0..x.samples() {
            for k in 1..x.taps() {
                // row k at column n is row 0 k samples earlier
                assert_eq!(x.row(k)[n], x.row(0)[n] - k as f64);
            }
        }
    }

    #[test]
    fn sliding_rejects_short_signal() {
        assert!(matches!(
            TapMatrix::sliding(&[1.0, 2.0], 3),
            Err(CoreError::SignalTooShort { len: 2, taps: 3 })
        ));
    }

    #[test]
    fn circular_wraps_history() {
        let x = TapMatrix::circular(&[1.0, 2.0, 3.0], 2).unwrap();
        assert_eq!(x.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(x.row(1), &[3.0, 1.0, 2.0]);
    }

    #[test]
    fn repeat_copies_signal() {
        let x = TapMatrix::repeat(&[0.5, -0.5], 3).unwrap();
        assert_eq!(x.taps(), 3);
        assert!(x.rows().all(|r| r == [0.5, -0.5]));
    }

    #[test]
    fn truncated_keeps_leading_rows() {
        let x = TapMatrix::from_rows(&[[1.0], [2.0], [3.0]]).unwrap();
        let t = x.truncated(2);
        assert_eq!(t.taps(), 2);
        assert_eq!(t.row(1), &[2.0]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn row_out_of_range_panics() {
        let x = TapMatrix::repeat(&[1.0], 2).unwrap();
        let _ = x.row(2);
    }
}
