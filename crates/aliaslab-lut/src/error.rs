//! Error types for the LUT model and its training loop.

use aliaslab_core::CoreError;
use thiserror::Error;

/// Errors that can occur while building, evaluating, or training a LUT model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LutError {
    /// Table resolution below two bins
    #[error("bins_num must be at least 2, got {0}")]
    InvalidBins(usize),

    /// Empty, inverted, or non-finite input range
    #[error("invalid input range [{min}, {max}]")]
    InvalidRange {
        /// Lower bound of the range.
        min: f64,
        /// Upper bound of the range.
        max: f64,
    },

    /// The tap matrix has fewer rows than the model has tables
    #[error("model needs {required} taps, input has {found}")]
    NotEnoughTaps {
        /// Number of tables (`1 + memory_depth`).
        required: usize,
        /// Rows present in the input.
        found: usize,
    },

    /// An input sample falls outside the table range
    #[error("sample {sample} of tap {tap} is {value}, outside [{min}, {max}]")]
    OutOfRange {
        /// Tap (row) of the offending value.
        tap: usize,
        /// Sample (column) of the offending value.
        sample: usize,
        /// The offending value.
        value: f64,
        /// Lower bound of the table range.
        min: f64,
        /// Upper bound of the table range.
        max: f64,
    },

    /// Target or gradient length does not match the number of samples
    #[error("expected {expected} values, got {found}")]
    LengthMismatch {
        /// Number of samples in the input.
        expected: usize,
        /// Length of the supplied slice.
        found: usize,
    },

    /// Tap matrix error
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result alias for `aliaslab-lut` operations.
pub type Result<T> = std::result::Result<T, LutError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn out_of_range_display() {
        let err = LutError::OutOfRange {
            tap: 1,
            sample: 7,
            value: -6.0,
            min: -5.0,
            max: 5.0,
        };
        assert_eq!(err.to_string(), "sample 7 of tap 1 is -6, outside [-5, 5]");
    }

    #[test]
    fn invalid_bins_display() {
        assert_eq!(
            LutError::InvalidBins(1).to_string(),
            "bins_num must be at least 2, got 1"
        );
    }

    #[test]
    fn core_error_is_transparent() {
        let err = LutError::from(CoreError::Empty);
        assert_eq!(err.to_string(), CoreError::Empty.to_string());
        assert!(err.source().is_none());
    }
}
