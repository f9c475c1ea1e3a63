//! Error types for signal generation and spectral measurement.

use aliaslab_core::CoreError;
use thiserror::Error;

/// Errors raised by the analysis helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Normalized tone frequency outside `[-1, 1]`
    #[error("normalized frequency must lie in [-1, 1], got {0}")]
    InvalidFrequency(f64),

    /// Negative or non-finite noise level
    #[error("invalid noise level {0}")]
    InvalidNoise(f64),

    /// Fundamental bin at DC or beyond Nyquist
    #[error("fundamental bin {bin} is outside 1..={nyquist}")]
    InvalidBin {
        /// Requested bin.
        bin: usize,
        /// Highest usable bin for the signal length.
        nyquist: usize,
    },

    /// Empty input signal
    #[error("signal is empty")]
    EmptySignal,

    /// Tap-matrix construction failed
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
