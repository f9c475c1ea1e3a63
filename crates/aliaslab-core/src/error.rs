//! Error types for tap matrices and the antialiasing engine.

use thiserror::Error;

/// Errors produced by `aliaslab-core`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Rows of a tap matrix have different lengths.
    #[error("row {row} has {found} samples, expected {expected}")]
    ShapeMismatch {
        /// Index of the offending row.
        row: usize,
        /// Length of row 0.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },

    /// A tap matrix must contain at least one row.
    #[error("tap matrix needs at least one row")]
    Empty,

    /// The signal is too short to produce the requested number of taps.
    #[error("signal of {len} samples is too short for {taps} taps")]
    SignalTooShort {
        /// Signal length.
        len: usize,
        /// Requested number of taps.
        taps: usize,
    },

    /// The antialiasing order needs more delayed taps than the matrix has.
    #[error("order {order} antialiasing needs {required} taps, got {found}")]
    InsufficientTaps {
        /// Requested antialiasing order.
        order: u8,
        /// Minimum number of taps for that order.
        required: usize,
        /// Taps present in the matrix.
        found: usize,
    },

    /// Antialiasing order outside 0..=3.
    #[error("unsupported antialiasing order: {0} (expected 0, 1, 2 or 3)")]
    UnsupportedOrder(u32),

    /// Text that names no antialiasing order.
    #[error("invalid antialiasing order '{0}' (expected 0-3, \"none\" or \"naive\")")]
    InvalidOrderName(String),

    /// Polylogarithm order outside {2, 3}.
    #[error("unsupported polylogarithm order: {0} (expected 2 or 3)")]
    UnsupportedPolylogOrder(u32),
}

/// Result alias for `aliaslab-core` operations.
pub type Result<T> = core::result::Result<T, CoreError>;
