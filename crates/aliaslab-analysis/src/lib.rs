//! aliaslab analysis - test signals, spectra, and aliasing measurement
//!
//! The helpers around the antialiasing core:
//!
//! - [`signal`] - time vectors and delayed-sine tap matrices with optional noise
//! - [`spectrum`] - FFT wrapper, magnitude spectra and peak picking
//! - [`resample`] - Fourier resampling and the [`oversampled`] combinator
//! - [`aliasing`] - harmonic vs. folded energy of a periodic test tone
//!
//! ## Example Workflow
//!
//! ```rust
//! use aliaslab_analysis::{AliasingReport, DelayedSine};
//! use aliaslab_core::AntialiasOrder;
//!
//! // one period of a bin-centered tone, driven hard into tanh
//! let n = 1023;
//! let tone = DelayedSine::new(n, 100.0 / n as f64, 4.0).with_history(1);
//! let x = tone.matrix().unwrap();
//!
//! let naive = AntialiasOrder::None.apply(&x).unwrap();
//! let adaa = AntialiasOrder::First.apply(&x).unwrap();
//!
//! let naive_db = AliasingReport::measure(&naive, 100).unwrap().ratio_db();
//! let adaa_db = AliasingReport::measure(&adaa, 100).unwrap().ratio_db();
//! assert!(adaa_db < naive_db);
//! ```

pub mod aliasing;
pub mod error;
pub mod resample;
pub mod signal;
pub mod spectrum;

pub use aliasing::{AliasingReport, alias_ratio_db, nearest_bin};
pub use error::{AnalysisError, Result};
pub use resample::{downsample, oversampled, resample, upsample};
pub use signal::{DelayedSine, sample_count, time_vector};
pub use spectrum::{Fft, Spectrum, magnitude_db, rfft_freqs};
