//! aliaslab Core - antiderivative antialiasing for tanh
//!
//! This crate holds the numerically sensitive half of aliaslab: the
//! divided-difference ADAA operators and the special functions behind them.
//!
//! # Core Abstractions
//!
//! ## Tap Matrices
//!
//! - [`TapMatrix`] - Delayed copies of a signal, row `k` delayed by `k` samples
//!
//! ## Special Functions
//!
//! - [`special::polylog`] - Element-wise dilogarithm / trilogarithm
//! - [`special::f1`], [`special::f2`], [`special::f3`] - Antiderivatives of tanh
//!
//! ## Anti-Aliasing
//!
//! - [`adaa::order1`], [`adaa::order2`], [`adaa::order3`] - ADAA operators
//! - [`AntialiasOrder`] - Order selector with checked tap counts
//!
//! # Example
//!
//! ```rust
//! use aliaslab_core::{AntialiasOrder, TapMatrix};
//!
//! let signal: Vec<f64> = (0..128).map(|n| 2.0 * (0.3 * n as f64).sin()).collect();
//! let x = TapMatrix::sliding(&signal, 4).unwrap();
//!
//! for order in AntialiasOrder::ALL {
//!     let y = order.apply(&x).unwrap();
//!     assert_eq!(y.len(), x.samples());
//! }
//! ```
//!
//! # Design Principles
//!
//! - **Pure functions**: no shared state; every operator is re-entrant
//! - **f64 throughout**: divided differences cancel, so single precision is not enough
//! - **Fail loudly**: insufficient taps panic (or return [`CoreError`] through
//!   [`AntialiasOrder::apply`]); degenerate inputs yield NaN/Inf, never a
//!   plausible finite value

pub mod adaa;
pub mod error;
pub mod special;
pub mod taps;

// Re-export main types at crate root
pub use adaa::{AntialiasOrder, has_degenerate_output};
pub use error::{CoreError, Result};
pub use special::{PolylogOrder, polylog};
pub use taps::TapMatrix;
