//! aliaslab LUT - learned lookup-table nonlinearity with memory
//!
//! This crate fits a small set of interpolated lookup tables to a saturating
//! nonlinearity by gradient descent:
//!
//! - [`lut`] - [`LutWithMemory`], one piecewise-linear table per delay tap
//! - [`param`] - [`Parameter`] storage and the [`Model`] trait
//! - [`loss`] - [`MseLoss`] and [`L1Loss`] criteria
//! - [`optim`] - [`Sgd`] and [`Adam`] optimizers
//! - [`trainer`] - [`Trainer`], the full-batch training loop
//!
//! ## Example Workflow
//!
//! ```rust
//! use aliaslab_core::TapMatrix;
//! use aliaslab_lut::{Adam, LutConfig, LutWithMemory, Model, Trainer};
//!
//! let config = LutConfig::new(-3.0, 3.0).with_bins(16).with_memory_depth(1);
//! let model = LutWithMemory::new(&config).unwrap();
//!
//! let xs: Vec<f64> = (0..300).map(|i| -3.0 + 0.02 * i as f64).collect();
//! let ys: Vec<f64> = xs.iter().map(|x| x.tanh()).collect();
//! let x = TapMatrix::repeat(&xs, config.taps()).unwrap();
//!
//! let mut trainer = Trainer::new(model, Adam::new(0.01));
//! trainer.train(&x, &ys, 100).unwrap();
//! assert_eq!(trainer.loss_history().len(), 10);
//!
//! let y = trainer.model().forward(&x).unwrap();
//! assert_eq!(y.len(), xs.len());
//! ```

pub mod error;
pub mod loss;
pub mod lut;
pub mod optim;
pub mod param;
pub mod trainer;

// Re-export main types
pub use error::{LutError, Result};
pub use loss::{Criterion, L1Loss, MseLoss};
pub use lut::{DEFAULT_BINS, DEFAULT_MEMORY_DEPTH, LutConfig, LutInit, LutWithMemory, RangePolicy};
pub use optim::{Adam, Optimizer, Sgd};
pub use param::{Model, Parameter};
pub use trainer::{DEFAULT_EPOCHS, LOSS_SAMPLE_INTERVAL, Trainer};
