//! Experiment configuration for aliaslab training runs.
//!
//! An experiment file fixes everything a LUT fitting run needs: the table
//! shape, the optimizer and objective, and the sampling grids used for
//! training and evaluation. Files are TOML; every field has a default, so an
//! empty file is a valid experiment.
//!
//! # Example
//!
//! ```rust
//! use aliaslab_config::{ExperimentConfig, OptimizerKind};
//!
//! let config = ExperimentConfig::from_toml(
//!     r#"
//!     [lut]
//!     input_range = [-5.0, 5.0]
//!     bins_num = 64
//!
//!     [trainer]
//!     optimizer = "adam"
//!     num_epochs = 3000
//!     "#,
//! )
//! .unwrap();
//!
//! config.validate().unwrap();
//! assert_eq!(config.trainer.optimizer, OptimizerKind::Adam);
//! assert_eq!(config.lut_config().taps(), 4);
//! assert_eq!(config.training_inputs().len(), 1000);
//! ```

mod error;
mod experiment;

pub use error::ConfigError;
pub use experiment::{
    CriterionKind, DataSection, ExperimentConfig, LutSection, OptimizerKind, RangePolicyKind,
    TrainerSection,
};
