//! Experiment file format for LUT training runs.

use aliaslab_lut::{
    Adam, Criterion, L1Loss, LutConfig, LutInit, MseLoss, Optimizer, RangePolicy, Sgd,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// A complete training experiment: model shape, optimizer, and data grid.
///
/// Every section and field is optional; missing values take the defaults
/// shown below.
///
/// # TOML Format
///
/// ```toml
/// [lut]
/// input_range = [-5.0, 5.0]
/// bins_num = 10
/// memory_depth = 3
/// seed = 0
/// range_policy = "strict"   # or "clamp"
///
/// [trainer]
/// optimizer = "adam"        # or "sgd"
/// learning_rate = 0.01
/// momentum = 0.0            # sgd only
/// num_epochs = 2000
/// criterion = "mse"         # or "l1"
///
/// [data]
/// step = 0.01
/// eval_step = 0.1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Model shape.
    pub lut: LutSection,
    /// Optimization settings.
    pub trainer: TrainerSection,
    /// Training and evaluation grids.
    pub data: DataSection,
}

/// `[lut]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LutSection {
    /// `[min_x, max_x]` covered by the tables.
    pub input_range: [f64; 2],
    /// Entries per table.
    pub bins_num: usize,
    /// Extra delay taps beyond the current sample.
    pub memory_depth: usize,
    /// Seed for the random table initialization.
    pub seed: u64,
    /// Out-of-range input handling.
    pub range_policy: RangePolicyKind,
}

impl Default for LutSection {
    fn default() -> Self {
        Self {
            input_range: [-5.0, 5.0],
            bins_num: aliaslab_lut::DEFAULT_BINS,
            memory_depth: aliaslab_lut::DEFAULT_MEMORY_DEPTH,
            seed: 0,
            range_policy: RangePolicyKind::Strict,
        }
    }
}

/// Serialized form of [`RangePolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicyKind {
    /// Reject out-of-range samples.
    #[default]
    Strict,
    /// Clamp out-of-range samples to the table edges.
    Clamp,
}

impl From<RangePolicyKind> for RangePolicy {
    fn from(kind: RangePolicyKind) -> Self {
        match kind {
            RangePolicyKind::Strict => RangePolicy::Strict,
            RangePolicyKind::Clamp => RangePolicy::Clamp,
        }
    }
}

/// `[trainer]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerSection {
    /// Update rule.
    pub optimizer: OptimizerKind,
    /// Step size.
    pub learning_rate: f64,
    /// Heavy-ball momentum, SGD only.
    pub momentum: f64,
    /// Epochs per run.
    pub num_epochs: usize,
    /// Objective.
    pub criterion: CriterionKind,
}

impl Default for TrainerSection {
    fn default() -> Self {
        Self {
            optimizer: OptimizerKind::Adam,
            learning_rate: 0.01,
            momentum: 0.0,
            num_epochs: aliaslab_lut::DEFAULT_EPOCHS,
            criterion: CriterionKind::Mse,
        }
    }
}

/// Optimizer selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    /// [`Adam`] with default betas.
    #[default]
    Adam,
    /// [`Sgd`], optionally with momentum.
    Sgd,
}

/// Criterion selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionKind {
    /// Mean squared error.
    #[default]
    Mse,
    /// Mean absolute error.
    L1,
}

/// `[data]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSection {
    /// Spacing of the training grid over the input range.
    pub step: f64,
    /// Spacing of the evaluation grid.
    pub eval_step: f64,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            step: 0.01,
            eval_step: 0.1,
        }
    }
}

impl ExperimentConfig {
    /// Load an experiment from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse an experiment from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the experiment to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize the experiment to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Override the epoch count.
    pub fn with_epochs(mut self, num_epochs: usize) -> Self {
        self.trainer.num_epochs = num_epochs;
        self
    }

    /// Check every field the run depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lut_config().validate()?;

        let t = &self.trainer;
        if !(t.learning_rate.is_finite() && t.learning_rate > 0.0) {
            return Err(ConfigError::invalid(
                "trainer.learning_rate",
                format!("must be positive, got {}", t.learning_rate),
            ));
        }
        if !(0.0..1.0).contains(&t.momentum) {
            return Err(ConfigError::invalid(
                "trainer.momentum",
                format!("must lie in [0, 1), got {}", t.momentum),
            ));
        }

        for (field, step) in [
            ("data.step", self.data.step),
            ("data.eval_step", self.data.eval_step),
        ] {
            if !(step.is_finite() && step > 0.0) {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be positive, got {step}"),
                ));
            }
        }
        Ok(())
    }

    /// Model options described by the `[lut]` section.
    pub fn lut_config(&self) -> LutConfig {
        let [min_x, max_x] = self.lut.input_range;
        LutConfig::new(min_x, max_x)
            .with_bins(self.lut.bins_num)
            .with_memory_depth(self.lut.memory_depth)
            .with_init(LutInit::Random {
                seed: self.lut.seed,
            })
            .with_range_policy(self.lut.range_policy.into())
    }

    /// The configured optimizer.
    pub fn optimizer(&self) -> Box<dyn Optimizer> {
        let t = &self.trainer;
        match t.optimizer {
            OptimizerKind::Adam => Box::new(Adam::new(t.learning_rate)),
            OptimizerKind::Sgd => Box::new(Sgd::with_momentum(t.learning_rate, t.momentum)),
        }
    }

    /// The configured criterion.
    pub fn criterion(&self) -> Box<dyn Criterion> {
        match self.trainer.criterion {
            CriterionKind::Mse => Box::new(MseLoss),
            CriterionKind::L1 => Box::new(L1Loss),
        }
    }

    /// Training inputs: the input range sampled every `data.step`.
    pub fn training_inputs(&self) -> Vec<f64> {
        self.grid(self.data.step)
    }

    /// Evaluation inputs: the input range sampled every `data.eval_step`.
    pub fn eval_inputs(&self) -> Vec<f64> {
        self.grid(self.data.eval_step)
    }

    /// `min_x, min_x + step, ...` strictly below `max_x`.
    fn grid(&self, step: f64) -> Vec<f64> {
        let [min_x, max_x] = self.lut.input_range;
        if step.is_nan() || step <= 0.0 || max_x <= min_x {
            return Vec::new();
        }
        let n = ((max_x - min_x) / step).ceil() as usize;
        (0..n)
            .map(|i| min_x + step * i as f64)
            .filter(|&x| x < max_x)
            .collect()
    }
}
