//! Piecewise-linear lookup tables with finite memory.
//!
//! [`LutWithMemory`] approximates a saturating nonlinearity with
//! `1 + memory_depth` independent tables, one per delay tap. Each table
//! holds `bins_num` samples of a learned function over `[min_x, max_x]`.
//!
//! # Forward Rule
//!
//! For tap `m` and input sample `x` (row `m` of the tap matrix):
//!
//! ```text
//! pos   = (x − min_x) / (max_x − min_x) · (bins_num − 1)
//! lower = floor(pos)
//! upper = min(lower + 1, bins_num − 1)
//! w     = pos − lower
//! lut   = T_m[lower] + w · (T_m[upper] − T_m[lower])
//! y    += lut · x
//! ```
//!
//! The raw sample multiplies the interpolated table value, so each table
//! learns a *gain curve* rather than an additive offset. The upper index
//! clamp makes `x = max_x` land exactly on the last entry.
//!
//! # Range Policy
//!
//! With [`RangePolicy::Strict`] (the default) a sample is accepted while
//! `0 ≤ pos < bins_num`, i.e. whenever `lower` is a valid table index; any
//! other sample (including NaN) is rejected with
//! [`LutError::OutOfRange`]. Inputs just above `max_x` but still inside the
//! last bin therefore evaluate to the last entry. [`RangePolicy::Clamp`]
//! clamps `pos` to `[0, bins_num − 1]` on both sides instead.
//!
//! # Example
//!
//! ```rust
//! use aliaslab_core::TapMatrix;
//! use aliaslab_lut::{LutConfig, LutInit, LutWithMemory, Model};
//!
//! let config = LutConfig::new(-1.0, 1.0)
//!     .with_bins(5)
//!     .with_memory_depth(0)
//!     .with_init(LutInit::Zeros);
//! let mut lut = LutWithMemory::new(&config).unwrap();
//! lut.table_mut(0).value_mut().fill(0.5);
//!
//! let x = TapMatrix::repeat(&[-1.0, 0.2, 1.0], 1).unwrap();
//! assert_eq!(lut.forward(&x).unwrap(), vec![-0.5, 0.1, 0.5]);
//! ```

use aliaslab_core::TapMatrix;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::{LutError, Result};
use crate::param::{Model, Parameter};

/// Default table resolution.
pub const DEFAULT_BINS: usize = 10;

/// Default number of extra delay taps.
pub const DEFAULT_MEMORY_DEPTH: usize = 3;

/// How table entries are initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LutInit {
    /// Uniform in `[-1, 1)` from a seeded generator.
    Random {
        /// Generator seed.
        seed: u64,
    },
    /// All entries zero.
    Zeros,
}

impl Default for LutInit {
    fn default() -> Self {
        LutInit::Random { seed: 0 }
    }
}

/// Handling of inputs outside the table range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePolicy {
    /// Reject samples whose lower bin index is not a valid table index.
    #[default]
    Strict,
    /// Clamp the normalized position to the table on both sides.
    Clamp,
}

/// Construction options for [`LutWithMemory`].
#[derive(Debug, Clone, PartialEq)]
pub struct LutConfig {
    /// Input range `(min_x, max_x)` covered by the tables.
    pub input_range: (f64, f64),
    /// Entries per table.
    pub bins_num: usize,
    /// Extra delay taps beyond the current sample.
    pub memory_depth: usize,
    /// Table initialization.
    pub init: LutInit,
    /// Out-of-range handling.
    pub range_policy: RangePolicy,
}

impl LutConfig {
    /// Default configuration over `[min_x, max_x]`.
    pub fn new(min_x: f64, max_x: f64) -> Self {
        Self {
            input_range: (min_x, max_x),
            bins_num: DEFAULT_BINS,
            memory_depth: DEFAULT_MEMORY_DEPTH,
            init: LutInit::default(),
            range_policy: RangePolicy::default(),
        }
    }

    /// Set the table resolution.
    pub fn with_bins(mut self, bins_num: usize) -> Self {
        self.bins_num = bins_num;
        self
    }

    /// Set the memory depth.
    pub fn with_memory_depth(mut self, memory_depth: usize) -> Self {
        self.memory_depth = memory_depth;
        self
    }

    /// Set the initialization.
    pub fn with_init(mut self, init: LutInit) -> Self {
        self.init = init;
        self
    }

    /// Set the out-of-range policy.
    pub fn with_range_policy(mut self, range_policy: RangePolicy) -> Self {
        self.range_policy = range_policy;
        self
    }

    /// Number of tables (`1 + memory_depth`).
    pub fn taps(&self) -> usize {
        1 + self.memory_depth
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.bins_num < 2 {
            return Err(LutError::InvalidBins(self.bins_num));
        }
        let (min, max) = self.input_range;
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(LutError::InvalidRange { min, max });
        }
        Ok(())
    }
}

/// Location of a sample inside a table.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bin {
    lower: usize,
    upper: usize,
    weight: f64,
}

impl Bin {
    #[inline]
    fn interpolate(self, table: &[f64]) -> f64 {
        let lo = table[self.lower];
        lo + self.weight * (table[self.upper] - lo)
    }
}

/// Mapping from input values to table bins, shared by every tap.
#[derive(Debug, Clone, Copy, PartialEq)]
struct BinGrid {
    min_x: f64,
    max_x: f64,
    bins_num: usize,
    policy: RangePolicy,
}

impl BinGrid {
    #[inline]
    fn locate(self, x: f64) -> Option<Bin> {
        let last = (self.bins_num - 1) as f64;
        let mut pos = (x - self.min_x) / (self.max_x - self.min_x) * last;

        match self.policy {
            RangePolicy::Strict => {
                // NaN fails both comparisons
                if !(pos >= 0.0 && pos < self.bins_num as f64) {
                    return None;
                }
            }
            RangePolicy::Clamp => {
                if pos.is_nan() {
                    return None;
                }
                pos = pos.clamp(0.0, last);
            }
        }

        let lower = pos.floor() as usize;
        let upper = (lower + 1).min(self.bins_num - 1);
        Some(Bin {
            lower,
            upper,
            weight: pos - lower as f64,
        })
    }
}

/// Memory lookup-table model: one interpolated table per delay tap.
#[derive(Debug, Clone, PartialEq)]
pub struct LutWithMemory {
    tables: Vec<Parameter>,
    grid: BinGrid,
    memory_depth: usize,
}

impl LutWithMemory {
    /// Build a model from a configuration.
    pub fn new(config: &LutConfig) -> Result<Self> {
        config.validate()?;

        let tables = match config.init {
            LutInit::Zeros => (0..config.taps())
                .map(|_| Parameter::zeros(config.bins_num))
                .collect(),
            LutInit::Random { seed } => {
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                (0..config.taps())
                    .map(|_| {
                        Parameter::new(
                            (0..config.bins_num)
                                .map(|_| rng.random_range(-1.0..1.0))
                                .collect(),
                        )
                    })
                    .collect()
            }
        };

        let (min_x, max_x) = config.input_range;
        tracing::debug!(
            taps = config.taps(),
            bins = config.bins_num,
            min_x,
            max_x,
            "lut model created"
        );

        Ok(Self {
            tables,
            grid: BinGrid {
                min_x,
                max_x,
                bins_num: config.bins_num,
                policy: config.range_policy,
            },
            memory_depth: config.memory_depth,
        })
    }

    /// Build a model from explicit table contents, one table per tap.
    ///
    /// `config.memory_depth` is ignored; the depth follows `tables.len()`.
    pub fn from_tables(config: &LutConfig, tables: Vec<Vec<f64>>) -> Result<Self> {
        config.validate()?;
        if tables.is_empty() {
            return Err(LutError::NotEnoughTaps {
                required: 1,
                found: 0,
            });
        }
        if let Some(bad) = tables.iter().find(|t| t.len() != config.bins_num) {
            return Err(LutError::LengthMismatch {
                expected: config.bins_num,
                found: bad.len(),
            });
        }

        let (min_x, max_x) = config.input_range;
        Ok(Self {
            memory_depth: tables.len() - 1,
            tables: tables.into_iter().map(Parameter::new).collect(),
            grid: BinGrid {
                min_x,
                max_x,
                bins_num: config.bins_num,
                policy: config.range_policy,
            },
        })
    }

    /// Entries per table.
    pub fn bins_num(&self) -> usize {
        self.grid.bins_num
    }

    /// Extra delay taps beyond the current sample.
    pub fn memory_depth(&self) -> usize {
        self.memory_depth
    }

    /// Input range `(min_x, max_x)`.
    pub fn input_range(&self) -> (f64, f64) {
        (self.grid.min_x, self.grid.max_x)
    }

    /// Out-of-range handling.
    pub fn range_policy(&self) -> RangePolicy {
        self.grid.policy
    }

    /// Table for tap `m`.
    pub fn table(&self, m: usize) -> &Parameter {
        &self.tables[m]
    }

    /// Mutable table for tap `m`.
    pub fn table_mut(&mut self, m: usize) -> &mut Parameter {
        &mut self.tables[m]
    }

    /// Input value at the centre of table entry `k`.
    pub fn bin_center(&self, k: usize) -> f64 {
        let (min, max) = self.input_range();
        min + (max - min) * k as f64 / (self.grid.bins_num - 1) as f64
    }

    fn check_taps(&self, x: &TapMatrix) -> Result<()> {
        let required = self.tables.len();
        if x.taps() < required {
            return Err(LutError::NotEnoughTaps {
                required,
                found: x.taps(),
            });
        }
        Ok(())
    }

    fn out_of_range(&self, tap: usize, sample: usize, value: f64) -> LutError {
        LutError::OutOfRange {
            tap,
            sample,
            value,
            min: self.grid.min_x,
            max: self.grid.max_x,
        }
    }
}

impl Model for LutWithMemory {
    fn forward(&self, x: &TapMatrix) -> Result<Vec<f64>> {
        self.check_taps(x)?;

        let mut y = vec![0.0; x.samples()];
        for (m, table) in self.tables.iter().enumerate() {
            for (n, (&v, out)) in x.row(m).iter().zip(y.iter_mut()).enumerate() {
                let bin = self
                    .grid
                    .locate(v)
                    .ok_or_else(|| self.out_of_range(m, n, v))?;
                *out += bin.interpolate(table.value()) * v;
            }
        }
        Ok(y)
    }

    fn backward(&mut self, x: &TapMatrix, grad_output: &[f64]) -> Result<()> {
        self.check_taps(x)?;
        if grad_output.len() != x.samples() {
            return Err(LutError::LengthMismatch {
                expected: x.samples(),
                found: grad_output.len(),
            });
        }

        let grid = self.grid;
        for m in 0..self.tables.len() {
            let row = x.row(m);
            for (n, (&v, &g)) in row.iter().zip(grad_output).enumerate() {
                let Some(bin) = grid.locate(v) else {
                    return Err(self.out_of_range(m, n, v));
                };
                // d(lut·x)/dT[lower] = x(1-w), d(lut·x)/dT[upper] = x·w
                let gx = g * v;
                let grad = self.tables[m].grad_mut();
                grad[bin.lower] += gx * (1.0 - bin.weight);
                grad[bin.upper] += gx * bin.weight;
            }
        }
        Ok(())
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.tables.iter_mut().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeros_config(bins: usize, depth: usize) -> LutConfig {
        LutConfig::new(-5.0, 5.0)
            .with_bins(bins)
            .with_memory_depth(depth)
            .with_init(LutInit::Zeros)
    }

    fn ramp_model(bins: usize) -> LutWithMemory {
        // single tap whose table is its own bin index
        let table: Vec<f64> = (0..bins).map(|k| k as f64).collect();
        LutWithMemory::from_tables(&zeros_config(bins, 0), vec![table]).unwrap()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = LutConfig::new(0.0, 1.0);
        assert_eq!(config.bins_num, 10);
        assert_eq!(config.memory_depth, 3);
        assert_eq!(config.range_policy, RangePolicy::Strict);
        assert_eq!(config.taps(), 4);
    }

    #[test]
    fn validate_rejects_bad_configs() {
        assert_eq!(
            LutConfig::new(0.0, 1.0).with_bins(1).validate(),
            Err(LutError::InvalidBins(1))
        );
        assert!(matches!(
            LutConfig::new(1.0, 1.0).validate(),
            Err(LutError::InvalidRange { .. })
        ));
        assert!(matches!(
            LutConfig::new(f64::NEG_INFINITY, 1.0).validate(),
            Err(LutError::InvalidRange { .. })
        ));
    }

    #[test]
    fn random_init_is_seeded() {
        let config = LutConfig::new(-1.0, 1.0).with_init(LutInit::Random { seed: 7 });
        let a = LutWithMemory::new(&config).unwrap();
        let b = LutWithMemory::new(&config).unwrap();
        assert_eq!(a, b);
        assert!(a.table(0).value().iter().all(|v| (-1.0..1.0).contains(v)));
        assert_ne!(a.table(0).value(), a.table(1).value());
    }

    #[test]
    fn interpolates_between_entries_and_gates_by_input() {
        let lut = ramp_model(11);
        // x = 0.5 sits halfway between bins 5 and 6 -> lut = 5.5, y = 5.5 * 0.5
        let x = TapMatrix::repeat(&[0.5], 1).unwrap();
        let y = lut.forward(&x).unwrap();
        assert!((y[0] - 2.75).abs() < 1e-12, "{}", y[0]);
    }

    #[test]
    fn upper_edge_clamps_index() {
        let lut = ramp_model(64);
        let x = TapMatrix::repeat(&[5.0], 1).unwrap();
        let y = lut.forward(&x).unwrap();
        assert!((y[0] - 63.0 * 5.0).abs() < 1e-9);
    }

    #[test]
    fn lower_edge_is_first_entry() {
        let lut = ramp_model(8);
        let x = TapMatrix::repeat(&[-5.0], 1).unwrap();
        assert_eq!(lut.forward(&x).unwrap(), vec![0.0]);
    }

    #[test]
    fn strict_policy_rejects_below_range() {
        let lut = ramp_model(8);
        let x = TapMatrix::repeat(&[0.0, -5.01], 1).unwrap();
        assert_eq!(
            lut.forward(&x).unwrap_err(),
            LutError::OutOfRange {
                tap: 0,
                sample: 1,
                value: -5.01,
                min: -5.0,
                max: 5.0
            }
        );
    }

    #[test]
    fn strict_policy_accepts_inside_last_bin_only() {
        let lut = ramp_model(11);
        // one bin is 1.0 wide; 5.5 still floors to the last index
        let inside = TapMatrix::repeat(&[5.5], 1).unwrap();
        let y = lut.forward(&inside).unwrap();
        assert!((y[0] - 10.0 * 5.5).abs() < 1e-9);

        let beyond = TapMatrix::repeat(&[6.0], 1).unwrap();
        assert!(matches!(
            lut.forward(&beyond),
            Err(LutError::OutOfRange { .. })
        ));
    }

    #[test]
    fn strict_policy_rejects_nan() {
        let lut = ramp_model(8);
        let x = TapMatrix::repeat(&[f64::NAN], 1).unwrap();
        assert!(lut.forward(&x).is_err());
    }

    #[test]
    fn clamp_policy_saturates_both_sides() {
        let config = zeros_config(11, 0).with_range_policy(RangePolicy::Clamp);
        let table: Vec<f64> = (0..11).map(|k| k as f64).collect();
        let lut = LutWithMemory::from_tables(&config, vec![table]).unwrap();

        let x = TapMatrix::repeat(&[-7.0, 9.0], 1).unwrap();
        let y = lut.forward(&x).unwrap();
        assert_eq!(y[0], 0.0);
        assert!((y[1] - 10.0 * 9.0).abs() < 1e-9);
    }

    #[test]
    fn taps_are_summed() {
        let config = zeros_config(3, 1);
        let lut =
            LutWithMemory::from_tables(&config, vec![vec![1.0; 3], vec![2.0; 3]]).unwrap();
        let x = TapMatrix::from_rows(&[[1.0], [-2.0]]).unwrap();
        // 1·1 + 2·(-2)
        assert_eq!(lut.forward(&x).unwrap(), vec![-3.0]);
    }

    #[test]
    fn extra_taps_are_ignored() {
        let config = zeros_config(3, 0);
        let lut = LutWithMemory::from_tables(&config, vec![vec![1.0; 3]]).unwrap();
        let x = TapMatrix::from_rows(&[[2.0], [100.0]]).unwrap();
        assert_eq!(lut.forward(&x).unwrap(), vec![2.0]);
    }

    #[test]
    fn rejects_too_few_taps() {
        let lut = LutWithMemory::new(&zeros_config(4, 3)).unwrap();
        let x = TapMatrix::repeat(&[0.0], 2).unwrap();
        assert_eq!(
            lut.forward(&x).unwrap_err(),
            LutError::NotEnoughTaps {
                required: 4,
                found: 2
            }
        );
    }

    #[test]
    fn backward_matches_finite_differences() {
        let config = LutConfig::new(-2.0, 2.0)
            .with_bins(6)
            .with_memory_depth(1)
            .with_init(LutInit::Random { seed: 3 });
        let mut lut = LutWithMemory::new(&config).unwrap();
        let x = TapMatrix::from_rows(&[[-1.7, 0.3, 1.1, 2.0], [0.9, -0.4, 1.9, -2.0]]).unwrap();
        let upstream = [0.5, -1.0, 2.0, 0.25];

        lut.zero_grad();
        lut.backward(&x, &upstream).unwrap();

        // L = Σ upstream[n] · y[n]
        let objective = |lut: &LutWithMemory| -> f64 {
            lut.forward(&x)
                .unwrap()
                .iter()
                .zip(&upstream)
                .map(|(y, g)| y * g)
                .sum()
        };

        let h = 1e-6;
        for m in 0..2 {
            for k in 0..6 {
                let analytic = lut.table(m).grad()[k];
                let mut probe = lut.clone();
                probe.table_mut(m).value_mut()[k] += h;
                let up = objective(&probe);
                probe.table_mut(m).value_mut()[k] -= 2.0 * h;
                let down = objective(&probe);
                let numeric = (up - down) / (2.0 * h);
                assert!(
                    (analytic - numeric).abs() < 1e-6,
                    "tap {m} bin {k}: {analytic} vs {numeric}"
                );
            }
        }
    }

    #[test]
    fn backward_rejects_wrong_gradient_length() {
        let mut lut = LutWithMemory::new(&zeros_config(4, 0)).unwrap();
        let x = TapMatrix::repeat(&[0.0, 1.0], 1).unwrap();
        assert_eq!(
            lut.backward(&x, &[1.0]).unwrap_err(),
            LutError::LengthMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn bin_centers_span_range() {
        let lut = LutWithMemory::new(&zeros_config(11, 0)).unwrap();
        assert_eq!(lut.bin_center(0), -5.0);
        assert_eq!(lut.bin_center(10), 5.0);
        assert!((lut.bin_center(5)).abs() < 1e-12);
    }
}
