//! Integration tests for aliaslab-lut.
//!
//! Fits the memory LUT model to tanh and checks the learned curve on a
//! held-out sampling, plus continuity of the interpolant.

use aliaslab_core::TapMatrix;
use aliaslab_lut::{Adam, LutConfig, LutInit, LutWithMemory, Model, Trainer};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Evenly spaced values in `[start, stop)`.
fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let n = ((stop - start) / step).ceil() as usize;
    (0..n).map(|i| start + step * i as f64).collect()
}

fn tanh_all(xs: &[f64]) -> Vec<f64> {
    xs.iter().map(|x| x.tanh()).collect()
}

// ===========================================================================
// 1. Fitting tanh
// ===========================================================================

#[test]
fn lut_with_memory_fits_tanh() {
    let (min_x, max_x) = (-5.0, 5.0);
    let memory_depth = 3;

    let config = LutConfig::new(min_x, max_x)
        .with_bins(64)
        .with_memory_depth(memory_depth);
    let model = LutWithMemory::new(&config).unwrap();

    let xs = arange(min_x, max_x, 0.01);
    assert_eq!(xs.len(), 1000);
    let x = TapMatrix::repeat(&xs, memory_depth + 1).unwrap();
    let y = tanh_all(&xs);

    let mut trainer = Trainer::new(model, Adam::new(0.01));
    trainer.train(&x, &y, 3000).unwrap();
    assert_eq!(trainer.loss_history().len(), 300);

    let x_eval = arange(min_x, max_x, 0.1);
    let y_pred = trainer
        .model()
        .forward(&TapMatrix::repeat(&x_eval, memory_depth + 1).unwrap())
        .unwrap();

    let tol = 1e-3;
    for ((x, expected), got) in x_eval.iter().zip(tanh_all(&x_eval)).zip(&y_pred) {
        assert!(
            (expected - got).abs() <= tol,
            "prediction error above {tol} at x={x}: {got} vs {expected}"
        );
    }
}

#[test]
fn loss_history_trends_down() {
    let config = LutConfig::new(-3.0, 3.0).with_bins(24).with_memory_depth(1);
    let xs = arange(-3.0, 3.0, 0.02);
    let x = TapMatrix::repeat(&xs, 2).unwrap();
    let y = tanh_all(&xs);

    let mut trainer = Trainer::new(LutWithMemory::new(&config).unwrap(), Adam::new(0.01));
    trainer.train(&x, &y, 1000).unwrap();

    let history = trainer.loss_history();
    assert!(history.iter().all(|l| l.is_finite()));
    assert!(history[history.len() - 1] < history[0] * 0.01, "{history:?}");
}

// ===========================================================================
// 2. Continuity of the interpolant
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A dense sweep never jumps by more than the local table step.
    #[test]
    fn output_is_continuous_on_dense_sweep(seed in any::<u64>(), bins in 2usize..40) {
        let config = LutConfig::new(-2.0, 3.0)
            .with_bins(bins)
            .with_memory_depth(0)
            .with_init(LutInit::Random { seed });
        let lut = LutWithMemory::new(&config).unwrap();

        let n = 4001;
        let xs: Vec<f64> = (0..n).map(|i| -2.0 + 5.0 * i as f64 / (n - 1) as f64).collect();
        let y = lut.forward(&TapMatrix::repeat(&xs, 1).unwrap()).unwrap();

        let table = lut.table(0).value();
        let max_entry = table.iter().fold(0.0f64, |a, v| a.max(v.abs()));
        let max_step = table.windows(2).fold(0.0f64, |a, w| a.max((w[1] - w[0]).abs()));
        let dx = 5.0 / (n - 1) as f64;
        let bin_width = 5.0 / (bins - 1) as f64;
        // |Δ(lut·x)| ≤ |x|·|Δlut| + |lut|·|Δx|, with |Δlut| ≤ step·dx/width
        let bound = 3.0 * max_step * dx / bin_width + max_entry * dx + 1e-12;

        for (i, w) in y.windows(2).enumerate() {
            prop_assert!(
                (w[1] - w[0]).abs() <= bound,
                "jump {} at x={} exceeds {}", (w[1] - w[0]).abs(), xs[i], bound
            );
        }
    }

    /// The rightmost edge evaluates without indexing past the table.
    #[test]
    fn max_input_clamps_upper_index(bins in 2usize..128, lo in -10.0f64..0.0, width in 0.1f64..20.0) {
        let hi = lo + width;
        let config = LutConfig::new(lo, hi).with_bins(bins).with_memory_depth(2);
        let lut = LutWithMemory::new(&config).unwrap();
        let y = lut.forward(&TapMatrix::repeat(&[hi], 3).unwrap()).unwrap();
        let expected: f64 = (0..3).map(|m| lut.table(m).value()[bins - 1] * hi).sum();
        prop_assert!((y[0] - expected).abs() < 1e-9 * (1.0 + expected.abs()));
    }
}
