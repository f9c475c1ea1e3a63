//! Loss functions for fitting.

/// Scalar objective between predictions and targets, with its gradient.
pub trait Criterion {
    /// Loss value. `pred` and `target` have equal length.
    fn loss(&self, pred: &[f64], target: &[f64]) -> f64;

    /// `∂loss/∂pred`, one entry per prediction.
    fn gradient(&self, pred: &[f64], target: &[f64]) -> Vec<f64>;
}

/// Mean squared error: `mean((pred − target)²)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MseLoss;

impl Criterion for MseLoss {
    fn loss(&self, pred: &[f64], target: &[f64]) -> f64 {
        if pred.is_empty() {
            return 0.0;
        }
        let sum: f64 = pred
            .iter()
            .zip(target)
            .map(|(p, t)| (p - t) * (p - t))
            .sum();
        sum / pred.len() as f64
    }

    fn gradient(&self, pred: &[f64], target: &[f64]) -> Vec<f64> {
        let scale = 2.0 / pred.len().max(1) as f64;
        pred.iter()
            .zip(target)
            .map(|(p, t)| scale * (p - t))
            .collect()
    }
}

/// Mean absolute error: `mean(|pred − target|)`.
///
/// The gradient at exact equality is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct L1Loss;

impl Criterion for L1Loss {
    fn loss(&self, pred: &[f64], target: &[f64]) -> f64 {
        if pred.is_empty() {
            return 0.0;
        }
        let sum: f64 = pred.iter().zip(target).map(|(p, t)| (p - t).abs()).sum();
        sum / pred.len() as f64
    }

    fn gradient(&self, pred: &[f64], target: &[f64]) -> Vec<f64> {
        let scale = 1.0 / pred.len().max(1) as f64;
        pred.iter()
            .zip(target)
            .map(|(p, t)| {
                let d = p - t;
                if d > 0.0 {
                    scale
                } else if d < 0.0 {
                    -scale
                } else {
                    0.0
                }
            })
            .collect()
    }
}

impl<C: Criterion + ?Sized> Criterion for Box<C> {
    fn loss(&self, pred: &[f64], target: &[f64]) -> f64 {
        (**self).loss(pred, target)
    }

    fn gradient(&self, pred: &[f64], target: &[f64]) -> Vec<f64> {
        (**self).gradient(pred, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mse_value_and_gradient() {
        let pred = [1.0, 2.0, 4.0];
        let target = [1.0, 1.0, 1.0];
        assert!((MseLoss.loss(&pred, &target) - 10.0 / 3.0).abs() < 1e-12);
        let g = MseLoss.gradient(&pred, &target);
        assert!((g[1] - 2.0 / 3.0).abs() < 1e-12);
        assert!((g[2] - 2.0).abs() < 1e-12);
        assert_eq!(g[0], 0.0);
    }

    #[test]
    fn l1_value_and_gradient() {
        let pred = [0.0, 2.0, -1.0, 5.0];
        let target = [0.0, 1.0, 1.0, 5.0];
        assert!((L1Loss.loss(&pred, &target) - 0.75).abs() < 1e-12);
        assert_eq!(L1Loss.gradient(&pred, &target), vec![0.0, 0.25, -0.25, 0.0]);
    }

    #[test]
    fn empty_input_has_zero_loss() {
        assert_eq!(MseLoss.loss(&[], &[]), 0.0);
        assert_eq!(L1Loss.loss(&[], &[]), 0.0);
        assert!(MseLoss.gradient(&[], &[]).is_empty());
    }

    #[test]
    fn boxed_criterion_delegates() {
        let boxed: Box<dyn Criterion> = Box::new(MseLoss);
        assert_eq!(boxed.loss(&[3.0], &[1.0]), 4.0);
    }
}
