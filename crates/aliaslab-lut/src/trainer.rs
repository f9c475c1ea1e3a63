//! Full-batch training loop.
//!
//! [`Trainer`] owns a [`Model`], an [`Optimizer`] and a [`Criterion`] and
//! runs a fixed number of epochs over one input batch:
//!
//! ```text
//! for epoch in 0..num_epochs:
//!     zero gradients
//!     y_pred = model(X)
//!     loss   = criterion(y_pred, y)
//!     backpropagate ∂loss/∂y_pred into the model
//!     optimizer step
//!     if epoch % 10 == 0: record loss
//! ```
//!
//! There is no early stopping and no validation split; every run executes
//! the full epoch count. A diverging run is not aborted. Inspect
//! [`Trainer::loss_history`] afterwards.

use aliaslab_core::TapMatrix;

use crate::error::{LutError, Result};
use crate::loss::{Criterion, MseLoss};
use crate::optim::Optimizer;
use crate::param::Model;

/// Epoch count used by [`Trainer::train_default`].
pub const DEFAULT_EPOCHS: usize = 2000;

/// Loss is recorded every this many epochs.
pub const LOSS_SAMPLE_INTERVAL: usize = 10;

/// Full-batch gradient-descent driver.
#[derive(Debug)]
pub struct Trainer<M, O, C = MseLoss> {
    model: M,
    optimizer: O,
    criterion: C,
    loss_history: Vec<f64>,
}

impl<M: Model, O: Optimizer> Trainer<M, O, MseLoss> {
    /// Trainer with the mean-squared-error criterion.
    pub fn new(model: M, optimizer: O) -> Self {
        Self::with_criterion(model, optimizer, MseLoss)
    }
}

impl<M: Model, O: Optimizer, C: Criterion> Trainer<M, O, C> {
    /// Trainer with an explicit criterion.
    pub fn with_criterion(model: M, optimizer: O, criterion: C) -> Self {
        Self {
            model,
            optimizer,
            criterion,
            loss_history: Vec::new(),
        }
    }

    /// Train for [`DEFAULT_EPOCHS`] epochs.
    pub fn train_default(&mut self, x: &TapMatrix, y: &[f64]) -> Result<()> {
        self.train(x, y, DEFAULT_EPOCHS)
    }

    /// Train for `num_epochs` epochs on the batch `(x, y)`.
    ///
    /// The loss history is cleared at the start of every run.
    pub fn train(&mut self, x: &TapMatrix, y: &[f64], num_epochs: usize) -> Result<()> {
        self.train_with_progress(x, y, num_epochs, |_, _| {})
    }

    /// Like [`train`](Self::train), calling `on_epoch(epoch, loss)` after
    /// every optimizer step.
    pub fn train_with_progress<F>(
        &mut self,
        x: &TapMatrix,
        y: &[f64],
        num_epochs: usize,
        mut on_epoch: F,
    ) -> Result<()>
    where
        F: FnMut(usize, f64),
    {
        if y.len() != x.samples() {
            return Err(LutError::LengthMismatch {
                expected: x.samples(),
                found: y.len(),
            });
        }

        self.loss_history.clear();
        self.loss_history
            .reserve(num_epochs.div_ceil(LOSS_SAMPLE_INTERVAL));

        tracing::info!(
            epochs = num_epochs,
            samples = x.samples(),
            lr = self.optimizer.learning_rate(),
            "training started"
        );

        let mut warned = false;
        for epoch in 0..num_epochs {
            self.model.zero_grad();
            let pred = self.model.forward(x)?;
            let loss = self.criterion.loss(&pred, y);
            let grad = self.criterion.gradient(&pred, y);
            self.model.backward(x, &grad)?;
            self.optimizer.step(&mut self.model.parameters_mut());

            if epoch % LOSS_SAMPLE_INTERVAL == 0 {
                self.loss_history.push(loss);
                tracing::debug!(epoch, loss, "loss snapshot");
                if !loss.is_finite() && !warned {
                    tracing::warn!(epoch, "loss is not finite; training continues");
                    warned = true;
                }
            }
            on_epoch(epoch, loss);
        }

        tracing::info!(
            final_loss = self.loss_history.last().copied().unwrap_or(f64::NAN),
            snapshots = self.loss_history.len(),
            "training finished"
        );
        Ok(())
    }

    /// Loss sampled every [`LOSS_SAMPLE_INTERVAL`] epochs of the last run.
    pub fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    /// The model being trained.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The optimizer.
    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    /// The criterion.
    pub fn criterion(&self) -> &C {
        &self.criterion
    }

    /// Evaluate the model on `x`.
    pub fn predict(&self, x: &TapMatrix) -> Result<Vec<f64>> {
        self.model.forward(x)
    }

    /// Give back the trained model.
    pub fn into_model(self) -> M {
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::L1Loss;
    use crate::lut::{LutConfig, LutInit, LutWithMemory};
    use crate::optim::{Adam, Sgd};

    fn small_problem() -> (LutWithMemory, TapMatrix, Vec<f64>) {
        let config = LutConfig::new(-2.0, 2.0)
            .with_bins(9)
            .with_memory_depth(0)
            .with_init(LutInit::Zeros);
        let model = LutWithMemory::new(&config).unwrap();
        let xs: Vec<f64> = (0..40).map(|i| -2.0 + 0.1 * f64::from(i)).collect();
        let ys: Vec<f64> = xs.iter().map(|v| 0.5 * v).collect();
        (model, TapMatrix::repeat(&xs, 1).unwrap(), ys)
    }

    #[test]
    fn history_is_sampled_every_ten_epochs() {
        let (model, x, y) = small_problem();
        let mut trainer = Trainer::new(model, Sgd::new(0.01));
        trainer.train(&x, &y, 25).unwrap();
        // epochs 0, 10, 20
        assert_eq!(trainer.loss_history().len(), 3);

        trainer.train(&x, &y, 10).unwrap();
        assert_eq!(trainer.loss_history().len(), 1, "history resets per run");
    }

    #[test]
    fn default_epoch_count() {
        let (model, x, y) = small_problem();
        let mut trainer = Trainer::new(model, Sgd::new(0.01));
        trainer.train_default(&x, &y).unwrap();
        assert_eq!(trainer.loss_history().len(), DEFAULT_EPOCHS / 10);
    }

    #[test]
    fn loss_decreases_on_linear_target() {
        let (model, x, y) = small_problem();
        let mut trainer = Trainer::new(model, Adam::new(0.05));
        trainer.train(&x, &y, 500).unwrap();
        let history = trainer.loss_history();
        assert!(history.last().unwrap() < &(history[0] * 1e-2), "{history:?}");

        // a constant gain of 0.5 is representable exactly
        let model = trainer.into_model();
        for &v in model.table(0).value() {
            assert!((v - 0.5).abs() < 0.1, "{v}");
        }
    }

    #[test]
    fn progress_callback_sees_every_epoch() {
        let (model, x, y) = small_problem();
        let mut trainer = Trainer::with_criterion(model, Sgd::new(0.01), L1Loss);
        let mut seen = Vec::new();
        trainer
            .train_with_progress(&x, &y, 12, |epoch, _| seen.push(epoch))
            .unwrap();
        assert_eq!(seen, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn divergence_is_recorded_not_raised() {
        let (model, x, y) = small_problem();
        let mut trainer = Trainer::new(model, Sgd::new(50.0));
        trainer.train(&x, &y, 200).unwrap();
        let last = *trainer.loss_history().last().unwrap();
        assert!(!last.is_finite() || last > trainer.loss_history()[0]);
    }

    #[test]
    fn rejects_mismatched_target() {
        let (model, x, _) = small_problem();
        let mut trainer = Trainer::new(model, Sgd::new(0.01));
        assert_eq!(
            trainer.train(&x, &[0.0; 3], 1).unwrap_err(),
            LutError::LengthMismatch {
                expected: 40,
                found: 3
            }
        );
    }

    #[test]
    fn out_of_range_input_stops_training() {
        let (model, _, _) = small_problem();
        let x = TapMatrix::repeat(&[0.0, -3.0], 1).unwrap();
        let mut trainer = Trainer::new(model, Sgd::new(0.01));
        assert!(matches!(
            trainer.train(&x, &[0.0, 0.0], 5),
            Err(LutError::OutOfRange { .. })
        ));
    }
}
