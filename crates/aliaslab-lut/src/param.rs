//! Trainable parameters and the differentiable-model interface.
//!
//! A [`Parameter`] is a fixed-length vector of values paired with an
//! equally long gradient accumulator. Models expose their parameters through
//! [`Model::parameters_mut`]; optimizers update them in place from the
//! accumulated gradients.

use aliaslab_core::TapMatrix;

use crate::error::Result;

/// Fixed-length trainable vector with its gradient accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    value: Vec<f64>,
    grad: Vec<f64>,
}

impl Parameter {
    /// Wrap existing values; the gradient starts at zero.
    pub fn new(value: Vec<f64>) -> Self {
        let grad = vec![0.0; value.len()];
        Self { value, grad }
    }

    /// All-zero parameter of the given length.
    pub fn zeros(len: usize) -> Self {
        Self::new(vec![0.0; len])
    }

    /// Number of scalars.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether the parameter holds no scalars.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Current values.
    pub fn value(&self) -> &[f64] {
        &self.value
    }

    /// Mutable values.
    pub fn value_mut(&mut self) -> &mut [f64] {
        &mut self.value
    }

    /// Accumulated gradient.
    pub fn grad(&self) -> &[f64] {
        &self.grad
    }

    /// Mutable gradient, for accumulation during backward passes.
    pub fn grad_mut(&mut self) -> &mut [f64] {
        &mut self.grad
    }

    /// Values (mutable) and gradient (shared) at once, for optimizer steps.
    pub fn split_mut(&mut self) -> (&mut [f64], &[f64]) {
        (&mut self.value, &self.grad)
    }

    /// Reset the gradient to zero.
    pub fn zero_grad(&mut self) {
        self.grad.fill(0.0);
    }
}

/// A model that can be evaluated on a tap matrix and differentiated with
/// respect to its parameters.
///
/// [`backward`](Self::backward) *accumulates* into the parameter gradients;
/// call [`zero_grad`](Self::zero_grad) between steps.
pub trait Model {
    /// One prediction per column of `x`.
    fn forward(&self, x: &TapMatrix) -> Result<Vec<f64>>;

    /// Accumulate `∂L/∂θ` given `∂L/∂y` for each column of `x`.
    fn backward(&mut self, x: &TapMatrix, grad_output: &[f64]) -> Result<()>;

    /// Mutable access to every trainable parameter, in a stable order.
    fn parameters_mut(&mut self) -> Vec<&mut Parameter>;

    /// Clear all accumulated gradients.
    fn zero_grad(&mut self) {
        for p in self.parameters_mut() {
            p.zero_grad();
        }
    }
}
