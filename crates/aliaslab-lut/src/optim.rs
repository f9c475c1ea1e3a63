//! Gradient-based optimizers.
//!
//! An [`Optimizer`] turns the gradients accumulated in a set of
//! [`Parameter`]s into an in-place update. Optimizers keep per-parameter
//! state (momentum, moment estimates) indexed by the order in which
//! parameters are passed to [`Optimizer::step`], so the same model must be
//! passed in the same order every step.
//!
//! # Algorithms
//!
//! ## SGD
//!
//! ```text
//! b  = μ·b + g        (b = g on the first step; μ = 0 disables momentum)
//! θ -= lr · b
//! ```
//!
//! ## Adam
//!
//! ```text
//! m  = β1·m + (1 − β1)·g
//! v  = β2·v + (1 − β2)·g²
//! θ -= lr / (1 − β1ᵗ) · m / (√v / √(1 − β2ᵗ) + ε)
//! ```
//!
//! Reference: Kingma & Ba, "Adam: A Method for Stochastic Optimization",
//! ICLR 2015.

use crate::param::Parameter;

/// Update rule applied to accumulated gradients.
pub trait Optimizer {
    /// Apply one update to every parameter.
    fn step(&mut self, params: &mut [&mut Parameter]);

    /// Current learning rate.
    fn learning_rate(&self) -> f64;

    /// Change the learning rate for subsequent steps.
    fn set_learning_rate(&mut self, lr: f64);

    /// Drop all internal state (moments, step count).
    fn reset(&mut self);
}

/// Reallocate per-parameter state when the parameter layout changes.
///
/// Returns `true` if the state was rebuilt.
fn ensure_state(state: &mut Vec<Vec<f64>>, params: &[&mut Parameter]) -> bool {
    let matches = state.len() == params.len()
        && state.iter().zip(params).all(|(s, p)| s.len() == p.len());
    if !matches {
        *state = params.iter().map(|p| vec![0.0; p.len()]).collect();
    }
    !matches
}

/// Stochastic gradient descent with optional momentum.
#[derive(Debug, Clone, PartialEq)]
pub struct Sgd {
    lr: f64,
    momentum: f64,
    velocity: Vec<Vec<f64>>,
    started: bool,
}

impl Sgd {
    /// Plain SGD.
    pub fn new(lr: f64) -> Self {
        Self::with_momentum(lr, 0.0)
    }

    /// SGD with heavy-ball momentum `μ`.
    pub fn with_momentum(lr: f64, momentum: f64) -> Self {
        Self {
            lr,
            momentum,
            velocity: Vec::new(),
            started: false,
        }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, params: &mut [&mut Parameter]) {
        if self.momentum == 0.0 {
            for p in params.iter_mut() {
                let (value, grad) = p.split_mut();
                for (v, g) in value.iter_mut().zip(grad) {
                    *v -= self.lr * g;
                }
            }
            return;
        }

        if ensure_state(&mut self.velocity, params) {
            self.started = false;
        }

        for (p, buf) in params.iter_mut().zip(&mut self.velocity) {
            let (value, grad) = p.split_mut();
            for ((v, g), b) in value.iter_mut().zip(grad).zip(buf.iter_mut()) {
                *b = if self.started {
                    self.momentum * *b + g
                } else {
                    *g
                };
                *v -= self.lr * *b;
            }
        }
        self.started = true;
    }

    fn learning_rate(&self) -> f64 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.lr = lr;
    }

    fn reset(&mut self) {
        self.velocity.clear();
        self.started = false;
    }
}

/// Adam optimizer with bias-corrected moment estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct Adam {
    lr: f64,
    beta1: f64,
    beta2: f64,
    eps: f64,
    m: Vec<Vec<f64>>,
    v: Vec<Vec<f64>>,
    t: i32,
}

impl Adam {
    /// Adam with the usual defaults: β1 = 0.9, β2 = 0.999, ε = 1e-8.
    pub fn new(lr: f64) -> Self {
        Self::with_betas(lr, 0.9, 0.999, 1e-8)
    }

    /// Adam with explicit moment decay rates and ε.
    pub fn with_betas(lr: f64, beta1: f64, beta2: f64, eps: f64) -> Self {
        Self {
            lr,
            beta1,
            beta2,
            eps,
            m: Vec::new(),
            v: Vec::new(),
            t: 0,
        }
    }

    /// Number of steps taken since creation or the last reset.
    pub fn steps(&self) -> i32 {
        self.t
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [&mut Parameter]) {
        let rebuilt = ensure_state(&mut self.m, params);
        if ensure_state(&mut self.v, params) || rebuilt {
            self.t = 0;
        }

        self.t += 1;
        let bias1 = 1.0 - self.beta1.powi(self.t);
        let bias2_sqrt = (1.0 - self.beta2.powi(self.t)).sqrt();
        let step_size = self.lr / bias1;

        for ((p, m), v) in params.iter_mut().zip(&mut self.m).zip(&mut self.v) {
            let (value, grad) = p.split_mut();
            for i in 0..value.len() {
                let g = grad[i];
                m[i] = self.beta1 * m[i] + (1.0 - self.beta1) * g;
                v[i] = self.beta2 * v[i] + (1.0 - self.beta2) * g * g;
                let denom = v[i].sqrt() / bias2_sqrt + self.eps;
                value[i] -= step_size * m[i] / denom;
            }
        }
    }

    fn learning_rate(&self) -> f64 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.lr = lr;
    }

    fn reset(&mut self) {
        self.m.clear();
        self.v.clear();
        self.t = 0;
    }
}

impl<O: Optimizer + ?Sized> Optimizer for Box<O> {
    fn step(&mut self, params: &mut [&mut Parameter]) {
        (**self).step(params);
    }

    fn learning_rate(&self) -> f64 {
        (**self).learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f64) {
        (**self).set_learning_rate(lr);
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}
