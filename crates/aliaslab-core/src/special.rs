//! Antiderivatives of tanh and the polylogarithms they need.
//!
//! The antialiasing engine works on the first three antiderivatives of
//! `tanh`:
//!
//! ```text
//! F1(x) = log(cosh(x))
//! F2(x) = ½·Li₂(−e^{−2x}) − ½x² − x·log(1 + e^{−2x}) + x·log(cosh(x))
//! F3(x) = ⅙·x·(−2x² − 3x·log(1 + e^{−2x}) + 3x·log(cosh(x))) − ¼·Li₃(−e^{−2x})
//! ```
//!
//! All integration constants are fixed to zero. They cancel in the divided
//! differences of [`crate::adaa`], and the ADAA formulas rely on the exact
//! functions above, so they must not be reintroduced here.
//!
//! # Evaluation
//!
//! Substituting `log(cosh(x)) = x + log(1 + e^{−2x}) − ln 2` collapses the
//! closed forms to
//!
//! ```text
//! F2(x) = x²/2 − x·ln 2 + ½·Li₂(−e^{−2x})
//! F3(x) = x³/6 − x²·ln 2/2 − ¼·Li₃(−e^{−2x})
//! ```
//!
//! For `x ≥ 0` the polylogarithm argument lies in `[−1, 0)`. For `x < 0`,
//! `e^{−2x}` overflows long before `x` becomes large, so the inversion
//! formulas
//!
//! ```text
//! Li₂(−y) = −π²/6 − ½·ln²(y) − Li₂(−1/y)
//! Li₃(−y) =  Li₃(−1/y) − π²/6·ln(y) − ⅙·ln³(y)
//! ```
//!
//! are applied with `y = e^{−2x}`, giving expressions in `e^{2x} ≤ 1`. The
//! branch switch is at `x = 0`; there is no magnitude threshold, and for
//! very large `|x|` the exponential underflows to zero where `Liₙ(0) = 0`.
//!
//! # Reference
//!
//! Bilbao, Esqueda, Parker, Välimäki, "Antiderivative Antialiasing for
//! Memoryless Nonlinearities", IEEE Signal Processing Letters 24(7),
//! pp. 1049–1053, 2017.

use core::f64::consts::{LN_2, PI};

use polylog::{Li2, Li3};

use crate::error::CoreError;

const PI_SQ: f64 = PI * PI;

/// Order of the polylogarithm `Liₙ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolylogOrder {
    /// `Li₂`, the dilogarithm.
    Dilog,
    /// `Li₃`, the trilogarithm.
    Trilog,
}

impl PolylogOrder {
    /// The integer order `n`.
    pub fn n(self) -> u32 {
        match self {
            PolylogOrder::Dilog => 2,
            PolylogOrder::Trilog => 3,
        }
    }
}

impl TryFrom<u32> for PolylogOrder {
    type Error = CoreError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        match n {
            2 => Ok(PolylogOrder::Dilog),
            3 => Ok(PolylogOrder::Trilog),
            other => Err(CoreError::UnsupportedPolylogOrder(other)),
        }
    }
}

/// Real part of `Liₙ(x)` for a single real argument.
#[inline]
pub fn li(x: f64, order: PolylogOrder) -> f64 {
    match order {
        PolylogOrder::Dilog => x.li2(),
        PolylogOrder::Trilog => x.li3(),
    }
}

/// Element-wise `Liₙ` over a slice.
///
/// Returns a vector of the same length. Arguments are real; for the
/// arguments produced by `−e^{−2x}` the imaginary part is zero, and for
/// `x > 1` only the real part is returned.
///
/// # Example
///
/// ```rust
/// use aliaslab_core::special::{polylog, PolylogOrder};
///
/// let y = polylog(&[0.0, -1.0], PolylogOrder::Dilog);
/// assert_eq!(y[0], 0.0);
/// assert!((y[1] + std::f64::consts::PI.powi(2) / 12.0).abs() < 1e-12);
/// ```
pub fn polylog(xs: &[f64], order: PolylogOrder) -> Vec<f64> {
    map_slice(xs, |x| li(x, order))
}

/// The nonlinearity itself.
#[inline]
pub fn tanh(x: f64) -> f64 {
    x.tanh()
}

/// `log(cosh(x))` without overflow for large `|x|`.
#[inline]
fn log_cosh(x: f64) -> f64 {
    let a = x.abs();
    a + (-2.0 * a).exp().ln_1p() - LN_2
}

/// First antiderivative of tanh: `log(cosh(x))`.
#[inline]
pub fn f1(x: f64) -> f64 {
    log_cosh(x)
}

/// Second antiderivative of tanh.
pub fn f2(x: f64) -> f64 {
    // -e^{-2|x|}, always in [-1, 0]
    let z = -(-2.0 * x.abs()).exp();
    let x2 = x * x;
    if x >= 0.0 {
        0.5 * x2 - x * LN_2 + 0.5 * z.li2()
    } else {
        -0.5 * x2 - x * LN_2 - PI_SQ / 12.0 - 0.5 * z.li2()
    }
}

/// Third antiderivative of tanh.
pub fn f3(x: f64) -> f64 {
    let z = -(-2.0 * x.abs()).exp();
    let x2 = x * x;
    let x3 = x2 * x;
    if x >= 0.0 {
        x3 / 6.0 - 0.5 * x2 * LN_2 - 0.25 * z.li3()
    } else {
        -x3 / 6.0 - 0.5 * x2 * LN_2 - PI_SQ * x / 12.0 - 0.25 * z.li3()
    }
}

/// Antiderivative of the given order (1, 2 or 3).
///
/// Order 0 is tanh itself.
///
/// # Panics
///
/// Panics for orders above 3.
pub fn antiderivative(order: u8) -> fn(f64) -> f64 {
    match order {
        0 => tanh,
        1 => f1,
        2 => f2,
        3 => f3,
        _ => panic!("no antiderivative of order {order}"),
    }
}

/// [`f1`] over a slice.
pub fn f1_slice(xs: &[f64]) -> Vec<f64> {
    map_slice(xs, f1)
}

/// [`f2`] over a slice.
pub fn f2_slice(xs: &[f64]) -> Vec<f64> {
    map_slice(xs, f2)
}

/// [`f3`] over a slice.
pub fn f3_slice(xs: &[f64]) -> Vec<f64> {
    map_slice(xs, f3)
}

/// Apply a scalar function element-wise into a pre-allocated buffer.
#[inline]
pub fn map_slice(xs: &[f64], f: impl Fn(f64) -> f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(xs.len());
    out.extend(xs.iter().map(|&x| f(x)));
    out
}
