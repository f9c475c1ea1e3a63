//! Anti-Derivative Anti-Aliasing (ADAA) of tanh, orders 1 to 3.
//!
//! ADAA reduces aliasing in nonlinear waveshaping by replacing the direct
//! evaluation `f(x[n])` with divided differences of antiderivatives of `f`.
//! Each order averages the nonlinearity over the linearly interpolated
//! input once more, which acts as a progressively steeper continuous-time
//! lowpass applied *before* sampling.
//!
//! All operators take a [`TapMatrix`] whose row `k` is the input delayed by
//! `k` samples and return one output per column. With `z_k = X[k, n]` and
//! `D_F(a, b) = (F(a) − F(b)) / (a − b)`:
//!
//! ```text
//! order 1:  D_F1(z0, z1)
//! order 2:  2/(z0 − z2) · (D_F2(z0, z1) − D_F2(z1, z2))
//! order 3:  1/(z1 − z2) · ( 2/(z0 − z2) · (D_F3(z0, z1) − D_F3(z1, z2))
//!                         − 2/(z1 − z3) · (D_F3(z1, z2) − D_F3(z2, z3)) )
//! ```
//!
//! # Ill-conditioning
//!
//! Equal adjacent taps (silence, held DC, a sine sampled symmetrically about
//! its peak) make the denominators vanish. The operators do not guard
//! against this: such columns come out as NaN or ±Inf rather than as a
//! plausible but wrong finite number. Callers must keep adjacent taps
//! distinct, and can check results with [`has_degenerate_output`].
//!
//! # Reference
//!
//! Bilbao, Esqueda, Parker, Välimäki, "Antiderivative Antialiasing for
//! Memoryless Nonlinearities", IEEE Signal Processing Letters 24(7),
//! pp. 1049–1053, 2017.
//!
//! # Example
//!
//! ```rust
//! use aliaslab_core::{TapMatrix, adaa};
//!
//! let signal: Vec<f64> = (0..64).map(|n| 3.0 * (0.37 * n as f64).sin()).collect();
//! let x = TapMatrix::sliding(&signal, 4).unwrap();
//!
//! let y = adaa::order2(&x);
//! assert_eq!(y.len(), x.samples());
//! assert!(y.iter().all(|v| v.abs() <= 1.0 + 1e-9));
//! ```

use core::fmt;
use core::str::FromStr;

use crate::error::{CoreError, Result};
use crate::special::{f1, f2, f3};
use crate::taps::TapMatrix;

/// Divided difference `(F(a) − F(b)) / (a − b)` given precomputed `F(a)`, `F(b)`.
#[inline]
fn divided(fa: f64, fb: f64, a: f64, b: f64) -> f64 {
    (fa - fb) / (a - b)
}

/// Tanh applied directly to row 0, without antialiasing.
///
/// This is the aliasing reference the ADAA orders are compared against.
pub fn naive(x: &TapMatrix) -> Vec<f64> {
    x.row(0).iter().map(|v| v.tanh()).collect()
}

/// First-order ADAA.
///
/// # Panics
///
/// Panics if `x` has fewer than 2 taps.
pub fn order1(x: &TapMatrix) -> Vec<f64> {
    assert!(
        x.taps() >= 2,
        "order 1 antialiasing needs at least 2 taps, got {}",
        x.taps()
    );

    let (z0, z1) = (x.row(0), x.row(1));
    z0.iter()
        .zip(z1)
        .map(|(&a, &b)| divided(f1(a), f1(b), a, b))
        .collect()
}

/// Second-order ADAA.
///
/// # Panics
///
/// Panics if `x` has fewer than 3 taps.
pub fn order2(x: &TapMatrix) -> Vec<f64> {
    assert!(
        x.taps() >= 3,
        "order 2 antialiasing needs at least 3 taps, got {}",
        x.taps()
    );

    let (z0, z1, z2) = (x.row(0), x.row(1), x.row(2));
    let mut out = Vec::with_capacity(x.samples());
    for n in 0..x.samples() {
        let (a, b, c) = (z0[n], z1[n], z2[n]);
        let (fa, fb, fc) = (f2(a), f2(b), f2(c));

        let scale = 2.0 / (a - c);
        let d01 = divided(fa, fb, a, b);
        let d12 = divided(fb, fc, b, c);
        out.push(scale * (d01 - d12));
    }
    out
}

/// Third-order ADAA.
///
/// # Panics
///
/// Panics if `x` has fewer than 4 taps.
pub fn order3(x: &TapMatrix) -> Vec<f64> {
    assert!(
        x.taps() >= 4,
        "order 3 antialiasing needs at least 4 taps, got {}",
        x.taps()
    );

    let (z0, z1, z2, z3) = (x.row(0), x.row(1), x.row(2), x.row(3));
    let mut out = Vec::with_capacity(x.samples());
    for n in 0..x.samples() {
        let (a, b, c, d) = (z0[n], z1[n], z2[n], z3[n]);
        let (fa, fb, fc, fd) = (f3(a), f3(b), f3(c), f3(d));

        let outer = 1.0 / (b - c);
        let left = 2.0 / (a - c);
        let right = 2.0 / (b - d);

        let d01 = divided(fa, fb, a, b);
        let d12 = divided(fb, fc, b, c);
        let d23 = divided(fc, fd, c, d);

        out.push(outer * (left * (d01 - d12) - right * (d12 - d23)));
    }
    out
}

/// Whether any output sample is NaN or infinite.
///
/// A degenerate result means some column had coincident adjacent taps.
pub fn has_degenerate_output(y: &[f64]) -> bool {
    y.iter().any(|v| !v.is_finite())
}

/// Antialiasing order selector.
///
/// [`apply`](Self::apply) checks the tap count and returns
/// [`CoreError::InsufficientTaps`] instead of panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AntialiasOrder {
    /// Plain tanh, no antialiasing.
    None,
    /// First-order ADAA.
    #[default]
    First,
    /// Second-order ADAA.
    Second,
    /// Third-order ADAA.
    Third,
}

impl AntialiasOrder {
    /// All orders, lowest first.
    pub const ALL: [AntialiasOrder; 4] = [
        AntialiasOrder::None,
        AntialiasOrder::First,
        AntialiasOrder::Second,
        AntialiasOrder::Third,
    ];

    /// Numeric order, 0 to 3.
    pub fn as_u8(self) -> u8 {
        match self {
            AntialiasOrder::None => 0,
            AntialiasOrder::First => 1,
            AntialiasOrder::Second => 2,
            AntialiasOrder::Third => 3,
        }
    }

    /// Minimum number of taps (`order + 1`).
    pub fn required_taps(self) -> usize {
        usize::from(self.as_u8()) + 1
    }

    /// Run the operator for this order on `x`.
    pub fn apply(self, x: &TapMatrix) -> Result<Vec<f64>> {
        let required = self.required_taps();
        if x.taps() < required {
            return Err(CoreError::InsufficientTaps {
                order: self.as_u8(),
                required,
                found: x.taps(),
            });
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(order = self.as_u8(), samples = x.samples(), "adaa apply");

        Ok(match self {
            AntialiasOrder::None => naive(x),
            AntialiasOrder::First => order1(x),
            AntialiasOrder::Second => order2(x),
            AntialiasOrder::Third => order3(x),
        })
    }
}

impl TryFrom<u32> for AntialiasOrder {
    type Error = CoreError;

    fn try_from(order: u32) -> core::result::Result<Self, Self::Error> {
        match order {
            0 => Ok(AntialiasOrder::None),
            1 => Ok(AntialiasOrder::First),
            2 => Ok(AntialiasOrder::Second),
            3 => Ok(AntialiasOrder::Third),
            other => Err(CoreError::UnsupportedOrder(other)),
        }
    }
}

impl FromStr for AntialiasOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "naive" => Ok(AntialiasOrder::None),
            other => other
                .parse::<u32>()
                .map_err(|_| CoreError::InvalidOrderName(s.trim().to_string()))
                .and_then(AntialiasOrder::try_from),
        }
    }
}

impl fmt::Display for AntialiasOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AntialiasOrder::None => f.write_str("naive"),
            other => write!(f, "adaa{}", other.as_u8()),
        }
    }
}
