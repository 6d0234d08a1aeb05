//! Bounded bracketing root-finder
//!
//! Bisection is slow but never leaves its bracket, which matters here: the
//! functions being solved are tabulated or have singular endpoints, and a
//! Newton step that lands outside (0, 1) or below absolute zero is worse than
//! a few extra iterations.

use crate::error::{KineticsError, Result};
use serde::{Deserialize, Serialize};

/// Root-finder tolerances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootFinder {
    /// Relative bracket width at which the root is accepted
    pub tolerance: f64,
    /// Absolute bracket width floor, for roots at or near zero
    pub absolute_tolerance: f64,
    /// Iteration cap; hitting it yields [`KineticsError::Convergence`]
    pub max_iterations: usize,
}

impl Default for RootFinder {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            absolute_tolerance: 1e-15,
            max_iterations: 200,
        }
    }
}

impl RootFinder {
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(KineticsError::invalid_parameter(
                "root_finder.tolerance",
                format!("must lie in (0, 1), got {}", self.tolerance),
            ));
        }
        if self.absolute_tolerance.is_nan() || self.absolute_tolerance < 0.0 {
            return Err(KineticsError::invalid_parameter(
                "root_finder.absolute_tolerance",
                format!("must be non-negative, got {}", self.absolute_tolerance),
            ));
        }
        if self.max_iterations == 0 {
            return Err(KineticsError::invalid_parameter(
                "root_finder.max_iterations",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Find x in [lower, upper] with f(x) = 0 by bisection.
    ///
    /// f(lower) and f(upper) must have opposite signs (or one of them be zero).
    ///
    /// # Errors
    /// [`KineticsError::Convergence`] when the interval does not bracket a sign
    /// change, f is not finite at an endpoint, or the bracket is still wider
    /// than the tolerance after `max_iterations` halvings.
    pub fn bisect<F>(&self, f: F, lower: f64, upper: f64) -> Result<f64>
    where
        F: Fn(f64) -> f64,
    {
        let (mut a, mut b) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        let mut fa = f(a);
        let fb = f(b);

        if fa == 0.0 {
            return Ok(a);
        }
        if fb == 0.0 {
            return Ok(b);
        }
        if !fa.is_finite() || !fb.is_finite() || fa.signum() == fb.signum() {
            return Err(KineticsError::Convergence {
                iterations: 0,
                residual: fa.abs().min(fb.abs()),
            });
        }

        let mut residual = f64::INFINITY;
        for _ in 0..self.max_iterations {
            let mid = 0.5 * (a + b);
            let fm = f(mid);
            residual = fm.abs();

            if fm == 0.0 {
                return Ok(mid);
            }
            if fm.signum() == fa.signum() {
                a = mid;
                fa = fm;
            } else {
                b = mid;
            }

            let scale = a.abs().max(b.abs());
            if b - a <= self.tolerance * scale + self.absolute_tolerance {
                return Ok(0.5 * (a + b));
            }
        }

        Err(KineticsError::Convergence {
            iterations: self.max_iterations,
            residual,
        })
    }
}
