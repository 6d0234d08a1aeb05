//! Time-constant fitting of CCT events
//!
//! Downstream process models describe each phase on a cooling path by a
//! first-order law `x(t) = ξ·(1 − exp(−t/τ))`. Given the start and finish
//! times of an event, with `x_s` the start fraction and `x_r` the fraction
//! of the first-order asymptote reached at finish:
//!
//! ```text
//! τ   = (ln(x_s / x_r) − t_f − t_s) / ln(1 − x_s / x_r)
//! ξ   = x_s / (1 − exp(−t_s / τ))
//! t_m = −τ · ln(1 − 0.5 / ξ)
//! ```
//!
//! The transform is stateless and never fails; rows whose result is not a
//! finite number are reported without a fit.

use super::additivity::{CctCurve, CoolingEvent};
use crate::core_types::Phase;
use serde::{Deserialize, Serialize};

/// Fractions the fit is anchored on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConvention {
    /// Fraction at the start event
    pub start_fraction: f64,
    /// Fraction at the finish event
    pub reference_fraction: f64,
}

impl Default for FitConvention {
    fn default() -> Self {
        Self {
            start_fraction: 0.01,
            reference_fraction: 0.9,
        }
    }
}

/// First-order law parameters of one event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeConstantFit {
    /// τ (s)
    pub tau: f64,
    /// ξ, the asymptotic amplitude
    pub amplitude: f64,
    /// t_m (s), time to half transformation
    pub half_time: f64,
}

/// Fit attached to the event it came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedEvent {
    pub phase: Phase,
    pub cooling_rate: f64,
    pub fit: Option<TimeConstantFit>,
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Fit a start/finish pair
pub fn fit_time_constant(
    start: f64,
    finish: f64,
    convention: &FitConvention,
) -> Option<TimeConstantFit> {
    let ratio = convention.start_fraction / convention.reference_fraction;
    let tau = finite((ratio.ln() - finish - start) / (-ratio).ln_1p())?;
    let amplitude = finite(convention.start_fraction / -(-start / tau).exp_m1())?;
    let half_time = finite(-tau * (-0.5 / amplitude).ln_1p())?;
    Some(TimeConstantFit {
        tau,
        amplitude,
        half_time,
    })
}

/// Fit one CCT event; `None` unless both start and finish exist
pub fn fit_event(event: &CoolingEvent, convention: &FitConvention) -> Option<TimeConstantFit> {
    let start = event.event.start_time()?;
    let finish = event.event.finish_time()?;
    fit_time_constant(start, finish, convention)
}

/// Fit every event of a CCT curve that has both start and finish
pub fn fit_curve(curve: &CctCurve, convention: &FitConvention) -> Vec<FittedEvent> {
    curve
        .events
        .iter()
        .filter(|e| e.event.start.is_some() && e.event.finish.is_some())
        .map(|e| FittedEvent {
            phase: curve.phase,
            cooling_rate: e.cooling_rate,
            fit: fit_event(e, convention),
        })
        .collect()
}
