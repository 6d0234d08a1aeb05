//! Error taxonomy for the kinetics engine.
//!
//! Only malformed inputs abort a query. Convergence and domain failures are
//! raised per point and the curve builders decide whether to omit the point
//! or propagate it (strict mode).

use thiserror::Error;

/// Errors produced by the kinetics engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KineticsError {
    /// Alloy input is malformed: unknown element, missing carbon, non-finite
    /// or negative content, or an invalid grain size.
    #[error("invalid composition: {message}")]
    InvalidComposition { message: String },

    /// Cooling path is malformed (too short, non-finite, time not increasing).
    #[error("invalid cooling path: {message}")]
    InvalidCoolingPath { message: String },

    /// A grid, sweep or configuration value is unusable.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// Bounded root-finder failed to bracket or converge.
    #[error("root finder did not converge after {iterations} iterations (residual {residual:e})")]
    Convergence { iterations: usize, residual: f64 },

    /// Value lies outside the range the empirical formulas were fitted on.
    #[error("{quantity} = {value} outside fitted range [{min}, {max}]")]
    Domain {
        quantity: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl KineticsError {
    pub(crate) fn invalid_composition(message: impl Into<String>) -> Self {
        Self::InvalidComposition {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidCoolingPath {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    pub(crate) fn domain(quantity: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        Self::Domain {
            quantity: quantity.into(),
            value,
            min,
            max,
        }
    }

    /// True for the per-point failures that lenient builders omit.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Convergence { .. } | Self::Domain { .. })
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, KineticsError>;
