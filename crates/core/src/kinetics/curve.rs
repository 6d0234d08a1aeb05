//! Curve and event records shared by the TTT and CCT builders

use crate::core_types::{Celsius, Phase};
use serde::{Deserialize, Serialize};

/// A (time, temperature) point on a start or finish line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Seconds since the start of the path (TTT: since the quench)
    pub time: f64,
    pub temperature: Celsius,
}

impl CurvePoint {
    pub fn new(time: f64, temperature: Celsius) -> Self {
        Self { time, temperature }
    }
}

/// Start and finish lines of one phase, as plotted on a TTT or CCT diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationCurve {
    pub phase: Phase,
    pub start: Vec<CurvePoint>,
    pub finish: Vec<CurvePoint>,
}

impl TransformationCurve {
    pub fn empty(phase: Phase) -> Self {
        Self {
            phase,
            start: Vec::new(),
            finish: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.finish.is_empty()
    }
}

/// Start and finish of one phase along one thermal path
///
/// `None` means the threshold was never reached; a phase that never starts
/// has not formed, which is a result rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseEvent {
    pub phase: Phase,
    pub start: Option<CurvePoint>,
    pub finish: Option<CurvePoint>,
}

impl PhaseEvent {
    pub fn not_formed(phase: Phase) -> Self {
        Self {
            phase,
            start: None,
            finish: None,
        }
    }

    pub fn formed(&self) -> bool {
        self.start.is_some()
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start.map(|p| p.time)
    }

    pub fn finish_time(&self) -> Option<f64> {
        self.finish.map(|p| p.time)
    }

    pub fn start_temperature(&self) -> Option<Celsius> {
        self.start.map(|p| p.temperature)
    }

    pub fn finish_temperature(&self) -> Option<Celsius> {
        self.finish.map(|p| p.temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_curve() {
        let curve = TransformationCurve::empty(Phase::Bainite);
        assert!(curve.is_empty());
        let one_sided = TransformationCurve {
            finish: vec![CurvePoint::new(2.0, Celsius::new(480.0))],
            ..curve
        };
        assert!(!one_sided.is_empty());
    }

    #[test]
    fn test_not_formed() {
        let event = PhaseEvent::not_formed(Phase::Bainite);
        assert!(!event.formed());
        assert_eq!(event.start_time(), None);
        assert_eq!(event.finish_temperature(), None);
    }
}
