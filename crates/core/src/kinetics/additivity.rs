//! Scheil additivity and CCT construction
//!
//! The time to reach fraction X* along a thermal path is where
//!
//! ```text
//! Σ Δt_i / τ(X*, T_{i−1}) = 1
//! ```
//!
//! (left Riemann sum over the resampled path). The crossing step is linearly
//! interpolated so the event lands between samples. Martensite is athermal and
//! is not projected this way: its start and finish are where the path first
//! crosses the Koistinen–Marburger temperatures of the two thresholds.
//!
//! A CCT diagram is the set of events over a family of cooling paths; paths
//! are independent and are evaluated in parallel.

use super::cooling_path::{CoolingPath, MAX_SAMPLES};
use super::curve::{CurvePoint, PhaseEvent, TransformationCurve};
use super::parameters::{DiffusionalParameters, KineticsModel};
use crate::alloy::Alloy;
use crate::core_types::{Celsius, Phase};
use crate::error::{KineticsError, Result};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound on the number of paths in a sweep
const MAX_SWEEP_PATHS: usize = 100_000;

/// Family of constant-rate cooling paths, log-spaced in rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoolingRateSweep {
    /// Austenitizing temperature every path starts from
    pub initial_temperature: Celsius,
    pub final_temperature: Celsius,
    /// Slowest rate (°C/s)
    pub min_rate: f64,
    /// Fastest rate (°C/s)
    pub max_rate: f64,
    /// Number of paths
    pub rates: usize,
    /// Resampling density of each path
    pub samples_per_path: usize,
}

impl Default for CoolingRateSweep {
    fn default() -> Self {
        Self {
            initial_temperature: Celsius::new(900.0),
            final_temperature: Celsius::ROOM,
            min_rate: 1e-3,
            max_rate: 1e3,
            rates: 61,
            samples_per_path: 1000,
        }
    }
}

impl CoolingRateSweep {
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature.is_finite()
            && self.final_temperature.is_finite()
            && self.initial_temperature > self.final_temperature)
        {
            return Err(KineticsError::invalid_parameter(
                "sweep.initial_temperature",
                format!(
                    "must be above final temperature ({} <= {})",
                    self.initial_temperature, self.final_temperature
                ),
            ));
        }
        if !(self.min_rate > 0.0 && self.max_rate.is_finite() && self.min_rate <= self.max_rate) {
            return Err(KineticsError::invalid_parameter(
                "sweep.min_rate/max_rate",
                format!(
                    "need 0 < min_rate <= max_rate, got {} and {}",
                    self.min_rate, self.max_rate
                ),
            ));
        }
        if !(1..=MAX_SWEEP_PATHS).contains(&self.rates) {
            return Err(KineticsError::invalid_parameter(
                "sweep.rates",
                format!("need 1..={MAX_SWEEP_PATHS} paths, got {}", self.rates),
            ));
        }
        if !(2..=MAX_SAMPLES).contains(&self.samples_per_path) {
            return Err(KineticsError::invalid_parameter(
                "sweep.samples_per_path",
                format!(
                    "need 2..={MAX_SAMPLES} samples, got {}",
                    self.samples_per_path
                ),
            ));
        }
        Ok(())
    }

    /// Cooling rates from slowest to fastest
    pub fn cooling_rates(&self) -> Vec<f64> {
        if self.rates == 1 {
            return vec![self.min_rate];
        }
        let span = (self.max_rate / self.min_rate).ln();
        let last = (self.rates - 1) as f64;
        (0..self.rates)
            .map(|i| self.min_rate * (span * i as f64 / last).exp())
            .collect()
    }

    pub fn paths(&self) -> Result<Vec<CoolingPath>> {
        self.validate()?;
        self.cooling_rates()
            .into_iter()
            .map(|rate| {
                CoolingPath::constant_rate(self.initial_temperature, self.final_temperature, rate)
            })
            .collect()
    }
}

/// Event of one phase on one path of a CCT family
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoolingEvent {
    /// Index of the path in the family
    pub path_index: usize,
    /// Mean cooling rate of the path (°C/s)
    pub cooling_rate: f64,
    pub event: PhaseEvent,
}

/// CCT events of one phase, in path order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CctCurve {
    pub phase: Phase,
    pub events: Vec<CoolingEvent>,
}

impl CctCurve {
    /// Start/finish lines, each sorted by time
    pub fn curve(&self) -> TransformationCurve {
        let mut start: Vec<CurvePoint> = self.events.iter().filter_map(|e| e.event.start).collect();
        let mut finish: Vec<CurvePoint> =
            self.events.iter().filter_map(|e| e.event.finish).collect();
        start.sort_by(|a, b| a.time.total_cmp(&b.time));
        finish.sort_by(|a, b| a.time.total_cmp(&b.time));
        TransformationCurve {
            phase: self.phase,
            start,
            finish,
        }
    }

    /// Events where the phase formed
    pub fn formed(&self) -> impl Iterator<Item = &CoolingEvent> {
        self.events.iter().filter(|e| e.event.formed())
    }
}

/// Continuous-Cooling-Transformation diagram of one alloy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CctDiagram {
    pub alloy: Alloy,
    pub curves: FxHashMap<Phase, CctCurve>,
}

impl CctDiagram {
    pub fn curve(&self, phase: Phase) -> Option<&CctCurve> {
        self.curves.get(&phase)
    }

    pub fn transformation_curve(&self, phase: Phase) -> TransformationCurve {
        self.curve(phase)
            .map_or_else(|| TransformationCurve::empty(phase), CctCurve::curve)
    }
}

/// Time at which the Scheil sum for fraction X* first reaches 1
fn scheil_crossing(
    params: &DiffusionalParameters,
    reduced_time: f64,
    path: &CoolingPath,
) -> Option<CurvePoint> {
    let times = path.times();
    let temperatures = path.temperatures();

    let mut sum = 0.0;
    for i in 1..times.len() {
        let dt = times[i] - times[i - 1];
        let rate = params.inverse_rate_factor(temperatures[i - 1]) / reduced_time;
        let next = sum + dt * rate;
        if next >= 1.0 {
            let weight = (1.0 - sum) / (next - sum);
            let (t0, y0, y1) = (times[i - 1], *temperatures[i - 1], *temperatures[i]);
            return Some(CurvePoint::new(
                t0 + weight * dt,
                Celsius::from(y0 + weight * (y1 - y0)),
            ));
        }
        sum = next;
    }
    None
}

/// First time the path is at or below `threshold`
fn first_crossing_below(threshold: Celsius, path: &CoolingPath) -> Option<CurvePoint> {
    let times = path.times();
    let temperatures = path.temperatures();

    if temperatures[0] <= threshold {
        return Some(CurvePoint::new(times[0], temperatures[0]));
    }
    let i = temperatures.iter().position(|t| *t <= threshold)?;
    let (y0, y1) = (*temperatures[i - 1], *temperatures[i]);
    let weight = (y0 - *threshold) / (y0 - y1);
    Some(CurvePoint::new(
        times[i - 1] + weight * (times[i] - times[i - 1]),
        threshold,
    ))
}

/// Event of a phase on a path that is already resampled
fn event_on_samples(model: &KineticsModel, phase: Phase, path: &CoolingPath) -> PhaseEvent {
    let config = model.config();

    match model.diffusional(phase) {
        Some(params) => {
            let law = model.law();
            let start = scheil_crossing(params, law.reduced_time(config.start_fraction), path);
            // Finish cannot precede start; skip the second pass when nothing formed
            let finish = start.and_then(|_| {
                scheil_crossing(params, law.reduced_time(config.finish_fraction), path)
            });
            PhaseEvent {
                phase,
                start,
                finish,
            }
        }
        None => {
            let martensite = model.martensite();
            let crossing = |fraction: f64| {
                martensite
                    .temperature_for_fraction(fraction)
                    .and_then(|t| first_crossing_below(t, path))
            };
            let start = crossing(config.start_fraction);
            let finish = start.and_then(|_| crossing(config.finish_fraction));
            PhaseEvent {
                phase,
                start,
                finish,
            }
        }
    }
}

/// Start and finish of one phase along a path resampled to `samples` points
///
/// # Errors
/// [`KineticsError::InvalidParameter`] when `samples < 2`. A phase that never
/// reaches its start threshold is reported as not formed, not as an error.
pub fn phase_event(
    model: &KineticsModel,
    phase: Phase,
    path: &CoolingPath,
    samples: usize,
) -> Result<PhaseEvent> {
    let resampled = path.resample(samples)?;
    Ok(event_on_samples(model, phase, &resampled))
}

/// Events of every phase along one path, in [`Phase::ALL`] order
pub fn phase_events(
    model: &KineticsModel,
    path: &CoolingPath,
    samples: usize,
) -> Result<[PhaseEvent; 4]> {
    let resampled = path.resample(samples)?;
    Ok(Phase::ALL.map(|phase| event_on_samples(model, phase, &resampled)))
}

/// CCT diagram over an arbitrary family of paths
pub fn build_cct_for_paths(
    model: &KineticsModel,
    paths: &[CoolingPath],
    samples: usize,
) -> Result<CctDiagram> {
    let per_path: Vec<[PhaseEvent; 4]> = paths
        .par_iter()
        .map(|path| phase_events(model, path, samples))
        .collect::<Result<_>>()?;

    let mut curves: FxHashMap<Phase, CctCurve> = Phase::ALL
        .into_iter()
        .map(|phase| {
            (
                phase,
                CctCurve {
                    phase,
                    events: Vec::with_capacity(paths.len()),
                },
            )
        })
        .collect();

    for (path_index, (path, events)) in paths.iter().zip(per_path).enumerate() {
        let cooling_rate = path.mean_cooling_rate();
        for event in events {
            if let Some(curve) = curves.get_mut(&event.phase) {
                curve.events.push(CoolingEvent {
                    path_index,
                    cooling_rate,
                    event,
                });
            }
        }
    }

    for curve in curves.values() {
        debug!(
            "CCT {}: formed on {}/{} paths",
            curve.phase,
            curve.formed().count(),
            curve.events.len()
        );
    }

    Ok(CctDiagram {
        alloy: *model.alloy(),
        curves,
    })
}

/// CCT diagram over a constant-rate sweep
pub fn build_cct(model: &KineticsModel, sweep: &CoolingRateSweep) -> Result<CctDiagram> {
    let paths = sweep.paths()?;
    debug!(
        "CCT sweep: {} paths, {:.3e}..{:.3e} °C/s",
        paths.len(),
        sweep.min_rate,
        sweep.max_rate
    );
    build_cct_for_paths(model, &paths, sweep.samples_per_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_model() -> KineticsModel {
        let alloy = Alloy::from_pairs(3.0, [("C", 0.35), ("Mn", 0.37)]).unwrap();
        KineticsModel::with_defaults(alloy).unwrap()
    }

    fn slow_path() -> CoolingPath {
        CoolingPath::from_points([(0.0, 843.0), (1e5, 0.0)]).unwrap()
    }

    #[test]
    fn test_sweep_rates_log_spaced() {
        let sweep = CoolingRateSweep {
            min_rate: 0.1,
            max_rate: 100.0,
            rates: 4,
            ..CoolingRateSweep::default()
        };
        let rates = sweep.cooling_rates();
        for (rate, expected) in rates.iter().zip([0.1, 1.0, 10.0, 100.0]) {
            assert_relative_eq!(*rate, expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_invalid_sweeps() {
        let bad = [
            CoolingRateSweep {
                min_rate: 0.0,
                ..CoolingRateSweep::default()
            },
            CoolingRateSweep {
                rates: 0,
                ..CoolingRateSweep::default()
            },
            CoolingRateSweep {
                samples_per_path: 1,
                ..CoolingRateSweep::default()
            },
            CoolingRateSweep {
                rates: usize::MAX,
                ..CoolingRateSweep::default()
            },
            CoolingRateSweep {
                samples_per_path: usize::MAX,
                ..CoolingRateSweep::default()
            },
            CoolingRateSweep {
                final_temperature: Celsius::new(1000.0),
                ..CoolingRateSweep::default()
            },
        ];
        for sweep in bad {
            assert!(matches!(
                sweep.validate(),
                Err(KineticsError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_slow_cooling_ferrite_then_pearlite() {
        let model = reference_model();
        let ferrite = phase_event(&model, Phase::Ferrite, &slow_path(), 2001).unwrap();
        let pearlite = phase_event(&model, Phase::Pearlite, &slow_path(), 2001).unwrap();

        let f_start = ferrite.start.unwrap();
        let f_finish = ferrite.finish.unwrap();
        assert!(f_start.time < f_finish.time);
        assert!(f_start.temperature < model.alloy().ae3());
        // Ferrite starts about 15 °C below Ae3 at this rate
        assert!((*f_start.temperature - 772.0).abs() < 5.0);

        let p_finish = pearlite.finish.unwrap();
        assert!(f_finish.time < p_finish.time);
        assert!(pearlite.start.unwrap().temperature < model.alloy().ae1());
    }

    #[test]
    fn test_path_outside_range_not_formed() {
        let model = reference_model();
        let hot = CoolingPath::from_points([(0.0, 900.0), (100.0, 800.0)]).unwrap();
        for phase in Phase::ALL {
            let event = phase_event(&model, phase, &hot, 100).unwrap();
            assert!(!event.formed(), "{phase} should not form above Ae3");
            assert!(event.finish.is_none());
        }
    }

    #[test]
    fn test_quench_forms_only_martensite() {
        let model = reference_model();
        let quench =
            CoolingPath::constant_rate(Celsius::new(900.0), Celsius::ROOM, 1e4).unwrap();
        let events = phase_events(&model, &quench, 2000).unwrap();
        for event in &events[..3] {
            assert!(!event.formed(), "{} formed in a quench", event.phase);
        }
        let martensite = events[3];
        assert_eq!(martensite.phase, Phase::Martensite);
        let start = martensite.start.unwrap();
        let expected = model.martensite().temperature_for_fraction(0.01).unwrap();
        assert_relative_eq!(*start.temperature, *expected, max_relative = 1e-12);
        assert!(martensite.finish.unwrap().temperature < start.temperature);
    }

    #[test]
    fn test_cct_sweep() {
        let model = reference_model();
        let sweep = CoolingRateSweep {
            rates: 13,
            samples_per_path: 400,
            ..CoolingRateSweep::default()
        };
        let cct = build_cct(&model, &sweep).unwrap();
        for phase in Phase::ALL {
            assert_eq!(cct.curve(phase).unwrap().events.len(), 13);
        }

        // Slowest path forms ferrite, fastest does not
        let ferrite = cct.curve(Phase::Ferrite).unwrap();
        assert!(ferrite.events[0].event.formed());
        assert!(!ferrite.events[12].event.formed());
        assert!(ferrite.events[0].cooling_rate < ferrite.events[12].cooling_rate);

        let curve = cct.transformation_curve(Phase::Ferrite);
        assert!(curve.start.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn test_cct_is_deterministic() {
        let model = reference_model();
        let sweep = CoolingRateSweep {
            rates: 9,
            samples_per_path: 300,
            ..CoolingRateSweep::default()
        };
        let a = build_cct(&model, &sweep).unwrap();
        let b = build_cct(&model, &sweep).unwrap();
        assert_eq!(a, b);
    }
}
