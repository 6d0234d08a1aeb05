//! Phase-fraction integration along a cooling path
//!
//! Each diffusional phase carries an equivalent isothermal clock, the reduced
//! time `θ = Σ Δt / F(T)`. Because τ(X, T) = F(T)·S(X) the fraction reached by
//! a phase on its own is `X = S⁻¹(θ)` whatever the thermal history. Phases
//! compete for the same austenite: each step the progress of every phase is
//! turned into an absolute increment of what is still available,
//!
//! ```text
//! increment = available · (X_new − X_old) / (1 − X_old)
//! available = min(remaining austenite, capacity − already formed)
//! ```
//!
//! and increments that would overdraw the austenite are scaled down together.
//! Martensite then forms athermally from what remains whenever the path
//! reaches a new low below Ms.

use super::cooling_path::CoolingPath;
use super::parameters::KineticsModel;
use crate::core_types::{Celsius, Phase};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Below this remaining parent fraction a phase is treated as complete
const COMPLETE_EPSILON: f64 = 1e-12;

/// One row of a [`FractionTable`]; fractions are of the whole specimen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionRow {
    pub time: f64,
    pub temperature: Celsius,
    pub ferrite: f64,
    pub pearlite: f64,
    pub bainite: f64,
    pub martensite: f64,
    /// Untransformed austenite
    pub austenite: f64,
    /// Sum of all product phases
    pub total: f64,
}

impl FractionRow {
    pub fn fraction(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Ferrite => self.ferrite,
            Phase::Pearlite => self.pearlite,
            Phase::Bainite => self.bainite,
            Phase::Martensite => self.martensite,
        }
    }
}

/// Phase-fraction time series, one row per resampled path point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractionTable {
    rows: Vec<FractionRow>,
}

impl FractionTable {
    pub fn rows(&self) -> &[FractionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// State at the end of the path
    pub fn final_row(&self) -> Option<&FractionRow> {
        self.rows.last()
    }

    /// `(time, temperature, fraction)` series of one phase
    pub fn series(&self, phase: Phase) -> Vec<(f64, Celsius, f64)> {
        self.rows
            .iter()
            .map(|row| (row.time, row.temperature, row.fraction(phase)))
            .collect()
    }
}

/// Equivalent isothermal clock of one diffusional phase
#[derive(Debug, Clone, Copy, Default)]
struct PhaseClock {
    reduced_time: f64,
    /// Fraction of this phase's own reaction, X(θ)
    progress: f64,
    /// Absolute fraction formed
    formed: f64,
}

/// Step-by-step integrator state
struct FractionIntegrator<'a> {
    model: &'a KineticsModel,
    clocks: [PhaseClock; 3],
    martensite: f64,
    lowest_below_ms: Celsius,
}

impl<'a> FractionIntegrator<'a> {
    fn new(model: &'a KineticsModel) -> Self {
        Self {
            model,
            clocks: [PhaseClock::default(); 3],
            martensite: 0.0,
            lowest_below_ms: model.martensite().ms,
        }
    }

    fn transformed(&self) -> f64 {
        self.clocks.iter().map(|c| c.formed).sum::<f64>() + self.martensite
    }

    fn remaining(&self) -> f64 {
        (1.0 - self.transformed()).max(0.0)
    }

    /// Advance the diffusional phases over `dt` at `temperature`
    fn advance(&mut self, dt: f64, temperature: Celsius) {
        let remaining = self.remaining();
        let law = self.model.law();
        let root = &self.model.config().root_finder;
        let mut increments = [0.0; 3];

        for (i, phase) in Phase::DIFFUSIONAL.into_iter().enumerate() {
            let Some(params) = self.model.diffusional(phase) else {
                continue;
            };
            let rate = params.inverse_rate_factor(temperature);
            if rate <= 0.0 {
                continue;
            }

            let clock = &mut self.clocks[i];
            clock.reduced_time += dt * rate;
            let progress = match law.fraction(clock.reduced_time, root) {
                Ok(x) => x.max(clock.progress),
                Err(e) => {
                    trace!("{} step at {} skipped: {}", phase, temperature, e);
                    continue;
                }
            };

            let parent = 1.0 - clock.progress;
            let conditional = if parent > COMPLETE_EPSILON {
                (progress - clock.progress) / parent
            } else if progress > clock.progress {
                1.0
            } else {
                0.0
            };
            clock.progress = progress;

            let available = remaining.min(self.model.capacity(phase) - clock.formed).max(0.0);
            increments[i] = available * conditional.clamp(0.0, 1.0);
        }

        let requested: f64 = increments.iter().sum();
        let scale = if requested > remaining && requested > 0.0 {
            remaining / requested
        } else {
            1.0
        };
        for (clock, increment) in self.clocks.iter_mut().zip(increments) {
            clock.formed += increment * scale;
        }
    }

    /// Athermal martensite on reaching a new low below Ms
    fn quench_to(&mut self, temperature: Celsius) {
        if temperature >= self.lowest_below_ms {
            return;
        }
        let rate = self.model.martensite().rate;
        let undercooling = (self.lowest_below_ms - temperature).value();
        self.martensite += self.remaining() * -(-rate * undercooling).exp_m1();
        self.lowest_below_ms = temperature;
    }

    fn row(&self, time: f64, temperature: Celsius) -> FractionRow {
        let [ferrite, pearlite, bainite] = self.clocks.map(|c| c.formed);
        let total = ferrite + pearlite + bainite + self.martensite;
        FractionRow {
            time,
            temperature,
            ferrite,
            pearlite,
            bainite,
            martensite: self.martensite,
            austenite: 1.0 - total,
            total,
        }
    }
}

/// Integrate phase fractions along `path` resampled to `samples` points
///
/// Deterministic, never subtracts from a phase, and keeps
/// `ferrite + pearlite + bainite + martensite + austenite = 1` on every row.
/// A step that cannot be evaluated (outside a phase's range, root-finder
/// failure) contributes nothing.
///
/// # Errors
/// [`crate::KineticsError::InvalidParameter`] when `samples < 2`.
pub fn integrate(model: &KineticsModel, path: &CoolingPath, samples: usize) -> Result<FractionTable> {
    let path = path.resample(samples)?;
    let times = path.times();
    let temperatures = path.temperatures();

    let mut state = FractionIntegrator::new(model);
    let mut rows = Vec::with_capacity(times.len());

    state.quench_to(temperatures[0]);
    rows.push(state.row(times[0], temperatures[0]));

    for i in 1..times.len() {
        state.advance(times[i] - times[i - 1], temperatures[i - 1]);
        state.quench_to(temperatures[i]);
        rows.push(state.row(times[i], temperatures[i]));
    }

    if let Some(last) = rows.last() {
        debug!(
            "Integrated {} rows: F={:.4} P={:.4} B={:.4} M={:.4} A={:.4}",
            rows.len(),
            last.ferrite,
            last.pearlite,
            last.bainite,
            last.martensite,
            last.austenite
        );
    }

    Ok(FractionTable { rows })
}
