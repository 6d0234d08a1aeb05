//! Isothermal (TTT) curve builder
//!
//! For each grid temperature inside a phase's validity range the start and
//! finish times are `τ(X_start, T)` and `τ(X_finish, T)`. Grid temperatures
//! outside the range are skipped; per-point failures are omitted unless the
//! model is in strict mode.

use super::curve::{CurvePoint, TransformationCurve};
use super::parameters::KineticsModel;
use crate::alloy::Alloy;
use crate::core_types::{Celsius, Phase};
use crate::error::{KineticsError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Upper bound on grid size, to catch a mistyped step before it allocates
const MAX_GRID_POINTS: usize = 1_000_000;

/// Evenly spaced temperatures `lower, lower + step, ..., <= upper`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureGrid {
    pub lower: Celsius,
    pub upper: Celsius,
    pub step: f64,
}

impl Default for TemperatureGrid {
    fn default() -> Self {
        Self {
            lower: Celsius::ROOM,
            upper: Celsius::new(900.0),
            step: 5.0,
        }
    }
}

impl TemperatureGrid {
    pub fn new(lower: Celsius, upper: Celsius, step: f64) -> Result<Self> {
        let grid = Self { lower, upper, step };
        grid.validate()?;
        Ok(grid)
    }

    /// Grid spanning Ms to Ae3 of an alloy, i.e. every temperature at which
    /// some diffusional phase can form
    pub fn for_alloy(alloy: &Alloy, step: f64) -> Result<Self> {
        Self::new(alloy.ms(), alloy.ae3(), step)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.step > 0.0 && self.step.is_finite()) {
            return Err(KineticsError::invalid_parameter(
                "grid.step",
                format!("must be positive, got {}", self.step),
            ));
        }
        if !self.lower.is_finite() || !self.upper.is_finite() || self.lower > self.upper {
            return Err(KineticsError::invalid_parameter(
                "grid.lower/upper",
                format!("need finite lower <= upper, got {} and {}", self.lower, self.upper),
            ));
        }
        if self.len() > MAX_GRID_POINTS {
            return Err(KineticsError::invalid_parameter(
                "grid.step",
                format!("{} points exceed the limit of {MAX_GRID_POINTS}", self.len()),
            ));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        let span = (self.upper - self.lower).value();
        // Small slack so that e.g. 400..=800 step 0.1 keeps its last point
        (span / self.step + 1e-9).floor() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ascending grid temperatures
    pub fn temperatures(&self) -> impl Iterator<Item = Celsius> + '_ {
        (0..self.len()).map(|i| Celsius::from(*self.lower + i as f64 * self.step))
    }
}

/// One row of a TTT curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsothermalPoint {
    pub temperature: Celsius,
    /// Time to the start fraction (s)
    pub start: f64,
    /// Time to the finish fraction (s)
    pub finish: f64,
}

/// TTT start/finish curve of one phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsothermalCurve {
    pub phase: Phase,
    /// Rows in ascending temperature
    pub points: Vec<IsothermalPoint>,
    /// Row with the shortest start time
    pub nose: Option<IsothermalPoint>,
    /// Nose temperature from d(ln F)/dT = 0, independent of grid spacing
    pub nose_temperature: Option<Celsius>,
}

impl IsothermalCurve {
    pub fn empty(phase: Phase) -> Self {
        Self {
            phase,
            points: Vec::new(),
            nose: None,
            nose_temperature: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Same rows in the representation shared with CCT diagrams
    pub fn curve(&self) -> TransformationCurve {
        TransformationCurve {
            phase: self.phase,
            start: self
                .points
                .iter()
                .map(|p| CurvePoint::new(p.start, p.temperature))
                .collect(),
            finish: self
                .points
                .iter()
                .map(|p| CurvePoint::new(p.finish, p.temperature))
                .collect(),
        }
    }
}

/// Martensite has no C-curve; TTT diagrams draw horizontal lines instead
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MartensiteLines {
    pub ms: Celsius,
    pub m50: Option<Celsius>,
    pub m90: Option<Celsius>,
}

impl MartensiteLines {
    pub fn for_model(model: &KineticsModel) -> Self {
        let params = model.martensite();
        Self {
            ms: params.ms,
            m50: params.temperature_for_fraction(0.5),
            m90: params.temperature_for_fraction(0.9),
        }
    }
}

/// Time-Temperature-Transformation diagram of one alloy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TttDiagram {
    pub alloy: Alloy,
    pub grid: TemperatureGrid,
    pub curves: FxHashMap<Phase, IsothermalCurve>,
    pub martensite: MartensiteLines,
}

impl TttDiagram {
    pub fn curve(&self, phase: Phase) -> Option<&IsothermalCurve> {
        self.curves.get(&phase)
    }

    /// Start/finish lines of a phase; empty for martensite
    pub fn transformation_curve(&self, phase: Phase) -> TransformationCurve {
        self.curve(phase)
            .map_or_else(|| TransformationCurve::empty(phase), IsothermalCurve::curve)
    }
}

/// Start/finish times of a phase at one temperature
pub fn isothermal_point(
    model: &KineticsModel,
    phase: Phase,
    temperature: Celsius,
) -> Result<IsothermalPoint> {
    let config = model.config();
    let start = model.isothermal_time(phase, temperature, config.start_fraction)?;
    let finish = model.isothermal_time(phase, temperature, config.finish_fraction)?;
    Ok(IsothermalPoint {
        temperature,
        start,
        finish,
    })
}

/// Build the TTT curve of one phase over a grid
///
/// # Errors
/// Invalid grids fail immediately. In strict mode the first per-point
/// convergence or domain failure is returned; otherwise such points are
/// left out of the curve. A nose that lies outside the validity range leaves
/// `nose_temperature` as `None` in both modes.
pub fn build_isothermal_curve(
    model: &KineticsModel,
    phase: Phase,
    grid: &TemperatureGrid,
) -> Result<IsothermalCurve> {
    grid.validate()?;
    let Some(params) = model.diffusional(phase) else {
        return Ok(IsothermalCurve::empty(phase));
    };
    let strict = model.config().strict;

    let mut points = Vec::new();
    for temperature in grid.temperatures().filter(|t| params.is_valid_at(*t)) {
        match isothermal_point(model, phase, temperature) {
            Ok(point) => points.push(point),
            Err(e) if e.is_recoverable() && !strict => {
                trace!("Omitting {} at {}: {}", phase, temperature, e);
            }
            Err(e) => return Err(e),
        }
    }

    if points.is_empty() {
        debug!("{} curve empty on grid {}..{}", phase, grid.lower, grid.upper);
        return Ok(IsothermalCurve::empty(phase));
    }

    let nose = points
        .iter()
        .copied()
        .min_by(|a, b| a.start.total_cmp(&b.start));

    // Not a per-point failure: the grid rows stand even without a refined nose
    let nose_temperature = match model.nose_temperature(phase) {
        Ok(t) => Some(t),
        Err(e) if e.is_recoverable() => {
            debug!("No interior nose for {}: {}", phase, e);
            None
        }
        Err(e) => return Err(e),
    };

    debug!(
        "{} curve: {} points, nose at {:?}",
        phase,
        points.len(),
        nose_temperature
    );

    Ok(IsothermalCurve {
        phase,
        points,
        nose,
        nose_temperature,
    })
}

/// Build the TTT diagram: one curve per diffusional phase plus martensite lines
pub fn build_ttt(model: &KineticsModel, grid: &TemperatureGrid) -> Result<TttDiagram> {
    let mut curves = FxHashMap::default();
    for phase in Phase::DIFFUSIONAL {
        curves.insert(phase, build_isothermal_curve(model, phase, grid)?);
    }

    Ok(TttDiagram {
        alloy: *model.alloy(),
        grid: *grid,
        curves,
        martensite: MartensiteLines::for_model(model),
    })
}
