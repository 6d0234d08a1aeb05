//! Alloy record: composition, grain size and derived critical temperatures

use crate::core_types::{Celsius, Composition, Phase};
use crate::error::{KineticsError, Result};
use crate::physics::critical_temperatures::{
    ae1_grange, bs_li, equilibrium_ferrite_fraction, CriticalTemperatureFormulas,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Steel grade for which diagrams are computed
///
/// Immutable: the critical temperatures are derived once in the constructor
/// and are pure functions of composition and the chosen formulas.
///
/// # Example
/// ```
/// use steel_kinetics_core::Alloy;
///
/// let alloy = Alloy::from_pairs(3.0, [("C", 0.35), ("Mn", 0.37)]).unwrap();
/// assert!(alloy.ae3() > alloy.ae1());
/// assert!(alloy.bs() > alloy.ms());
/// ```
///
/// Deserializing reads only the inputs (see [`AlloySpec`]) and derives the
/// temperatures again, so derived fields in the JSON are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AlloySpec")]
pub struct Alloy {
    grain_size: f64,
    composition: Composition,
    formulas: CriticalTemperatureFormulas,
    ae1: Celsius,
    ae3: Celsius,
    bs: Celsius,
    ms: Celsius,
    martensite_rate: f64,
    equilibrium_ferrite: f64,
}

/// Inputs an [`Alloy`] is built from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlloySpec {
    pub grain_size: f64,
    pub composition: Composition,
    #[serde(default)]
    pub formulas: CriticalTemperatureFormulas,
}

impl TryFrom<AlloySpec> for Alloy {
    type Error = KineticsError;

    fn try_from(spec: AlloySpec) -> Result<Self> {
        Self::with_formulas(spec.grain_size, spec.composition, spec.formulas)
    }
}

impl Alloy {
    /// Create an alloy with the default critical-temperature formulas
    ///
    /// # Arguments
    /// * `grain_size` - ASTM grain size number (finite; larger is finer)
    /// * `composition` - Mass-percent composition
    pub fn new(grain_size: f64, composition: Composition) -> Result<Self> {
        Self::with_formulas(grain_size, composition, CriticalTemperatureFormulas::default())
    }

    /// Create an alloy from `(symbol, wt%)` pairs, e.g. `[("C", 0.35), ("Mn", 0.37)]`
    pub fn from_pairs<'a, I>(grain_size: f64, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        Self::new(grain_size, Composition::from_pairs(pairs)?)
    }

    /// Create an alloy using specific regressions for Ae3, Ms and α
    pub fn with_formulas(
        grain_size: f64,
        composition: Composition,
        formulas: CriticalTemperatureFormulas,
    ) -> Result<Self> {
        if !grain_size.is_finite() {
            return Err(KineticsError::invalid_composition(format!(
                "grain size must be a finite ASTM number, got {grain_size}"
            )));
        }
        composition.validate()?;

        Ok(Self {
            grain_size,
            composition,
            formulas,
            ae1: ae1_grange(&composition),
            ae3: formulas.ae3(&composition),
            bs: bs_li(&composition),
            ms: formulas.ms(&composition),
            martensite_rate: formulas.martensite_rate(&composition),
            equilibrium_ferrite: equilibrium_ferrite_fraction(composition.carbon),
        })
    }

    /// ASTM grain size number
    pub fn grain_size(&self) -> f64 {
        self.grain_size
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn formulas(&self) -> CriticalTemperatureFormulas {
        self.formulas
    }

    /// Lower critical (eutectoid) temperature
    pub fn ae1(&self) -> Celsius {
        self.ae1
    }

    /// Upper critical temperature
    pub fn ae3(&self) -> Celsius {
        self.ae3
    }

    /// Bainite start temperature
    pub fn bs(&self) -> Celsius {
        self.bs
    }

    /// Martensite start temperature
    pub fn ms(&self) -> Celsius {
        self.ms
    }

    /// Koistinen–Marburger rate constant α (1/K)
    pub fn martensite_rate(&self) -> f64 {
        self.martensite_rate
    }

    /// Lever-rule proeutectoid ferrite fraction
    pub fn equilibrium_ferrite_fraction(&self) -> f64 {
        self.equilibrium_ferrite
    }

    /// Open temperature interval `(lower, upper)` in which a phase can form
    ///
    /// Diffusional phases form between Ms and their critical temperature;
    /// martensite forms anywhere below Ms.
    pub fn validity_range(&self, phase: Phase) -> (Celsius, Celsius) {
        match phase {
            Phase::Ferrite => (self.ms, self.ae3),
            Phase::Pearlite => (self.ms, self.ae1),
            Phase::Bainite => (self.ms, self.bs),
            Phase::Martensite => (Celsius::ABSOLUTE_ZERO, self.ms),
        }
    }
}

impl fmt::Display for Alloy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ASTM {})", self.composition, self.grain_size)
    }
}
