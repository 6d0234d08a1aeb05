//! Kinetics parameter model
//!
//! Maps an [`Alloy`] and a [`Phase`] to the coefficients of that phase's rate
//! law. Every regression constant comes from [`KineticsConfig`], whose
//! `Default` is the Li et al. (1998) fit; nothing here is hard-coded beyond
//! that default.

use crate::alloy::Alloy;
use crate::core_types::{Celsius, Composition, Element, Phase};
use crate::error::{KineticsError, Result};
use crate::physics::koistinen_marburger;
use crate::physics::li_kinetics::{self, CompositionFactor, LI_ACTIVATION_ENERGY};
use crate::physics::{RateLaw, SigmoidLaw};
use crate::solver::RootFinder;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Regression coefficients of one diffusional phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiffusionalCoefficients {
    /// Composition term P
    pub composition: CompositionFactor,
    /// k in 2^(k·G)
    pub grain_exponent: f64,
    /// m in ΔT^m
    pub undercooling_exponent: f64,
    /// Q in cal/mol
    pub activation_energy: f64,
}

impl DiffusionalCoefficients {
    pub const LI_FERRITE: DiffusionalCoefficients = DiffusionalCoefficients {
        composition: CompositionFactor::LI_FERRITE,
        grain_exponent: 0.41,
        undercooling_exponent: 3.0,
        activation_energy: LI_ACTIVATION_ENERGY,
    };

    pub const LI_PEARLITE: DiffusionalCoefficients = DiffusionalCoefficients {
        composition: CompositionFactor::LI_PEARLITE,
        grain_exponent: 0.32,
        undercooling_exponent: 3.0,
        activation_energy: LI_ACTIVATION_ENERGY,
    };

    pub const LI_BAINITE: DiffusionalCoefficients = DiffusionalCoefficients {
        composition: CompositionFactor::LI_BAINITE,
        grain_exponent: 0.29,
        undercooling_exponent: 2.0,
        activation_energy: LI_ACTIVATION_ENERGY,
    };

    fn validate(&self, name: &'static str) -> Result<()> {
        let finite = [
            self.grain_exponent,
            self.undercooling_exponent,
            self.activation_energy,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite || self.undercooling_exponent <= 0.0 || self.activation_energy < 0.0 {
            return Err(KineticsError::invalid_parameter(
                name,
                "exponents must be finite, m > 0 and Q >= 0",
            ));
        }
        if !self.composition.is_finite() {
            return Err(KineticsError::invalid_parameter(
                name,
                "composition coefficients must be finite",
            ));
        }
        Ok(())
    }
}

/// Composition window the regressions are trusted in (wt%, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementBounds {
    pub element: Element,
    pub min: f64,
    pub max: f64,
}

impl ElementBounds {
    fn validate(&self) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite() && self.min <= self.max) {
            return Err(KineticsError::invalid_parameter(
                "fitted_range",
                format!(
                    "{} bounds need finite min <= max, got {} and {}",
                    self.element, self.min, self.max
                ),
            ));
        }
        Ok(())
    }
}

/// Kinetics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KineticsConfig {
    pub ferrite: DiffusionalCoefficients,
    pub pearlite: DiffusionalCoefficients,
    pub bainite: DiffusionalCoefficients,

    /// Shape of the fraction factor S(X)
    pub rate_law: RateLaw,

    /// Fraction defining transformation start (TTT/CCT start curves)
    pub start_fraction: f64,

    /// Fraction defining transformation finish
    pub finish_fraction: f64,

    /// Cap proeutectoid ferrite at its lever-rule equilibrium fraction
    pub limit_ferrite_to_equilibrium: bool,

    /// When set, compositions outside these bounds fail with a domain error
    /// instead of extrapolating
    pub fitted_range: Option<Vec<ElementBounds>>,

    /// Propagate per-point convergence/domain failures instead of omitting points
    pub strict: bool,

    pub root_finder: RootFinder,
}

impl Default for KineticsConfig {
    fn default() -> Self {
        Self {
            ferrite: DiffusionalCoefficients::LI_FERRITE,
            pearlite: DiffusionalCoefficients::LI_PEARLITE,
            bainite: DiffusionalCoefficients::LI_BAINITE,
            rate_law: RateLaw::default(),
            start_fraction: 0.01,
            finish_fraction: 0.99,
            limit_ferrite_to_equilibrium: true,
            fitted_range: None,
            strict: false,
            root_finder: RootFinder::default(),
        }
    }
}

impl KineticsConfig {
    pub fn validate(&self) -> Result<()> {
        self.ferrite.validate("ferrite")?;
        self.pearlite.validate("pearlite")?;
        self.bainite.validate("bainite")?;
        self.root_finder.validate()?;
        for bound in self.fitted_range.iter().flatten() {
            bound.validate()?;
        }

        let open_unit = |v: f64| v > 0.0 && v < 1.0;
        if !open_unit(self.start_fraction) || !open_unit(self.finish_fraction) {
            return Err(KineticsError::invalid_parameter(
                "start_fraction/finish_fraction",
                format!(
                    "must lie in (0, 1), got {} and {}",
                    self.start_fraction, self.finish_fraction
                ),
            ));
        }
        if self.start_fraction >= self.finish_fraction {
            return Err(KineticsError::invalid_parameter(
                "start_fraction",
                format!(
                    "must be below finish_fraction ({} >= {})",
                    self.start_fraction, self.finish_fraction
                ),
            ));
        }
        Ok(())
    }

    pub fn coefficients(&self, phase: Phase) -> Option<&DiffusionalCoefficients> {
        match phase {
            Phase::Ferrite => Some(&self.ferrite),
            Phase::Pearlite => Some(&self.pearlite),
            Phase::Bainite => Some(&self.bainite),
            Phase::Martensite => None,
        }
    }

    /// Check the composition against `fitted_range`, if configured
    pub fn check_fitted_range(&self, composition: &Composition) -> Result<()> {
        let Some(bounds) = &self.fitted_range else {
            return Ok(());
        };
        for bound in bounds {
            let value = composition.get(bound.element);
            if value < bound.min || value > bound.max {
                return Err(KineticsError::domain(
                    format!("{} (wt%)", bound.element),
                    value,
                    bound.min,
                    bound.max,
                ));
            }
        }
        Ok(())
    }
}

/// Rate-law coefficients of a diffusional phase for one alloy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiffusionalParameters {
    pub phase: Phase,
    /// P evaluated for the alloy's composition
    pub composition_exponent: f64,
    pub grain_size: f64,
    pub grain_exponent: f64,
    pub undercooling_exponent: f64,
    pub activation_energy: f64,
    /// Temperature below which the phase can form (Ae3, Ae1 or Bs)
    pub critical_temperature: Celsius,
    /// Temperature above which the phase can form (Ms)
    pub lower_temperature: Celsius,
}

impl DiffusionalParameters {
    /// Strictly inside the validity interval
    pub fn is_valid_at(&self, temperature: Celsius) -> bool {
        temperature > self.lower_temperature && temperature < self.critical_temperature
    }

    /// ln F(T), `None` outside the validity interval
    pub fn ln_rate_factor(&self, temperature: Celsius) -> Option<f64> {
        if !self.is_valid_at(temperature) {
            return None;
        }
        li_kinetics::ln_rate_factor(
            self.composition_exponent,
            self.grain_size,
            self.grain_exponent,
            (self.critical_temperature - temperature).value(),
            self.undercooling_exponent,
            self.activation_energy,
            temperature,
        )
    }

    /// 1 / F(T) in 1/s; zero where the phase cannot form
    pub fn inverse_rate_factor(&self, temperature: Celsius) -> f64 {
        self.ln_rate_factor(temperature)
            .map_or(0.0, |ln_f| (-ln_f).exp())
    }

    /// d(ln F)/dT at a temperature inside the validity interval
    pub fn ln_rate_factor_slope(&self, temperature: Celsius) -> f64 {
        li_kinetics::ln_rate_factor_slope(
            (self.critical_temperature - temperature).value(),
            self.undercooling_exponent,
            self.activation_energy,
            temperature,
        )
    }
}

/// Parameters of the athermal martensite reaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MartensiteParameters {
    pub ms: Celsius,
    /// Koistinen–Marburger α (1/K)
    pub rate: f64,
}

impl MartensiteParameters {
    /// Temperature where fraction X of the parent austenite has become martensite
    pub fn temperature_for_fraction(&self, fraction: f64) -> Option<Celsius> {
        koistinen_marburger::temperature_for_fraction(self.ms, self.rate, fraction)
    }
}

/// Rate-law parameters, dispatched on the phase variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PhaseParameters {
    Diffusional(DiffusionalParameters),
    Athermal(MartensiteParameters),
}

/// Kinetics parameters of one phase for one alloy
///
/// Pure function of its inputs.
///
/// # Errors
/// [`KineticsError::Domain`] if `config.fitted_range` is set and the
/// composition lies outside it.
pub fn kinetics_parameters(
    alloy: &Alloy,
    phase: Phase,
    config: &KineticsConfig,
) -> Result<PhaseParameters> {
    config.check_fitted_range(alloy.composition())?;

    let Some(coefficients) = config.coefficients(phase) else {
        return Ok(PhaseParameters::Athermal(MartensiteParameters {
            ms: alloy.ms(),
            rate: alloy.martensite_rate(),
        }));
    };

    let (lower_temperature, critical_temperature) = alloy.validity_range(phase);
    Ok(PhaseParameters::Diffusional(DiffusionalParameters {
        phase,
        composition_exponent: coefficients.composition.exponent(alloy.composition()),
        grain_size: alloy.grain_size(),
        grain_exponent: coefficients.grain_exponent,
        undercooling_exponent: coefficients.undercooling_exponent,
        activation_energy: coefficients.activation_energy,
        critical_temperature,
        lower_temperature,
    }))
}

fn athermal_error(phase: Phase) -> KineticsError {
    KineticsError::invalid_parameter("phase", format!("{phase} is athermal"))
}

/// Alloy plus evaluated kinetics, shared by every builder
///
/// Immutable and `Send + Sync`; build it once per alloy and query it from as
/// many threads as needed.
#[derive(Debug, Clone)]
pub struct KineticsModel {
    alloy: Alloy,
    config: KineticsConfig,
    law: SigmoidLaw,
    diffusional: [DiffusionalParameters; 3],
    martensite: MartensiteParameters,
}

impl KineticsModel {
    pub fn new(alloy: Alloy, config: KineticsConfig) -> Result<Self> {
        config.validate()?;
        let law = SigmoidLaw::new(config.rate_law)?;

        let diffusional_for = |phase: Phase| -> Result<DiffusionalParameters> {
            match kinetics_parameters(&alloy, phase, &config)? {
                PhaseParameters::Diffusional(p) => Ok(p),
                PhaseParameters::Athermal(_) => Err(KineticsError::invalid_parameter(
                    "phase",
                    format!("{phase} has no diffusional parameters"),
                )),
            }
        };
        let diffusional = [
            diffusional_for(Phase::Ferrite)?,
            diffusional_for(Phase::Pearlite)?,
            diffusional_for(Phase::Bainite)?,
        ];
        let martensite = match kinetics_parameters(&alloy, Phase::Martensite, &config)? {
            PhaseParameters::Athermal(m) => m,
            PhaseParameters::Diffusional(_) => {
                return Err(KineticsError::invalid_parameter(
                    "phase",
                    "martensite has no athermal parameters",
                ))
            }
        };

        info!(
            "Kinetics model for {}: Ae3={}, Ae1={}, Bs={}, Ms={}",
            alloy,
            alloy.ae3(),
            alloy.ae1(),
            alloy.bs(),
            alloy.ms()
        );

        Ok(Self {
            alloy,
            config,
            law,
            diffusional,
            martensite,
        })
    }

    /// Model with the default (Li 1998) configuration
    pub fn with_defaults(alloy: Alloy) -> Result<Self> {
        Self::new(alloy, KineticsConfig::default())
    }

    pub fn alloy(&self) -> &Alloy {
        &self.alloy
    }

    pub fn config(&self) -> &KineticsConfig {
        &self.config
    }

    pub fn law(&self) -> &SigmoidLaw {
        &self.law
    }

    pub fn parameters(&self, phase: Phase) -> PhaseParameters {
        match self.diffusional(phase) {
            Some(p) => PhaseParameters::Diffusional(*p),
            None => PhaseParameters::Athermal(self.martensite),
        }
    }

    /// Diffusional parameters, `None` for martensite
    pub fn diffusional(&self, phase: Phase) -> Option<&DiffusionalParameters> {
        match phase {
            Phase::Ferrite => Some(&self.diffusional[0]),
            Phase::Pearlite => Some(&self.diffusional[1]),
            Phase::Bainite => Some(&self.diffusional[2]),
            Phase::Martensite => None,
        }
    }

    pub fn martensite(&self) -> &MartensiteParameters {
        &self.martensite
    }

    /// Maximum absolute fraction a phase can reach
    pub fn capacity(&self, phase: Phase) -> f64 {
        if phase == Phase::Ferrite && self.config.limit_ferrite_to_equilibrium {
            self.alloy.equilibrium_ferrite_fraction()
        } else {
            1.0
        }
    }

    /// Isothermal time (s) to reach `fraction` of a diffusional phase at T
    ///
    /// # Errors
    /// [`KineticsError::Domain`] when T is outside the phase's validity range
    /// or the time is not a finite positive number,
    /// [`KineticsError::InvalidParameter`] for martensite.
    pub fn isothermal_time(&self, phase: Phase, temperature: Celsius, fraction: f64) -> Result<f64> {
        let params = self.diffusional(phase).ok_or_else(|| athermal_error(phase))?;
        let ln_f = params.ln_rate_factor(temperature).ok_or_else(|| {
            KineticsError::domain(
                format!("{phase} temperature (°C)"),
                *temperature,
                *params.lower_temperature,
                *params.critical_temperature,
            )
        })?;

        let time = ln_f.exp() * self.law.reduced_time(fraction);
        if time.is_finite() && time > 0.0 {
            Ok(time)
        } else {
            Err(KineticsError::domain(
                format!("{phase} isothermal time (s)"),
                time,
                0.0,
                f64::MAX,
            ))
        }
    }

    /// Temperature of minimum isothermal time (the C-curve nose)
    ///
    /// Solves d(ln F)/dT = 0 inside the validity interval with the bounded
    /// root-finder. The slope is monotone, so a root, when bracketed, is unique.
    ///
    /// # Errors
    /// [`KineticsError::Convergence`] when the nose is not bracketed by the
    /// validity interval (it lies at or below Ms), [`KineticsError::Domain`]
    /// for an empty validity interval, [`KineticsError::InvalidParameter`] for
    /// martensite.
    pub fn nose_temperature(&self, phase: Phase) -> Result<Celsius> {
        let params = self.diffusional(phase).ok_or_else(|| athermal_error(phase))?;
        let lower = (*params.lower_temperature).max(-273.0);
        let upper = *params.critical_temperature;
        if lower >= upper {
            return Err(KineticsError::domain(
                format!("{phase} validity range (°C)"),
                upper,
                lower,
                upper,
            ));
        }

        // Stay a hair inside the open interval: the slope diverges at the top
        let span = upper - lower;
        let nose = self.config.root_finder.bisect(
            |t| params.ln_rate_factor_slope(Celsius::from(t)),
            lower + 1e-9 * span,
            upper - 1e-9 * span,
        )?;
        Ok(Celsius::from(nose))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_model() -> KineticsModel {
        let alloy = Alloy::from_pairs(3.0, [("C", 0.35), ("Mn", 0.37)]).unwrap();
        KineticsModel::with_defaults(alloy).unwrap()
    }

    #[test]
    fn test_parameters_dispatch_on_phase() {
        let model = reference_model();
        match model.parameters(Phase::Ferrite) {
            PhaseParameters::Diffusional(p) => {
                assert_eq!(p.critical_temperature, model.alloy().ae3());
                assert_eq!(p.undercooling_exponent, 3.0);
            }
            PhaseParameters::Athermal(_) => panic!("ferrite is diffusional"),
        }
        match model.parameters(Phase::Bainite) {
            PhaseParameters::Diffusional(p) => assert_eq!(p.undercooling_exponent, 2.0),
            PhaseParameters::Athermal(_) => panic!("bainite is diffusional"),
        }
        assert!(matches!(
            model.parameters(Phase::Martensite),
            PhaseParameters::Athermal(_)
        ));
    }

    #[test]
    fn test_start_before_finish() {
        let model = reference_model();
        for phase in Phase::DIFFUSIONAL {
            let t = Celsius::new(500.0);
            let start = model.isothermal_time(phase, t, 0.01).unwrap();
            let finish = model.isothermal_time(phase, t, 0.99).unwrap();
            assert!(start > 0.0 && start < finish, "{phase}: {start} vs {finish}");
        }
    }

    #[test]
    fn test_outside_range_is_domain_error() {
        let model = reference_model();
        let err = model
            .isothermal_time(Phase::Pearlite, Celsius::new(750.0), 0.01)
            .unwrap_err();
        assert!(matches!(err, KineticsError::Domain { .. }));
        let err = model
            .isothermal_time(Phase::Ferrite, Celsius::new(200.0), 0.01)
            .unwrap_err();
        assert!(matches!(err, KineticsError::Domain { .. }));
    }

    #[test]
    fn test_nose_temperatures() {
        let model = reference_model();
        let ferrite = model.nose_temperature(Phase::Ferrite).unwrap();
        let pearlite = model.nose_temperature(Phase::Pearlite).unwrap();
        let bainite = model.nose_temperature(Phase::Bainite).unwrap();
        assert!((*ferrite - 612.0).abs() < 5.0, "ferrite nose {ferrite}");
        assert!((*pearlite - 565.0).abs() < 5.0, "pearlite nose {pearlite}");
        assert!((*bainite - 515.0).abs() < 5.0, "bainite nose {bainite}");
        assert!(model.nose_temperature(Phase::Martensite).is_err());
    }

    #[test]
    fn test_nose_is_minimum_time() {
        let model = reference_model();
        let nose = model.nose_temperature(Phase::Ferrite).unwrap();
        let at_nose = model.isothermal_time(Phase::Ferrite, nose, 0.01).unwrap();
        for offset in [-20.0, -5.0, 5.0, 20.0] {
            let t = Celsius::from(*nose + offset);
            let time = model.isothermal_time(Phase::Ferrite, t, 0.01).unwrap();
            assert!(time > at_nose);
        }
    }

    #[test]
    fn test_fitted_range_enforcement() {
        let alloy = Alloy::from_pairs(3.0, [("C", 1.2)]).unwrap();
        let config = KineticsConfig {
            fitted_range: Some(vec![ElementBounds {
                element: Element::Carbon,
                min: 0.0,
                max: 0.8,
            }]),
            ..KineticsConfig::default()
        };
        let err = KineticsModel::new(alloy, config).unwrap_err();
        assert!(matches!(err, KineticsError::Domain { .. }));

        // Without bounds the same alloy extrapolates silently
        assert!(KineticsModel::with_defaults(alloy).is_ok());
    }

    #[test]
    fn test_non_finite_composition_coefficients_rejected() {
        let alloy = Alloy::from_pairs(3.0, [("C", 0.35), ("Mn", 0.37)]).unwrap();
        let mut config = KineticsConfig::default();
        config.pearlite.composition.intercept = f64::NAN;
        assert!(matches!(
            KineticsModel::new(alloy, config),
            Err(KineticsError::InvalidParameter {
                name: "pearlite",
                ..
            })
        ));

        let mut config = KineticsConfig::default();
        config.ferrite.composition.manganese = f64::INFINITY;
        assert!(KineticsModel::new(alloy, config).is_err());
    }

    #[test]
    fn test_malformed_fitted_range_rejected() {
        let alloy = Alloy::from_pairs(3.0, [("C", 0.35)]).unwrap();
        let bounds = [(f64::NAN, 0.8), (0.0, f64::NAN), (0.8, 0.1)];
        for (min, max) in bounds {
            let config = KineticsConfig {
                fitted_range: Some(vec![ElementBounds {
                    element: Element::Carbon,
                    min,
                    max,
                }]),
                ..KineticsConfig::default()
            };
            assert!(matches!(
                KineticsModel::new(alloy, config),
                Err(KineticsError::InvalidParameter {
                    name: "fitted_range",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let alloy = Alloy::from_pairs(3.0, [("C", 0.35)]).unwrap();
        let config = KineticsConfig {
            start_fraction: 0.5,
            finish_fraction: 0.4,
            ..KineticsConfig::default()
        };
        assert!(matches!(
            KineticsModel::new(alloy, config),
            Err(KineticsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_ferrite_capacity() {
        let model = reference_model();
        assert!((model.capacity(Phase::Ferrite) - 0.56).abs() < 1e-12);
        assert_eq!(model.capacity(Phase::Pearlite), 1.0);

        let unlimited = KineticsModel::new(
            *model.alloy(),
            KineticsConfig {
                limit_ferrite_to_equilibrium: false,
                ..KineticsConfig::default()
            },
        )
        .unwrap();
        assert_eq!(unlimited.capacity(Phase::Ferrite), 1.0);
    }
}
