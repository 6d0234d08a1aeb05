//! Li–Kirkaldy Isothermal Rate Model (1998)
//!
//! Kirkaldy and Venugopalan proposed that the time to reach fraction X of a
//! diffusional product at temperature T separates into a temperature factor
//! and a fraction factor:
//!
//! ```text
//! τ(X, T) = F(T) · S(X)
//! F(T)    = exp(P) / (2^(k·G) · ΔT^m · exp(−Q / (R·T)))
//! ```
//!
//! Li et al. refitted the composition term P, the grain-size exponent k and
//! the undercooling exponent m per phase against a large TTT database. This
//! module holds those coefficients and evaluates F(T); the fraction factor
//! S(X) lives in [`super::sigmoid`].
//!
//! # Scientific References
//! - Kirkaldy, J.S., Venugopalan, D. (1983). "Prediction of microstructure and
//!   hardenability in low alloy steels" Phase Transformations in Ferrous Alloys, 125-148
//! - Li, M.V., Niebuhr, D.V., Meekisho, L.L., Atteridge, D.G. (1998). "A computational
//!   model for the prediction of steel hardenability" Metall. Mater. Trans. B, 29, 661-672

use crate::core_types::{Celsius, Composition};
use serde::{Deserialize, Serialize};

/// Gas constant in cal/(mol·K), matching the activation energy units of the fit
pub const GAS_CONSTANT_CAL: f64 = 1.9872;

/// Activation energy shared by all three diffusional phases (cal/mol)
pub const LI_ACTIVATION_ENERGY: f64 = 27500.0;

/// Linear composition term P of the rate model; F scales with exp(P)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionFactor {
    pub intercept: f64,
    pub carbon: f64,
    pub manganese: f64,
    pub silicon: f64,
    pub nickel: f64,
    pub chromium: f64,
    pub molybdenum: f64,
    /// Coefficient of √Mo (pearlite uses a square-root molybdenum term)
    pub sqrt_molybdenum: f64,
}

impl CompositionFactor {
    /// Ferrite: FC = exp(1.00 + 6.31C + 1.78Mn + 0.31Si + 1.12Ni + 2.70Cr + 4.06Mo)
    pub const LI_FERRITE: CompositionFactor = CompositionFactor {
        intercept: 1.00,
        carbon: 6.31,
        manganese: 1.78,
        silicon: 0.31,
        nickel: 1.12,
        chromium: 2.70,
        molybdenum: 4.06,
        sqrt_molybdenum: 0.0,
    };

    /// Pearlite: PC = exp(−4.25 + 4.12C + 4.36Mn + 0.44Si + 1.71Ni + 3.33Cr + 5.19√Mo)
    pub const LI_PEARLITE: CompositionFactor = CompositionFactor {
        intercept: -4.25,
        carbon: 4.12,
        manganese: 4.36,
        silicon: 0.44,
        nickel: 1.71,
        chromium: 3.33,
        molybdenum: 0.0,
        sqrt_molybdenum: 5.19,
    };

    /// Bainite: BC = exp(−10.23 + 10.18C + 0.85Mn + 0.55Ni + 0.90Cr + 0.36Mo)
    pub const LI_BAINITE: CompositionFactor = CompositionFactor {
        intercept: -10.23,
        carbon: 10.18,
        manganese: 0.85,
        silicon: 0.0,
        nickel: 0.55,
        chromium: 0.90,
        molybdenum: 0.36,
        sqrt_molybdenum: 0.0,
    };

    /// Exponent P for a composition
    pub fn exponent(&self, c: &Composition) -> f64 {
        self.intercept
            + self.carbon * c.carbon
            + self.manganese * c.manganese
            + self.silicon * c.silicon
            + self.nickel * c.nickel
            + self.chromium * c.chromium
            + self.molybdenum * c.molybdenum
            + self.sqrt_molybdenum * c.molybdenum.sqrt()
    }

    /// Every coefficient is a finite number
    pub fn is_finite(&self) -> bool {
        [
            self.intercept,
            self.carbon,
            self.manganese,
            self.silicon,
            self.nickel,
            self.chromium,
            self.molybdenum,
            self.sqrt_molybdenum,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Natural log of the temperature factor F(T) in seconds
///
/// Evaluated in log space so that the Arrhenius term at low temperature
/// cannot overflow before the caller decides what to do with it.
///
/// # Arguments
/// * `composition_exponent` - P from [`CompositionFactor::exponent`]
/// * `grain_size` - ASTM grain size number G
/// * `grain_exponent` - k (0.41 ferrite, 0.32 pearlite, 0.29 bainite)
/// * `undercooling` - ΔT below the phase's critical temperature (K), must be > 0
/// * `undercooling_exponent` - m (3 ferrite/pearlite, 2 bainite)
/// * `activation_energy` - Q in cal/mol
/// * `temperature` - Transformation temperature
///
/// # Returns
/// ln F(T), or `None` when ΔT ≤ 0 or the temperature is not above absolute zero
pub fn ln_rate_factor(
    composition_exponent: f64,
    grain_size: f64,
    grain_exponent: f64,
    undercooling: f64,
    undercooling_exponent: f64,
    activation_energy: f64,
    temperature: Celsius,
) -> Option<f64> {
    let kelvin = *temperature.to_kelvin();
    if undercooling <= 0.0 || kelvin <= 0.0 {
        return None;
    }

    let grain_term = grain_exponent * grain_size * std::f64::consts::LN_2;
    let undercooling_term = undercooling_exponent * undercooling.ln();
    let arrhenius_term = activation_energy / (GAS_CONSTANT_CAL * kelvin);

    Some(composition_exponent - grain_term - undercooling_term + arrhenius_term)
}

/// Derivative d(ln F)/dT in 1/K
///
/// ```text
/// d(ln F)/dT = m / ΔT − Q / (R·T²)
/// ```
///
/// Strictly increasing in T on (0 K, T_crit), so it has at most one root: the
/// nose of the C-curve.
pub fn ln_rate_factor_slope(
    undercooling: f64,
    undercooling_exponent: f64,
    activation_energy: f64,
    temperature: Celsius,
) -> f64 {
    let kelvin = *temperature.to_kelvin();
    undercooling_exponent / undercooling - activation_energy / (GAS_CONSTANT_CAL * kelvin * kelvin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Element;

    fn medium_carbon() -> Composition {
        Composition::new(0.35).with(Element::Manganese, 0.37)
    }

    #[test]
    fn test_li_composition_factors() {
        let c = medium_carbon();
        // 1 + 2.2085 + 0.6586
        assert!((CompositionFactor::LI_FERRITE.exponent(&c) - 3.8671).abs() < 1e-9);
        // -4.25 + 1.442 + 1.6132
        assert!((CompositionFactor::LI_PEARLITE.exponent(&c) + 1.1948).abs() < 1e-9);
        // -10.23 + 3.563 + 0.3145
        assert!((CompositionFactor::LI_BAINITE.exponent(&c) + 6.3525).abs() < 1e-9);
    }

    #[test]
    fn test_alloying_slows_ferrite() {
        let plain = medium_carbon();
        let alloyed = plain.with(Element::Chromium, 1.0).with(Element::Molybdenum, 0.25);
        assert!(
            CompositionFactor::LI_FERRITE.exponent(&alloyed)
                > CompositionFactor::LI_FERRITE.exponent(&plain)
        );
    }

    #[test]
    fn test_non_finite_coefficients_detected() {
        assert!(CompositionFactor::LI_PEARLITE.is_finite());
        let broken = CompositionFactor {
            chromium: f64::INFINITY,
            ..CompositionFactor::LI_BAINITE
        };
        assert!(!broken.is_finite());
    }

    #[test]
    fn test_rate_factor_at_ferrite_nose() {
        let p = CompositionFactor::LI_FERRITE.exponent(&medium_carbon());
        let t = Celsius::new(612.0);
        let ln_f = ln_rate_factor(p, 3.0, 0.41, 786.5 - 612.0, 3.0, LI_ACTIVATION_ENERGY, t)
            .unwrap();
        let f = ln_f.exp();
        // Hand calculation gives ~23.6 s
        assert!(f > 20.0 && f < 28.0, "F(612°C) = {f}");
    }

    #[test]
    fn test_no_factor_above_critical_temperature() {
        assert!(ln_rate_factor(0.0, 3.0, 0.41, 0.0, 3.0, 27500.0, Celsius::new(786.5)).is_none());
        assert!(ln_rate_factor(0.0, 3.0, 0.41, -5.0, 3.0, 27500.0, Celsius::new(790.0)).is_none());
    }

    #[test]
    fn test_finer_grain_accelerates() {
        let t = Celsius::new(650.0);
        let coarse = ln_rate_factor(1.0, 3.0, 0.41, 100.0, 3.0, 27500.0, t).unwrap();
        let fine = ln_rate_factor(1.0, 9.0, 0.41, 100.0, 3.0, 27500.0, t).unwrap();
        assert!(fine < coarse, "higher ASTM number means faster kinetics");
    }

    #[test]
    fn test_slope_changes_sign_across_nose() {
        let tc = 786.5;
        let below = ln_rate_factor_slope(tc - 550.0, 3.0, 27500.0, Celsius::new(550.0));
        let above = ln_rate_factor_slope(tc - 700.0, 3.0, 27500.0, Celsius::new(700.0));
        assert!(below < 0.0);
        assert!(above > 0.0);
    }
}
