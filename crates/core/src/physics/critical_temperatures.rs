//! Critical Transformation Temperatures of Low-Alloy Steels
//!
//! Empirical regressions for the equilibrium and start temperatures that bound
//! each product phase, plus the Koistinen–Marburger rate constant.
//!
//! All compositions are in mass percent. Temperatures are returned in °C and
//! are unchecked: compositions far outside the regressions' data sets
//! extrapolate, possibly to physically meaningless values.
//!
//! # Scientific References
//! - Grange, R.A. (1961). "Estimating critical ranges in heat treatment of steels"
//!   Metal Progress, 79, 73-75
//! - Andrews, K.W. (1965). "Empirical formulae for the calculation of some
//!   transformation temperatures" J. Iron Steel Inst., 203, 721-727
//! - Li, M.V., Niebuhr, D.V., Meekisho, L.L., Atteridge, D.G. (1998). "A computational
//!   model for the prediction of steel hardenability" Metall. Mater. Trans. B, 29, 661-672
//! - van Bohemen, S.M.C. (2012). "Bainite and martensite start temperature calculated
//!   with exponential carbon dependence" Mater. Sci. Technol., 28(4), 487-495
//! - Koistinen, D.P., Marburger, R.E. (1959). "A general equation prescribing the extent
//!   of the austenite-martensite transformation" Acta Metall., 7, 59-60

use crate::core_types::{Celsius, Composition};
use serde::{Deserialize, Serialize};

/// Koistinen–Marburger rate constant for plain carbon steels (1/K)
pub const KOISTINEN_MARBURGER_RATE: f64 = 0.011;

/// Eutectoid carbon content of the Fe–C system (wt%)
pub const EUTECTOID_CARBON: f64 = 0.77;

/// Maximum carbon solubility in ferrite at the eutectoid temperature (wt%)
pub const FERRITE_CARBON: f64 = 0.02;

/// Ae1 (lower critical temperature), Grange (1961)
///
/// ```text
/// Ae1 [°F] = 1333 − 25·Mn + 40·Si − 26·Ni + 42·Cr
/// ```
pub fn ae1_grange(c: &Composition) -> Celsius {
    Celsius::from_fahrenheit(
        1333.0 - 25.0 * c.manganese + 40.0 * c.silicon - 26.0 * c.nickel + 42.0 * c.chromium,
    )
}

/// Ae3 (upper critical temperature), Grange (1961)
///
/// ```text
/// Ae3 [°F] = 1570 − 323·C − 25·Mn + 80·Si − 32·Ni − 3·Cr
/// ```
pub fn ae3_grange(c: &Composition) -> Celsius {
    Celsius::from_fahrenheit(
        1570.0 - 323.0 * c.carbon - 25.0 * c.manganese + 80.0 * c.silicon
            - 32.0 * c.nickel
            - 3.0 * c.chromium,
    )
}

/// Ae3, Andrews (1965) linear form
///
/// ```text
/// Ae3 [°C] = 910 − 203·√C − 15.2·Ni + 44.7·Si + 31.5·Mo
/// ```
pub fn ae3_andrews(c: &Composition) -> Celsius {
    Celsius::from(
        910.0 - 203.0 * c.carbon.sqrt() - 15.2 * c.nickel + 44.7 * c.silicon
            + 31.5 * c.molybdenum,
    )
}

/// Bainite start, Li et al. (1998)
///
/// ```text
/// Bs [°C] = 637 − 58·C − 35·Mn − 15·Ni − 34·Cr − 41·Mo
/// ```
pub fn bs_li(c: &Composition) -> Celsius {
    Celsius::from(
        637.0 - 58.0 * c.carbon - 35.0 * c.manganese - 15.0 * c.nickel - 34.0 * c.chromium
            - 41.0 * c.molybdenum,
    )
}

/// Martensite start, Andrews (1965) linear form
///
/// ```text
/// Ms [°C] = 539 − 423·C − 30.4·Mn − 17.7·Ni − 12.1·Cr − 7.5·Mo + 10·Co − 7.5·Si
/// ```
pub fn ms_andrews(c: &Composition) -> Celsius {
    Celsius::from(
        539.0 - 423.0 * c.carbon - 30.4 * c.manganese - 17.7 * c.nickel - 12.1 * c.chromium
            - 7.5 * c.molybdenum
            + 10.0 * c.cobalt
            - 7.5 * c.silicon,
    )
}

/// Martensite start, van Bohemen (2012)
///
/// Exponential carbon dependence fits high-carbon steels better than the
/// linear Andrews form.
///
/// ```text
/// Ms [°C] = 565 − 31·Mn − 13·Si − 10·Cr − 18·Ni − 12·Mo − 600·(1 − exp(−0.96·C))
/// ```
pub fn ms_van_bohemen(c: &Composition) -> Celsius {
    Celsius::from(
        565.0 - 31.0 * c.manganese - 13.0 * c.silicon - 10.0 * c.chromium - 18.0 * c.nickel
            - 12.0 * c.molybdenum
            - 600.0 * (1.0 - (-0.96 * c.carbon).exp()),
    )
}

/// Koistinen–Marburger rate constant, van Bohemen (2012) (1/K)
///
/// ```text
/// α = 0.0224 − 0.0107·C − 0.0007·Mn − 0.00005·Ni − 0.00012·Cr − 0.0001·Mo
/// ```
///
/// Clamped at zero: a non-positive α means no martensite forms.
pub fn martensite_rate_van_bohemen(c: &Composition) -> f64 {
    (0.0224 - 0.0107 * c.carbon - 0.0007 * c.manganese - 0.00005 * c.nickel
        - 0.00012 * c.chromium
        - 0.0001 * c.molybdenum)
        .max(0.0)
}

/// Equilibrium proeutectoid ferrite fraction by the lever rule at the eutectoid
///
/// Zero for eutectoid and hypereutectoid steels.
pub fn equilibrium_ferrite_fraction(carbon: f64) -> f64 {
    ((EUTECTOID_CARBON - carbon) / (EUTECTOID_CARBON - FERRITE_CARBON)).clamp(0.0, 1.0)
}

/// Ae3 regression selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ae3Formula {
    #[default]
    Grange,
    Andrews,
}

/// Ms regression selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MsFormula {
    Andrews,
    #[default]
    VanBohemen,
}

/// Koistinen–Marburger rate constant selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MartensiteRateFormula {
    /// Constant α = 0.011 1/K
    KoistinenMarburger,
    #[default]
    VanBohemen,
}

/// Which regressions an [`crate::Alloy`] uses for its derived temperatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalTemperatureFormulas {
    pub ae3: Ae3Formula,
    pub ms: MsFormula,
    pub martensite_rate: MartensiteRateFormula,
}

impl CriticalTemperatureFormulas {
    pub fn ae3(&self, c: &Composition) -> Celsius {
        match self.ae3 {
            Ae3Formula::Grange => ae3_grange(c),
            Ae3Formula::Andrews => ae3_andrews(c),
        }
    }

    pub fn ms(&self, c: &Composition) -> Celsius {
        match self.ms {
            MsFormula::Andrews => ms_andrews(c),
            MsFormula::VanBohemen => ms_van_bohemen(c),
        }
    }

    pub fn martensite_rate(&self, c: &Composition) -> f64 {
        match self.martensite_rate {
            MartensiteRateFormula::KoistinenMarburger => KOISTINEN_MARBURGER_RATE,
            MartensiteRateFormula::VanBohemen => martensite_rate_van_bohemen(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Element;

    fn medium_carbon() -> Composition {
        Composition::new(0.35).with(Element::Manganese, 0.37)
    }

    #[test]
    fn test_grange_plain_carbon_values() {
        let c = medium_carbon();
        // (1333 - 9.25 - 32) * 5/9
        assert!((*ae1_grange(&c) - 717.638_888).abs() < 1e-5);
        // (1570 - 113.05 - 9.25 - 32) * 5/9
        assert!((*ae3_grange(&c) - 786.5).abs() < 1e-9);
    }

    #[test]
    fn test_ordering_of_critical_temperatures() {
        let c = medium_carbon();
        let ae3 = ae3_grange(&c);
        let ae1 = ae1_grange(&c);
        let bs = bs_li(&c);
        let ms = ms_van_bohemen(&c);
        assert!(ae3 > ae1, "Ae3 {ae3} should exceed Ae1 {ae1}");
        assert!(ae1 > bs, "Ae1 {ae1} should exceed Bs {bs}");
        assert!(bs > ms, "Bs {bs} should exceed Ms {ms}");
    }

    #[test]
    fn test_ms_formulas_agree_for_medium_carbon() {
        let c = medium_carbon();
        let andrews = *ms_andrews(&c);
        let bohemen = *ms_van_bohemen(&c);
        assert!((andrews - 379.7).abs() < 0.1, "Andrews Ms {andrews}");
        assert!((andrews - bohemen).abs() < 10.0);
    }

    #[test]
    fn test_carbon_lowers_ae3_and_ms() {
        let low = Composition::new(0.1);
        let high = Composition::new(0.6);
        assert!(ae3_grange(&high) < ae3_grange(&low));
        assert!(ae3_andrews(&high) < ae3_andrews(&low));
        assert!(ms_van_bohemen(&high) < ms_van_bohemen(&low));
    }

    #[test]
    fn test_martensite_rate() {
        let rate = martensite_rate_van_bohemen(&medium_carbon());
        assert!((rate - 0.018396).abs() < 1e-6, "alpha {rate}");
        assert_eq!(martensite_rate_van_bohemen(&Composition::new(5.0)), 0.0);
    }

    #[test]
    fn test_lever_rule() {
        assert!((equilibrium_ferrite_fraction(0.35) - 0.56).abs() < 1e-12);
        assert_eq!(equilibrium_ferrite_fraction(0.8), 0.0);
        assert_eq!(equilibrium_ferrite_fraction(0.0), 1.0);
    }

    #[test]
    fn test_formula_selection() {
        let c = medium_carbon();
        let formulas = CriticalTemperatureFormulas {
            ae3: Ae3Formula::Andrews,
            ms: MsFormula::Andrews,
            martensite_rate: MartensiteRateFormula::KoistinenMarburger,
        };
        assert_eq!(formulas.ae3(&c), ae3_andrews(&c));
        assert_eq!(formulas.ms(&c), ms_andrews(&c));
        assert_eq!(formulas.martensite_rate(&c), KOISTINEN_MARBURGER_RATE);
    }
}
