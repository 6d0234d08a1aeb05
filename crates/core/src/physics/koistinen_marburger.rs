//! Koistinen–Marburger Athermal Martensite Model (1959)
//!
//! Martensite forms without diffusion and without a time dependence: the
//! fraction of austenite transformed depends only on how far below Ms the
//! steel has been cooled.
//!
//! ```text
//! f_M = 1 − exp(−α · (Ms − T)),  T < Ms
//! ```
//!
//! # References
//! - Koistinen, D.P., Marburger, R.E. (1959). Acta Metall., 7, 59-60
//! - van Bohemen, S.M.C., Sietsma, J. (2009). "Effect of composition on kinetics of
//!   athermal martensite formation in plain carbon steels" Mater. Sci. Technol., 25, 1009-1012

use crate::core_types::{Celsius, CelsiusDelta};

/// Fraction of the parent austenite transformed at temperature T
pub fn martensite_fraction(ms: Celsius, rate: f64, temperature: Celsius) -> f64 {
    let undercooling = (ms - temperature).value();
    if undercooling <= 0.0 || rate <= 0.0 {
        return 0.0;
    }
    -(-rate * undercooling).exp_m1()
}

/// Temperature at which fraction X of the parent austenite has transformed
///
/// Returns `None` when α ≤ 0 (no martensite) or X is outside [0, 1).
pub fn temperature_for_fraction(ms: Celsius, rate: f64, fraction: f64) -> Option<Celsius> {
    if rate <= 0.0 || !(0.0..1.0).contains(&fraction) {
        return None;
    }
    let undercooling = -(-fraction).ln_1p() / rate;
    Some(ms - CelsiusDelta::new(undercooling))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_no_martensite_above_ms() {
        let ms = Celsius::new(380.0);
        assert_eq!(martensite_fraction(ms, 0.011, Celsius::new(400.0)), 0.0);
        assert_eq!(martensite_fraction(ms, 0.011, ms), 0.0);
    }

    #[test]
    fn test_room_temperature_fraction() {
        let f = martensite_fraction(Celsius::new(380.0), 0.011, Celsius::new(25.0));
        assert_relative_eq!(f, 1.0 - (-0.011_f64 * 355.0).exp(), max_relative = 1e-12);
        assert!(f > 0.97);
    }

    #[test]
    fn test_m50_m90() {
        let ms = Celsius::new(380.0);
        let m50 = temperature_for_fraction(ms, 0.011, 0.5).unwrap();
        let m90 = temperature_for_fraction(ms, 0.011, 0.9).unwrap();
        assert_relative_eq!(*m50, 380.0 - std::f64::consts::LN_2 / 0.011, max_relative = 1e-12);
        assert!(m90 < m50);
        assert_relative_eq!(martensite_fraction(ms, 0.011, m90), 0.9, max_relative = 1e-9);
        assert!(temperature_for_fraction(ms, 0.0, 0.5).is_none());
        assert!(temperature_for_fraction(ms, 0.011, 1.0).is_none());
    }
}
