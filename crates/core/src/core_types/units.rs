//! Semantic unit types for temperatures
//!
//! Newtype wrappers keep Celsius and Kelvin apart: the rate model needs
//! absolute temperature in the Arrhenius term and Celsius undercooling
//! everywhere else, and mixing the two silently shifts every curve by 273 K.
//!
//! # Design Philosophy
//! - f64 throughout (exponentials of Q/RT are sensitive to rounding)
//! - Total ordering via `total_cmp`, so temperatures sort and `min`/`max` work
//! - Serde support so configs and result tables carry typed temperatures
//!
//! # Usage
//! ```
//! use steel_kinetics_core::core_types::units::{Celsius, Kelvin};
//!
//! let temp = Celsius::new(727.0);
//! let kelvin: Kelvin = temp.into();
//! assert!((*kelvin - 1000.15).abs() < 1e-9);
//!
//! let undercooling = Celsius::new(786.5) - temp;
//! assert!((undercooling.value() - 59.5).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Sub};

/// Celsius to Kelvin conversion offset (0°C = 273.15 K)
pub const CELSIUS_KELVIN_OFFSET: f64 = 273.15;

// ============================================================================
// CELSIUS
// ============================================================================

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f64);

impl Eq for Celsius {}

impl PartialOrd for Celsius {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Celsius {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for Celsius {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Celsius {
    /// Absolute zero in Celsius
    pub const ABSOLUTE_ZERO: Celsius = Celsius(-CELSIUS_KELVIN_OFFSET);

    /// Room temperature used as the default end of cooling sweeps
    pub const ROOM: Celsius = Celsius(25.0);

    /// Create a new Celsius temperature. Asserts value >= absolute zero (-273.15°C).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= -CELSIUS_KELVIN_OFFSET,
            "Celsius::new: value is below absolute zero (-273.15°C)"
        );
        Celsius(value)
    }

    /// Convert a Fahrenheit reading (several steel regressions are published in °F)
    #[inline]
    #[must_use]
    pub fn from_fahrenheit(value: f64) -> Self {
        Celsius((value - 32.0) * 5.0 / 9.0)
    }

    /// Convert to Kelvin
    #[inline]
    #[must_use]
    pub fn to_kelvin(self) -> Kelvin {
        Kelvin(self.0 + CELSIUS_KELVIN_OFFSET)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Unchecked conversion: empirical formulas may extrapolate below absolute
/// zero for absurd compositions, and the result must still be representable.
impl From<f64> for Celsius {
    fn from(v: f64) -> Self {
        Celsius(v)
    }
}

impl From<Celsius> for f64 {
    fn from(c: Celsius) -> f64 {
        c.0
    }
}

impl From<Celsius> for Kelvin {
    fn from(c: Celsius) -> Kelvin {
        c.to_kelvin()
    }
}

impl Sub for Celsius {
    type Output = CelsiusDelta;
    fn sub(self, rhs: Celsius) -> CelsiusDelta {
        CelsiusDelta(self.0 - rhs.0)
    }
}

impl Add<CelsiusDelta> for Celsius {
    type Output = Celsius;
    fn add(self, rhs: CelsiusDelta) -> Celsius {
        Celsius(self.0 + rhs.0)
    }
}

impl Sub<CelsiusDelta> for Celsius {
    type Output = Celsius;
    fn sub(self, rhs: CelsiusDelta) -> Celsius {
        Celsius(self.0 - rhs.0)
    }
}

impl PartialEq<f64> for Celsius {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<f64> for Celsius {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

// ============================================================================
// CELSIUS DELTA
// ============================================================================

/// Temperature difference in Celsius (undercooling, cooling steps)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CelsiusDelta(f64);

impl CelsiusDelta {
    /// Create a temperature delta (can be any value, positive or negative)
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        CelsiusDelta(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for CelsiusDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

// ============================================================================
// KELVIN
// ============================================================================

/// Temperature in Kelvin (absolute scale)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kelvin(f64);

impl Eq for Kelvin {}

impl PartialOrd for Kelvin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Kelvin {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for Kelvin {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Kelvin {
    /// Create a new Kelvin temperature. Asserts value >= absolute zero (0 K).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Kelvin::new: value is below absolute zero (0 K)");
        Kelvin(value)
    }

    /// Convert to Celsius
    #[inline]
    #[must_use]
    pub fn to_celsius(self) -> Celsius {
        Celsius(self.0 - CELSIUS_KELVIN_OFFSET)
    }
}

impl From<Kelvin> for Celsius {
    fn from(k: Kelvin) -> Celsius {
        k.to_celsius()
    }
}

impl fmt::Display for Kelvin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} K", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_kelvin_round_trip() {
        let t = Celsius::new(843.0);
        let k = t.to_kelvin();
        assert!((*k - 1116.15).abs() < 1e-9);
        assert!((k.to_celsius().value() - 843.0).abs() < 1e-9);
    }

    #[test]
    fn test_fahrenheit_conversion() {
        assert!((Celsius::from_fahrenheit(212.0).value() - 100.0).abs() < 1e-12);
        assert!((Celsius::from_fahrenheit(1333.0).value() - 722.777_777).abs() < 1e-5);
    }

    #[test]
    fn test_ordering_and_delta() {
        let ms = Celsius::new(382.0);
        let bs = Celsius::new(603.0);
        assert_eq!(ms.max(bs), bs);
        assert_eq!((bs - ms).value(), 221.0);
        assert_eq!(ms + CelsiusDelta::new(10.0), Celsius::new(392.0));
    }

    #[test]
    #[should_panic(expected = "below absolute zero")]
    fn test_celsius_new_rejects_below_absolute_zero() {
        let _ = Celsius::new(-300.0);
    }
}
