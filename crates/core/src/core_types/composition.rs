//! Alloy composition in mass percent
//!
//! The element set is fixed to what the hardenability regressions use.
//! Carbon is mandatory; every other element defaults to zero.

use crate::error::{KineticsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alloying elements recognised by the regressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Carbon,
    Manganese,
    Silicon,
    Nickel,
    Chromium,
    Molybdenum,
    Cobalt,
}

impl Element {
    /// All elements in table order
    pub const ALL: [Element; 7] = [
        Element::Carbon,
        Element::Manganese,
        Element::Silicon,
        Element::Nickel,
        Element::Chromium,
        Element::Molybdenum,
        Element::Cobalt,
    ];

    /// Chemical symbol
    pub const fn symbol(self) -> &'static str {
        match self {
            Element::Carbon => "C",
            Element::Manganese => "Mn",
            Element::Silicon => "Si",
            Element::Nickel => "Ni",
            Element::Chromium => "Cr",
            Element::Molybdenum => "Mo",
            Element::Cobalt => "Co",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = KineticsError;

    /// Parse a chemical symbol, case-insensitively ("mn", "Mn", "MN")
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Element::ALL
            .into_iter()
            .find(|e| e.symbol().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| KineticsError::invalid_composition(format!("unknown element '{s}'")))
    }
}

/// Mass-percent composition of a steel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Composition {
    pub carbon: f64,
    #[serde(default)]
    pub manganese: f64,
    #[serde(default)]
    pub silicon: f64,
    #[serde(default)]
    pub nickel: f64,
    #[serde(default)]
    pub chromium: f64,
    #[serde(default)]
    pub molybdenum: f64,
    #[serde(default)]
    pub cobalt: f64,
}

impl Composition {
    /// Plain carbon steel with the given carbon content (wt%)
    pub fn new(carbon: f64) -> Self {
        Self {
            carbon,
            ..Self::default()
        }
    }

    /// Set one element, builder style
    pub fn with(mut self, element: Element, wt_pct: f64) -> Self {
        *self.slot_mut(element) = wt_pct;
        self
    }

    /// Content of one element (wt%)
    pub fn get(&self, element: Element) -> f64 {
        match element {
            Element::Carbon => self.carbon,
            Element::Manganese => self.manganese,
            Element::Silicon => self.silicon,
            Element::Nickel => self.nickel,
            Element::Chromium => self.chromium,
            Element::Molybdenum => self.molybdenum,
            Element::Cobalt => self.cobalt,
        }
    }

    fn slot_mut(&mut self, element: Element) -> &mut f64 {
        match element {
            Element::Carbon => &mut self.carbon,
            Element::Manganese => &mut self.manganese,
            Element::Silicon => &mut self.silicon,
            Element::Nickel => &mut self.nickel,
            Element::Chromium => &mut self.chromium,
            Element::Molybdenum => &mut self.molybdenum,
            Element::Cobalt => &mut self.cobalt,
        }
    }

    /// Build from `(symbol, wt%)` pairs, e.g. `[("C", 0.35), ("Mn", 0.37)]`.
    ///
    /// Fails on unknown symbols, repeated symbols, or when carbon is absent.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut composition = Self::default();
        let mut seen = [false; Element::ALL.len()];

        for (symbol, value) in pairs {
            let element: Element = symbol.parse()?;
            let index = element as usize;
            if seen[index] {
                return Err(KineticsError::invalid_composition(format!(
                    "element {element} given more than once"
                )));
            }
            seen[index] = true;
            *composition.slot_mut(element) = value;
        }

        if !seen[Element::Carbon as usize] {
            return Err(KineticsError::invalid_composition("carbon content is mandatory"));
        }
        composition.validate()?;
        Ok(composition)
    }

    /// Iterate `(element, wt%)` in table order
    pub fn iter(&self) -> impl Iterator<Item = (Element, f64)> + '_ {
        Element::ALL.into_iter().map(|e| (e, self.get(e)))
    }

    /// Every content must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for (element, value) in self.iter() {
            if !value.is_finite() {
                return Err(KineticsError::invalid_composition(format!(
                    "{element} content is not a number ({value})"
                )));
            }
            if value < 0.0 {
                return Err(KineticsError::invalid_composition(format!(
                    "{element} content is negative ({value})"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (element, value) in self.iter() {
            if value == 0.0 && element != Element::Carbon {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{element}={value}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_defaults_to_zero() {
        let comp = Composition::from_pairs([("C", 0.35), ("Mn", 0.37)]).unwrap();
        assert_eq!(comp.carbon, 0.35);
        assert_eq!(comp.manganese, 0.37);
        assert_eq!(comp.chromium, 0.0);
        assert_eq!(comp.to_string(), "C=0.35, Mn=0.37");
    }

    #[test]
    fn test_symbols_are_case_insensitive() {
        assert_eq!("mo".parse::<Element>().unwrap(), Element::Molybdenum);
        assert_eq!(" CR ".parse::<Element>().unwrap(), Element::Chromium);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            Composition::from_pairs([("Mn", 0.5)]),
            Err(KineticsError::InvalidComposition { .. })
        ));
        assert!(matches!(
            Composition::from_pairs([("C", 0.2), ("Xx", 0.1)]),
            Err(KineticsError::InvalidComposition { .. })
        ));
        assert!(matches!(
            Composition::from_pairs([("C", -0.1)]),
            Err(KineticsError::InvalidComposition { .. })
        ));
        assert!(matches!(
            Composition::from_pairs([("C", f64::NAN)]),
            Err(KineticsError::InvalidComposition { .. })
        ));
        assert!(matches!(
            Composition::from_pairs([("C", 0.2), ("c", 0.3)]),
            Err(KineticsError::InvalidComposition { .. })
        ));
    }

    #[test]
    fn test_builder_and_get() {
        let comp = Composition::new(1.0)
            .with(Element::Chromium, 5.125)
            .with(Element::Molybdenum, 1.15);
        assert_eq!(comp.get(Element::Chromium), 5.125);
        assert_eq!(comp.get(Element::Molybdenum), 1.15);
        assert_eq!(comp.get(Element::Nickel), 0.0);
    }
}
