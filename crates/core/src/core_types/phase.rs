//! Product phases of austenite decomposition

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transformation product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    /// Proeutectoid ferrite (diffusional, forms below Ae3)
    Ferrite,
    /// Pearlite (diffusional, forms below Ae1)
    Pearlite,
    /// Bainite (diffusional, forms below Bs)
    Bainite,
    /// Martensite (athermal, forms below Ms)
    Martensite,
}

impl Phase {
    /// All phases in output column order
    pub const ALL: [Phase; 4] = [
        Phase::Ferrite,
        Phase::Pearlite,
        Phase::Bainite,
        Phase::Martensite,
    ];

    /// Phases governed by isothermal kinetics and the additivity rule
    pub const DIFFUSIONAL: [Phase; 3] = [Phase::Ferrite, Phase::Pearlite, Phase::Bainite];

    /// Whether the phase participates in additivity-based CCT projection
    pub const fn follows_additivity(self) -> bool {
        !matches!(self, Phase::Martensite)
    }

    /// Lower-case name, stable for column headers
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Ferrite => "ferrite",
            Phase::Pearlite => "pearlite",
            Phase::Bainite => "bainite",
            Phase::Martensite => "martensite",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_martensite_is_athermal() {
        for phase in Phase::DIFFUSIONAL {
            assert!(phase.follows_additivity());
        }
        assert!(!Phase::Martensite.follows_additivity());
    }
}
