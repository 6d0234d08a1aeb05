//! Steel Transformation Kinetics Core Library
//!
//! Predicts how austenite decomposes on cooling: Time-Temperature-Transformation
//! (TTT) and Continuous-Cooling-Transformation (CCT) diagrams and phase-fraction
//! histories for plain-carbon and low-alloy steels.
//!
//! ## Models
//!
//! - Critical temperatures (Ae1, Ae3, Bs, Ms) from empirical composition regressions
//! - Kirkaldy–Venugopalan rate law with the Li et al. (1998) coefficients for
//!   ferrite, pearlite and bainite
//! - Scheil additivity for start/finish along arbitrary cooling paths
//! - Equivalent-isothermal-clock integration with phase competition
//! - Koistinen–Marburger athermal martensite
//!
//! ## Example
//!
//! ```
//! use steel_kinetics_core::{Alloy, CoolingPath, TransformationDiagrams};
//!
//! let alloy = Alloy::from_pairs(3.0, [("C", 0.35), ("Mn", 0.37)]).unwrap();
//! let diagrams = TransformationDiagrams::new(alloy).unwrap();
//!
//! let path = CoolingPath::from_points([(0.0, 843.0), (1e5, 0.0)]).unwrap();
//! let table = diagrams.transformed_fraction(&path, 2001).unwrap();
//! let last = table.final_row().unwrap();
//! assert!(last.ferrite > 0.5 && last.pearlite > 0.4);
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Empirical models and numerics
pub mod physics;
pub mod solver;

// Alloy record and kinetics builders
pub mod alloy;
pub mod diagrams;
pub mod kinetics;

// Re-export core types
pub use alloy::{Alloy, AlloySpec};
pub use core_types::{Celsius, CelsiusDelta, Composition, Element, Kelvin, Phase};
pub use error::{KineticsError, Result};

// Re-export builders
pub use diagrams::TransformationDiagrams;
pub use kinetics::{
    build_cct, build_cct_for_paths, build_ttt, integrate, kinetics_parameters, phase_event,
    CctDiagram, CoolingPath, CoolingRateSweep, FractionTable, KineticsConfig, KineticsModel,
    PhaseEvent, TemperatureGrid, TransformationCurve, TttDiagram,
};
pub use physics::{CriticalTemperatureFormulas, RateLaw};
pub use solver::RootFinder;
