//! One-stop facade over the kinetics builders
//!
//! `TransformationDiagrams` owns a [`KineticsModel`] and forwards to the free
//! functions in [`crate::kinetics`]. It holds no mutable state, so one value
//! can serve any number of queries, from any number of threads.

use crate::alloy::Alloy;
use crate::core_types::Phase;
use crate::error::Result;
use crate::kinetics::{
    build_cct, build_cct_for_paths, build_ttt, fit_curve, integrate, phase_event, CctDiagram,
    CoolingPath, CoolingRateSweep, FitConvention, FittedEvent, FractionTable, KineticsConfig,
    KineticsModel, PhaseEvent, TemperatureGrid, TttDiagram,
};
use tracing::debug;

/// TTT/CCT diagrams and phase-fraction histories of one alloy
#[derive(Debug, Clone)]
pub struct TransformationDiagrams {
    model: KineticsModel,
}

impl TransformationDiagrams {
    /// Diagrams with the default (Li 1998) kinetics
    pub fn new(alloy: Alloy) -> Result<Self> {
        Self::with_config(alloy, KineticsConfig::default())
    }

    /// Diagrams with custom regression constants, thresholds or rate law
    pub fn with_config(alloy: Alloy, config: KineticsConfig) -> Result<Self> {
        Ok(Self {
            model: KineticsModel::new(alloy, config)?,
        })
    }

    pub fn alloy(&self) -> &Alloy {
        self.model.alloy()
    }

    pub fn model(&self) -> &KineticsModel {
        &self.model
    }

    /// TTT diagram over a temperature grid
    pub fn ttt(&self, grid: &TemperatureGrid) -> Result<TttDiagram> {
        build_ttt(&self.model, grid)
    }

    /// TTT diagram over Ms..Ae3 with the given step (°C)
    pub fn ttt_default_range(&self, step: f64) -> Result<TttDiagram> {
        let grid = TemperatureGrid::for_alloy(self.model.alloy(), step)?;
        debug!("TTT grid {}..{} step {}", grid.lower, grid.upper, grid.step);
        self.ttt(&grid)
    }

    /// CCT diagram over a constant-rate sweep
    pub fn cct(&self, sweep: &CoolingRateSweep) -> Result<CctDiagram> {
        build_cct(&self.model, sweep)
    }

    /// CCT diagram over caller-supplied paths
    pub fn cct_for_paths(&self, paths: &[CoolingPath], samples: usize) -> Result<CctDiagram> {
        build_cct_for_paths(&self.model, paths, samples)
    }

    /// Phase fractions along a path
    pub fn transformed_fraction(&self, path: &CoolingPath, samples: usize) -> Result<FractionTable> {
        integrate(&self.model, path, samples)
    }

    /// Start/finish of one phase along a path
    pub fn phase_event(&self, phase: Phase, path: &CoolingPath, samples: usize) -> Result<PhaseEvent> {
        phase_event(&self.model, phase, path, samples)
    }

    /// First-order fits of every CCT event with both start and finish
    pub fn fitted_events(&self, cct: &CctDiagram, convention: &FitConvention) -> Vec<FittedEvent> {
        Phase::ALL
            .into_iter()
            .filter_map(|phase| cct.curve(phase))
            .flat_map(|curve| fit_curve(curve, convention))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Celsius;

    fn reference() -> TransformationDiagrams {
        let alloy = Alloy::from_pairs(3.0, [("C", 0.35), ("Mn", 0.37)]).unwrap();
        TransformationDiagrams::new(alloy).unwrap()
    }

    #[test]
    fn test_facade_matches_free_functions() {
        let diagrams = reference();
        let path = CoolingPath::constant_rate(Celsius::new(900.0), Celsius::ROOM, 1.0).unwrap();
        let via_facade = diagrams.transformed_fraction(&path, 500).unwrap();
        let direct = integrate(diagrams.model(), &path, 500).unwrap();
        assert_eq!(via_facade, direct);

        let event = diagrams.phase_event(Phase::Ferrite, &path, 500).unwrap();
        assert!(event.formed());
    }

    #[test]
    fn test_default_range_ttt() {
        let diagrams = reference();
        let ttt = diagrams.ttt_default_range(2.0).unwrap();
        for phase in Phase::DIFFUSIONAL {
            assert!(!ttt.curve(phase).unwrap().is_empty());
        }
    }

    #[test]
    fn test_fitted_events() {
        let diagrams = reference();
        let sweep = CoolingRateSweep {
            min_rate: 0.1,
            max_rate: 10.0,
            rates: 5,
            samples_per_path: 500,
            ..CoolingRateSweep::default()
        };
        let cct = diagrams.cct(&sweep).unwrap();
        let fits = diagrams.fitted_events(&cct, &FitConvention::default());
        assert!(!fits.is_empty());
        assert!(fits.iter().filter_map(|f| f.fit).all(|f| f.tau.is_finite()));
    }
}
