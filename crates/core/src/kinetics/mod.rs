//! Transformation kinetics: parameters, TTT and CCT builders, fraction integration

pub mod additivity;
pub mod cooling_path;
pub mod curve;
pub mod fitting;
pub mod integrator;
pub mod isothermal;
pub mod parameters;

pub use additivity::{
    build_cct, build_cct_for_paths, phase_event, phase_events, CctCurve, CctDiagram,
    CoolingEvent, CoolingRateSweep,
};
pub use cooling_path::CoolingPath;
pub use curve::{CurvePoint, PhaseEvent, TransformationCurve};
pub use fitting::{fit_curve, fit_event, fit_time_constant, FitConvention, FittedEvent, TimeConstantFit};
pub use integrator::{integrate, FractionRow, FractionTable};
pub use isothermal::{
    build_isothermal_curve, build_ttt, IsothermalCurve, IsothermalPoint, MartensiteLines,
    TemperatureGrid, TttDiagram,
};
pub use parameters::{
    kinetics_parameters, DiffusionalCoefficients, DiffusionalParameters, ElementBounds,
    KineticsConfig, KineticsModel, MartensiteParameters, PhaseParameters,
};
