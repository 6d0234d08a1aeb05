//! Empirical metallurgy models: critical temperatures, rate laws, martensite

pub mod critical_temperatures;
pub mod koistinen_marburger;
pub mod li_kinetics;
pub mod sigmoid;

pub use critical_temperatures::{
    Ae3Formula, CriticalTemperatureFormulas, MartensiteRateFormula, MsFormula,
};
pub use li_kinetics::CompositionFactor;
pub use sigmoid::{KirkaldyIntegral, RateLaw, SigmoidLaw};
