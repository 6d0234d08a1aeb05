//! Numerical solvers shared by the kinetics builders

pub mod root;

pub use root::RootFinder;
