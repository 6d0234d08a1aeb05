//! Core types and utilities

pub mod composition;
pub mod phase;
pub mod units;

pub use composition::{Composition, Element};
pub use phase::Phase;
pub use units::*;
