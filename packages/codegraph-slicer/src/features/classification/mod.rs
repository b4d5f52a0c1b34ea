//! Instruction classification
//!
//! - domain/: `UnitType` categories and capability predicates
//! - infrastructure/: the shape-based classifier

pub mod domain;
pub mod infrastructure;

pub use domain::UnitType;
pub use infrastructure::classify;
