//! Interprocedural backward slicing
//!
//! - domain/: criteria and slice records
//! - infrastructure/: generator, transfer rules, slicer, merger
//! - application/: public use-case surface

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::*;
pub use domain::{ContentLine, SliceRecord, SlicingCriterion, TargetKind};
