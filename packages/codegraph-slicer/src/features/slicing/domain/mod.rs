//! Program slicing domain models

pub mod criterion;
pub mod slice;

pub use criterion::{SlicingCriterion, TargetKind};
pub use slice::{ContentLine, SliceRecord};
