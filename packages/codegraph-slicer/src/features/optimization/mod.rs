//! Merged-slice optimization
//!
//! - domain/: abstract values, branch decisions, dead ranges
//! - infrastructure/: segment interpreter, dead-branch elimination, string folding

pub mod domain;
pub mod infrastructure;

pub use domain::{AbsValue, BranchDecision, DeadRanges};
pub use infrastructure::{ConstantFolder, DeadBranchEliminator, SegmentInterpreter};
