pub mod context;
pub mod criterion_generator;
pub mod merger;
pub mod slicer;
pub mod transfer;

pub use context::TraversalContext;
pub use criterion_generator::CriterionGenerator;
pub use merger::{MergeStats, SliceMerger};
pub use slicer::{ProgramSlicer, SlicerStats};
pub use transfer::{transfer, Effect, LiveSet, Spawn, TransferEnv};
