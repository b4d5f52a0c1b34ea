pub mod bodies;
pub mod constant_folding;
pub mod dead_branch;
pub mod interpreter;

pub use bodies::BodyCache;
pub use constant_folding::ConstantFolder;
pub use dead_branch::{DeadBranchEliminator, LinePosition};
pub use interpreter::{CallArgs, SegmentInterpreter, SegmentOutcome};
