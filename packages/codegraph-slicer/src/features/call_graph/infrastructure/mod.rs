pub mod builder;
pub mod graph;

pub use builder::{load_body, CallGraphBuild, CallGraphBuilder, CallGraphStats, ClassFilter};
pub use graph::CallGraph;
