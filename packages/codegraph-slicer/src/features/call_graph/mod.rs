//! Call graph construction
//!
//! - domain/: symbols, edge kinds, constant and branch tables
//! - infrastructure/: petgraph-backed graph and the one-pass builder

pub mod domain;
pub mod infrastructure;

pub use domain::{
    BranchTargetTable, CallGraphEdgeKind, ConstantTable, MethodBranches, SymbolKind, SymbolNode,
};
pub use infrastructure::{
    load_body, CallGraph, CallGraphBuild, CallGraphBuilder, CallGraphStats, ClassFilter,
};
