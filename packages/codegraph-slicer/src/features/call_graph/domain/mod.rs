//! Call graph domain models

pub mod branch_table;
pub mod constant_table;
pub mod symbol;

pub use branch_table::{BranchTargetTable, MethodBranches};
pub use constant_table::ConstantTable;
pub use symbol::{CallGraphEdgeKind, SymbolKind, SymbolNode};
