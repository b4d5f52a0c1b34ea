//! Call-graph nodes and edge kinds

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SymbolKind {
    Method,
    Field,
}

/// Node of the call graph, identified by its signature string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolNode {
    pub id: String,
    pub kind: SymbolKind,
}

impl SymbolNode {
    pub fn method(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: SymbolKind::Method,
        }
    }

    pub fn field(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: SymbolKind::Field,
        }
    }
}

/// Typed relation between symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CallGraphEdgeKind {
    /// method → method
    Calls,
    /// method → field
    Reads,
    /// method → field
    Writes,
}

impl CallGraphEdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calls => "CALLS",
            Self::Reads => "READS",
            Self::Writes => "WRITES",
        }
    }
}
