//! Symbol-level call graph
//!
//! Method and field nodes keyed by signature string, with typed edges
//! (Calls, Reads, Writes). Nodes dedup by identifier and edges dedup by
//! `(source, target, kind)`, so adding the same fact twice is a no-op.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::features::call_graph::domain::{CallGraphEdgeKind, SymbolKind, SymbolNode};

/// Call graph over method and field symbols
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    /// Directed graph: method → callee / accessed field
    graph: DiGraph<SymbolNode, CallGraphEdgeKind>,

    /// Signature → node index
    symbol_to_node: FxHashMap<String, NodeIndex>,

    /// Present edges, for dedup
    edge_keys: FxHashSet<(NodeIndex, NodeIndex, CallGraphEdgeKind)>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node index for `id`, creating the node if needed
    pub fn ensure_node(&mut self, id: &str, kind: SymbolKind) -> NodeIndex {
        if let Some(&idx) = self.symbol_to_node.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(SymbolNode {
            id: id.to_string(),
            kind,
        });
        self.symbol_to_node.insert(id.to_string(), idx);
        idx
    }

    fn add_edge(
        &mut self,
        from: (&str, SymbolKind),
        to: (&str, SymbolKind),
        kind: CallGraphEdgeKind,
    ) -> bool {
        let from_idx = self.ensure_node(from.0, from.1);
        let to_idx = self.ensure_node(to.0, to.1);
        if !self.edge_keys.insert((from_idx, to_idx, kind)) {
            return false;
        }
        self.graph.add_edge(from_idx, to_idx, kind);
        true
    }

    /// Add `caller → callee`; returns false when already present
    pub fn add_call(&mut self, caller: &str, callee: &str) -> bool {
        self.add_edge(
            (caller, SymbolKind::Method),
            (callee, SymbolKind::Method),
            CallGraphEdgeKind::Calls,
        )
    }

    pub fn add_read(&mut self, method: &str, field: &str) -> bool {
        self.add_edge(
            (method, SymbolKind::Method),
            (field, SymbolKind::Field),
            CallGraphEdgeKind::Reads,
        )
    }

    pub fn add_write(&mut self, method: &str, field: &str) -> bool {
        self.add_edge(
            (method, SymbolKind::Method),
            (field, SymbolKind::Field),
            CallGraphEdgeKind::Writes,
        )
    }

    fn neighbors(&self, id: &str, direction: Direction, kind: CallGraphEdgeKind) -> Vec<String> {
        let Some(&idx) = self.symbol_to_node.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<String> = self
            .graph
            .edges_directed(idx, direction)
            .filter(|e| *e.weight() == kind)
            .map(|e| {
                let other = match direction {
                    Direction::Incoming => e.source(),
                    Direction::Outgoing => e.target(),
                };
                self.graph[other].id.clone()
            })
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Methods calling `method`, sorted
    pub fn callers_of(&self, method: &str) -> Vec<String> {
        self.neighbors(method, Direction::Incoming, CallGraphEdgeKind::Calls)
    }

    /// Methods writing `field`, sorted
    pub fn writers_of(&self, field: &str) -> Vec<String> {
        self.neighbors(field, Direction::Incoming, CallGraphEdgeKind::Writes)
    }

    /// Methods reading `field`, sorted
    pub fn readers_of(&self, field: &str) -> Vec<String> {
        self.neighbors(field, Direction::Incoming, CallGraphEdgeKind::Reads)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.symbol_to_node.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All edges as `(source, target, kind)`, sorted
    pub fn edges(&self) -> Vec<(String, String, CallGraphEdgeKind)> {
        let mut edges: Vec<_> = self
            .graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].id.clone(),
                    self.graph[e.target()].id.clone(),
                    *e.weight(),
                )
            })
            .collect();
        edges.sort();
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_dedup() {
        let mut graph = CallGraph::new();
        assert!(graph.add_call("a", "b"));
        assert!(!graph.add_call("a", "b"));
        assert!(graph.add_read("a", "f"));
        assert!(graph.add_write("a", "f"));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.readers_of("f"), vec!["a".to_string()]);
        assert_eq!(graph.writers_of("f"), vec!["a".to_string()]);
        assert_eq!(graph.callers_of("b"), vec!["a".to_string()]);
        assert!(graph.callers_of("missing").is_empty());
    }
}
