//! Per-method branch target table
//!
//! Records every jump of a method by program index. Back-edges (target at or
//! before the source) identify loops; forward jumps delimit code that some
//! path may bypass.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::models::{Instruction, Stmt};

/// Jumps of one method
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodBranches {
    /// Unconditional jumps `(source, target)`
    pub gotos: Vec<(usize, usize)>,
    /// Conditional jumps `(source, target)`
    pub conditionals: Vec<(usize, usize)>,
    /// Switch source → case targets (default last)
    pub switches: BTreeMap<usize, Vec<usize>>,
}

impl MethodBranches {
    /// Record the jump(s) of one statement
    pub fn record(&mut self, index: usize, stmt: &Stmt) {
        match stmt {
            Stmt::Goto { target } => self.gotos.push((index, *target)),
            Stmt::If { target, .. } => self.conditionals.push((index, *target)),
            Stmt::Switch { .. } => {
                self.switches.insert(index, stmt.branch_targets());
            }
            _ => {}
        }
    }

    pub fn from_body(body: &[Instruction]) -> Self {
        let mut branches = Self::default();
        for instruction in body {
            branches.record(instruction.index, &instruction.stmt);
        }
        branches
    }

    fn all_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.gotos
            .iter()
            .chain(self.conditionals.iter())
            .copied()
            .chain(
                self.switches
                    .iter()
                    .flat_map(|(src, targets)| targets.iter().map(move |t| (*src, *t))),
            )
    }

    /// Jumps whose target is at or before the source, sorted
    pub fn back_edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<_> = self.all_edges().filter(|(src, tgt)| tgt <= src).collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }

    /// Jumps whose target is after the source, sorted
    pub fn forward_jumps(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<_> = self.all_edges().filter(|(src, tgt)| tgt > src).collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }

    /// Whether `index` lies inside some loop `[head, tail]`
    pub fn in_loop(&self, index: usize) -> bool {
        self.back_edges()
            .iter()
            .any(|(tail, head)| *head <= index && index <= *tail)
    }
}

/// Method signature string → branches
#[derive(Debug, Clone, Default)]
pub struct BranchTargetTable {
    methods: FxHashMap<String, MethodBranches>,
}

impl BranchTargetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, method: impl Into<String>, branches: MethodBranches) {
        self.methods.insert(method.into(), branches);
    }

    pub fn get(&self, method: &str) -> Option<&MethodBranches> {
        self.methods.get(method)
    }
}
