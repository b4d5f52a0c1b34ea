//! Per-criterion traversal state
//!
//! Positions are program indices unless stated otherwise; the criterion's
//! `target_index` is the only reversed index and is converted once here.

use rustc_hash::FxHashSet;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::features::call_graph::MethodBranches;
use crate::features::slicing::domain::{ContentLine, SliceRecord, SlicingCriterion};
use crate::features::slicing::infrastructure::transfer::{Effect, LiveSet, Spawn};
use crate::shared::models::Instruction;

pub struct TraversalContext {
    pub criterion: SlicingCriterion,
    pub body: Arc<[Instruction]>,
    pub live: LiveSet,
    pub param_ordinals: BTreeSet<usize>,
    pub spawns: Vec<Spawn>,
    /// (tail, head) pairs, tail ≥ head
    back_edges: Vec<(usize, usize)>,
    forward_jumps: Vec<(usize, usize)>,
    taken_back_edges: FxHashSet<(usize, usize)>,
    lines: BTreeMap<usize, ContentLine>,
}

impl TraversalContext {
    pub fn new(
        criterion: SlicingCriterion,
        body: Arc<[Instruction]>,
        branches: &MethodBranches,
    ) -> Self {
        let live = criterion
            .live_values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self {
            criterion,
            body,
            live,
            param_ordinals: BTreeSet::new(),
            spawns: Vec::new(),
            back_edges: branches.back_edges(),
            forward_jumps: branches.forward_jumps(),
            taken_back_edges: FxHashSet::default(),
            lines: BTreeMap::new(),
        }
    }

    /// Program index of a reversed index
    pub fn program_index(&self, reversed: usize) -> usize {
        self.body.len() - 1 - reversed
    }

    /// Program index of the seed
    pub fn seed_index(&self) -> usize {
        self.program_index(self.criterion.target_index)
    }

    /// At a loop head enclosing the seed, the first visit jumps to the loop's
    /// tail so the loop-carried part is walked once. Returns the tail.
    pub fn take_loop_jump(&mut self, index: usize) -> Option<usize> {
        let seed = self.seed_index();
        let edge = self
            .back_edges
            .iter()
            .copied()
            .filter(|&(tail, head)| head == index && head <= seed && seed < tail)
            .find(|edge| !self.taken_back_edges.contains(edge))?;
        self.taken_back_edges.insert(edge);
        Some(edge.0)
    }

    /// `index` sits strictly inside a forward jump landing at or before the
    /// seed, so its definitions may be skipped at run time.
    pub fn may_define_only(&self, index: usize) -> bool {
        let seed = self.seed_index();
        self.forward_jumps
            .iter()
            .any(|&(src, tgt)| src < index && index < tgt && tgt <= seed)
    }

    pub fn is_live(&self, id: &str) -> bool {
        self.live.contains_key(id)
    }

    pub fn make_live(&mut self, id: impl Into<String>, origin: impl Into<String>) {
        self.live.entry(id.into()).or_insert_with(|| origin.into());
    }

    /// Keep `instruction` in the slice, merging constants into an existing line
    pub fn retain(&mut self, instruction: &Instruction, constants: Vec<String>) {
        let Some(unit_type) = instruction.unit_type else {
            return;
        };
        let line = self
            .lines
            .entry(instruction.index)
            .or_insert_with(|| ContentLine {
                unit_string: instruction.stmt.to_string(),
                unit_type,
                caller_name: instruction.method.clone(),
                line_number: instruction.index,
                source_index: instruction.index,
                constants: None,
            });
        for constant in constants {
            line.attach_constant(constant);
        }
    }

    /// Apply an effect's kills and gens at `index`
    pub fn apply(&mut self, index: usize, effect: &Effect) {
        let origin = effect
            .trigger
            .as_ref()
            .and_then(|t| self.live.get(t).cloned())
            .unwrap_or_else(|| self.criterion.target_statement.clone());

        if !self.may_define_only(index) {
            for id in &effect.kill {
                self.live.remove(id);
            }
        }
        for id in &effect.gen {
            self.make_live(id.clone(), origin.clone());
        }
        if let Some(ordinal) = effect.param_ordinal {
            self.param_ordinals.insert(ordinal);
        }
        for spawn in &effect.spawns {
            if !self.spawns.contains(spawn) {
                self.spawns.push(spawn.clone());
            }
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Finish the walk as a per-criterion record
    pub fn into_record(self, node_id: String, related_node_ids: Vec<String>) -> SliceRecord {
        let group_id = self.criterion.root_id();
        SliceRecord {
            node_id: Some(node_id),
            group_id,
            related_node_ids,
            caller_name: self.criterion.caller,
            target_statement: self.criterion.target_statement,
            target_param_numbers: self.criterion.target_param_numbers,
            target_variables: self.criterion.live_values,
            content: self.lines.into_values().collect(),
        }
    }
}
