//! Slicing criterion
//!
//! A (location, tracked values) pair seeding one backward walk. Identity is the
//! hash of caller, target statement, reversed target index and the live-value
//! set; the slice store uses it to keep at most one slice per criterion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::shared::utils::IdGenerator;

/// What the target statement names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// `x = <field>`: value read from a field
    FieldRead,
    /// `<field> = x`: value written into a field
    FieldWrite,
    /// Arguments (or receiver) of an invocation
    Invocation,
    /// `return x`
    ReturnValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlicingCriterion {
    /// Signature string of the method the walk runs in
    pub caller: String,
    pub target_statement: String,
    pub target_kind: TargetKind,
    /// Seed position in the reversed instruction list
    pub target_index: usize,
    /// Selected positions; `-1` is the receiver
    pub target_param_numbers: Vec<i32>,
    /// Live value id → originating reference
    pub live_values: BTreeMap<String, String>,
    /// Call-boundary hops from the root: positive upward, negative downward
    pub depth: i32,
    /// Root criterion id; `None` on a root
    pub group_id: Option<String>,
}

impl SlicingCriterion {
    pub fn new(
        caller: impl Into<String>,
        target_statement: impl Into<String>,
        target_kind: TargetKind,
        target_index: usize,
    ) -> Self {
        Self {
            caller: caller.into(),
            target_statement: target_statement.into(),
            target_kind,
            target_index,
            target_param_numbers: Vec::new(),
            live_values: BTreeMap::new(),
            depth: 0,
            group_id: None,
        }
    }

    pub fn with_params(mut self, params: Vec<i32>) -> Self {
        self.target_param_numbers = params;
        self
    }

    pub fn with_live(mut self, id: impl Into<String>, origin: impl Into<String>) -> Self {
        self.live_values.insert(id.into(), origin.into());
        self
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn node_id(&self) -> String {
        let live: Vec<&str> = self.live_values.keys().map(String::as_str).collect();
        IdGenerator::generate_criterion_id(
            &self.caller,
            &self.target_statement,
            self.target_index,
            &live,
        )
    }

    /// Root id of the criterion's group (own id for roots)
    pub fn root_id(&self) -> String {
        self.group_id.clone().unwrap_or_else(|| self.node_id())
    }

    pub fn is_root(&self) -> bool {
        self.group_id.is_none()
    }

    pub fn seeds_field_read(&self) -> bool {
        self.target_kind == TargetKind::FieldRead
    }

    fn identity(&self) -> (&str, &str, usize, Vec<&str>) {
        (
            &self.caller,
            &self.target_statement,
            self.target_index,
            self.live_values.keys().map(String::as_str).collect(),
        )
    }
}

impl PartialEq for SlicingCriterion {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for SlicingCriterion {}

impl Hash for SlicingCriterion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}
