//! Slice records as persisted in the slice store

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::features::classification::UnitType;

/// One retained instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentLine {
    pub unit_string: String,
    pub unit_type: UnitType,
    /// Signature string of the owning method
    pub caller_name: String,
    /// Ascending position within the slice
    pub line_number: usize,
    /// Program index within the owning method
    pub source_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constants: Option<Vec<String>>,
}

impl ContentLine {
    pub fn attach_constant(&mut self, literal: String) {
        let constants = self.constants.get_or_insert_with(Vec::new);
        if !constants.contains(&literal) {
            constants.push(literal);
        }
    }
}

/// Per-criterion slice, or a merged path slice when `node_id` is absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub group_id: String,
    #[serde(default)]
    pub related_node_ids: Vec<String>,
    pub caller_name: String,
    pub target_statement: String,
    #[serde(default)]
    pub target_param_numbers: Vec<i32>,
    /// Live value id → originating reference at the seed
    #[serde(default)]
    pub target_variables: BTreeMap<String, String>,
    #[serde(default)]
    pub content: Vec<ContentLine>,
}

impl SliceRecord {
    pub fn is_merged(&self) -> bool {
        self.node_id.is_none()
    }

    /// Unit strings in content order
    pub fn unit_strings(&self) -> Vec<&str> {
        self.content.iter().map(|l| l.unit_string.as_str()).collect()
    }

    /// Every constant attached to any line, in content order
    pub fn constants(&self) -> Vec<&str> {
        self.content
            .iter()
            .filter_map(|l| l.constants.as_ref())
            .flatten()
            .map(String::as_str)
            .collect()
    }
}
