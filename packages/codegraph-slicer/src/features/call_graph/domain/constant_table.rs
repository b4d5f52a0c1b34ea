//! Static-final constant table
//!
//! Field signature → constant, recorded from class declarations. The first
//! writer wins so that re-running the build never changes an entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shared::models::{Constant, FieldSig};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstantTable {
    /// class name → (field signature → constant)
    by_class: BTreeMap<String, BTreeMap<String, Constant>>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a constant; returns false when the field already has one
    pub fn record(&mut self, field: &FieldSig, value: Constant) -> bool {
        let fields = self.by_class.entry(field.class.clone()).or_default();
        let key = field.to_string();
        if fields.contains_key(&key) {
            return false;
        }
        fields.insert(key, value);
        true
    }

    /// Constant of a field signature string
    pub fn get(&self, field: &str) -> Option<&Constant> {
        let class = FieldSig::parse(field).ok()?.class;
        self.by_class.get(&class)?.get(field)
    }

    pub fn get_field(&self, field: &FieldSig) -> Option<&Constant> {
        self.by_class.get(&field.class)?.get(&field.to_string())
    }

    pub fn len(&self) -> usize {
        self.by_class.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
