//! Classified instruction

use serde::{Deserialize, Serialize};
use std::fmt;

use super::stmt::Stmt;
use crate::features::classification::{classify, UnitType};

/// A statement at a fixed program-order index of its method.
///
/// Immutable once materialised; classification happens exactly once here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Signature string of the owning method
    pub method: String,
    /// Program-order index within the method body
    pub index: usize,
    pub stmt: Stmt,
    pub unit_type: Option<UnitType>,
}

impl Instruction {
    pub fn new(method: impl Into<String>, index: usize, stmt: Stmt) -> Self {
        let unit_type = classify(&stmt);
        Self {
            method: method.into(),
            index,
            stmt,
            unit_type,
        }
    }

    pub fn is_classified(&self) -> bool {
        self.unit_type.is_some()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.stmt.fmt(f)
    }
}
