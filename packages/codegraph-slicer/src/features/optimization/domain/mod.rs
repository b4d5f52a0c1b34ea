//! Optimization domain models
//!
//! Values known to the segment interpreter, branch decisions, and the
//! position ranges proven unreachable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::models::{CmpOp, Constant};

/// Value of a local along the straight-line replay of a segment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbsValue {
    Int(i64),
    Str(String),
}

impl AbsValue {
    pub fn from_constant(constant: &Constant) -> Option<Self> {
        match constant {
            Constant::Str(s) => Some(AbsValue::Str(s.clone())),
            other => other.as_int().map(AbsValue::Int),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AbsValue::Int(v) => Some(*v),
            AbsValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AbsValue::Str(s) => Some(s),
            AbsValue::Int(_) => None,
        }
    }
}

impl fmt::Display for AbsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsValue::Int(v) => write!(f, "{}", v),
            AbsValue::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Outcome of evaluating a conditional jump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchDecision {
    Taken,
    NotTaken,
    Unknown,
}

impl BranchDecision {
    /// Compare two known values; strings only decide equality tests
    pub fn evaluate(op: CmpOp, lhs: &AbsValue, rhs: &AbsValue) -> Self {
        let holds = match (lhs, rhs) {
            (AbsValue::Int(a), AbsValue::Int(b)) => op.evaluate(*a, *b),
            (AbsValue::Str(a), AbsValue::Str(b)) => match op {
                CmpOp::Eq => a == b,
                CmpOp::Ne => a != b,
                _ => return BranchDecision::Unknown,
            },
            _ => return BranchDecision::Unknown,
        };
        if holds {
            BranchDecision::Taken
        } else {
            BranchDecision::NotTaken
        }
    }
}

/// Inclusive program-index ranges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeadRanges {
    ranges: Vec<(usize, usize)>,
}

impl DeadRanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `[start, end]`; empty when `end < start`
    pub fn add(&mut self, start: usize, end: usize) {
        if start <= end {
            self.ranges.push((start, end));
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.ranges
            .iter()
            .any(|&(start, end)| start <= index && index <= end)
    }

    pub fn ranges(&self) -> &[(usize, usize)] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_comparison_decides_equality_only() {
        let a = AbsValue::Str("AES".to_string());
        let b = AbsValue::Str("DES".to_string());
        assert_eq!(BranchDecision::evaluate(CmpOp::Ne, &a, &b), BranchDecision::Taken);
        assert_eq!(BranchDecision::evaluate(CmpOp::Eq, &a, &b), BranchDecision::NotTaken);
        assert_eq!(BranchDecision::evaluate(CmpOp::Lt, &a, &b), BranchDecision::Unknown);
        assert_eq!(
            BranchDecision::evaluate(CmpOp::Eq, &a, &AbsValue::Int(1)),
            BranchDecision::Unknown
        );
    }

    #[test]
    fn test_dead_ranges() {
        let mut dead = DeadRanges::new();
        dead.add(3, 5);
        dead.add(9, 8);
        assert!(dead.contains(3) && dead.contains(5));
        assert!(!dead.contains(6));
        assert_eq!(dead.ranges(), &[(3, 5)]);
    }
}
