//! Three-address statements as delivered by the IR provider
//!
//! Branch targets are program-order indices into the owning method's
//! instruction list.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::{InvokeExpr, Local, Value};

/// Binary comparison operators of conditional branches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    Ne,
    Ge,
    Gt,
    Lt,
    Le,
}

impl CmpOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Ge => ">=",
            CmpOp::Gt => ">",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
        }
    }

    /// Numeric comparison semantics
    pub fn evaluate(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
        }
    }
}

/// `lhs op rhs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub op: CmpOp,
    pub lhs: Value,
    pub rhs: Value,
}

impl Condition {
    pub fn new(lhs: Value, op: CmpOp, rhs: Value) -> Self {
        Self { op, lhs, rhs }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op.symbol(), self.rhs)
    }
}

/// Statement shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Assign { lhs: Value, rhs: Value },
    Identity { local: Local, rhs: Value },
    Invoke(InvokeExpr),
    If { cond: Condition, target: usize },
    Goto { target: usize },
    Switch { key: Value, cases: Vec<(i64, usize)>, default: usize },
    Return(Value),
    ReturnVoid,
    Throw(Value),
    Nop,
}

impl Stmt {
    /// Invocation carried by this statement (plain or assigning)
    pub fn invoke_expr(&self) -> Option<&InvokeExpr> {
        match self {
            Stmt::Invoke(expr) => Some(expr),
            Stmt::Assign {
                rhs: Value::Invoke(expr),
                ..
            } => Some(expr),
            _ => None,
        }
    }

    /// Local written by an assignment or identity statement
    pub fn assigned_local(&self) -> Option<&Local> {
        match self {
            Stmt::Assign {
                lhs: Value::Local(local),
                ..
            } => Some(local),
            Stmt::Identity { local, .. } => Some(local),
            _ => None,
        }
    }

    /// Value identifiers defined by this statement.
    ///
    /// Field stores define the field signature; array stores define the array local.
    pub fn defs(&self) -> Vec<String> {
        match self {
            Stmt::Assign { lhs, .. } => match lhs {
                Value::Local(local) => vec![local.name.clone()],
                Value::InstanceField { field, .. } | Value::StaticField(field) => {
                    vec![field.to_string()]
                }
                Value::ArrayRef { base, .. } => vec![base.name.clone()],
                _ => Vec::new(),
            },
            Stmt::Identity { local, .. } => vec![local.name.clone()],
            _ => Vec::new(),
        }
    }

    /// Value identifiers read by this statement
    pub fn uses(&self) -> Vec<String> {
        let mut out = Vec::new();
        match self {
            Stmt::Assign { lhs, rhs } => {
                match lhs {
                    Value::ArrayRef { index, .. } => index.collect_ids(&mut out),
                    Value::InstanceField { base, .. } => out.push(base.name.clone()),
                    _ => {}
                }
                rhs.collect_ids(&mut out);
            }
            Stmt::Invoke(expr) => Value::Invoke(expr.clone()).collect_ids(&mut out),
            Stmt::If { cond, .. } => {
                cond.lhs.collect_ids(&mut out);
                cond.rhs.collect_ids(&mut out);
            }
            Stmt::Switch { key, .. } => key.collect_ids(&mut out),
            Stmt::Return(v) | Stmt::Throw(v) => v.collect_ids(&mut out),
            Stmt::Identity { .. } | Stmt::Goto { .. } | Stmt::ReturnVoid | Stmt::Nop => {}
        }
        out
    }

    /// Program-order indices this statement may jump to
    pub fn branch_targets(&self) -> Vec<usize> {
        match self {
            Stmt::If { target, .. } | Stmt::Goto { target } => vec![*target],
            Stmt::Switch { cases, default, .. } => {
                let mut targets: Vec<usize> = cases.iter().map(|(_, t)| *t).collect();
                targets.push(*default);
                targets
            }
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Assign { lhs, rhs } => write!(f, "{} = {}", lhs, rhs),
            Stmt::Identity { local, rhs } => write!(f, "{} := {}", local, rhs),
            Stmt::Invoke(expr) => expr.fmt(f),
            Stmt::If { cond, target } => write!(f, "if {} goto {}", cond, target),
            Stmt::Goto { target } => write!(f, "goto {}", target),
            Stmt::Switch {
                key,
                cases,
                default,
            } => {
                write!(f, "lookupswitch({}) {{ ", key)?;
                for (value, target) in cases {
                    write!(f, "case {}: goto {}; ", value, target)?;
                }
                write!(f, "default: goto {}; }}", default)
            }
            Stmt::Return(v) => write!(f, "return {}", v),
            Stmt::ReturnVoid => f.write_str("return"),
            Stmt::Throw(v) => write!(f, "throw {}", v),
            Stmt::Nop => f.write_str("nop"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{FieldSig, Type};

    #[test]
    fn test_field_store_defs_field() {
        let field = FieldSig::new("com.app.Config", Type::string(), "ALG");
        let stmt = Stmt::Assign {
            lhs: Value::StaticField(field.clone()),
            rhs: Value::local("r1", Type::string()),
        };
        assert_eq!(stmt.defs(), vec![field.to_string()]);
        assert_eq!(stmt.uses(), vec!["r1".to_string()]);
        assert_eq!(
            stmt.to_string(),
            "<com.app.Config: java.lang.String ALG> = r1"
        );
    }

    #[test]
    fn test_if_display_and_targets() {
        let stmt = Stmt::If {
            cond: Condition::new(Value::local("i0", Type::Int), CmpOp::Ge, Value::int(3)),
            target: 7,
        };
        assert_eq!(stmt.to_string(), "if i0 >= 3 goto 7");
        assert_eq!(stmt.branch_targets(), vec![7]);
        assert_eq!(stmt.uses(), vec!["i0".to_string()]);
    }

    #[test]
    fn test_cmp_op_semantics() {
        assert!(CmpOp::Ge.evaluate(5, 3));
        assert!(!CmpOp::Lt.evaluate(5, 3));
        assert!(CmpOp::Le.evaluate(3, 3));
        assert!(CmpOp::Ne.evaluate(1, 2));
    }
}
