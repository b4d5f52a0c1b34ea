//! Segment interpreter
//!
//! Replays one method body once in program order, tracking integer and string
//! constants in locals. Conditional jumps whose operands are known decide a
//! dead range; undecided jumps and loop bodies make the positions they cover
//! uncertain, and any assignment at an uncertain position forgets its local.

use rustc_hash::FxHashMap;

use crate::features::call_graph::MethodBranches;
use crate::features::optimization::domain::{AbsValue, BranchDecision, DeadRanges};
use crate::shared::models::{BinOp, Condition, Instruction, Stmt, Value};

/// Arguments passed to a callee; `None` where unknown
pub type CallArgs = Vec<Option<AbsValue>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentOutcome {
    pub dead: DeadRanges,
    /// Arguments at the first reachable call of the requested callee
    pub call_args: Option<CallArgs>,
}

pub struct SegmentInterpreter<'a> {
    body: &'a [Instruction],
    branches: MethodBranches,
}

impl<'a> SegmentInterpreter<'a> {
    pub fn new(body: &'a [Instruction]) -> Self {
        Self {
            body,
            branches: MethodBranches::from_body(body),
        }
    }

    /// Replay the body with `params` bound to parameter identities.
    ///
    /// `callee` names a method whose call arguments should be captured.
    pub fn run(&self, params: &[Option<AbsValue>], callee: Option<&str>) -> SegmentOutcome {
        let mut frame: FxHashMap<String, AbsValue> = FxHashMap::default();
        let mut dead = DeadRanges::new();
        let mut uncertain = DeadRanges::new();
        let mut call_args = None;

        for (index, instruction) in self.body.iter().enumerate() {
            if dead.contains(index) {
                continue;
            }
            let certain = !uncertain.contains(index) && !self.branches.in_loop(index);

            if call_args.is_none() {
                if let (Some(callee), Some(expr)) = (callee, instruction.stmt.invoke_expr()) {
                    if expr.method.to_string() == callee {
                        call_args = Some(expr.args.iter().map(|a| resolve(&frame, a)).collect());
                    }
                }
            }

            match &instruction.stmt {
                Stmt::Identity {
                    local,
                    rhs: Value::ParameterRef { index: ordinal, .. },
                } => match params.get(*ordinal).cloned().flatten() {
                    Some(value) if certain => {
                        frame.insert(local.name.clone(), value);
                    }
                    _ => {
                        frame.remove(&local.name);
                    }
                },
                Stmt::Identity { local, .. } => {
                    frame.remove(&local.name);
                }
                Stmt::Assign {
                    lhs: Value::Local(local),
                    rhs,
                } => match evaluate(&frame, rhs) {
                    Some(value) if certain => {
                        frame.insert(local.name.clone(), value);
                    }
                    _ => {
                        frame.remove(&local.name);
                    }
                },
                Stmt::If { cond, target } if *target > index && certain => {
                    self.decide(index, *target, condition(&frame, cond), &mut dead, &mut uncertain);
                }
                Stmt::If { target, .. } if *target > index => {
                    self.decide(index, *target, BranchDecision::Unknown, &mut dead, &mut uncertain);
                }
                _ => {}
            }
        }

        SegmentOutcome { dead, call_args }
    }

    fn decide(
        &self,
        index: usize,
        target: usize,
        decision: BranchDecision,
        dead: &mut DeadRanges,
        uncertain: &mut DeadRanges,
    ) {
        let else_arm = self.else_arm(index, target);
        match decision {
            BranchDecision::Taken => dead.add(index + 1, target - 1),
            BranchDecision::NotTaken => {
                if let Some((start, end)) = else_arm {
                    dead.add(start, end);
                }
            }
            BranchDecision::Unknown => {
                uncertain.add(index + 1, target - 1);
                if let Some((start, end)) = else_arm {
                    uncertain.add(start, end);
                }
            }
        }
    }

    /// `[target, j - 1]` when the fall-through arm ends in a forward `goto j`
    fn else_arm(&self, index: usize, target: usize) -> Option<(usize, usize)> {
        if target <= index + 1 {
            return None;
        }
        match self.body.get(target - 1).map(|i| &i.stmt) {
            Some(Stmt::Goto { target: join }) if *join > target => Some((target, join - 1)),
            _ => None,
        }
    }
}

fn resolve(frame: &FxHashMap<String, AbsValue>, value: &Value) -> Option<AbsValue> {
    match value {
        Value::Local(local) => frame.get(&local.name).cloned(),
        Value::Constant(constant) => AbsValue::from_constant(constant),
        _ => None,
    }
}

fn evaluate(frame: &FxHashMap<String, AbsValue>, value: &Value) -> Option<AbsValue> {
    match value {
        Value::BinOp {
            op: BinOp::Add,
            lhs,
            rhs,
        } => {
            let a = resolve(frame, lhs)?.as_int()?;
            let b = resolve(frame, rhs)?.as_int()?;
            a.checked_add(b).map(AbsValue::Int)
        }
        other => resolve(frame, other),
    }
}

fn condition(frame: &FxHashMap<String, AbsValue>, cond: &Condition) -> BranchDecision {
    match (resolve(frame, &cond.lhs), resolve(frame, &cond.rhs)) {
        (Some(lhs), Some(rhs)) => BranchDecision::evaluate(cond.op, &lhs, &rhs),
        _ => BranchDecision::Unknown,
    }
}
