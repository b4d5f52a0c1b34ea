/*
 * Criterion Generator
 *
 * Turns a user request (caller method, target statement text, kind, selected
 * positions) into root criteria: one per matching instruction of the caller.
 *
 * A request whose selected values have no tracked type (integral, character,
 * text or byte sequence) yields nothing. Call sites resolving to the same
 * argument set are generated once.
 */

use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::features::call_graph::load_body;
use crate::features::classification::UnitType;
use crate::features::ir_provider::ProgramSource;
use crate::features::slicing::domain::{SlicingCriterion, TargetKind};
use crate::shared::models::{Instruction, MethodSig, Signature, Stmt, Value};

pub struct CriterionGenerator<'a> {
    source: &'a dyn ProgramSource,
}

impl<'a> CriterionGenerator<'a> {
    pub fn new(source: &'a dyn ProgramSource) -> Self {
        Self { source }
    }

    pub fn generate(
        &self,
        caller: &str,
        target_statement: &str,
        kind: TargetKind,
        params: &[i32],
    ) -> Vec<SlicingCriterion> {
        let caller_sig = match MethodSig::parse(caller) {
            Ok(sig) => sig,
            Err(err) => {
                warn!(caller, error = %err, "Unparsable caller signature");
                return Vec::new();
            }
        };

        if !tracks_text(&caller_sig, target_statement, kind, params) {
            debug!(target = target_statement, "Target carries no tracked type");
            return Vec::new();
        }

        let body = match load_body(self.source, &caller_sig) {
            Ok(body) => body,
            Err(err) => {
                warn!(caller, error = %err, "Caller body unavailable");
                return Vec::new();
            }
        };

        let caller_name = caller_sig.to_string();
        let len = body.len();
        let mut seen: FxHashSet<Vec<String>> = FxHashSet::default();
        let mut criteria = Vec::new();

        for (rev, instruction) in body.iter().rev().enumerate() {
            if !matches_kind(instruction, kind)
                || !instruction.stmt.to_string().contains(target_statement)
            {
                continue;
            }
            let Some(live) = seed_live_values(instruction, target_statement, kind, params) else {
                continue;
            };
            if !seen.insert(dedup_key(instruction, kind, params, &live)) {
                debug!(index = len - 1 - rev, "Duplicate call site skipped");
                continue;
            }

            let mut criterion =
                SlicingCriterion::new(caller_name.clone(), target_statement, kind, rev)
                    .with_params(params.to_vec());
            criterion.live_values = live;
            criteria.push(criterion);
        }

        debug!(
            caller = %caller_name,
            target = target_statement,
            criteria = criteria.len(),
            "Generated criteria"
        );
        criteria
    }
}

/// Whether any selected value has a tracked type
fn tracks_text(caller: &MethodSig, target: &str, kind: TargetKind, params: &[i32]) -> bool {
    match kind {
        TargetKind::ReturnValue => caller.ret.is_tracked(),
        TargetKind::FieldRead | TargetKind::FieldWrite => match Signature::parse(target) {
            Ok(Signature::Field(field)) => field.ty.is_tracked(),
            _ => true,
        },
        TargetKind::Invocation => match Signature::parse(target) {
            Ok(Signature::Method(method)) if params.is_empty() => method.ret.is_tracked(),
            Ok(Signature::Method(method)) => params.iter().any(|&p| {
                p < 0
                    || method
                        .param(p as usize)
                        .map_or(false, |ty| ty.is_tracked())
            }),
            _ => true,
        },
    }
}

fn matches_kind(instruction: &Instruction, kind: TargetKind) -> bool {
    let Some(unit_type) = instruction.unit_type else {
        return false;
    };
    match kind {
        TargetKind::FieldRead => unit_type == UnitType::AssignField,
        TargetKind::FieldWrite => matches!(
            unit_type,
            UnitType::FieldStoreConstant | UnitType::FieldStoreVariable
        ),
        TargetKind::Invocation => unit_type.is_invoke(),
        TargetKind::ReturnValue => unit_type == UnitType::ReturnValue,
    }
}

/// Live ids at the seed; `None` when the instruction does not fit its kind
fn seed_live_values(
    instruction: &Instruction,
    target: &str,
    kind: TargetKind,
    params: &[i32],
) -> Option<BTreeMap<String, String>> {
    let mut live = BTreeMap::new();
    match (kind, &instruction.stmt) {
        (TargetKind::FieldRead, Stmt::Assign { rhs, .. }) => {
            live.insert(rhs.field()?.to_string(), target.to_string());
        }
        (TargetKind::FieldWrite, Stmt::Assign { rhs, .. }) => {
            if let Value::Local(local) = rhs {
                live.insert(local.name.clone(), target.to_string());
            }
        }
        (TargetKind::Invocation, stmt) => {
            let expr = stmt.invoke_expr()?;
            let positions: Vec<i32> = if params.is_empty() {
                (0..expr.args.len() as i32).collect()
            } else {
                params.to_vec()
            };
            for position in positions {
                if let Some(Value::Local(local)) = expr.operand(position) {
                    live.insert(local.name, format!("{}#{}", target, position));
                }
            }
        }
        (TargetKind::ReturnValue, Stmt::Return(value)) => {
            if let Value::Local(local) = value {
                live.insert(local.name.clone(), "return".to_string());
            }
        }
        _ => return None,
    }
    Some(live)
}

/// Resolved argument set of a seed; constants resolve to their literal text
fn dedup_key(
    instruction: &Instruction,
    kind: TargetKind,
    params: &[i32],
    live: &BTreeMap<String, String>,
) -> Vec<String> {
    match (kind, instruction.stmt.invoke_expr()) {
        (TargetKind::Invocation, Some(expr)) => {
            let positions: Vec<i32> = if params.is_empty() {
                (0..expr.args.len() as i32).collect()
            } else {
                params.to_vec()
            };
            positions
                .into_iter()
                .map(|p| match expr.operand(p) {
                    Some(Value::Constant(c)) => c.literal_text(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                })
                .collect()
        }
        _ => {
            let mut key: Vec<String> = live.keys().cloned().collect();
            key.push(instruction.stmt.to_string());
            key
        }
    }
}
