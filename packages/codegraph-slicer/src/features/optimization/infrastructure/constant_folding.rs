//! String constant folding
//!
//! Tracks string constants held by locals along a merged slice and rewrites
//! `x = y.replace(c1, c2)` into `x = "<result>"` when `y` and both characters
//! are known. Lines are matched back to their instructions through the body
//! cache, so folding an already folded slice changes nothing.

use ahash::AHashMap;
use tracing::trace;

use crate::features::ir_provider::ProgramSource;
use crate::features::optimization::infrastructure::bodies::BodyCache;
use crate::features::slicing::domain::ContentLine;
use crate::shared::constants::{idioms, types};
use crate::shared::models::{Constant, InvokeExpr, Local, Stmt, Type, Value};

pub struct ConstantFolder<'a> {
    bodies: BodyCache<'a>,
}

impl<'a> ConstantFolder<'a> {
    pub fn new(source: &'a dyn ProgramSource) -> Self {
        Self {
            bodies: BodyCache::new(source),
        }
    }

    /// Fold `lines` in place; returns the number of lines whose text changed
    pub fn fold(&mut self, lines: &mut [ContentLine]) -> usize {
        // (method, local) → known string
        let mut strings: AHashMap<(String, String), String> = AHashMap::new();
        let mut folded = 0;

        for line in lines.iter_mut() {
            let Some(instruction) = self.bodies.instruction(&line.caller_name, line.source_index)
            else {
                continue;
            };
            let Stmt::Assign {
                lhs: Value::Local(dest),
                rhs,
            } = &instruction.stmt
            else {
                continue;
            };
            let key = (line.caller_name.clone(), dest.name.clone());

            let known = match rhs {
                Value::Constant(Constant::Str(s)) => Some(s.clone()),
                Value::Local(source) => strings
                    .get(&(line.caller_name.clone(), source.name.clone()))
                    .cloned(),
                Value::Invoke(expr) => {
                    let result = fold_replace(expr, &line.caller_name, &strings);
                    if let Some(result) = &result {
                        if rewrite(line, dest, result) {
                            trace!(line = %line.unit_string, "Folded replace call");
                            folded += 1;
                        }
                    }
                    result
                }
                _ => None,
            };

            match known {
                Some(value) => {
                    strings.insert(key, value);
                }
                None => {
                    strings.remove(&key);
                }
            }
        }

        folded
    }
}

/// Result of `String.replace(char, char)` on a known receiver
fn fold_replace(
    expr: &InvokeExpr,
    method: &str,
    strings: &AHashMap<(String, String), String>,
) -> Option<String> {
    let sig = &expr.method;
    if sig.class != types::STRING_CLASS
        || sig.name != idioms::REPLACE_METHOD
        || sig.params != [Type::Char, Type::Char]
    {
        return None;
    }
    let receiver = expr.base.as_ref()?;
    let text = strings.get(&(method.to_string(), receiver.name.clone()))?;
    let from = char_arg(expr.args.first()?)?;
    let to = char_arg(expr.args.get(1)?)?;
    Some(text.replace(from, &to.to_string()))
}

fn char_arg(value: &Value) -> Option<char> {
    let code = value.as_constant()?.as_int()?;
    char::from_u32(u32::try_from(code).ok()?)
}

/// Replace the line text, keeping its classification; false when it already
/// reads that way
fn rewrite(line: &mut ContentLine, dest: &Local, result: &str) -> bool {
    let text = format!("{} = {}", dest, Constant::str(result));
    line.constants = Some(vec![result.to_string()]);
    if line.unit_string == text {
        return false;
    }
    line.unit_string = text;
    true
}
