//! Per-instruction transfer rules
//!
//! `transfer` is pure: it inspects one classified instruction against the
//! current live set and describes what the walk should do. Shapes that do not
//! fit their classification yield "no information" (an empty effect).

use rustc_hash::FxHashMap;

use crate::features::call_graph::ConstantTable;
use crate::features::classification::UnitType;
use crate::shared::constants::idioms;
use crate::shared::models::{
    Constant, FieldSig, Instruction, InvokeExpr, InvokeKind, Local, MethodSig, Stmt, Type, Value,
};

/// Live value id → originating reference
pub type LiveSet = FxHashMap<String, String>;

/// Continuation requested by a transfer rule
#[derive(Debug, Clone, PartialEq)]
pub enum Spawn {
    /// Result of a call is live: follow every `return v` of the callee
    Downward { callee: MethodSig },
    /// A field read reached the walk: follow the field's other writers
    FieldWriters { field: FieldSig },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effect {
    pub retain: bool,
    /// Literal texts attached to the retained line
    pub constants: Vec<String>,
    /// Live id that made the instruction relevant
    pub trigger: Option<String>,
    pub kill: Vec<String>,
    pub gen: Vec<String>,
    pub param_ordinal: Option<usize>,
    pub spawns: Vec<Spawn>,
}

impl Effect {
    fn skip() -> Self {
        Self::default()
    }

    fn retained(trigger: &str) -> Self {
        Self {
            retain: true,
            trigger: Some(trigger.to_string()),
            ..Self::default()
        }
    }

    fn gen_value(&mut self, value: &Value) {
        if let Value::Local(local) = value {
            self.gen.push(local.name.clone());
        }
    }

    fn attach(&mut self, constant: &Constant, slot: &Type) {
        if let Some(text) = constant.text_for(slot) {
            if !self.constants.contains(&text) {
                self.constants.push(text);
            }
        }
    }
}

/// Read-only inputs shared by every rule of one walk
pub struct TransferEnv<'a> {
    pub constants: &'a ConstantTable,
    /// The criterion's seed is itself a field read
    pub seed_field_read: bool,
}

pub fn transfer(instruction: &Instruction, live: &LiveSet, env: &TransferEnv<'_>) -> Effect {
    let Some(unit_type) = instruction.unit_type else {
        return Effect::skip();
    };

    match (unit_type, &instruction.stmt) {
        (t, Stmt::Invoke(expr)) if t.is_invoke() => transfer_invoke(expr, None, live),
        (
            t,
            Stmt::Assign {
                lhs: Value::Local(result),
                rhs: Value::Invoke(expr),
            },
        ) if t.is_assigning_invoke() => transfer_invoke(expr, Some(result), live),

        (UnitType::ParameterIdentity, Stmt::Identity { local, rhs }) => {
            let Value::ParameterRef { index, .. } = rhs else {
                return Effect::skip();
            };
            if !live.contains_key(&local.name) {
                return Effect::skip();
            }
            let mut effect = Effect::retained(&local.name);
            effect.kill.push(local.name.clone());
            effect.param_ordinal = Some(*index);
            effect
        }
        (UnitType::CaughtExceptionIdentity, Stmt::Identity { local, .. }) => {
            if !live.contains_key(&local.name) {
                return Effect::skip();
            }
            let mut effect = Effect::retained(&local.name);
            effect.kill.push(local.name.clone());
            effect
        }

        (t, Stmt::Assign { lhs: Value::Local(dest), rhs }) => {
            if !live.contains_key(&dest.name) {
                return Effect::skip();
            }
            transfer_local_definition(t, dest, rhs, env)
        }

        (UnitType::FieldStoreVariable, Stmt::Assign { lhs, rhs }) => {
            let Some(field) = lhs.field() else {
                return Effect::skip();
            };
            let id = field.to_string();
            if !live.contains_key(&id) {
                return Effect::skip();
            }
            let mut effect = Effect::retained(&id);
            effect.kill.push(id);
            effect.gen_value(rhs);
            effect
        }
        (UnitType::FieldStoreConstant, Stmt::Assign { lhs, rhs }) => {
            let (Some(field), Some(constant)) = (lhs.field(), rhs.as_constant()) else {
                return Effect::skip();
            };
            let id = field.to_string();
            if !live.contains_key(&id) {
                return Effect::skip();
            }
            let mut effect = Effect::retained(&id);
            effect.attach(constant, &field.ty);
            effect.kill.push(id);
            effect
        }

        (
            UnitType::ArrayStoreVariable,
            Stmt::Assign {
                lhs: Value::ArrayRef { base, .. },
                rhs,
            },
        ) => {
            if !live.contains_key(&base.name) {
                return Effect::skip();
            }
            let mut effect = Effect::retained(&base.name);
            effect.gen_value(rhs);
            effect
        }
        (
            UnitType::ArrayStoreConstant,
            Stmt::Assign {
                lhs: Value::ArrayRef { base, .. },
                rhs: Value::Constant(constant),
            },
        ) => {
            if !live.contains_key(&base.name) {
                return Effect::skip();
            }
            let mut effect = Effect::retained(&base.name);
            effect.attach(constant, &element_type(&base.ty));
            effect
        }

        _ => Effect::skip(),
    }
}

/// `dest = rhs` where `dest` is live
fn transfer_local_definition(
    unit_type: UnitType,
    dest: &Local,
    rhs: &Value,
    env: &TransferEnv<'_>,
) -> Effect {
    let mut effect = Effect::retained(&dest.name);
    effect.kill.push(dest.name.clone());

    match (unit_type, rhs) {
        (UnitType::AssignConstant, Value::Constant(constant)) => {
            effect.attach(constant, &dest.ty);
        }
        (UnitType::NewInstance | UnitType::NewException, Value::NewInstance(_))
        | (UnitType::NewArray, Value::NewArray { .. }) => {}
        (UnitType::AssignVariable, Value::Local(source)) => {
            effect.gen.push(source.name.clone());
        }
        (UnitType::Cast, Value::Cast { op, .. })
        | (UnitType::LengthOf, Value::Length(op))
        | (UnitType::InstanceOf, Value::InstanceOf { op, .. }) => match &**op {
            Value::Local(source) => effect.gen.push(source.name.clone()),
            Value::Constant(constant) => effect.attach(constant, &dest.ty),
            _ => {}
        },
        (UnitType::AssignArrayElement, Value::ArrayRef { base, .. }) => {
            effect.gen.push(base.name.clone());
        }
        (UnitType::AssignAdd, Value::BinOp { lhs, rhs, .. }) => {
            for operand in [&**lhs, &**rhs] {
                match operand {
                    Value::Local(source) => effect.gen.push(source.name.clone()),
                    Value::Constant(constant) => effect.attach(constant, &dest.ty),
                    _ => {}
                }
            }
        }
        (UnitType::AssignField, field_ref) => {
            let Some(field) = field_ref.field() else {
                return Effect::skip();
            };
            if let Some(constant) = env.constants.get_field(field) {
                effect.attach(constant, &field.ty);
            }
            effect.gen.push(field.to_string());
            if env.seed_field_read {
                effect.spawns.push(Spawn::FieldWriters {
                    field: field.clone(),
                });
            }
        }
        _ => return Effect::skip(),
    }

    effect
}

fn transfer_invoke(expr: &InvokeExpr, result: Option<&Local>, live: &LiveSet) -> Effect {
    if is_bulk_copy(expr) {
        let dest = expr
            .args
            .get(idioms::BULK_COPY_DEST_ARG)
            .and_then(Value::as_local);
        return match dest {
            Some(dest) if live.contains_key(&dest.name) => {
                let mut effect = Effect::retained(&dest.name);
                if let Some(source) = expr.args.get(idioms::BULK_COPY_SOURCE_ARG) {
                    effect.gen_value(source);
                }
                effect
            }
            _ => Effect::skip(),
        };
    }

    if is_map_insert(expr) {
        if let Some(receiver) = expr.base.as_ref().filter(|b| live.contains_key(&b.name)) {
            let mut effect = Effect::retained(&receiver.name);
            for (i, arg) in expr.args.iter().enumerate() {
                match arg {
                    Value::Local(local) => effect.gen.push(local.name.clone()),
                    Value::Constant(constant) => {
                        let slot = expr.method.param(i).cloned().unwrap_or(Type::Unknown);
                        effect.attach(constant, &slot);
                    }
                    _ => {}
                }
            }
            return effect;
        }
    }

    let result_live = result.filter(|r| live.contains_key(&r.name));
    let trigger = match result_live {
        Some(r) => Some(r.name.clone()),
        None => expr
            .base
            .iter()
            .map(|b| b.name.clone())
            .chain(expr.args.iter().flat_map(Value::used_ids))
            .find(|id| live.contains_key(id)),
    };
    let Some(trigger) = trigger else {
        return Effect::skip();
    };

    let mut effect = Effect::retained(&trigger);
    if let Some(base) = &expr.base {
        effect.gen.push(base.name.clone());
    }
    for (i, arg) in expr.args.iter().enumerate() {
        let slot = expr.method.param(i).cloned().unwrap_or(Type::Unknown);
        match arg {
            Value::Local(local) if slot.is_text_like() || local.ty.is_text_like() => {
                effect.gen.push(local.name.clone())
            }
            Value::Constant(constant) => effect.attach(constant, &slot),
            _ => {}
        }
    }
    if let Some(result) = result_live {
        effect.kill.push(result.name.clone());
        effect.spawns.push(Spawn::Downward {
            callee: expr.method.clone(),
        });
    }
    effect
}

/// `System.arraycopy(src, srcPos, dest, destPos, length)`
pub fn is_bulk_copy(expr: &InvokeExpr) -> bool {
    expr.kind == InvokeKind::Static
        && expr.method.class == idioms::BULK_COPY_CLASS
        && expr.method.name == idioms::BULK_COPY_METHOD
}

/// `Map.put`, `Properties.setProperty` and friends
pub fn is_map_insert(expr: &InvokeExpr) -> bool {
    expr.base.is_some()
        && idioms::MAP_CLASSES.contains(&expr.method.class.as_str())
        && idioms::MAP_INSERT_METHODS.contains(&expr.method.name.as_str())
}

fn element_type(ty: &Type) -> Type {
    match ty {
        Type::Array(elem) => elem.as_ref().clone(),
        _ => Type::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{BinOp, Local};

    fn env(table: &ConstantTable, seed_field_read: bool) -> TransferEnv<'_> {
        TransferEnv {
            constants: table,
            seed_field_read,
        }
    }

    fn live(ids: &[&str]) -> LiveSet {
        ids.iter()
            .map(|id| (id.to_string(), "seed".to_string()))
            .collect()
    }

    fn ins(stmt: Stmt) -> Instruction {
        Instruction::new("<a.B: void m()>", 0, stmt)
    }

    fn string_local(name: &str) -> Local {
        Local::new(name, Type::string())
    }

    #[test]
    fn test_unrelated_instruction_is_skipped() {
        let table = ConstantTable::new();
        let stmt = Stmt::Assign {
            lhs: Value::Local(string_local("r9")),
            rhs: Value::string("x"),
        };
        let effect = transfer(&ins(stmt), &live(&["r1"]), &env(&table, false));
        assert!(!effect.retain);
    }

    #[test]
    fn test_constant_assignment_retires_destination() {
        let table = ConstantTable::new();
        let stmt = Stmt::Assign {
            lhs: Value::Local(string_local("r1")),
            rhs: Value::string("AES/ECB/PKCS5Padding"),
        };
        let effect = transfer(&ins(stmt), &live(&["r1"]), &env(&table, false));
        assert!(effect.retain);
        assert_eq!(effect.kill, vec!["r1".to_string()]);
        assert_eq!(effect.constants, vec!["AES/ECB/PKCS5Padding".to_string()]);
    }

    #[test]
    fn test_assigning_invoke_spawns_downward() {
        let table = ConstantTable::new();
        let sig = MethodSig::new("java.lang.String", Type::bytes(), "getBytes", vec![]);
        let expr = InvokeExpr::virtual_call(string_local("r1"), sig.clone(), vec![]);
        let stmt = Stmt::Assign {
            lhs: Value::local("r2", Type::bytes()),
            rhs: Value::Invoke(expr),
        };
        let effect = transfer(&ins(stmt), &live(&["r2"]), &env(&table, false));
        assert!(effect.retain);
        assert_eq!(effect.kill, vec!["r2".to_string()]);
        assert_eq!(effect.gen, vec!["r1".to_string()]);
        assert_eq!(effect.spawns, vec![Spawn::Downward { callee: sig }]);
    }

    #[test]
    fn test_ordinary_invoke_adds_text_like_args() {
        let table = ConstantTable::new();
        let sig = MethodSig::new(
            "javax.crypto.spec.SecretKeySpec",
            Type::Void,
            "<init>",
            vec![Type::bytes(), Type::string()],
        );
        let receiver = Local::new("r3", Type::object("javax.crypto.spec.SecretKeySpec"));
        let expr = InvokeExpr::special_call(
            receiver,
            sig,
            vec![Value::local("r2", Type::bytes()), Value::string("AES")],
        );
        let effect = transfer(
            &ins(Stmt::Invoke(expr)),
            &live(&["r3"]),
            &env(&table, false),
        );
        assert!(effect.retain);
        assert_eq!(effect.gen, vec!["r3".to_string(), "r2".to_string()]);
        assert_eq!(effect.constants, vec!["AES".to_string()]);
        assert!(effect.spawns.is_empty());
    }

    #[test]
    fn test_bulk_copy_moves_liveness_to_source() {
        let table = ConstantTable::new();
        let sig = MethodSig::new(
            "java.lang.System",
            Type::Void,
            "arraycopy",
            vec![
                Type::object("java.lang.Object"),
                Type::Int,
                Type::object("java.lang.Object"),
                Type::Int,
                Type::Int,
            ],
        );
        let expr = InvokeExpr::static_call(
            sig,
            vec![
                Value::local("r1", Type::bytes()),
                Value::int(0),
                Value::local("r2", Type::bytes()),
                Value::int(0),
                Value::int(16),
            ],
        );
        let stmt = Stmt::Invoke(expr);

        let effect = transfer(&ins(stmt.clone()), &live(&["r2"]), &env(&table, false));
        assert!(effect.retain);
        assert_eq!(effect.gen, vec!["r1".to_string()]);
        assert!(effect.kill.is_empty());
        assert!(effect.constants.is_empty());

        let effect = transfer(&ins(stmt), &live(&["r1"]), &env(&table, false));
        assert!(!effect.retain);
    }

    #[test]
    fn test_map_insert_adds_key_and_value() {
        let table = ConstantTable::new();
        let sig = MethodSig::new(
            "java.util.Properties",
            Type::object("java.lang.Object"),
            "setProperty",
            vec![Type::string(), Type::string()],
        );
        let expr = InvokeExpr::virtual_call(
            Local::new("r5", Type::object("java.util.Properties")),
            sig,
            vec![Value::string("alg"), Value::local("r6", Type::string())],
        );
        let effect = transfer(&ins(Stmt::Invoke(expr)), &live(&["r5"]), &env(&table, false));
        assert!(effect.retain);
        assert_eq!(effect.gen, vec!["r6".to_string()]);
        assert_eq!(effect.constants, vec!["alg".to_string()]);
    }

    #[test]
    fn test_field_read_swaps_to_field_and_spawns_writers() {
        let field = FieldSig::new("com.app.Keys", Type::string(), "SECRET");
        let mut table = ConstantTable::new();
        table.record(&field, Constant::str("hunter2"));
        let stmt = Stmt::Assign {
            lhs: Value::Local(string_local("r1")),
            rhs: Value::StaticField(field.clone()),
        };

        let effect = transfer(&ins(stmt.clone()), &live(&["r1"]), &env(&table, true));
        assert!(effect.retain);
        assert_eq!(effect.gen, vec![field.to_string()]);
        assert_eq!(effect.constants, vec!["hunter2".to_string()]);
        assert_eq!(effect.spawns, vec![Spawn::FieldWriters { field }]);

        let effect = transfer(&ins(stmt), &live(&["r1"]), &env(&table, false));
        assert!(effect.spawns.is_empty());
    }

    #[test]
    fn test_field_store_variable_swaps_to_stored_local() {
        let table = ConstantTable::new();
        let field = FieldSig::new("com.app.Keys", Type::string(), "SECRET");
        let stmt = Stmt::Assign {
            lhs: Value::StaticField(field.clone()),
            rhs: Value::Local(string_local("r4")),
        };
        let id = field.to_string();
        let effect = transfer(&ins(stmt), &live(&[id.as_str()]), &env(&table, false));
        assert!(effect.retain);
        assert_eq!(effect.kill, vec![field.to_string()]);
        assert_eq!(effect.gen, vec!["r4".to_string()]);
    }

    #[test]
    fn test_add_makes_both_operands_live() {
        let table = ConstantTable::new();
        let stmt = Stmt::Assign {
            lhs: Value::local("i2", Type::Int),
            rhs: Value::BinOp {
                op: BinOp::Add,
                lhs: Box::new(Value::local("i0", Type::Int)),
                rhs: Box::new(Value::local("i1", Type::Int)),
            },
        };
        let effect = transfer(&ins(stmt), &live(&["i2"]), &env(&table, false));
        assert_eq!(effect.gen, vec!["i0".to_string(), "i1".to_string()]);
        assert_eq!(effect.kill, vec!["i2".to_string()]);
    }

    #[test]
    fn test_parameter_identity_collects_ordinal() {
        let table = ConstantTable::new();
        let stmt = Stmt::Identity {
            local: string_local("r1"),
            rhs: Value::ParameterRef {
                index: 1,
                ty: Type::string(),
            },
        };
        let effect = transfer(&ins(stmt), &live(&["r1"]), &env(&table, false));
        assert!(effect.retain);
        assert_eq!(effect.param_ordinal, Some(1));
        assert_eq!(effect.kill, vec!["r1".to_string()]);
    }

    #[test]
    fn test_return_is_never_retained() {
        let table = ConstantTable::new();
        let stmt = Stmt::Return(Value::Local(string_local("r1")));
        let effect = transfer(&ins(stmt), &live(&["r1"]), &env(&table, false));
        assert!(!effect.retain);
    }
}
