/*
 * Instruction Classifier
 *
 * Maps a statement to its UnitType by shape alone:
 * - no symbol resolution, no type hierarchy
 * - total: every statement maps to Some(category) or None
 */

use crate::features::classification::domain::UnitType;
use crate::shared::constants::types::THROWABLE_CLASS;
use crate::shared::models::{BinOp, InvokeKind, Stmt, Type, Value};

/// Classify one statement
pub fn classify(stmt: &Stmt) -> Option<UnitType> {
    match stmt {
        Stmt::Invoke(expr) => Some(match expr.kind {
            InvokeKind::Virtual => UnitType::VirtualInvoke,
            InvokeKind::Static => UnitType::StaticInvoke,
            InvokeKind::Interface => UnitType::InterfaceInvoke,
            InvokeKind::Special => UnitType::SpecialInvoke,
        }),
        Stmt::Identity { rhs, .. } => match rhs {
            Value::ParameterRef { .. } => Some(UnitType::ParameterIdentity),
            Value::CaughtException => Some(UnitType::CaughtExceptionIdentity),
            _ => None,
        },
        Stmt::Assign { lhs, rhs } => classify_assignment(lhs, rhs),
        Stmt::If { .. } => Some(UnitType::If),
        Stmt::Goto { .. } => Some(UnitType::Goto),
        Stmt::Switch { .. } => Some(UnitType::Switch),
        Stmt::Return(_) => Some(UnitType::ReturnValue),
        Stmt::ReturnVoid => Some(UnitType::ReturnVoid),
        Stmt::Throw(_) | Stmt::Nop => None,
    }
}

fn classify_assignment(lhs: &Value, rhs: &Value) -> Option<UnitType> {
    match lhs {
        Value::Local(_) => classify_local_definition(rhs),
        Value::ArrayRef { .. } => match rhs {
            Value::Constant(_) => Some(UnitType::ArrayStoreConstant),
            Value::Local(_) => Some(UnitType::ArrayStoreVariable),
            _ => None,
        },
        Value::InstanceField { .. } | Value::StaticField(_) => match rhs {
            Value::Constant(_) => Some(UnitType::FieldStoreConstant),
            Value::Local(_) => Some(UnitType::FieldStoreVariable),
            _ => None,
        },
        _ => None,
    }
}

fn classify_local_definition(rhs: &Value) -> Option<UnitType> {
    match rhs {
        Value::Invoke(expr) => Some(match expr.kind {
            InvokeKind::Virtual => UnitType::AssignVirtualInvoke,
            InvokeKind::Static => UnitType::AssignStaticInvoke,
            InvokeKind::Interface => UnitType::AssignInterfaceInvoke,
            InvokeKind::Special => UnitType::AssignSpecialInvoke,
        }),
        Value::NewInstance(ty) if is_exception_type(ty) => Some(UnitType::NewException),
        Value::NewInstance(_) => Some(UnitType::NewInstance),
        Value::NewArray { .. } => Some(UnitType::NewArray),
        Value::Constant(_) => Some(UnitType::AssignConstant),
        Value::Local(_) => Some(UnitType::AssignVariable),
        Value::ArrayRef { .. } => Some(UnitType::AssignArrayElement),
        Value::InstanceField { .. } | Value::StaticField(_) => Some(UnitType::AssignField),
        Value::BinOp { op: BinOp::Add, .. } => Some(UnitType::AssignAdd),
        Value::Cast { .. } => Some(UnitType::Cast),
        Value::Length(_) => Some(UnitType::LengthOf),
        Value::InstanceOf { .. } => Some(UnitType::InstanceOf),
        _ => None,
    }
}

/// Naming convention for throwables: `*Exception`, `*Error`, `Throwable`
fn is_exception_type(ty: &Type) -> bool {
    let Some(name) = ty.class_name() else {
        return false;
    };
    if name == THROWABLE_CLASS {
        return true;
    }
    let simple = name.rsplit('.').next().unwrap_or(name);
    simple == "Throwable" || simple.ends_with("Exception") || simple.ends_with("Error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{
        CmpOp, Condition, Constant, FieldSig, InvokeExpr, Local, MethodSig,
    };

    fn local(name: &str) -> Value {
        Value::local(name, Type::string())
    }

    fn assign(lhs: Value, rhs: Value) -> Stmt {
        Stmt::Assign { lhs, rhs }
    }

    fn get_instance() -> InvokeExpr {
        InvokeExpr::static_call(
            MethodSig::new(
                "javax.crypto.Cipher",
                Type::object("javax.crypto.Cipher"),
                "getInstance",
                vec![Type::string()],
            ),
            vec![Value::string("AES")],
        )
    }

    #[test]
    fn test_invocations() {
        let expr = get_instance();
        assert_eq!(
            classify(&Stmt::Invoke(expr.clone())),
            Some(UnitType::StaticInvoke)
        );
        assert_eq!(
            classify(&assign(local("r1"), Value::Invoke(expr))),
            Some(UnitType::AssignStaticInvoke)
        );

        let virt = InvokeExpr::virtual_call(
            Local::new("r0", Type::object("a.B")),
            MethodSig::new("a.B", Type::Void, "run", vec![]),
            vec![],
        );
        assert_eq!(classify(&Stmt::Invoke(virt)), Some(UnitType::VirtualInvoke));
    }

    #[test]
    fn test_identities() {
        let param = Stmt::Identity {
            local: Local::new("r1", Type::string()),
            rhs: Value::ParameterRef {
                index: 0,
                ty: Type::string(),
            },
        };
        assert_eq!(classify(&param), Some(UnitType::ParameterIdentity));

        let this = Stmt::Identity {
            local: Local::new("r0", Type::object("a.B")),
            rhs: Value::ThisRef(Type::object("a.B")),
        };
        assert_eq!(classify(&this), None);

        let caught = Stmt::Identity {
            local: Local::new("r9", Type::object("java.lang.Exception")),
            rhs: Value::CaughtException,
        };
        assert_eq!(classify(&caught), Some(UnitType::CaughtExceptionIdentity));
    }

    #[test]
    fn test_allocations() {
        let new_key = assign(
            local("r2"),
            Value::NewInstance(Type::object("javax.crypto.spec.SecretKeySpec")),
        );
        assert_eq!(classify(&new_key), Some(UnitType::NewInstance));

        for exc in [
            "java.lang.IllegalStateException",
            "java.lang.AssertionError",
            "java.lang.Throwable",
        ] {
            let stmt = assign(local("r3"), Value::NewInstance(Type::object(exc)));
            assert_eq!(classify(&stmt), Some(UnitType::NewException), "{}", exc);
        }

        let arr = assign(
            local("r4"),
            Value::NewArray {
                elem: Type::Byte,
                size: Box::new(Value::int(16)),
            },
        );
        assert_eq!(classify(&arr), Some(UnitType::NewArray));
    }

    #[test]
    fn test_assignments() {
        let field = FieldSig::new("com.app.Config", Type::string(), "KEY");
        let base = Local::new("r0", Type::object("com.app.Config"));

        assert_eq!(
            classify(&assign(local("r1"), Value::string("AES"))),
            Some(UnitType::AssignConstant)
        );
        assert_eq!(
            classify(&assign(local("r1"), local("r2"))),
            Some(UnitType::AssignVariable)
        );
        assert_eq!(
            classify(&assign(
                local("r1"),
                Value::ArrayRef {
                    base: base.clone(),
                    index: Box::new(Value::int(0)),
                }
            )),
            Some(UnitType::AssignArrayElement)
        );
        assert_eq!(
            classify(&assign(
                local("r1"),
                Value::InstanceField {
                    base: base.clone(),
                    field: field.clone(),
                }
            )),
            Some(UnitType::AssignField)
        );
        assert_eq!(
            classify(&assign(local("r1"), Value::StaticField(field.clone()))),
            Some(UnitType::AssignField)
        );
        assert_eq!(
            classify(&assign(
                Value::local("i0", Type::Int),
                Value::BinOp {
                    op: BinOp::Add,
                    lhs: Box::new(Value::local("i1", Type::Int)),
                    rhs: Box::new(Value::int(1)),
                }
            )),
            Some(UnitType::AssignAdd)
        );
        assert_eq!(
            classify(&assign(
                Value::local("i0", Type::Int),
                Value::BinOp {
                    op: BinOp::Mul,
                    lhs: Box::new(Value::local("i1", Type::Int)),
                    rhs: Box::new(Value::int(2)),
                }
            )),
            None
        );
    }

    #[test]
    fn test_stores() {
        let field = FieldSig::new("com.app.Config", Type::string(), "KEY");
        let arr = Value::ArrayRef {
            base: Local::new("r5", Type::bytes()),
            index: Box::new(Value::int(0)),
        };

        assert_eq!(
            classify(&assign(arr.clone(), Value::int(7))),
            Some(UnitType::ArrayStoreConstant)
        );
        assert_eq!(
            classify(&assign(arr, Value::local("b0", Type::Byte))),
            Some(UnitType::ArrayStoreVariable)
        );
        assert_eq!(
            classify(&assign(
                Value::StaticField(field.clone()),
                Value::Constant(Constant::str("x"))
            )),
            Some(UnitType::FieldStoreConstant)
        );
        assert_eq!(
            classify(&assign(Value::StaticField(field.clone()), local("r1"))),
            Some(UnitType::FieldStoreVariable)
        );
        // field-to-field copies are not three-address code
        assert_eq!(
            classify(&assign(
                Value::StaticField(field.clone()),
                Value::StaticField(field)
            )),
            None
        );
    }

    #[test]
    fn test_control_flow() {
        let cond = Condition::new(Value::local("i0", Type::Int), CmpOp::Eq, Value::int(0));
        assert_eq!(
            classify(&Stmt::If { cond, target: 4 }),
            Some(UnitType::If)
        );
        assert_eq!(classify(&Stmt::Goto { target: 1 }), Some(UnitType::Goto));
        assert_eq!(
            classify(&Stmt::Switch {
                key: Value::local("i0", Type::Int),
                cases: vec![(1, 3)],
                default: 5,
            }),
            Some(UnitType::Switch)
        );
        assert_eq!(
            classify(&Stmt::Return(local("r1"))),
            Some(UnitType::ReturnValue)
        );
        assert_eq!(classify(&Stmt::ReturnVoid), Some(UnitType::ReturnVoid));
        assert_eq!(classify(&Stmt::Throw(local("r1"))), None);
        assert_eq!(classify(&Stmt::Nop), None);
    }
}
