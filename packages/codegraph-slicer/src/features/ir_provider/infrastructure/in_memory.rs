/*
 * In-memory IR provider
 *
 * Holds classes and already-materialised bodies. Used by hosts that lower the
 * bytecode themselves, and by tests/benches through the builders below.
 */

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::{Result, SlicerError};
use crate::features::ir_provider::domain::{ClassDef, FieldDef, MethodDef};
use crate::features::ir_provider::ports::ProgramSource;
use crate::shared::models::{
    Condition, Constant, FieldSig, Instruction, InvokeExpr, Local, MethodSig, Stmt, Type, Value,
};

// ═══════════════════════════════════════════════════════════════════════════
// InMemoryProgram
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Clone)]
pub struct InMemoryProgram {
    classes: BTreeMap<String, Arc<ClassDef>>,
    /// Method signature string → instructions
    bodies: FxHashMap<String, Arc<[Instruction]>>,
}

impl InMemoryProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class and materialise its bodies
    pub fn add_class(&mut self, builder: ClassBuilder) -> &mut Self {
        let (class, bodies) = builder.build();
        for (sig, stmts) in bodies {
            let key = sig.to_string();
            let instructions: Vec<Instruction> = stmts
                .into_iter()
                .enumerate()
                .map(|(index, stmt)| Instruction::new(key.clone(), index, stmt))
                .collect();
            self.bodies.insert(key, instructions.into());
        }
        self.classes.insert(class.name.clone(), Arc::new(class));
        self
    }

    pub fn with_class(mut self, builder: ClassBuilder) -> Self {
        self.add_class(builder);
        self
    }

    /// Register a class that is referenced but unavailable
    pub fn add_phantom(&mut self, name: impl Into<String>) -> &mut Self {
        let class = ClassDef::phantom(name);
        self.classes.insert(class.name.clone(), Arc::new(class));
        self
    }

    pub fn method_count(&self) -> usize {
        self.bodies.len()
    }
}

impl ProgramSource for InMemoryProgram {
    fn classes(&self) -> Vec<Arc<ClassDef>> {
        self.classes
            .values()
            .filter(|c| !c.is_phantom)
            .cloned()
            .collect()
    }

    fn class(&self, name: &str) -> Option<Arc<ClassDef>> {
        self.classes.get(name).cloned()
    }

    fn method_body(&self, method: &MethodSig) -> Result<Arc<[Instruction]>> {
        match self.classes.get(&method.class) {
            None => {
                return Err(SlicerError::unresolved(format!(
                    "class {} is not loaded",
                    method.class
                )))
            }
            Some(class) if class.is_phantom => {
                return Err(SlicerError::unresolved(format!(
                    "class {} is phantom",
                    method.class
                )))
            }
            Some(_) => {}
        }
        self.bodies
            .get(&method.to_string())
            .cloned()
            .ok_or_else(|| SlicerError::unresolved(format!("no body for {}", method)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Builders
// ═══════════════════════════════════════════════════════════════════════════

/// Class under construction
pub struct ClassBuilder {
    class: ClassDef,
    bodies: Vec<(MethodSig, Vec<Stmt>)>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            class: ClassDef::new(name),
            bodies: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.class.name
    }

    pub fn super_class(mut self, name: impl Into<String>) -> Self {
        self.class.super_class = Some(name.into());
        self
    }

    pub fn enum_type(mut self) -> Self {
        self.class.is_enum = true;
        self
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.class.fields.push(field);
        self
    }

    /// Instance field of this class
    pub fn instance_field(self, name: &str, ty: Type) -> Self {
        let sig = FieldSig::new(self.class.name.clone(), ty, name);
        self.field(FieldDef::instance(sig))
    }

    /// `static final` field with a constant tag
    pub fn constant_field(self, name: &str, ty: Type, value: Constant) -> Self {
        let sig = FieldSig::new(self.class.name.clone(), ty, name);
        self.field(FieldDef::constant(sig, value))
    }

    /// Enum constant of this (enum) class
    pub fn enum_constant(self, name: &str) -> Self {
        let ty = Type::object(self.class.name.clone());
        let sig = FieldSig::new(self.class.name.clone(), ty, name);
        self.field(FieldDef {
            sig,
            is_static: true,
            is_final: true,
            constant_value: None,
            is_enum_constant: true,
        })
    }

    /// Concrete method with its body
    pub fn method(mut self, body: BodyBuilder) -> Self {
        let (sig, stmts) = body.build();
        self.class.methods.push(MethodDef {
            sig: sig.clone(),
            is_concrete: true,
        });
        self.bodies.push((sig, stmts));
        self
    }

    /// Abstract or native method
    pub fn abstract_method(mut self, sig: MethodSig) -> Self {
        self.class.methods.push(MethodDef {
            sig,
            is_concrete: false,
        });
        self
    }

    pub fn build(self) -> (ClassDef, Vec<(MethodSig, Vec<Stmt>)>) {
        (self.class, self.bodies)
    }
}

/// Method body under construction; statements get consecutive program indices
pub struct BodyBuilder {
    sig: MethodSig,
    stmts: Vec<Stmt>,
}

impl BodyBuilder {
    pub fn new(sig: MethodSig) -> Self {
        Self {
            sig,
            stmts: Vec::new(),
        }
    }

    pub fn sig(&self) -> &MethodSig {
        &self.sig
    }

    /// Index the next statement will get
    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn stmt(mut self, stmt: Stmt) -> Self {
        self.stmts.push(stmt);
        self
    }

    /// `r0 := @this: C`
    pub fn this(self) -> Self {
        let ty = Type::object(self.sig.class.clone());
        self.stmt(Stmt::Identity {
            local: Local::new("r0", ty.clone()),
            rhs: Value::ThisRef(ty),
        })
    }

    /// `name := @parameterN: T` with T taken from the signature
    pub fn param(self, name: &str, index: usize) -> Self {
        let ty = self.sig.param(index).cloned().unwrap_or(Type::Unknown);
        self.stmt(Stmt::Identity {
            local: Local::new(name, ty.clone()),
            rhs: Value::ParameterRef { index, ty },
        })
    }

    /// `name = constant`
    pub fn constant(self, name: &str, ty: Type, value: Constant) -> Self {
        self.assign(Value::local(name, ty), Value::Constant(value))
    }

    pub fn assign(self, lhs: Value, rhs: Value) -> Self {
        self.stmt(Stmt::Assign { lhs, rhs })
    }

    pub fn invoke(self, expr: InvokeExpr) -> Self {
        self.stmt(Stmt::Invoke(expr))
    }

    /// `name = invoke ...` typed by the callee's return type
    pub fn assign_invoke(self, name: &str, expr: InvokeExpr) -> Self {
        let ty = expr.method.ret.clone();
        self.assign(Value::local(name, ty), Value::Invoke(expr))
    }

    pub fn if_goto(self, cond: Condition, target: usize) -> Self {
        self.stmt(Stmt::If { cond, target })
    }

    pub fn goto(self, target: usize) -> Self {
        self.stmt(Stmt::Goto { target })
    }

    pub fn switch(self, key: Value, cases: Vec<(i64, usize)>, default: usize) -> Self {
        self.stmt(Stmt::Switch {
            key,
            cases,
            default,
        })
    }

    pub fn ret(self, value: Value) -> Self {
        self.stmt(Stmt::Return(value))
    }

    pub fn ret_void(self) -> Self {
        self.stmt(Stmt::ReturnVoid)
    }

    pub fn build(self) -> (MethodSig, Vec<Stmt>) {
        (self.sig, self.stmts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::classification::UnitType;

    fn sig(class: &str, name: &str) -> MethodSig {
        MethodSig::new(class, Type::Void, name, vec![Type::string()])
    }

    #[test]
    fn test_bodies_are_classified_in_order() {
        let m = sig("com.app.Main", "run");
        let mut program = InMemoryProgram::new();
        program.add_class(
            ClassBuilder::new("com.app.Main").method(
                BodyBuilder::new(m.clone())
                    .this()
                    .param("r1", 0)
                    .ret_void(),
            ),
        );

        let body = program.method_body(&m).unwrap();
        assert_eq!(body.len(), 3);
        assert_eq!(body[0].unit_type, None);
        assert_eq!(body[1].unit_type, Some(UnitType::ParameterIdentity));
        assert_eq!(body[2].index, 2);
        assert_eq!(body[2].method, m.to_string());
    }

    #[test]
    fn test_phantom_and_missing_bodies() {
        let mut program = InMemoryProgram::new();
        program.add_phantom("com.lib.Missing");
        program.add_class(
            ClassBuilder::new("com.app.Api").abstract_method(sig("com.app.Api", "call")),
        );

        assert!(!program.is_loaded("com.lib.Missing"));
        assert!(program.is_loaded("com.app.Api"));
        assert_eq!(program.classes().len(), 1);

        let err = program
            .method_body(&sig("com.lib.Missing", "x"))
            .unwrap_err();
        assert!(matches!(err, SlicerError::UnresolvedReference(_)));
        assert!(program.method_body(&sig("com.app.Api", "call")).is_err());
        assert!(program.method_body(&sig("com.app.Nope", "x")).is_err());
    }
}
