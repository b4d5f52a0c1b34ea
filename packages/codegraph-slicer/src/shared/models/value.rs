//! Jimple-style values (operands and right-hand sides)

use serde::{Deserialize, Serialize};
use std::fmt;

use super::signature::{FieldSig, MethodSig};
use super::types::Type;

/// Method-local variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Local {
    pub name: String,
    pub ty: Type,
}

impl Local {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for Local {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Literal constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    /// int/short/byte/char/boolean constants share one representation in the IR
    Int(i64),
    Long(i64),
    Float(f64),
    Double(f64),
    Str(String),
    Null,
    Class(String),
}

impl Constant {
    pub fn str(value: impl Into<String>) -> Self {
        Constant::Str(value.into())
    }

    /// Literal payload without quoting (`"AES"` → `AES`)
    pub fn literal_text(&self) -> String {
        match self {
            Constant::Int(v) | Constant::Long(v) => v.to_string(),
            Constant::Float(v) | Constant::Double(v) => v.to_string(),
            Constant::Str(s) => s.clone(),
            Constant::Null => "null".to_string(),
            Constant::Class(name) => name.clone(),
        }
    }

    /// Literal text when the constant flows into a character/text/byte-typed slot
    pub fn text_for(&self, slot: &Type) -> Option<String> {
        match self {
            Constant::Str(s) => Some(s.clone()),
            Constant::Int(v) if slot.is_char() => char::from_u32(*v as u32).map(String::from),
            Constant::Int(v) if matches!(slot, Type::Byte) => Some(v.to_string()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Constant::Int(v) | Constant::Long(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{}", v),
            Constant::Long(v) => write!(f, "{}L", v),
            Constant::Float(v) => write!(f, "{:?}F", v),
            Constant::Double(v) => write!(f, "{:?}", v),
            Constant::Str(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Constant::Null => f.write_str("null"),
            Constant::Class(name) => write!(f, "class \"{}\"", name),
        }
    }
}

/// Invocation dispatch kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvokeKind {
    Virtual,
    Static,
    Interface,
    Special,
}

impl InvokeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvokeKind::Virtual => "virtualinvoke",
            InvokeKind::Static => "staticinvoke",
            InvokeKind::Interface => "interfaceinvoke",
            InvokeKind::Special => "specialinvoke",
        }
    }
}

/// Invocation expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeExpr {
    pub kind: InvokeKind,
    /// Receiver; `None` for static calls
    pub base: Option<Local>,
    pub method: MethodSig,
    pub args: Vec<Value>,
}

impl InvokeExpr {
    pub fn virtual_call(base: Local, method: MethodSig, args: Vec<Value>) -> Self {
        Self {
            kind: InvokeKind::Virtual,
            base: Some(base),
            method,
            args,
        }
    }

    pub fn interface_call(base: Local, method: MethodSig, args: Vec<Value>) -> Self {
        Self {
            kind: InvokeKind::Interface,
            base: Some(base),
            method,
            args,
        }
    }

    pub fn special_call(base: Local, method: MethodSig, args: Vec<Value>) -> Self {
        Self {
            kind: InvokeKind::Special,
            base: Some(base),
            method,
            args,
        }
    }

    pub fn static_call(method: MethodSig, args: Vec<Value>) -> Self {
        Self {
            kind: InvokeKind::Static,
            base: None,
            method,
            args,
        }
    }

    /// Argument at `position`; `-1` names the receiver
    pub fn operand(&self, position: i32) -> Option<Value> {
        if position < 0 {
            return self.base.clone().map(Value::Local);
        }
        self.args.get(position as usize).cloned()
    }

    /// Declared type of the operand at `position`
    pub fn operand_type(&self, position: i32) -> Option<Type> {
        if position < 0 {
            return self.base.as_ref().map(|b| b.ty.clone());
        }
        self.method.param(position as usize).cloned()
    }

    fn collect_ids(&self, out: &mut Vec<String>) {
        if let Some(base) = &self.base {
            out.push(base.name.clone());
        }
        for arg in &self.args {
            arg.collect_ids(out);
        }
    }
}

impl fmt::Display for InvokeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self
            .args
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        match &self.base {
            Some(base) => write!(f, "{} {}.{}({})", self.kind.as_str(), base, self.method, args),
            None => write!(f, "{} {}({})", self.kind.as_str(), self.method, args),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Ushr,
    Cmp,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Xor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::Ushr => ">>>",
            BinOp::Cmp => "cmp",
        }
    }
}

/// Operand or right-hand side of a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Local(Local),
    Constant(Constant),
    InstanceField { base: Local, field: FieldSig },
    StaticField(FieldSig),
    ArrayRef { base: Local, index: Box<Value> },
    Invoke(InvokeExpr),
    NewInstance(Type),
    NewArray { elem: Type, size: Box<Value> },
    Cast { ty: Type, op: Box<Value> },
    Length(Box<Value>),
    InstanceOf { op: Box<Value>, ty: Type },
    BinOp { op: BinOp, lhs: Box<Value>, rhs: Box<Value> },
    ParameterRef { index: usize, ty: Type },
    ThisRef(Type),
    CaughtException,
}

impl Value {
    pub fn local(name: impl Into<String>, ty: Type) -> Self {
        Value::Local(Local::new(name, ty))
    }

    pub fn int(v: i64) -> Self {
        Value::Constant(Constant::Int(v))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::Constant(Constant::Str(s.into()))
    }

    pub fn null() -> Self {
        Value::Constant(Constant::Null)
    }

    pub fn as_local(&self) -> Option<&Local> {
        match self {
            Value::Local(local) => Some(local),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Value::Constant(c) => Some(c),
            _ => None,
        }
    }

    /// Field accessed by this value, if it is a field reference
    pub fn field(&self) -> Option<&FieldSig> {
        match self {
            Value::InstanceField { field, .. } | Value::StaticField(field) => Some(field),
            _ => None,
        }
    }

    /// Value identifiers read when this value is evaluated
    pub fn used_ids(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_ids(&mut out);
        out
    }

    pub(crate) fn collect_ids(&self, out: &mut Vec<String>) {
        match self {
            Value::Local(local) => out.push(local.name.clone()),
            Value::InstanceField { base, field } => {
                out.push(base.name.clone());
                out.push(field.to_string());
            }
            Value::StaticField(field) => out.push(field.to_string()),
            Value::ArrayRef { base, index } => {
                out.push(base.name.clone());
                index.collect_ids(out);
            }
            Value::Invoke(expr) => expr.collect_ids(out),
            Value::NewArray { size, .. } => size.collect_ids(out),
            Value::Cast { op, .. } | Value::Length(op) | Value::InstanceOf { op, .. } => {
                op.collect_ids(out)
            }
            Value::BinOp { lhs, rhs, .. } => {
                lhs.collect_ids(out);
                rhs.collect_ids(out);
            }
            Value::Constant(_)
            | Value::NewInstance(_)
            | Value::ParameterRef { .. }
            | Value::ThisRef(_)
            | Value::CaughtException => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Local(local) => local.fmt(f),
            Value::Constant(c) => c.fmt(f),
            Value::InstanceField { base, field } => write!(f, "{}.{}", base, field),
            Value::StaticField(field) => field.fmt(f),
            Value::ArrayRef { base, index } => write!(f, "{}[{}]", base, index),
            Value::Invoke(expr) => expr.fmt(f),
            Value::NewInstance(ty) => write!(f, "new {}", ty),
            Value::NewArray { elem, size } => write!(f, "newarray ({})[{}]", elem, size),
            Value::Cast { ty, op } => write!(f, "({}) {}", ty, op),
            Value::Length(op) => write!(f, "lengthof {}", op),
            Value::InstanceOf { op, ty } => write!(f, "{} instanceof {}", op, ty),
            Value::BinOp { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op.symbol(), rhs),
            Value::ParameterRef { index, ty } => write!(f, "@parameter{}: {}", index, ty),
            Value::ThisRef(ty) => write!(f, "@this: {}", ty),
            Value::CaughtException => f.write_str("@caughtexception"),
        }
    }
}

impl From<Local> for Value {
    fn from(local: Local) -> Self {
        Value::Local(local)
    }
}

impl From<Constant> for Value {
    fn from(c: Constant) -> Self {
        Value::Constant(c)
    }
}
