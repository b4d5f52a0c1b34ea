//! Test data builders
//!
//! Short constructors for the IR shapes the fixtures repeat.

use codegraph_slicer::shared::models::{
    CmpOp, Condition, Constant, InvokeExpr, Local, MethodSig, Type, Value,
};

pub const STRING: &str = "java.lang.String";
pub const CIPHER: &str = "javax.crypto.Cipher";

pub fn string_ty() -> Type {
    Type::string()
}

/// `<class: ret name(params)>`
pub fn method(class: &str, ret: Type, name: &str, params: Vec<Type>) -> MethodSig {
    MethodSig::new(class, ret, name, params)
}

/// `static void name(String)` on `class`
pub fn string_sink(class: &str, name: &str) -> MethodSig {
    method(class, Type::Void, name, vec![string_ty()])
}

pub fn cipher_get_instance() -> MethodSig {
    method(CIPHER, Type::object(CIPHER), "getInstance", vec![string_ty()])
}

pub fn cipher_do_final() -> MethodSig {
    method(CIPHER, Type::bytes(), "doFinal", vec![Type::bytes()])
}

pub fn string_get_bytes() -> MethodSig {
    method(STRING, Type::bytes(), "getBytes", vec![])
}

pub fn string_replace() -> MethodSig {
    method(STRING, string_ty(), "replace", vec![Type::Char, Type::Char])
}

pub fn str_local(name: &str) -> Value {
    Value::local(name, string_ty())
}

pub fn int_local(name: &str) -> Value {
    Value::local(name, Type::Int)
}

pub fn static_call(sig: MethodSig, args: Vec<Value>) -> InvokeExpr {
    InvokeExpr::static_call(sig, args)
}

pub fn virtual_call(receiver: &str, ty: Type, sig: MethodSig, args: Vec<Value>) -> InvokeExpr {
    InvokeExpr::virtual_call(Local::new(receiver, ty), sig, args)
}

pub fn text(value: &str) -> Constant {
    Constant::str(value)
}

pub fn int_cmp(name: &str, op: CmpOp, value: i64) -> Condition {
    Condition::new(int_local(name), op, Value::int(value))
}
