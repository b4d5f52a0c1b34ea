//! Program structure as exposed by the IR provider

use serde::{Deserialize, Serialize};

use crate::shared::models::{Constant, FieldSig, MethodSig};

/// Declared field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub sig: FieldSig,
    pub is_static: bool,
    pub is_final: bool,
    /// Compile-time constant tag (`ConstantValue` attribute)
    pub constant_value: Option<Constant>,
    /// Constant of an enum type
    pub is_enum_constant: bool,
}

impl FieldDef {
    pub fn instance(sig: FieldSig) -> Self {
        Self {
            sig,
            is_static: false,
            is_final: false,
            constant_value: None,
            is_enum_constant: false,
        }
    }

    /// `static final` field with a constant tag
    pub fn constant(sig: FieldSig, value: Constant) -> Self {
        Self {
            sig,
            is_static: true,
            is_final: true,
            constant_value: Some(value),
            is_enum_constant: false,
        }
    }

    pub fn is_static_final_constant(&self) -> bool {
        self.is_static && self.is_final && self.constant_value.is_some()
    }
}

/// Declared method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDef {
    pub sig: MethodSig,
    /// Has a body (not abstract/native)
    pub is_concrete: bool,
}

/// Declared class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    pub super_class: Option<String>,
    pub is_enum: bool,
    /// Referenced but not available to the provider
    pub is_phantom: bool,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_class: None,
            is_enum: false,
            is_phantom: false,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn phantom(name: impl Into<String>) -> Self {
        Self {
            is_phantom: true,
            ..Self::new(name)
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.sig.name == name)
    }

    pub fn method(&self, sig: &MethodSig) -> Option<&MethodDef> {
        self.methods.iter().find(|m| &m.sig == sig)
    }

    pub fn concrete_methods(&self) -> impl Iterator<Item = &MethodDef> {
        self.methods.iter().filter(|m| m.is_concrete)
    }

    pub fn static_initializer(&self) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.sig.is_static_initializer())
    }
}
