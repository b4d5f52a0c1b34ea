//! Method and field signatures
//!
//! Signatures are the symbolic identifiers of call-graph nodes. Their textual form
//! (`<class: ret name(params)>` / `<class: type name>`) is also what slicing targets
//! are matched against, so `Display` and `parse` must stay inverse to each other.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::types::Type;
use crate::errors::{Result, SlicerError};

static METHOD_SIG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<([^:<>\s]+): (\S+) ([^\s(]+)\(([^)]*)\)>$").expect("valid method regex")
});

static FIELD_SIG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<([^:<>\s]+): (\S+) ([^\s()<>]+)>$").expect("valid field regex"));

/// Method signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSig {
    pub class: String,
    pub ret: Type,
    pub name: String,
    pub params: Vec<Type>,
}

impl MethodSig {
    pub fn new(
        class: impl Into<String>,
        ret: Type,
        name: impl Into<String>,
        params: Vec<Type>,
    ) -> Self {
        Self {
            class: class.into(),
            ret,
            name: name.into(),
            params,
        }
    }

    pub fn is_static_initializer(&self) -> bool {
        self.name == "<clinit>"
    }

    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }

    /// Declared type of parameter `index`
    pub fn param(&self, index: usize) -> Option<&Type> {
        self.params.get(index)
    }

    /// `ret name(params)` without the declaring class
    pub fn sub_signature(&self) -> String {
        format!("{} {}({})", self.ret, self.name, join_types(&self.params))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let caps = METHOD_SIG
            .captures(text.trim())
            .ok_or_else(|| SlicerError::InvalidSignature(text.to_string()))?;
        let params = caps[4]
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Type::parse)
            .collect();
        Ok(Self::new(&caps[1], Type::parse(&caps[2]), &caps[3], params))
    }
}

impl fmt::Display for MethodSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {}>", self.class, self.sub_signature())
    }
}

impl FromStr for MethodSig {
    type Err = SlicerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Field signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSig {
    pub class: String,
    pub ty: Type,
    pub name: String,
}

impl FieldSig {
    pub fn new(class: impl Into<String>, ty: Type, name: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ty,
            name: name.into(),
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let caps = FIELD_SIG
            .captures(text.trim())
            .ok_or_else(|| SlicerError::InvalidSignature(text.to_string()))?;
        Ok(Self::new(&caps[1], Type::parse(&caps[2]), &caps[3]))
    }
}

impl fmt::Display for FieldSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {} {}>", self.class, self.ty, self.name)
    }
}

impl FromStr for FieldSig {
    type Err = SlicerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Either kind of symbol a slicing target can name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Signature {
    Method(MethodSig),
    Field(FieldSig),
}

impl Signature {
    pub fn parse(text: &str) -> Result<Self> {
        if let Ok(method) = MethodSig::parse(text) {
            return Ok(Signature::Method(method));
        }
        FieldSig::parse(text).map(Signature::Field)
    }

    pub fn declaring_class(&self) -> &str {
        match self {
            Signature::Method(m) => &m.class,
            Signature::Field(f) => &f.class,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signature::Method(m) => m.fmt(f),
            Signature::Field(field) => field.fmt(f),
        }
    }
}

fn join_types(types: &[Type]) -> String {
    types
        .iter()
        .map(Type::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
