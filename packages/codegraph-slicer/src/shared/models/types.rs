//! Bytecode value types
//!
//! Mirrors the JVM type lattice as exposed by the IR provider. Only the predicates
//! used by the slicer are defined here; subtyping is not modelled.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::constants::types::STRING_CLASS;

/// Value type of a local, field, parameter or return slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
    Null,
    /// Reference type by fully qualified class name
    Ref(String),
    Array(Box<Type>),
    /// Type the provider could not resolve (phantom)
    Unknown,
}

impl Type {
    /// `java.lang.String`
    pub fn string() -> Self {
        Type::Ref(STRING_CLASS.to_string())
    }

    pub fn object(class: impl Into<String>) -> Self {
        Type::Ref(class.into())
    }

    pub fn array_of(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    /// `byte[]`
    pub fn bytes() -> Self {
        Type::array_of(Type::Byte)
    }

    pub fn is_integral(&self) -> bool {
        matches!(self, Type::Byte | Type::Short | Type::Int | Type::Long)
    }

    pub fn is_char(&self) -> bool {
        matches!(self, Type::Char)
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, Type::Ref(name) if name == STRING_CLASS)
    }

    pub fn is_byte_sequence(&self) -> bool {
        matches!(self, Type::Array(elem) if **elem == Type::Byte)
    }

    /// Value types the slicer follows: integral, character, textual, byte-sequence
    pub fn is_tracked(&self) -> bool {
        self.is_integral() || self.is_char() || self.is_textual() || self.is_byte_sequence()
    }

    /// Character/text/byte-typed slots whose values are added to the live set
    /// when passed to an ordinary invocation.
    pub fn is_text_like(&self) -> bool {
        match self {
            Type::Char | Type::Byte => true,
            Type::Array(elem) => matches!(**elem, Type::Byte | Type::Char),
            other => other.is_textual(),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Ref(_) | Type::Array(_) | Type::Null)
    }

    /// Class name of a reference type
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Ref(name) => Some(name),
            _ => None,
        }
    }

    /// Parse the Java source form used in signatures (`int`, `byte[]`, `java.lang.String`)
    pub fn parse(text: &str) -> Type {
        let text = text.trim();
        if let Some(elem) = text.strip_suffix("[]") {
            return Type::array_of(Type::parse(elem));
        }
        match text {
            "boolean" => Type::Boolean,
            "byte" => Type::Byte,
            "char" => Type::Char,
            "short" => Type::Short,
            "int" => Type::Int,
            "long" => Type::Long,
            "float" => Type::Float,
            "double" => Type::Double,
            "void" => Type::Void,
            "null_type" => Type::Null,
            "" | "unknown" => Type::Unknown,
            name => Type::Ref(name.to_string()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Boolean => f.write_str("boolean"),
            Type::Byte => f.write_str("byte"),
            Type::Char => f.write_str("char"),
            Type::Short => f.write_str("short"),
            Type::Int => f.write_str("int"),
            Type::Long => f.write_str("long"),
            Type::Float => f.write_str("float"),
            Type::Double => f.write_str("double"),
            Type::Void => f.write_str("void"),
            Type::Null => f.write_str("null_type"),
            Type::Ref(name) => f.write_str(name),
            Type::Array(elem) => write!(f, "{}[]", elem),
            Type::Unknown => f.write_str("unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_types() {
        assert!(Type::Int.is_tracked());
        assert!(Type::Char.is_tracked());
        assert!(Type::string().is_tracked());
        assert!(Type::bytes().is_tracked());
        assert!(!Type::object("javax.crypto.Cipher").is_tracked());
        assert!(!Type::array_of(Type::Int).is_tracked());
        assert!(!Type::Boolean.is_tracked());
    }

    #[test]
    fn test_text_like() {
        assert!(Type::Char.is_text_like());
        assert!(Type::array_of(Type::Char).is_text_like());
        assert!(Type::string().is_text_like());
        assert!(!Type::Int.is_text_like());
    }

    #[test]
    fn test_parse_display() {
        for text in ["int", "byte[]", "java.lang.String", "char[][]", "void"] {
            assert_eq!(Type::parse(text).to_string(), text);
        }
        assert_eq!(Type::parse("byte[]"), Type::bytes());
    }
}
