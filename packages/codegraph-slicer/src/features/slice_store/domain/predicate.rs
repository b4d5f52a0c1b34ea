//! Typed record predicates
//!
//! Conjunctive predicates over JSON documents. Field paths are dotted
//! (`content.unitString`) and fan out over arrays, so a path names every
//! value reachable through it. An absent field never fails evaluation.
//!
//! Textual form (rule-engine boundary):
//! - `field==value`   loose equality (numbers and strings compare by text)
//! - `field!=null`    field present
//! - `field==null`    field absent
//! - `field in text`  substring search through the value, recursively

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::fmt;

use crate::errors::{Result, SlicerError};

static EQUALITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([\w.]+)\s*(==|!=)\s*(.*?)\s*$").expect("valid equality regex")
});

static CONTAINS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([\w.]+)\s+in\s+(.+?)\s*$").expect("valid contains regex"));

// ═══════════════════════════════════════════════════════════════════════════
// FieldPath
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn parse(path: &str) -> Self {
        Self(
            path.split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Every value reachable through the path
    pub fn resolve<'a>(&self, doc: &'a Value) -> Vec<&'a Value> {
        let mut current = vec![doc];
        for segment in &self.0 {
            let mut next = Vec::new();
            for value in current {
                collect_member(value, segment, &mut next);
            }
            if next.is_empty() {
                return next;
            }
            current = next;
        }
        current
    }
}

fn collect_member<'a>(value: &'a Value, segment: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            if let Some(member) = map.get(segment) {
                out.push(member);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_member(item, segment, out);
            }
        }
        _ => {}
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Predicate
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq { path: FieldPath, value: Value },
    Exists(FieldPath),
    Missing(FieldPath),
    Contains { path: FieldPath, needle: String },
}

impl Predicate {
    pub fn eq(path: &str, value: impl Into<Value>) -> Self {
        Predicate::Eq {
            path: FieldPath::parse(path),
            value: value.into(),
        }
    }

    pub fn exists(path: &str) -> Self {
        Predicate::Exists(FieldPath::parse(path))
    }

    pub fn missing(path: &str) -> Self {
        Predicate::Missing(FieldPath::parse(path))
    }

    pub fn contains(path: &str, needle: impl Into<String>) -> Self {
        Predicate::Contains {
            path: FieldPath::parse(path),
            needle: needle.into(),
        }
    }

    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Predicate::Eq { path, value } => path
                .resolve(doc)
                .into_iter()
                .any(|found| loose_eq(found, value)),
            Predicate::Exists(path) => is_present(&path.resolve(doc)),
            Predicate::Missing(path) => !is_present(&path.resolve(doc)),
            Predicate::Contains { path, needle } => path
                .resolve(doc)
                .into_iter()
                .any(|found| contains_text(found, needle)),
        }
    }

    /// Parse the textual predicate form
    pub fn parse(text: &str) -> Result<Self> {
        if let Some(caps) = CONTAINS.captures(text) {
            return Ok(Predicate::contains(&caps[1], unquote(&caps[2])));
        }
        let caps = EQUALITY
            .captures(text)
            .ok_or_else(|| SlicerError::InvalidPredicate(text.to_string()))?;
        let path = &caps[1];
        let raw = &caps[3];
        match (&caps[2], raw) {
            ("!=", "null") => Ok(Predicate::exists(path)),
            ("==", "null") => Ok(Predicate::missing(path)),
            ("==", _) if !raw.is_empty() => Ok(Predicate::eq(path, parse_literal(raw))),
            _ => Err(SlicerError::InvalidPredicate(text.to_string())),
        }
    }

    pub fn parse_all<S: AsRef<str>>(texts: &[S]) -> Result<Vec<Self>> {
        texts.iter().map(|t| Predicate::parse(t.as_ref())).collect()
    }
}

/// True when every predicate holds (the empty conjunction holds)
pub fn matches_all(predicates: &[Predicate], doc: &Value) -> bool {
    predicates.iter().all(|p| p.matches(doc))
}

fn is_present(found: &[&Value]) -> bool {
    found.iter().any(|v| !v.is_null())
}

fn loose_eq(found: &Value, expected: &Value) -> bool {
    if found == expected {
        return true;
    }
    match found {
        Value::Array(items) => items.iter().any(|item| loose_eq(item, expected)),
        Value::Object(_) | Value::Null => false,
        scalar => scalar_text(scalar) == scalar_text(expected),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::Array(items) => items.iter().any(|v| contains_text(v, needle)),
        Value::Object(map) => map.values().any(|v| contains_text(v, needle)),
        Value::Null => false,
        scalar => scalar_text(scalar).map_or(false, |text| text.contains(needle)),
    }
}

fn parse_literal(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn unquote(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "nodeId": "abc",
            "groupId": "root",
            "targetParamNumbers": [0, -1],
            "content": [
                {"unitString": "r1 = \"AES/ECB\"", "unitType": 13, "constants": ["AES/ECB"]},
                {"unitString": "return", "unitType": 29}
            ]
        })
    }

    #[test]
    fn test_equality_and_nested_paths() {
        let doc = doc();
        assert!(Predicate::eq("groupId", "root").matches(&doc));
        assert!(!Predicate::eq("groupId", "other").matches(&doc));
        assert!(Predicate::eq("content.unitType", 29).matches(&doc));
        assert!(Predicate::eq("content.unitType", "13").matches(&doc));
        assert!(Predicate::eq("targetParamNumbers", -1).matches(&doc));
    }

    #[test]
    fn test_existence() {
        let doc = doc();
        assert!(Predicate::exists("nodeId").matches(&doc));
        assert!(Predicate::missing("relatedNodeIds").matches(&doc));
        assert!(Predicate::exists("content.constants").matches(&doc));
        assert!(Predicate::missing("content.nothing.deeper").matches(&doc));
    }

    #[test]
    fn test_contains_is_recursive() {
        let doc = doc();
        assert!(Predicate::contains("content", "ECB").matches(&doc));
        assert!(Predicate::contains("content.constants", "AES").matches(&doc));
        assert!(!Predicate::contains("groupId", "ECB").matches(&doc));
        assert!(!Predicate::contains("absent", "x").matches(&doc));
    }

    #[test]
    fn test_parse_textual_forms() {
        assert_eq!(
            Predicate::parse("nodeId!=null").unwrap(),
            Predicate::exists("nodeId")
        );
        assert_eq!(
            Predicate::parse("nodeId == null").unwrap(),
            Predicate::missing("nodeId")
        );
        assert_eq!(
            Predicate::parse("content.unitType==13").unwrap(),
            Predicate::eq("content.unitType", 13)
        );
        assert_eq!(
            Predicate::parse("groupId==root").unwrap(),
            Predicate::eq("groupId", "root")
        );
        assert_eq!(
            Predicate::parse("content in \"ECB\"").unwrap(),
            Predicate::contains("content", "ECB")
        );
        assert!(Predicate::parse("nodeId ~ x").is_err());
        assert!(Predicate::parse("groupId!=root").is_err());
    }

    #[test]
    fn test_empty_conjunction_matches() {
        assert!(matches_all(&[], &doc()));
    }
}
