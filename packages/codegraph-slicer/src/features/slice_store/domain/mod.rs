//! Slice store domain: the predicate language

pub mod predicate;

pub use predicate::{matches_all, FieldPath, Predicate};
