//! Slice store
//!
//! - domain/: predicate language
//! - ports/: `SliceStore` trait
//! - infrastructure/: in-memory document store

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{FieldPath, Predicate};
pub use infrastructure::InMemorySliceStore;
pub use ports::SliceStore;
