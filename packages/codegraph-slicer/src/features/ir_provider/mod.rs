//! IR provider boundary
//!
//! - domain/: class, field and method declarations
//! - ports/: `ProgramSource` trait
//! - infrastructure/: in-memory adapter and builders

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{ClassDef, FieldDef, MethodDef};
pub use infrastructure::{BodyBuilder, ClassBuilder, InMemoryProgram};
pub use ports::ProgramSource;
