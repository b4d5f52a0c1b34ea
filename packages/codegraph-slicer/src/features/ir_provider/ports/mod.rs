//! IR Provider Port
//!
//! The slicer never parses bytecode itself. Whatever loads the program (archive
//! reader, decompiler bridge, in-memory fixture) implements `ProgramSource`.

use std::sync::Arc;

use crate::errors::Result;
use crate::features::ir_provider::domain::ClassDef;
use crate::shared::models::{Instruction, MethodSig};

// ═══════════════════════════════════════════════════════════════════════════
// Program Source Port
// ═══════════════════════════════════════════════════════════════════════════

/// Source of classes and materialised method bodies
///
/// # Implementors
/// - `InMemoryProgram` (infrastructure/in_memory.rs)
pub trait ProgramSource: Send + Sync {
    /// All loaded (non-phantom) classes, in a stable order
    fn classes(&self) -> Vec<Arc<ClassDef>>;

    /// Class by fully qualified name; may be a phantom
    fn class(&self, name: &str) -> Option<Arc<ClassDef>>;

    /// Instructions of a concrete method in program order.
    ///
    /// Fails with `UnresolvedReference` for unknown, phantom or bodiless methods.
    fn method_body(&self, method: &MethodSig) -> Result<Arc<[Instruction]>>;

    /// Whether the class is available with bodies
    fn is_loaded(&self, class: &str) -> bool {
        self.class(class).map_or(false, |c| !c.is_phantom)
    }
}
