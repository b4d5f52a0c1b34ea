/*
 * Call Graph Builder
 *
 * One pass over every accepted class:
 * - static-final constants → ConstantTable (first writer wins)
 * - invocations → CALLS edges (callee node created even when not loaded)
 * - field reads/writes → READS/WRITES edges (declaring class must be loaded)
 * - jumps → BranchTargetTable
 *
 * A method that cannot be materialised is skipped with a warning; the pass
 * never aborts. Processed classes are remembered so a re-run adds nothing.
 */

use rustc_hash::FxHashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::SlicingConfig;
use crate::errors::{Result, SlicerError};
use crate::features::call_graph::domain::{
    BranchTargetTable, ConstantTable, MethodBranches, SymbolKind,
};
use crate::features::call_graph::infrastructure::graph::CallGraph;
use crate::features::ir_provider::{ClassDef, ProgramSource};
use crate::shared::models::{Instruction, MethodSig, Stmt};

// ═══════════════════════════════════════════════════════════════════════════
// Class filter
// ═══════════════════════════════════════════════════════════════════════════

/// Excludes platform namespaces and phantom classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassFilter {
    excluded_prefixes: Vec<String>,
}

impl ClassFilter {
    pub fn new<I, S>(excluded_prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded_prefixes: excluded_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &SlicingConfig) -> Self {
        Self::new(config.excluded_namespaces.iter().cloned())
    }

    /// Filter that only drops phantom classes
    pub fn allow_all() -> Self {
        Self::new(Vec::<String>::new())
    }

    pub fn is_excluded_name(&self, class: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| class.starts_with(prefix.as_str()))
    }

    pub fn accepts(&self, class: &ClassDef) -> bool {
        !class.is_phantom && !self.is_excluded_name(&class.name)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Build result
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallGraphStats {
    pub classes: usize,
    pub methods: usize,
    pub skipped_methods: usize,
    pub constants: usize,
}

/// Call graph plus the side tables filled during the same pass
#[derive(Debug, Clone, Default)]
pub struct CallGraphBuild {
    pub graph: CallGraph,
    pub constants: ConstantTable,
    pub branches: BranchTargetTable,
    pub stats: CallGraphStats,
    processed_classes: FxHashSet<String>,
}

impl CallGraphBuild {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processed(&self, class: &str) -> bool {
        self.processed_classes.contains(class)
    }

    /// Branch table entry of `method`, computed from `body` when the build never saw it
    pub fn branches_for(&self, method: &str, body: &[Instruction]) -> MethodBranches {
        self.branches
            .get(method)
            .cloned()
            .unwrap_or_else(|| MethodBranches::from_body(body))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════

pub struct CallGraphBuilder {
    filter: ClassFilter,
}

impl CallGraphBuilder {
    pub fn new(filter: &ClassFilter) -> Self {
        Self {
            filter: filter.clone(),
        }
    }

    pub fn build(&self, source: &dyn ProgramSource) -> CallGraphBuild {
        let mut build = CallGraphBuild::new();
        self.build_into(&mut build, source);
        build
    }

    /// Extend `build` with every accepted class not processed yet
    pub fn build_into(&self, build: &mut CallGraphBuild, source: &dyn ProgramSource) {
        let before = build.graph.edge_count();
        info!("Call graph build started");

        for class in source.classes() {
            if !self.filter.accepts(&class) || build.is_processed(&class.name) {
                continue;
            }
            self.process_class(build, source, &class);
            build.processed_classes.insert(class.name.clone());
            build.stats.classes += 1;
        }

        build.stats.constants = build.constants.len();
        info!(
            classes = build.stats.classes,
            methods = build.stats.methods,
            skipped = build.stats.skipped_methods,
            nodes = build.graph.node_count(),
            edges = build.graph.edge_count(),
            new_edges = build.graph.edge_count() - before,
            "Call graph build finished"
        );
    }

    fn process_class(
        &self,
        build: &mut CallGraphBuild,
        source: &dyn ProgramSource,
        class: &ClassDef,
    ) {
        // Constant tags are visible before <clinit> runs
        for field in class.fields.iter().filter(|f| f.is_static_final_constant()) {
            if let Some(value) = &field.constant_value {
                build.constants.record(&field.sig, value.clone());
            }
        }

        for method in class.concrete_methods() {
            match load_body(source, &method.sig) {
                Ok(body) => {
                    self.process_method(build, source, &method.sig, &body);
                    build.stats.methods += 1;
                }
                Err(err) => {
                    warn!(method = %method.sig, error = %err, "Skipping method");
                    build.stats.skipped_methods += 1;
                }
            }
        }
    }

    fn process_method(
        &self,
        build: &mut CallGraphBuild,
        source: &dyn ProgramSource,
        sig: &MethodSig,
        body: &[Instruction],
    ) {
        let method = sig.to_string();
        build.graph.ensure_node(&method, SymbolKind::Method);

        let mut branches = MethodBranches::default();
        for instruction in body {
            if let Some(expr) = instruction.stmt.invoke_expr() {
                build.graph.add_call(&method, &expr.method.to_string());
            }
            if let Stmt::Assign { lhs, rhs } = &instruction.stmt {
                if let Some(field) = lhs.field() {
                    if source.is_loaded(&field.class) {
                        build.graph.add_write(&method, &field.to_string());
                    }
                }
                if let Some(field) = rhs.field() {
                    if source.is_loaded(&field.class) {
                        build.graph.add_read(&method, &field.to_string());
                    }
                }
            }
            branches.record(instruction.index, &instruction.stmt);
        }

        debug!(method = %method, instructions = body.len(), "Processed method");
        build.branches.insert(method, branches);
    }
}

/// Materialise a body; a panic inside the provider becomes `ResourceExhausted`
pub fn load_body(source: &dyn ProgramSource, sig: &MethodSig) -> Result<Arc<[Instruction]>> {
    match panic::catch_unwind(AssertUnwindSafe(|| source.method_body(sig))) {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic while materialising body".to_string());
            Err(SlicerError::ResourceExhausted(format!("{}: {}", sig, reason)))
        }
    }
}
