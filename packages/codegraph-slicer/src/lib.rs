/*
 * Codegraph Slicer - Crypto API Misuse Slicing Engine
 *
 * Interprocedural backward slicing over three-address bytecode IR:
 * - shared/      : IR models (types, signatures, values, statements), constants
 * - features/    : Vertical slices (classification → call graph → slicing → optimization)
 * - pipeline/    : End-to-end orchestration
 * - config/      : Presets and validated settings
 *
 * Each slice is stored as a JSON document; a downstream rule engine queries
 * the store with field predicates.
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Analysis entry points need many params
#![allow(clippy::type_complexity)] // Complex types are necessary for analysis
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::unnecessary_map_or)] // map_or style for compatibility

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ConfigError, Preset, SlicingConfig};
pub use errors::{Result, SlicerError};
pub use features::ir_provider::{ClassDef, InMemoryProgram, ProgramSource};
pub use features::slice_store::{InMemorySliceStore, Predicate, SliceStore};
pub use features::slicing::{ContentLine, SliceRecord, SlicingCriterion, TargetKind};
pub use pipeline::{SliceRequest, SliceRun, SlicingPipeline};
