//! Error types for codegraph-slicer
//!
//! Provides unified error handling across the crate. Most failures are local:
//! the affected unit of work is skipped and the analysis continues.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for slicing operations
#[derive(Debug, Error)]
pub enum SlicerError {
    /// Symbol, class or body the IR provider cannot supply
    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    /// Operand or index does not fit the instruction it was applied to
    #[error("Structural mismatch: {0}")]
    StructuralMismatch(String),

    /// Materialising a body exhausted resources (caught panic)
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Textual predicate that does not parse
    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),

    /// Textual signature that does not parse
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Slice record (de)serialization
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SlicerError {
    pub fn unresolved(msg: impl Into<String>) -> Self {
        SlicerError::UnresolvedReference(msg.into())
    }

    pub fn mismatch(msg: impl Into<String>) -> Self {
        SlicerError::StructuralMismatch(msg.into())
    }

    /// Whether the failure only invalidates the current unit of work
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            SlicerError::UnresolvedReference(_)
                | SlicerError::StructuralMismatch(_)
                | SlicerError::ResourceExhausted(_)
        )
    }
}

/// Result type alias for slicing operations
pub type Result<T> = std::result::Result<T, SlicerError>;
