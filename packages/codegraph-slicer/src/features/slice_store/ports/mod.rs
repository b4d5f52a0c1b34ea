//! Slice Store Port
//!
//! Record collection shared by the slicer (memoization), the merger, and the
//! downstream rule engine (raw document queries).

use serde_json::Value;

use crate::errors::Result;
use crate::features::slice_store::domain::Predicate;
use crate::features::slicing::domain::SliceRecord;

// ═══════════════════════════════════════════════════════════════════════════
// Slice Store Port
// ═══════════════════════════════════════════════════════════════════════════

/// # Implementors
/// - `InMemorySliceStore` (infrastructure/memory_store.rs)
pub trait SliceStore: Send + Sync {
    fn insert(&self, record: &SliceRecord) -> Result<()>;

    /// Insert unless a record with the same `nodeId` exists.
    ///
    /// The check and the insert form one atomic region.
    fn insert_if_absent(&self, record: &SliceRecord) -> Result<bool>;

    /// Raw documents matching every predicate
    fn select_documents(&self, predicates: &[Predicate]) -> Vec<Value>;

    /// Replace every matching document with `record`; returns the count
    fn update(&self, record: &SliceRecord, predicates: &[Predicate]) -> Result<usize>;

    /// Remove every matching document; returns the count
    fn delete(&self, predicates: &[Predicate]) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select_all(&self, predicates: &[Predicate]) -> Result<Vec<SliceRecord>> {
        self.select_documents(predicates)
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    fn select_one(&self, predicates: &[Predicate]) -> Result<Option<SliceRecord>> {
        match self.select_documents(predicates).into_iter().next() {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    fn contains_node(&self, node_id: &str) -> bool {
        !self
            .select_documents(&[Predicate::eq("nodeId", node_id)])
            .is_empty()
    }
}
