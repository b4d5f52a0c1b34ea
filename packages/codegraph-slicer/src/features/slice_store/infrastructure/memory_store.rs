//! In-Memory Slice Store
//!
//! Vector of JSON documents behind one lock; every query is a full scan.

use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::Result;
use crate::features::slice_store::domain::{matches_all, Predicate};
use crate::features::slice_store::ports::SliceStore;
use crate::features::slicing::domain::SliceRecord;

#[derive(Clone, Default)]
pub struct InMemorySliceStore {
    documents: Arc<RwLock<Vec<Value>>>,
}

impl InMemorySliceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored document, in insertion order
    pub fn documents(&self) -> Vec<Value> {
        self.documents.read().clone()
    }

    pub fn clear(&self) {
        self.documents.write().clear();
    }
}

impl SliceStore for InMemorySliceStore {
    fn insert(&self, record: &SliceRecord) -> Result<()> {
        let doc = serde_json::to_value(record)?;
        self.documents.write().push(doc);
        Ok(())
    }

    fn insert_if_absent(&self, record: &SliceRecord) -> Result<bool> {
        let doc = serde_json::to_value(record)?;
        let mut documents = self.documents.write();
        if let Some(node_id) = &record.node_id {
            let key = Predicate::eq("nodeId", node_id.as_str());
            if documents.iter().any(|d| key.matches(d)) {
                return Ok(false);
            }
        }
        documents.push(doc);
        Ok(true)
    }

    fn select_documents(&self, predicates: &[Predicate]) -> Vec<Value> {
        self.documents
            .read()
            .iter()
            .filter(|doc| matches_all(predicates, doc))
            .cloned()
            .collect()
    }

    fn update(&self, record: &SliceRecord, predicates: &[Predicate]) -> Result<usize> {
        let replacement = serde_json::to_value(record)?;
        let mut documents = self.documents.write();
        let mut updated = 0;
        for doc in documents.iter_mut() {
            if matches_all(predicates, doc) {
                *doc = replacement.clone();
                updated += 1;
            }
        }
        Ok(updated)
    }

    fn delete(&self, predicates: &[Predicate]) -> usize {
        let mut documents = self.documents.write();
        let before = documents.len();
        documents.retain(|doc| !matches_all(predicates, doc));
        before - documents.len()
    }

    fn len(&self) -> usize {
        self.documents.read().len()
    }
}
