//! ID generation utilities
//!
//! Generates stable, deterministic IDs for slicing criteria using SHA256.

use sha2::{Digest, Sha256};

use crate::shared::constants::hashing::HASH_LENGTH;

/// ID Generator for criterion identities
pub struct IdGenerator;

impl IdGenerator {
    /// Generate a criterion ID
    ///
    /// Format: first 32 hex chars of sha256(caller | target | index | sorted live ids)
    pub fn generate_criterion_id(
        caller: &str,
        target_statement: &str,
        target_index: usize,
        live_ids: &[&str],
    ) -> String {
        let mut sorted: Vec<&str> = live_ids.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let input = format!(
            "{}|{}|{}|{}",
            caller,
            target_statement,
            target_index,
            sorted.join(",")
        );
        Self::hash_to_hex(&input)
    }

    fn hash_to_hex(input: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        let digest = hasher.finalize();
        let mut hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        hex.truncate(HASH_LENGTH);
        hex
    }
}
