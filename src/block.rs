// Copyright (c) 2025 Vigil Contributors. Licensed under AGPLv3.
//! The atomic ledger record.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::canon;

/// One canonical, chained event record.
///
/// Blocks are immutable once written. They are created only by the append
/// engine or by the migrator's rewrite pass, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Dense, strictly increasing position, starting at 0.
    pub index: u64,
    /// Acting entity (e.g. a service name). Non-empty.
    pub subject: String,
    /// Event classification (e.g. a priority tier). Non-empty.
    pub category: String,
    /// Seconds since epoch. Monotonicity is not enforced.
    pub timestamp: f64,
    /// Hash of the preceding block, or [`canon::GENESIS`] for the first one.
    pub prev_hash: String,
    /// Digest over the canonical fields (hash excluded from its own input).
    pub hash: String,
}

impl Block {
    /// Build a block and compute its hash from the canonical fields.
    pub fn seal(
        index: u64,
        subject: &str,
        category: &str,
        timestamp: f64,
        prev_hash: &str,
    ) -> Self {
        let hash = canon::hash_fields(index, subject, category, timestamp, prev_hash);
        Self {
            index,
            subject: subject.to_string(),
            category: category.to_string(),
            timestamp,
            prev_hash: prev_hash.to_string(),
            hash,
        }
    }

    /// Recompute the digest from this block's own canonical fields.
    pub fn computed_hash(&self) -> String {
        canon::hash_fields(
            self.index,
            &self.subject,
            &self.category,
            self.timestamp,
            &self.prev_hash,
        )
    }

    /// Storage representation (canonical fields plus the stored hash).
    pub fn to_value(&self) -> Value {
        json!({
            "index": self.index,
            "subject": self.subject,
            "category": self.category,
            "timestamp": self.timestamp,
            "prev_hash": self.prev_hash,
            "hash": self.hash,
        })
    }
}
