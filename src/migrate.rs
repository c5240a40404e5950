// Copyright (c) 2025 Vigil Contributors. Licensed under AGPLv3.
//! Legacy-schema migration with quarantine.
//!
//! Partitions a mixed chain into unmappable and migratable records, rewrites
//! the migratable portion into a fresh canonical chain, and preserves the
//! rest in an append-only quarantine store. Malformed data is never fatal
//! here; the only fatal condition is unreadable or unwritable storage.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::block::Block;
use crate::canon::GENESIS;
use crate::error::Result;
use crate::events::{LedgerEvent, Notify};
use crate::legacy;
use crate::store::ChainStore;

const REASON_NON_OBJECT: &str = "non-object record";
const REASON_MISSING_FIELDS: &str = "missing subject/category/timestamp";

/// Outcome of one migration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    /// Records whose index, prev_hash, hash, subject, or category materially
    /// changed during the rewrite.
    pub modified: usize,
    /// Records moved to the quarantine store this pass.
    pub quarantined: usize,
    /// Records in the original chain before migration.
    pub total: usize,
}

/// A record that passed the minimum-fields test, with its canonical fields
/// resolved once at partition time.
struct Candidate {
    subject: String,
    category: String,
    timestamp: f64,
    original: Value,
}

pub(crate) fn run(
    store: &ChainStore,
    quarantine: &ChainStore,
    backup_path: &Path,
    backup: bool,
    notify: &dyn Notify,
) -> Result<MigrationReport> {
    let records = store.load()?;
    if records.is_empty() {
        notify.emit(&LedgerEvent::EmptyChain);
        return Ok(MigrationReport {
            modified: 0,
            quarantined: 0,
            total: 0,
        });
    }

    if backup && store.path().exists() {
        fs::copy(store.path(), backup_path)?;
        notify.emit(&LedgerEvent::BackupWritten {
            path: backup_path.to_path_buf(),
        });
    }

    let total = records.len();
    let (candidates, quarantined) = partition(records);

    if !quarantined.is_empty() {
        // Append-only union: previously quarantined records are never
        // overwritten or dropped.
        let mut merged = quarantine.load_lenient();
        merged.extend(quarantined.iter().cloned());
        quarantine.save(&merged)?;
        notify.emit(&LedgerEvent::Quarantined {
            count: quarantined.len(),
            path: quarantine.path().to_path_buf(),
        });
    }

    if candidates.is_empty() {
        // The active ledger keeps its prior state; silently producing an
        // empty chain would discard data.
        notify.emit(&LedgerEvent::NothingToMigrate);
        return Ok(MigrationReport {
            modified: 0,
            quarantined: quarantined.len(),
            total,
        });
    }

    let mut chain = Vec::with_capacity(candidates.len());
    let mut prev_hash = GENESIS.to_string();
    let mut modified = 0;

    for (new_index, candidate) in candidates.iter().enumerate() {
        let block = Block::seal(
            new_index as u64,
            &candidate.subject,
            &candidate.category,
            candidate.timestamp,
            &prev_hash,
        );
        if materially_changed(&candidate.original, &block) {
            modified += 1;
        }
        prev_hash = block.hash.clone();
        chain.push(block.to_value());
    }

    store.save(&chain)?;
    notify.emit(&LedgerEvent::MigrationComplete {
        blocks: chain.len(),
    });

    Ok(MigrationReport {
        modified,
        quarantined: quarantined.len(),
        total,
    })
}

/// Split originals into migration candidates and quarantine entries, both in
/// original order. Quarantine entries carry the original fields plus `reason`
/// and `original_index`.
fn partition(records: Vec<Value>) -> (Vec<Candidate>, Vec<Value>) {
    let mut candidates = Vec::new();
    let mut quarantined = Vec::new();

    for (i, record) in records.into_iter().enumerate() {
        if !record.is_object() {
            quarantined.push(json!({
                "reason": REASON_NON_OBJECT,
                "original_index": i,
                "value": record,
            }));
            continue;
        }

        let (subject, category) = legacy::map_fields(&record);
        let timestamp = legacy::resolve_timestamp(&record);
        match (subject, category, timestamp) {
            (Some(subject), Some(category), Some(timestamp)) => {
                candidates.push(Candidate {
                    subject,
                    category,
                    timestamp,
                    original: record,
                });
            }
            _ => {
                let mut entry = record;
                if let Some(obj) = entry.as_object_mut() {
                    obj.insert("reason".to_string(), json!(REASON_MISSING_FIELDS));
                    obj.insert("original_index".to_string(), json!(i));
                }
                quarantined.push(entry);
            }
        }
    }

    (candidates, quarantined)
}

fn materially_changed(original: &Value, block: &Block) -> bool {
    original.get("index").and_then(Value::as_u64) != Some(block.index)
        || original.get("prev_hash").and_then(Value::as_str) != Some(block.prev_hash.as_str())
        || original.get("hash").and_then(Value::as_str) != Some(block.hash.as_str())
        || original.get("subject").and_then(Value::as_str) != Some(block.subject.as_str())
        || original.get("category").and_then(Value::as_str) != Some(block.category.as_str())
}
