// Copyright (c) 2025 Vigil Contributors. Licensed under AGPLv3.
//! Ledger facade: append, verify, migrate.
//!
//! All operations are blocking and run to completion; the persisted files are
//! the only shared mutable resource. The injected [`LedgerLock`] is held
//! across each load-modify-save sequence (see `lock.rs` for the multi-writer
//! caveats of the default).

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::block::Block;
use crate::canon::{self, GENESIS};
use crate::config::LedgerConfig;
use crate::error::Result;
use crate::events::{LedgerEvent, Notify, TracingNotify};
use crate::legacy;
use crate::lock::{LedgerLock, NoLock};
use crate::migrate::{self, MigrationReport};
use crate::store::ChainStore;
use crate::verify::{self, VerifyOptions};

/// One ledger instance: an active chain store plus its quarantine side store.
pub struct Ledger {
    store: ChainStore,
    quarantine: ChainStore,
    config: LedgerConfig,
    notify: Arc<dyn Notify>,
    lock: Box<dyn LedgerLock>,
}

impl Ledger {
    /// Open a ledger at the configured paths with the default `tracing` sink
    /// and no cross-process lock.
    pub fn open(config: LedgerConfig) -> Self {
        Self {
            store: ChainStore::new(&config.ledger_path),
            quarantine: ChainStore::new(&config.quarantine_path),
            config,
            notify: Arc::new(TracingNotify),
            lock: Box::new(NoLock),
        }
    }

    /// Replace the event sink.
    pub fn with_notify(mut self, notify: Arc<dyn Notify>) -> Self {
        self.notify = notify;
        self
    }

    /// Inject a mutual-exclusion primitive around mutating operations.
    pub fn with_lock(mut self, lock: Box<dyn LedgerLock>) -> Self {
        self.lock = lock;
        self
    }

    /// Direct access to the active chain store (read-only tooling).
    pub fn store(&self) -> &ChainStore {
        &self.store
    }

    /// Build and commit a new block onto the current chain head. The whole
    /// chain is persisted atomically; history is never rewritten. Fails only
    /// when existing storage is unreadable as a sequence or unwritable.
    pub fn append(&self, subject: &str, category: &str) -> Result<Block> {
        let _guard = self.lock.acquire()?;

        let mut records = self.store.load()?;
        let prev_hash = tail_anchor(&records);
        let timestamp = now_secs();

        let block = Block::seal(
            records.len() as u64,
            subject,
            category,
            timestamp,
            &prev_hash,
        );
        records.push(block.to_value());
        self.store.save(&records)?;

        self.notify.emit(&LedgerEvent::Appended {
            subject: block.subject.clone(),
            index: block.index,
        });
        Ok(block)
    }

    /// Walk the stored chain and confirm every hash and link. Side-effect
    /// free; integrity failures yield `Ok(false)` plus a diagnostic event.
    /// Only unreadable storage is an error.
    pub fn verify(&self, opts: VerifyOptions) -> Result<bool> {
        let records = self.store.load()?;
        Ok(verify::verify_records(&records, opts, self.notify.as_ref()))
    }

    /// Rewrite the chain into canonical form, quarantining unmappable
    /// records. Optionally writes a byte-identical backup of the ledger file
    /// before any mutation. Never fails on bad data, only on bad storage.
    pub fn migrate(&self, backup: bool) -> Result<MigrationReport> {
        let _guard = self.lock.acquire()?;
        migrate::run(
            &self.store,
            &self.quarantine,
            &self.config.backup_path(),
            backup,
            self.notify.as_ref(),
        )
    }
}

/// Resolve the `prev_hash` for a new block from the current tail.
///
/// Stored hash wins; a mappable pre-canonical tail gets its hash recomputed
/// on the fly; anything else anchors at `GENESIS`. This tolerance is what
/// lets `append` work on a chain whose tail predates the canonical schema.
fn tail_anchor(records: &[Value]) -> String {
    let Some(last) = records.last() else {
        return GENESIS.to_string();
    };

    if let Some(stored) = last.get("hash").and_then(Value::as_str) {
        if !stored.is_empty() {
            return stored.to_string();
        }
    }

    let (subject, category) = legacy::map_fields(last);
    if let (Some(subject), Some(category)) = (subject, category) {
        if let Some(timestamp) = legacy::resolve_timestamp(last) {
            let index = legacy::resolve_index(last, records.len() - 1);
            let prev = last
                .get("prev_hash")
                .and_then(Value::as_str)
                .unwrap_or(GENESIS);
            return canon::hash_fields(index, &subject, &category, timestamp, prev);
        }
    }

    GENESIS.to_string()
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
