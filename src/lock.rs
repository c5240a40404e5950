// Copyright (c) 2025 Vigil Contributors. Licensed under AGPLv3.
//! Mutual-exclusion seam around the load-modify-save sequence.
//!
//! A single save is atomic, but `append` and `migrate` each run an unlocked
//! read-modify-write against the ledger file: two concurrent writers from
//! independent processes can still lose updates or diverge chain heads. The
//! bundled [`NoLock`] performs no exclusion and assumes callers serialize
//! writers externally (a file lock, or a single dedicated writer process).
//! Deployments that need multi-writer safety inject a real lock here.

use std::io;

/// Held for the duration of one load-modify-save sequence. Exclusion ends
/// when the guard drops.
pub trait LockGuard {}

/// Injected exclusion primitive acquired at the start of every mutating
/// operation.
pub trait LedgerLock {
    fn acquire(&self) -> io::Result<Box<dyn LockGuard>>;
}

/// Default: no cross-process exclusion.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLock;

struct NoGuard;

impl LockGuard for NoGuard {}

impl LedgerLock for NoLock {
    fn acquire(&self) -> io::Result<Box<dyn LockGuard>> {
        Ok(Box::new(NoGuard))
    }
}
