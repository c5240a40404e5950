// Copyright (c) 2025 Vigil Contributors. Licensed under AGPLv3.
//! Structured notification seam.
//!
//! Ledger operations report outcomes through [`Notify`] instead of writing to
//! any particular sink. The default implementation forwards to `tracing`;
//! tests install a recording sink to assert on emitted events.

use std::path::PathBuf;

use crate::verify::VerifyFailure;

/// Everything a ledger operation can report.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    /// A new block was committed onto the chain head.
    Appended { subject: String, index: u64 },
    /// The chain is empty; verification and migration treat this as trivial.
    EmptyChain,
    /// Unverifiable records at the start were excluded from chain validation.
    LegacyPrefixSkipped { count: usize },
    /// Every record from the first verifiable one to the end passed.
    Verified { blocks: usize },
    /// Integrity check failed; the chain is not certified.
    VerifyFailed { failure: VerifyFailure },
    /// Byte-identical pre-migration copy of the ledger file.
    BackupWritten { path: PathBuf },
    /// Unmappable records were moved to the quarantine store.
    Quarantined { count: usize, path: PathBuf },
    /// No migratable candidates remained; the active ledger was left untouched.
    NothingToMigrate,
    /// The active ledger was rewritten as a fresh canonical chain.
    MigrationComplete { blocks: usize },
}

/// Injected event sink. Implementations must not panic; emitting is advisory
/// and never affects operation results.
pub trait Notify {
    fn emit(&self, event: &LedgerEvent);
}

/// Default sink: structured records through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotify;

impl Notify for TracingNotify {
    fn emit(&self, event: &LedgerEvent) {
        match event {
            LedgerEvent::Appended { subject, index } => {
                tracing::info!(subject = %subject, index, "block appended");
            }
            LedgerEvent::EmptyChain => {
                tracing::info!("ledger is empty");
            }
            LedgerEvent::LegacyPrefixSkipped { count } => {
                tracing::warn!(count, "skipping unverifiable legacy prefix");
            }
            LedgerEvent::Verified { blocks } => {
                tracing::info!(blocks, "ledger integrity verified");
            }
            LedgerEvent::VerifyFailed { failure } => {
                tracing::error!(%failure, "ledger integrity check failed");
            }
            LedgerEvent::BackupWritten { path } => {
                tracing::info!(path = %path.display(), "pre-migration backup written");
            }
            LedgerEvent::Quarantined { count, path } => {
                tracing::warn!(count, path = %path.display(), "records quarantined");
            }
            LedgerEvent::NothingToMigrate => {
                tracing::warn!("no migratable blocks remain; active ledger left untouched");
            }
            LedgerEvent::MigrationComplete { blocks } => {
                tracing::info!(blocks, "active ledger rewritten as canonical chain");
            }
        }
    }
}
