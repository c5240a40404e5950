//! Error types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal storage failures. Integrity problems found while walking a chain are
/// not errors; the verifier reports them as structured events and a `false`
/// result instead.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Stored ledger is not syntactically valid JSON.
    #[error("ledger at {path} is not valid JSON: {detail}")]
    Malformed { path: PathBuf, detail: String },

    /// Stored ledger parses, but the top level is not an array.
    #[error("ledger at {path} is not a JSON array")]
    NotASequence { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
