// Copyright (c) 2025 Vigil Contributors. Licensed under AGPLv3.
//! Chain persistence with atomic replace semantics.
//!
//! The ledger is stored as a single JSON array of block objects. Every save
//! writes the full sequence to a sibling temp file, fsyncs, then renames over
//! the destination, so a reader never observes a partially written ledger and
//! a crash mid-write leaves the previous version intact.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{LedgerError, Result};

/// Loads and persists one ledger file. Holds an explicit path; there is no
/// process-wide location state, so independent instances can coexist.
#[derive(Debug, Clone)]
pub struct ChainStore {
    path: PathBuf,
}

impl ChainStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted sequence. An absent file is an empty ledger, not an
    /// error. Invalid JSON or a non-array top level is never coerced.
    pub fn load(&self) -> Result<Vec<Value>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        let data: Value = serde_json::from_str(&text).map_err(|e| LedgerError::Malformed {
            path: self.path.clone(),
            detail: e.to_string(),
        })?;
        match data {
            Value::Array(records) => Ok(records),
            _ => Err(LedgerError::NotASequence {
                path: self.path.clone(),
            }),
        }
    }

    /// Tolerant load for the quarantine side store: damaged or missing content
    /// yields an empty list so a quarantine merge can never fail on it.
    pub fn load_lenient(&self) -> Vec<Value> {
        self.load().unwrap_or_default()
    }

    /// Persist the full sequence via temp-file-then-rename.
    pub fn save(&self, records: &[Value]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        {
            let mut file = File::create(&tmp_path)?;
            serde_json::to_writer_pretty(&mut file, records).map_err(std::io::Error::from)?;
            file.write_all(b"\n")?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("ledger"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
