// Copyright (c) 2025 Vigil Contributors. Licensed under AGPLv3.
//! Chain verification.
//!
//! Walks a stored chain and confirms every hash and every link. Verification
//! is read-only and idempotent; integrity failures are reported as events and
//! a `false` result, never as errors, so a caller that merely wants a status
//! can never be crashed by a bad chain.
//!
//! Chaining is anchored on *computed* hashes: even when a record carries no
//! stored `hash` (tolerated outside strict mode), the recomputed digest is
//! what the next record's `prev_hash` must match.

use std::fmt;

use serde_json::Value;

use crate::canon::{self, GENESIS};
use crate::events::{LedgerEvent, Notify};
use crate::legacy;

/// Verification modes.
///
/// `strict_hash` requires every record to carry an explicit, matching stored
/// hash. The default tolerates a missing stored hash and anchors the chain on
/// the recomputed digest instead; that mode deliberately accepts a block whose
/// author omitted `hash` entirely, which is the historical legacy-tolerant
/// behavior.
#[derive(Debug, Clone, Copy)]
pub struct VerifyOptions {
    pub strict_hash: bool,
    pub allow_legacy_prefix: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            strict_hash: false,
            allow_legacy_prefix: true,
        }
    }
}

/// First failure found while walking the chain. Positions refer to the
/// record's place in the stored sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyFailure {
    /// No record in the chain maps to canonical fields; nothing can be
    /// certified.
    Unverifiable,
    /// A record inside the verifiable range is not a JSON object.
    NotAnObject { position: usize },
    /// Subject or category cannot be resolved, even through legacy keys.
    MissingFields { position: usize },
    /// Timestamp absent or not numeric.
    BadTimestamp { position: usize },
    /// Stated `prev_hash` disagrees with the previous record's computed hash.
    BrokenChain { position: usize },
    /// Stored hash disagrees with the digest recomputed from the record's own
    /// canonical fields.
    Tampered { position: usize },
    /// No stored hash, rejected under `strict_hash`.
    MissingHash { position: usize },
}

impl fmt::Display for VerifyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unverifiable => {
                write!(f, "no verifiable blocks found (all legacy/unmappable)")
            }
            Self::NotAnObject { position } => {
                write!(f, "record at position {position} is not an object")
            }
            Self::MissingFields { position } => {
                write!(f, "record at position {position} is missing subject/category")
            }
            Self::BadTimestamp { position } => {
                write!(f, "record at position {position} has an invalid or missing timestamp")
            }
            Self::BrokenChain { position } => {
                write!(f, "broken chain at position {position}")
            }
            Self::Tampered { position } => {
                write!(f, "tampering detected at position {position}")
            }
            Self::MissingHash { position } => {
                write!(f, "record at position {position} carries no hash (strict mode)")
            }
        }
    }
}

/// Whether a record can participate in chain verification at all.
fn is_verifiable(record: &Value) -> bool {
    legacy::has_minimum_fields(record)
}

/// Walk `records` and check every hash and link. Emits exactly one terminal
/// event: `Verified` on success, `VerifyFailed` with the first failure
/// otherwise.
pub fn verify_records(records: &[Value], opts: VerifyOptions, notify: &dyn Notify) -> bool {
    if records.is_empty() {
        notify.emit(&LedgerEvent::EmptyChain);
        return true;
    }

    let fail = |failure: VerifyFailure| {
        notify.emit(&LedgerEvent::VerifyFailed { failure });
        false
    };

    let mut start = 0;
    if opts.allow_legacy_prefix {
        match records.iter().position(is_verifiable) {
            Some(position) => start = position,
            None => return fail(VerifyFailure::Unverifiable),
        }
        if start > 0 {
            notify.emit(&LedgerEvent::LegacyPrefixSkipped { count: start });
        }
    }

    // Without the legacy-prefix allowance there is no lenient head: the chain
    // must anchor explicitly at GENESIS.
    let mut prev_expected: Option<String> = if opts.allow_legacy_prefix {
        None
    } else {
        Some(GENESIS.to_string())
    };

    for (i, record) in records.iter().enumerate().skip(start) {
        if !record.is_object() {
            return fail(VerifyFailure::NotAnObject { position: i });
        }

        let index = legacy::resolve_index(record, i);
        let (subject, category) = legacy::map_fields(record);
        let (Some(subject), Some(category)) = (subject, category) else {
            return fail(VerifyFailure::MissingFields { position: i });
        };
        let Some(timestamp) = legacy::resolve_timestamp(record) else {
            return fail(VerifyFailure::BadTimestamp { position: i });
        };

        let prev_hash = if opts.allow_legacy_prefix && i == start {
            // The first verifiable block's prev_hash is accepted as-is.
            record
                .get("prev_hash")
                .and_then(Value::as_str)
                .unwrap_or(GENESIS)
                .to_string()
        } else {
            let stated = record
                .get("prev_hash")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            match prev_expected.as_deref() {
                Some(expected) if expected == stated => stated,
                _ => return fail(VerifyFailure::BrokenChain { position: i }),
            }
        };

        let expected = canon::hash_fields(index, &subject, &category, timestamp, &prev_hash);

        match record.get("hash") {
            Some(Value::String(stored)) => {
                if *stored != expected {
                    return fail(VerifyFailure::Tampered { position: i });
                }
            }
            Some(Value::Null) | None => {
                if opts.strict_hash {
                    return fail(VerifyFailure::MissingHash { position: i });
                }
            }
            // A stored hash of the wrong JSON type can never match a digest.
            Some(_) => return fail(VerifyFailure::Tampered { position: i }),
        }

        // Computed hash is the ground truth for the next link, stored or not.
        prev_expected = Some(expected);
    }

    notify.emit(&LedgerEvent::Verified {
        blocks: records.len() - start,
    });
    true
}
