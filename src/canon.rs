// Copyright (c) 2025 Vigil Contributors. Licensed under AGPLv3.
//! Canonical block encoding and hashing.
//!
//! The canonical field set is `{index, subject, category, timestamp,
//! prev_hash}` and must remain stable forever: every stored hash was computed
//! over exactly these keys, so changing the shape makes all history
//! unverifiable.
//!
//! # Determinism
//! The payload is a compact JSON object. `serde_json`'s default `Map` is a
//! `BTreeMap`, so keys always serialize in sorted order, and floats go through
//! shortest round-trip formatting, which is stable for equal f64 bit patterns
//! on every platform. The digest is BLAKE3 over the payload bytes, rendered as
//! lowercase hex.

use serde_json::{json, Value};

/// Sentinel `prev_hash` for the first verifiable block of a chain.
pub const GENESIS: &str = "GENESIS";

/// Canonical hash input as a JSON value. The stored `hash` field is never part
/// of its own input.
pub fn canonical_value(
    index: u64,
    subject: &str,
    category: &str,
    timestamp: f64,
    prev_hash: &str,
) -> Value {
    json!({
        "index": index,
        "subject": subject,
        "category": category,
        "timestamp": timestamp,
        "prev_hash": prev_hash,
    })
}

/// Byte-stable serialization of the canonical fields.
pub fn canonical_payload(
    index: u64,
    subject: &str,
    category: &str,
    timestamp: f64,
    prev_hash: &str,
) -> String {
    canonical_value(index, subject, category, timestamp, prev_hash).to_string()
}

/// Deterministic digest over the canonical fields.
pub fn hash_fields(
    index: u64,
    subject: &str,
    category: &str,
    timestamp: f64,
    prev_hash: &str,
) -> String {
    let payload = canonical_payload(index, subject, category, timestamp, prev_hash);
    blake3::hash(payload.as_bytes()).to_hex().to_string()
}
