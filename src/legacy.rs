// Copyright (c) 2025 Vigil Contributors. Licensed under AGPLv3.
//! Best-effort field resolution for pre-canonical records.
//!
//! Older writers stored the two semantically required fields under a handful
//! of alternate key names. Resolution probes an explicit, ordered list and
//! nothing beyond it, so the fallback stays auditable and finite. Pure
//! functions, no I/O.

use serde_json::Value;

/// Alternate key names for the acting entity, probed in order.
pub const SUBJECT_KEYS: &[&str] = &["subject", "name", "organ", "organ_name", "service", "module"];

/// Alternate key names for the event classification, probed in order.
pub const CATEGORY_KEYS: &[&str] = &["category", "priority", "tier", "level", "tier_name", "class"];

fn field_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_resolvable(record: &Value, keys: &[&str]) -> Option<String> {
    let obj = record.as_object()?;
    keys.iter().find_map(|key| obj.get(*key).and_then(field_as_string))
}

/// Resolve `(subject, category)` from an arbitrary record. Each component
/// resolves independently; `None` means no alternate key carried a usable
/// value.
pub fn map_fields(record: &Value) -> (Option<String>, Option<String>) {
    (
        first_resolvable(record, SUBJECT_KEYS),
        first_resolvable(record, CATEGORY_KEYS),
    )
}

/// Numeric timestamp, if the record carries one. Legacy writers stored both
/// JSON numbers and numeric strings.
pub fn resolve_timestamp(record: &Value) -> Option<f64> {
    match record.get("timestamp")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Stored index, falling back to the record's position in the chain.
pub fn resolve_index(record: &Value, position: usize) -> u64 {
    record
        .get("index")
        .and_then(Value::as_u64)
        .unwrap_or(position as u64)
}

/// Whether subject, category, and timestamp can all be resolved. Records that
/// fail this test cannot participate in chain verification or migration.
pub fn has_minimum_fields(record: &Value) -> bool {
    let (subject, category) = map_fields(record);
    subject.is_some() && category.is_some() && resolve_timestamp(record).is_some()
}
