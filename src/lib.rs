// Copyright (c) 2025 Vigil Contributors. Licensed under AGPLv3.
//! vigil-ledger: a tamper-evident, append-only activation ledger.
//!
//! Discrete activation events are recorded as hash-chained blocks. Every block
//! digests a fixed canonical field set, so any retroactive edit breaks either
//! its own hash or the next block's `prev_hash` link. The crate also carries a
//! migration path that absorbs pre-canonical on-disk schemas without losing
//! data: unmappable records are quarantined, never dropped.

pub mod block;
pub mod canon;
pub mod config;
pub mod error;
pub mod events;
pub mod legacy;
pub mod ledger;
pub mod lock;
pub mod migrate;
pub mod store;
pub mod verify;
