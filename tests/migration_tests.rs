mod common;

use std::fs;
use std::sync::Arc;

use serde_json::json;
use tempfile::tempdir;

use common::Recorder;
use vigil_ledger::config::LedgerConfig;
use vigil_ledger::events::LedgerEvent;
use vigil_ledger::ledger::Ledger;
use vigil_ledger::store::ChainStore;
use vigil_ledger::verify::VerifyOptions;

fn strict() -> VerifyOptions {
    VerifyOptions {
        strict_hash: true,
        allow_legacy_prefix: true,
    }
}

#[test]
fn test_migrate_is_idempotent_on_canonical_chain() {
    let dir = tempdir().unwrap();
    let config = LedgerConfig::new(dir.path().join("ledger.json"));
    let ledger = Ledger::open(config.clone());
    for i in 0..3 {
        ledger.append(&format!("organ{i}"), "P0").unwrap();
    }

    let report = ledger.migrate(true).unwrap();
    assert_eq!(report.modified, 0);
    assert_eq!(report.quarantined, 0);
    assert_eq!(report.total, 3);

    assert!(ledger.verify(strict()).unwrap());
}

#[test]
fn test_mixed_chain_with_bare_string_record() {
    let dir = tempdir().unwrap();
    let config = LedgerConfig::new(dir.path().join("ledger.json"));

    let records = vec![
        json!({"name": "alpha", "priority": "P0", "timestamp": 1.0}),
        json!("stray marker line"),
        json!({"name": "beta", "priority": "P1", "timestamp": 2.0}),
    ];
    ChainStore::new(&config.ledger_path).save(&records).unwrap();

    let ledger = Ledger::open(config.clone());
    let report = ledger.migrate(true).unwrap();
    assert_eq!(report.quarantined, 1);
    assert_eq!(report.modified, 2);
    assert_eq!(report.total, 3);

    // Active chain rewritten with dense indices and fresh links.
    let chain = ChainStore::new(&config.ledger_path).load().unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0]["index"], json!(0));
    assert_eq!(chain[0]["subject"], json!("alpha"));
    assert_eq!(chain[0]["prev_hash"], json!(vigil_ledger::canon::GENESIS));
    assert_eq!(chain[1]["index"], json!(1));
    assert_eq!(chain[1]["subject"], json!("beta"));
    assert_eq!(chain[1]["prev_hash"], chain[0]["hash"]);
    assert!(ledger.verify(strict()).unwrap());

    // Quarantine preserves the original value with reason and position.
    let quarantined = ChainStore::new(&config.quarantine_path).load().unwrap();
    assert_eq!(quarantined.len(), 1);
    assert_eq!(quarantined[0]["reason"], json!("non-object record"));
    assert_eq!(quarantined[0]["original_index"], json!(1));
    assert_eq!(quarantined[0]["value"], json!("stray marker line"));
}

#[test]
fn test_quarantine_store_grows_monotonically() {
    let dir = tempdir().unwrap();
    let config = LedgerConfig::new(dir.path().join("ledger.json"));

    // A previously quarantined record must survive later migrations.
    let seeded = json!({"reason": "older run", "original_index": 9, "value": 42});
    ChainStore::new(&config.quarantine_path)
        .save(&[seeded.clone()])
        .unwrap();

    let records = vec![
        json!({"name": "alpha", "priority": "P0", "timestamp": 1.0}),
        json!({"half": "formed"}),
    ];
    ChainStore::new(&config.ledger_path).save(&records).unwrap();

    let ledger = Ledger::open(config.clone());
    let report = ledger.migrate(false).unwrap();
    assert_eq!(report.quarantined, 1);

    let quarantine = ChainStore::new(&config.quarantine_path);
    let after_first = quarantine.load().unwrap();
    assert_eq!(after_first.len(), 2);
    assert_eq!(after_first[0], seeded);

    // Second run: the chain is now canonical, nothing new is quarantined and
    // nothing vanishes.
    let report = ledger.migrate(false).unwrap();
    assert_eq!(report.quarantined, 0);
    assert_eq!(quarantine.load().unwrap().len(), 2);
}

#[test]
fn test_no_candidates_leaves_active_ledger_untouched() {
    let dir = tempdir().unwrap();
    let config = LedgerConfig::new(dir.path().join("ledger.json"));

    let records = vec![json!("garbage"), json!({"foo": 1})];
    ChainStore::new(&config.ledger_path).save(&records).unwrap();
    let before = fs::read(&config.ledger_path).unwrap();

    let events = Arc::new(Recorder::default());
    let ledger = Ledger::open(config.clone()).with_notify(events.clone());
    let report = ledger.migrate(false).unwrap();
    assert_eq!(report.modified, 0);
    assert_eq!(report.quarantined, 2);
    assert_eq!(report.total, 2);

    // Migration must never silently produce an empty active ledger.
    assert_eq!(fs::read(&config.ledger_path).unwrap(), before);
    assert!(events.events().contains(&LedgerEvent::NothingToMigrate));
}

#[test]
fn test_backup_is_byte_identical_and_optional() {
    let dir = tempdir().unwrap();
    let config = LedgerConfig::new(dir.path().join("ledger.json"));
    let ledger = Ledger::open(config.clone());
    ledger.append("sentinel", "P0").unwrap();

    let original = fs::read(&config.ledger_path).unwrap();
    ledger.migrate(true).unwrap();
    assert_eq!(fs::read(config.backup_path()).unwrap(), original);

    fs::remove_file(config.backup_path()).unwrap();
    ledger.migrate(false).unwrap();
    assert!(!config.backup_path().exists());
}

#[test]
fn test_rewrite_counts_materially_changed_records() {
    let dir = tempdir().unwrap();
    let config = LedgerConfig::new(dir.path().join("ledger.json"));

    // Canonical keys but wrong index and no hashes: both records change.
    let records = vec![
        json!({"subject": "a", "category": "P0", "timestamp": 1.0, "index": 5}),
        json!({"subject": "b", "category": "P1", "timestamp": 2.0}),
    ];
    ChainStore::new(&config.ledger_path).save(&records).unwrap();

    let ledger = Ledger::open(config);
    let report = ledger.migrate(false).unwrap();
    assert_eq!(report.modified, 2);
    assert_eq!(report.quarantined, 0);
    assert!(ledger.verify(strict()).unwrap());
}

#[test]
fn test_migrate_empty_ledger_reports_zeroes() {
    let dir = tempdir().unwrap();
    let events = Arc::new(Recorder::default());
    let ledger =
        Ledger::open(LedgerConfig::new(dir.path().join("ledger.json"))).with_notify(events.clone());

    let report = ledger.migrate(true).unwrap();
    assert_eq!((report.modified, report.quarantined, report.total), (0, 0, 0));
    assert_eq!(events.events(), vec![LedgerEvent::EmptyChain]);
}

#[test]
fn test_numeric_string_timestamp_migrates() {
    let dir = tempdir().unwrap();
    let config = LedgerConfig::new(dir.path().join("ledger.json"));

    let records = vec![json!({"name": "alpha", "priority": "P0", "timestamp": "123.5"})];
    ChainStore::new(&config.ledger_path).save(&records).unwrap();

    let ledger = Ledger::open(config.clone());
    let report = ledger.migrate(false).unwrap();
    assert_eq!(report.quarantined, 0);

    let chain = ChainStore::new(&config.ledger_path).load().unwrap();
    assert_eq!(chain[0]["timestamp"], json!(123.5));
    assert!(ledger.verify(strict()).unwrap());
}

#[test]
fn test_unparseable_timestamp_is_quarantined() {
    let dir = tempdir().unwrap();
    let config = LedgerConfig::new(dir.path().join("ledger.json"));

    let records = vec![json!({"name": "alpha", "priority": "P0", "timestamp": "soon"})];
    ChainStore::new(&config.ledger_path).save(&records).unwrap();

    let ledger = Ledger::open(config.clone());
    let report = ledger.migrate(false).unwrap();
    assert_eq!(report.quarantined, 1);
    assert_eq!(report.modified, 0);

    let quarantined = ChainStore::new(&config.quarantine_path).load().unwrap();
    assert_eq!(
        quarantined[0]["reason"],
        json!("missing subject/category/timestamp")
    );
    assert_eq!(quarantined[0]["original_index"], json!(0));
    assert_eq!(quarantined[0]["name"], json!("alpha"));
}

#[test]
fn test_append_continues_cleanly_after_migration() {
    let dir = tempdir().unwrap();
    let config = LedgerConfig::new(dir.path().join("ledger.json"));

    let records = vec![
        json!({"name": "alpha", "priority": "P0", "timestamp": 1.0}),
        json!("stray"),
    ];
    ChainStore::new(&config.ledger_path).save(&records).unwrap();

    let ledger = Ledger::open(config.clone());
    ledger.migrate(false).unwrap();
    let block = ledger.append("beta", "P1").unwrap();
    assert_eq!(block.index, 1);

    let chain = ChainStore::new(&config.ledger_path).load().unwrap();
    assert_eq!(block.prev_hash, chain[0]["hash"].as_str().unwrap());
    assert!(ledger.verify(strict()).unwrap());
}

#[test]
fn test_damaged_quarantine_store_does_not_block_migration() {
    let dir = tempdir().unwrap();
    let config = LedgerConfig::new(dir.path().join("ledger.json"));
    fs::write(&config.quarantine_path, "][").unwrap();

    let records = vec![json!("stray")];
    ChainStore::new(&config.ledger_path).save(&records).unwrap();

    let ledger = Ledger::open(config.clone());
    let report = ledger.migrate(false).unwrap();
    assert_eq!(report.quarantined, 1);

    let quarantined = ChainStore::new(&config.quarantine_path).load().unwrap();
    assert_eq!(quarantined.len(), 1);
}
