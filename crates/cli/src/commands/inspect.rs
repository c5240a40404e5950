use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde_json::Value;

use vigil_ledger::canon::GENESIS;
use vigil_ledger::config::LedgerConfig;
use vigil_ledger::legacy;
use vigil_ledger::store::ChainStore;

pub fn run(config: LedgerConfig) -> anyhow::Result<()> {
    let store = ChainStore::new(&config.ledger_path);
    let records = store.load()?;

    println!("\nVigil Ledger Report");
    println!("-------------------");
    println!("ledger:     {}", config.ledger_path.display());
    println!("quarantine: {}", config.quarantine_path.display());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Subject", "Category", "Timestamp", "Link"]);

    let mut prev_stored_hash: Option<String> = None;
    for (i, record) in records.iter().enumerate() {
        let (subject, category) = legacy::map_fields(record);
        let timestamp = legacy::resolve_timestamp(record)
            .map(|t| format!("{t:.3}"))
            .unwrap_or_else(|| "?".to_string());

        let stated_prev = record.get("prev_hash").and_then(Value::as_str);
        let link = if i == 0 {
            match stated_prev {
                Some(GENESIS) => "genesis",
                Some(_) => "head",
                None => "missing",
            }
        } else {
            match (stated_prev, prev_stored_hash.as_deref()) {
                (Some(prev), Some(last)) if prev == last => "ok",
                (None, _) => "missing",
                _ => "MISMATCH",
            }
        }
        .to_string();

        table.add_row(vec![
            i.to_string(),
            subject.unwrap_or_else(|| "?".to_string()),
            category.unwrap_or_else(|| "?".to_string()),
            timestamp,
            link,
        ]);

        prev_stored_hash = record
            .get("hash")
            .and_then(Value::as_str)
            .map(str::to_string);
    }

    println!("{table}");
    println!("{} block(s) on the active chain.", records.len());

    let quarantined = ChainStore::new(&config.quarantine_path).load_lenient();
    if !quarantined.is_empty() {
        println!("{} record(s) in quarantine.", quarantined.len());
    }
    Ok(())
}
