use vigil_ledger::config::LedgerConfig;
use vigil_ledger::ledger::Ledger;

pub fn run(config: LedgerConfig, subject: &str, category: &str) -> anyhow::Result<()> {
    let ledger = Ledger::open(config);
    let block = ledger.append(subject, category)?;

    println!(
        "✅ '{}' recorded in ledger (index={}, category={})",
        block.subject, block.index, block.category
    );
    Ok(())
}
