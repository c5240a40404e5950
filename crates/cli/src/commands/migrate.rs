use vigil_ledger::config::LedgerConfig;
use vigil_ledger::ledger::Ledger;

pub fn run(config: LedgerConfig, backup: bool) -> anyhow::Result<()> {
    let ledger = Ledger::open(config);
    let report = ledger.migrate(backup)?;

    println!("\nMigration report");
    println!("----------------");
    println!("original blocks:    {}", report.total);
    println!("rewritten/changed:  {}", report.modified);
    println!("quarantined:        {}", report.quarantined);

    if report.total > 0 && report.modified == 0 && report.quarantined == 0 {
        println!("\n🟢 Chain was already canonical.\n");
    }
    Ok(())
}
