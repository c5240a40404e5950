use std::sync::Arc;

use vigil_ledger::config::LedgerConfig;
use vigil_ledger::events::{LedgerEvent, Notify};
use vigil_ledger::ledger::Ledger;
use vigil_ledger::verify::VerifyOptions;

/// Sink that narrates verification to the terminal. The command only surfaces
/// pass/fail plus diagnostic text, never a specific failure type.
struct Console;

impl Notify for Console {
    fn emit(&self, event: &LedgerEvent) {
        match event {
            LedgerEvent::EmptyChain => println!("ℹ️ Ledger is empty."),
            LedgerEvent::LegacyPrefixSkipped { count } => {
                println!("⚠️ Skipping {count} legacy block(s) at start (unverifiable schema).");
            }
            LedgerEvent::VerifyFailed { failure } => println!("❌ {failure}"),
            _ => {}
        }
    }
}

pub fn run(config: LedgerConfig, strict_hash: bool, allow_legacy_prefix: bool) -> anyhow::Result<()> {
    let ledger = Ledger::open(config).with_notify(Arc::new(Console));
    let opts = VerifyOptions {
        strict_hash,
        allow_legacy_prefix,
    };

    if ledger.verify(opts)? {
        println!("\n🟢 Ledger integrity verified.\n");
        Ok(())
    } else {
        anyhow::bail!("ledger integrity check failed")
    }
}
