use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vigil_cli::commands::{append, inspect, migrate, verify};
use vigil_ledger::config::LedgerConfig;

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Vigil activation ledger - tamper-evident append, verify, migrate", long_about = None)]
struct Cli {
    /// Path to the active ledger file
    #[arg(long, global = true, default_value = "ledger.json")]
    ledger: PathBuf,

    /// Quarantine store path (defaults to a sibling of the ledger)
    #[arg(long, global = true)]
    quarantine: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one activation event on the chain head
    Append {
        /// Acting entity, e.g. a service name
        subject: String,
        /// Event classification, e.g. a priority tier
        category: String,
    },
    /// Walk the stored chain and check every hash and link
    Verify {
        /// Require every block to carry an explicit stored hash
        #[arg(long)]
        strict_hash: bool,

        /// Fail instead of skipping an unverifiable legacy prefix
        #[arg(long)]
        no_legacy_prefix: bool,
    },
    /// Rewrite the chain into canonical form, quarantining unmappable blocks
    Migrate {
        /// Skip the pre-migration backup copy
        #[arg(long)]
        no_backup: bool,
    },
    /// List the stored chain as a table
    Inspect,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "vigil_ledger=info,vigil_cli=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = LedgerConfig::new(&cli.ledger);
    if let Some(path) = cli.quarantine {
        config = config.with_quarantine_path(path);
    }

    match cli.command {
        Commands::Append { subject, category } => append::run(config, &subject, &category),
        Commands::Verify {
            strict_hash,
            no_legacy_prefix,
        } => verify::run(config, strict_hash, !no_legacy_prefix),
        Commands::Migrate { no_backup } => migrate::run(config, !no_backup),
        Commands::Inspect => inspect::run(config),
    }
}
