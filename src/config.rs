use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Where one ledger instance lives on disk. Passed into [`crate::ledger::Ledger`]
/// at construction; no global path state, so tests and tools can run multiple
/// independent ledgers in one process.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Active chain file (a JSON array of block objects).
    pub ledger_path: PathBuf,
    /// Append-only side store for unmappable records.
    pub quarantine_path: PathBuf,
}

impl LedgerConfig {
    /// Configuration with the quarantine store next to the ledger
    /// (`ledger.json` -> `ledger.quarantine.json`).
    pub fn new(ledger_path: impl Into<PathBuf>) -> Self {
        let ledger_path = ledger_path.into();
        let quarantine_path = default_quarantine_path(&ledger_path);
        Self {
            ledger_path,
            quarantine_path,
        }
    }

    pub fn with_quarantine_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.quarantine_path = path.into();
        self
    }

    /// Pre-migration backup artifact location (`ledger.json` -> `ledger.json.bak`).
    pub fn backup_path(&self) -> PathBuf {
        append_suffix(&self.ledger_path, ".bak")
    }
}

fn default_quarantine_path(ledger_path: &Path) -> PathBuf {
    let mut name = ledger_path
        .file_stem()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("ledger"));
    name.push(".quarantine.json");
    ledger_path.with_file_name(name)
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("ledger"));
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_paths() {
        let config = LedgerConfig::new("/tmp/state/ledger.json");
        assert_eq!(
            config.quarantine_path,
            PathBuf::from("/tmp/state/ledger.quarantine.json")
        );
        assert_eq!(
            config.backup_path(),
            PathBuf::from("/tmp/state/ledger.json.bak")
        );
    }

    #[test]
    fn test_quarantine_override() {
        let config = LedgerConfig::new("ledger.json").with_quarantine_path("elsewhere.json");
        assert_eq!(config.quarantine_path, PathBuf::from("elsewhere.json"));
    }
}
