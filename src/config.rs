//! Configuration for the ledger service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{LedgerError, Result};

/// Service configuration
///
/// The listen address and snapshot file path are fixed at startup and
/// immutable for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listen address
    pub listen_addr: String,

    /// Snapshot configuration
    pub snapshot: SnapshotConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:1111".to_string(),
            snapshot: SnapshotConfig::default(),
        }
    }
}

/// Snapshot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Snapshot file path
    pub path: PathBuf,

    /// Seconds between periodic snapshots
    pub interval_secs: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/accounts.csv"),
            interval_secs: 300, // Every 5 minutes
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| LedgerError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables, falling back to defaults
    ///
    /// An unset, unparseable, or zero snapshot interval falls back to
    /// the default.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(addr) = std::env::var("LEDGER_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(path) = std::env::var("LEDGER_SNAPSHOT_PATH") {
            config.snapshot.path = PathBuf::from(path);
        }

        if let Some(secs) = std::env::var("LEDGER_SNAPSHOT_INTERVAL_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .filter(|&secs| secs > 0)
        {
            config.snapshot.interval_secs = secs;
        }

        Ok(config)
    }

    /// Interval between periodic snapshots
    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_secs(self.snapshot.interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.listen_addr, "0.0.0.0:1111");
        assert_eq!(config.snapshot.path, PathBuf::from("./data/accounts.csv"));
        assert_eq!(config.snapshot.interval_secs, 300);
        assert_eq!(config.snapshot_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "listen_addr = \"127.0.0.1:9000\"\n\n[snapshot]\npath = \"/tmp/accounts.csv\"\ninterval_secs = 60"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.snapshot.path, PathBuf::from("/tmp/accounts.csv"));
        assert_eq!(config.snapshot.interval_secs, 60);
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen_addr = [not toml").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }

    #[test]
    fn test_from_env_ignores_zero_interval() {
        // No other test touches this variable
        std::env::set_var("LEDGER_SNAPSHOT_INTERVAL_SECS", "0");
        let config = Config::from_env().unwrap();
        assert_eq!(config.snapshot.interval_secs, 300);

        std::env::set_var("LEDGER_SNAPSHOT_INTERVAL_SECS", "45");
        let config = Config::from_env().unwrap();
        assert_eq!(config.snapshot.interval_secs, 45);

        std::env::remove_var("LEDGER_SNAPSHOT_INTERVAL_SECS");
    }
}
