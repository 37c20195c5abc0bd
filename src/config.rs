use std::env;
use std::path::PathBuf;

/// Default arbiter principal for local/dev deployments.
const DEFAULT_ARBITER: &str = "arbiter";

/// Configuration for the dispute-ledger CLI tool
///
/// This is a simple, single-process config. The arbiter principal is
/// fixed at deployment time: it can be set here (or via environment)
/// but is not mutable through any ledger operation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory path (default: `.dispute-ledger/` in current directory)
    pub data_dir: PathBuf,

    /// Output format: "human" (default) or "json"
    pub output_format: String,

    /// Log level: "info", "debug", "warn", "error" (default: "info")
    pub log_level: String,

    /// The privileged principal allowed to start voting and resolve disputes
    pub arbiter: String,
}

impl Config {
    /// Create a new config with defaults
    pub fn new() -> Self {
        let data_dir = env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".dispute-ledger");

        Config {
            data_dir,
            output_format: "human".to_string(),
            log_level: "info".to_string(),
            arbiter: DEFAULT_ARBITER.to_string(),
        }
    }

    /// Create config with custom data directory
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Config {
            data_dir,
            ..Config::new()
        }
    }

    /// Get the data directory path
    pub fn get_data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Set data directory
    pub fn set_data_dir(&mut self, dir: PathBuf) {
        self.data_dir = dir;
    }

    /// Get output format
    pub fn get_output_format(&self) -> &str {
        &self.output_format
    }

    /// Set output format ("human" or "json")
    pub fn set_output_format(&mut self, format: String) {
        self.output_format = format;
    }

    /// Get log level
    pub fn get_log_level(&self) -> &str {
        &self.log_level
    }

    /// Set log level
    pub fn set_log_level(&mut self, level: String) {
        self.log_level = level;
    }

    /// Get the arbiter principal
    pub fn get_arbiter(&self) -> &str {
        &self.arbiter
    }

    /// Get transaction log path
    pub fn get_tx_log_path(&self) -> PathBuf {
        self.data_dir.join("tx.log")
    }

    /// Get state snapshot path
    pub fn get_state_path(&self) -> PathBuf {
        self.data_dir.join("state.bin")
    }

    /// Get wallet store path
    pub fn get_wallets_path(&self) -> PathBuf {
        self.data_dir.join("wallets.json")
    }

    /// Load config from environment variables
    ///
    /// Environment variables:
    /// - `DISPUTE_LEDGER_DATA_DIR`: override data directory
    /// - `DISPUTE_LEDGER_OUTPUT_FORMAT`: "human" or "json"
    /// - `DISPUTE_LEDGER_LOG_LEVEL`: log level
    /// - `DISPUTE_LEDGER_ARBITER`: arbiter principal
    pub fn from_env() -> Self {
        let mut config = Config::new();

        if let Ok(dir) = env::var("DISPUTE_LEDGER_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(format) = env::var("DISPUTE_LEDGER_OUTPUT_FORMAT") {
            config.output_format = format;
        }

        if let Ok(level) = env::var("DISPUTE_LEDGER_LOG_LEVEL") {
            config.log_level = level;
        }

        if let Ok(arbiter) = env::var("DISPUTE_LEDGER_ARBITER") {
            config.arbiter = arbiter;
        }

        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
