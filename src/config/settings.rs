//! Health monitor configuration settings

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

/// Main configuration for the endpoint health monitor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Log level configuration
    pub log_level: String,

    /// Network name to force on first start ("mainnet" or "testnet")
    pub network: Option<String>,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// HTTP client configuration for probes
    pub http_client: HttpClientConfig,

    /// Re-check windows and watch interval
    pub health: HealthConfig,

    /// Where endpoint settings are persisted
    pub storage: StorageConfig,

    /// Runtime configuration
    pub runtime: RuntimeConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write daily-rotated log files
    pub enable_file_logging: bool,

    /// Directory for log files
    pub log_dir: PathBuf,

    /// Log file name prefix
    pub file_prefix: String,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Whole-request timeout for a single probe, in seconds
    pub request_timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// User-Agent sent with probes
    pub user_agent: String,
}

/// Health check scheduling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Minimum age of an indexer check before it is re-probed
    pub indexer_recheck_secs: u64,

    /// Minimum age of a relay check before it is re-probed
    pub relay_recheck_secs: u64,

    /// Tick interval of `watch`
    pub watch_interval_secs: u64,
}

/// Settings storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// YAML file holding the configured endpoints
    pub settings_path: PathBuf,
}

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime mode: "single_threaded" or "multi_threaded"
    pub mode: String,

    /// Number of worker threads for multi-threaded mode (None = auto-detect CPU cores)
    pub worker_threads: Option<usize>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            network: None,
            logging: LoggingConfig::default(),
            http_client: HttpClientConfig::default(),
            health: HealthConfig::default(),
            storage: StorageConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_file_logging: false,
            log_dir: PathBuf::from("logs"),
            file_prefix: "endpoint-health.log".to_string(),
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
            user_agent: format!("endpoint-health/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            indexer_recheck_secs: 10 * 60,
            relay_recheck_secs: 60,
            watch_interval_secs: 30,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from("endpoints.yml"),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            mode: "multi_threaded".to_string(),
            worker_threads: None,
        }
    }
}

impl HttpClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl MonitorConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: MonitorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path` (or `config.yml`) with environment
    /// variable overrides; a missing file yields the defaults
    pub fn load_config(path: Option<&Path>) -> Result<Self> {
        let config_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));

        let mut config = if config_path.exists() {
            Self::from_yaml_file(config_path)?
        } else if path.is_some() {
            return Err(anyhow::anyhow!(
                "Config file '{}' not found",
                config_path.display()
            ));
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Override settings from `ENDPOINT_HEALTH_*` variables and `RUST_LOG`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            self.log_level = log_level;
        }

        if let Ok(network) = std::env::var("ENDPOINT_HEALTH_NETWORK") {
            self.network = Some(network);
        }

        if let Ok(path) = std::env::var("ENDPOINT_HEALTH_SETTINGS_PATH") {
            self.storage.settings_path = PathBuf::from(path);
        }

        if let Ok(enable) = std::env::var("ENDPOINT_HEALTH_FILE_LOGGING") {
            self.logging.enable_file_logging = enable.to_lowercase() == "true";
        }

        if let Ok(timeout) = std::env::var("ENDPOINT_HEALTH_REQUEST_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse() {
                self.http_client.request_timeout_secs = timeout;
            }
        }

        if let Ok(timeout) = std::env::var("ENDPOINT_HEALTH_CONNECT_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse() {
                self.http_client.connect_timeout_secs = timeout;
            }
        }

        if let Ok(secs) = std::env::var("ENDPOINT_HEALTH_INDEXER_RECHECK_SECS") {
            if let Ok(secs) = secs.parse() {
                self.health.indexer_recheck_secs = secs;
            }
        }

        if let Ok(secs) = std::env::var("ENDPOINT_HEALTH_RELAY_RECHECK_SECS") {
            if let Ok(secs) = secs.parse() {
                self.health.relay_recheck_secs = secs;
            }
        }

        if let Ok(mode) = std::env::var("ENDPOINT_HEALTH_RUNTIME_MODE") {
            self.runtime.mode = mode;
        }
    }

    /// Reject settings the monitor cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.http_client.request_timeout_secs == 0 {
            anyhow::bail!("http_client.request_timeout_secs must be greater than zero");
        }
        if self.health.watch_interval_secs == 0 {
            anyhow::bail!("health.watch_interval_secs must be greater than zero");
        }
        Ok(())
    }
}
