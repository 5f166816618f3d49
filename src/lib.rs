//! Endpoint health tracking for indexer, relay, explorer and chat-app services
//!
//! Keeps a persisted view of which configured endpoints are reachable, probes
//! them on staleness windows, and picks the endpoint a client should use.

pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod models;
pub mod network;
pub mod service;
pub mod storage;
pub mod utils;

// Re-export commonly used items
pub use config::settings::MonitorConfig;
pub use error::{Error, ErrorKind, NetworkError, Result};
pub use health::{CheckPolicy, CycleReport, HealthChecker, HttpProber, Notifier, Prober};
pub use logging::{init_logger_with_config, init_logger_with_env};
pub use models::{Category, EndpointRecord, Settings, UrlStatus};
pub use network::Network;
pub use service::NetworkService;
pub use storage::{MemoryStore, NetworkStore, SettingsStore, YamlFileStore};

/// Runtime utilities for creating single-threaded vs multi-threaded Tokio runtimes
pub mod runtime {
    use crate::config::settings::RuntimeConfig;
    use anyhow::{Context, Result};
    use tokio::runtime::{Builder, Runtime};

    /// Create a Tokio runtime based on the configuration
    pub fn create_runtime(config: &RuntimeConfig) -> Result<Runtime> {
        match config.mode.as_str() {
            "single_threaded" => {
                tracing::debug!("Initializing single-threaded runtime");
                Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .context("Failed to create single-threaded runtime")
            }
            "multi_threaded" => {
                let mut builder = Builder::new_multi_thread();
                builder.enable_all();

                match config.worker_threads {
                    Some(threads) if threads > 0 => {
                        tracing::debug!("Initializing multi-threaded runtime with {} worker threads", threads);
                        builder.worker_threads(threads);
                    }
                    _ => tracing::debug!("Initializing multi-threaded runtime with auto-detected CPU cores"),
                }

                builder.build().context("Failed to create multi-threaded runtime")
            }
            other => {
                tracing::warn!("Unknown runtime mode '{}', defaulting to multi-threaded", other);
                Builder::new_multi_thread()
                    .enable_all()
                    .build()
                    .context("Failed to create default multi-threaded runtime")
            }
        }
    }

    /// Execute an async function with the configured runtime
    pub fn run_with_runtime<F, T>(config: &RuntimeConfig, future: F) -> Result<T>
    where
        F: std::future::Future<Output = Result<T>>,
    {
        let runtime = create_runtime(config)?;
        runtime.block_on(future)
    }

}
