//! Configuration loading

pub mod settings;

pub use settings::{
    HealthConfig, HttpClientConfig, LoggingConfig, MonitorConfig, RuntimeConfig, StorageConfig,
};
