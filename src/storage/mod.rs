//! Settings persistence backends
//!
//! The health core only needs whole-blob reads and writes of [`Settings`];
//! each call is treated as atomic and there is no transactionality across calls.

use crate::error::{Error, Result};
use crate::models::Settings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use tracing::debug;

/// Persists and retrieves the full set of configured endpoints
pub trait SettingsStore: Send + Sync {
    fn get_settings(&self) -> Result<Settings>;
    fn set_settings(&self, settings: &Settings) -> Result<()>;
}

/// Persists the selected network name
pub trait NetworkStore: Send + Sync {
    fn get_network(&self) -> Result<Option<String>>;
    fn set_network(&self, name: &str) -> Result<()>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: RwLock<Settings>,
    network: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
            network: RwLock::new(None),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn get_settings(&self) -> Result<Settings> {
        let settings = self
            .settings
            .read()
            .map_err(|_| Error::Storage("settings lock poisoned".into()))?;
        Ok(settings.clone())
    }

    fn set_settings(&self, settings: &Settings) -> Result<()> {
        let mut current = self
            .settings
            .write()
            .map_err(|_| Error::Storage("settings lock poisoned".into()))?;
        *current = settings.clone();
        Ok(())
    }
}

impl NetworkStore for MemoryStore {
    fn get_network(&self) -> Result<Option<String>> {
        let network = self
            .network
            .read()
            .map_err(|_| Error::Storage("network lock poisoned".into()))?;
        Ok(network.clone())
    }

    fn set_network(&self, name: &str) -> Result<()> {
        let mut network = self
            .network
            .write()
            .map_err(|_| Error::Storage("network lock poisoned".into()))?;
        *network = Some(name.to_string());
        Ok(())
    }
}

/// On-disk document written by [`YamlFileStore`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredState {
    #[serde(default)]
    network: Option<String>,
    #[serde(default)]
    settings: Settings,
}

/// YAML file store; a missing file reads as empty settings
#[derive(Debug)]
pub struct YamlFileStore {
    path: PathBuf,
    // Serializes read-modify-write of the document within this process
    io: Mutex<()>,
}

impl YamlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_state(&self) -> Result<StoredState> {
        if !self.path.exists() {
            debug!("Settings file {} not found, starting empty", self.path.display());
            return Ok(StoredState::default());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(StoredState::default());
        }
        Ok(serde_yaml::from_str(&contents)?)
    }

    fn write_state(&self, state: &StoredState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_yaml::to_string(state)?;
        // Write-then-rename so readers never see a half-written document
        let tmp = self.path.with_extension("yml.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!("Settings written to {}", self.path.display());
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.io
            .lock()
            .map_err(|_| Error::Storage(format!("{} lock poisoned", self.path.display())))
    }
}

impl SettingsStore for YamlFileStore {
    fn get_settings(&self) -> Result<Settings> {
        let _guard = self.lock()?;
        Ok(self.read_state()?.settings)
    }

    fn set_settings(&self, settings: &Settings) -> Result<()> {
        let _guard = self.lock()?;
        let mut state = self.read_state()?;
        state.settings = settings.clone();
        self.write_state(&state)
    }
}

impl NetworkStore for YamlFileStore {
    fn get_network(&self) -> Result<Option<String>> {
        let _guard = self.lock()?;
        Ok(self.read_state()?.network)
    }

    fn set_network(&self, name: &str) -> Result<()> {
        let _guard = self.lock()?;
        let mut state = self.read_state()?;
        state.network = Some(name.to_string());
        self.write_state(&state)
    }
}
