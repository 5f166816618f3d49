//! Client-facing endpoint service
//!
//! Wires a store, a prober and the health checker together and answers "which
//! endpoint should I use" for every category.

use std::sync::Arc;

use reqwest::StatusCode;
use tokio::task::JoinHandle;
use tracing::info;
use url::Url;

use crate::config::MonitorConfig;
use crate::error::{Error, Result};
use crate::health::{
    select_primary, CheckPolicy, CycleReport, HealthChecker, HttpProber, ListenerId, Notifier, Prober,
};
use crate::models::{Category, EndpointRecord, Settings};
use crate::network::{select_network, Network};
use crate::storage::{NetworkStore, SettingsStore, YamlFileStore};

pub struct NetworkService {
    settings: Arc<dyn SettingsStore>,
    networks: Arc<dyn NetworkStore>,
    checker: Arc<HealthChecker>,
}

impl NetworkService {
    pub fn new<S>(store: Arc<S>, prober: Arc<dyn Prober>, policy: CheckPolicy) -> Self
    where
        S: SettingsStore + NetworkStore + 'static,
    {
        let settings: Arc<dyn SettingsStore> = store.clone();
        let checker = Arc::new(HealthChecker::new(
            settings.clone(),
            prober,
            Arc::new(Notifier::new()),
            policy,
        ));

        Self {
            settings,
            networks: store,
            checker,
        }
    }

    /// File-backed service with an HTTP prober, as configured
    pub fn from_config(config: &MonitorConfig) -> Result<Self> {
        let store = Arc::new(YamlFileStore::new(&config.storage.settings_path));
        let prober = Arc::new(HttpProber::new(&config.http_client)?);
        info!("Using endpoint settings at {}", store.path().display());

        Ok(Self::new(store, prober, CheckPolicy::from(&config.health)))
    }

    pub fn checker(&self) -> &Arc<HealthChecker> {
        &self.checker
    }

    pub fn settings(&self) -> Result<Settings> {
        self.settings.get_settings()
    }

    pub async fn check_services(&self, force: bool) -> Result<CycleReport> {
        self.checker.run_check_cycle(force).await
    }

    /// Selected endpoint for `category`, as an owned snapshot
    pub fn primary(&self, category: Category) -> Result<EndpointRecord> {
        let settings = self.settings.get_settings()?;
        let selected = select_primary(&settings, category)?;
        Ok(selected.clone())
    }

    pub fn primary_indexer(&self) -> Result<EndpointRecord> {
        self.primary(Category::Indexer)
    }

    pub fn primary_relay(&self) -> Result<EndpointRecord> {
        self.primary(Category::Relay)
    }

    pub fn primary_explorer(&self) -> Result<EndpointRecord> {
        self.primary(Category::Explorer)
    }

    pub fn primary_chat_app(&self) -> Result<EndpointRecord> {
        self.primary(Category::ChatApp)
    }

    /// All configured relays, whatever their status; empty when none are set
    pub fn relays(&self) -> Result<Vec<EndpointRecord>> {
        Ok(self.settings.get_settings()?.relays)
    }

    pub fn handle_response_status(&self, status: StatusCode, url: &Url) -> Result<Option<String>> {
        self.checker.handle_response_status(status, url)
    }

    pub fn demote_host(&self, host: &str) -> Result<Option<String>> {
        self.checker.demote_host(host)
    }

    pub fn handle_error(&self, err: &Error) -> Option<JoinHandle<()>> {
        self.checker.handle_error(err)
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.checker.notifier().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.checker.notifier().unsubscribe(id)
    }

    pub fn check_and_set_network(&self, url: &str, explicit: Option<&str>) -> Result<Network> {
        select_network(self.networks.as_ref(), url, explicit)
    }

    /// Overwrite the stored network choice
    pub fn set_network(&self, network: Network) -> Result<()> {
        self.networks.set_network(network.name())
    }
}
