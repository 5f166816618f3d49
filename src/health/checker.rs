//! Health check orchestration
//!
//! One cycle reads the settings once, probes every eligible endpoint in order
//! (indexers, then relays), and commits once at the end: the whole settings
//! value is persisted and listeners are notified only when a status changed or
//! the cycle was forced. A probe error stops the cycle after the current
//! endpoint; whatever was already applied is still committed, then the error
//! is returned.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use reqwest::StatusCode;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::HealthConfig;
use crate::error::{Error, NetworkError, Result};
use crate::health::notify::Notifier;
use crate::health::prober::Prober;
use crate::models::{Category, Settings, UrlStatus};
use crate::storage::SettingsStore;
use crate::utils::{is_stale, now, same_host, window_secs};

/// Staleness windows per probed category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckPolicy {
    pub indexer_window: Duration,
    pub relay_window: Duration,
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self {
            indexer_window: Duration::minutes(10),
            relay_window: Duration::minutes(1),
        }
    }
}

impl From<&HealthConfig> for CheckPolicy {
    fn from(config: &HealthConfig) -> Self {
        Self {
            indexer_window: window_secs(config.indexer_recheck_secs),
            relay_window: window_secs(config.relay_recheck_secs),
        }
    }
}

/// What a cycle did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Number of endpoints probed
    pub probed: usize,
    /// URLs whose status differs from before the cycle
    pub changed: Vec<String>,
    /// Whether settings were written and listeners notified
    pub persisted: bool,
}

impl CycleReport {
    pub fn status_changed(&self) -> bool {
        !self.changed.is_empty()
    }
}

pub struct HealthChecker {
    store: Arc<dyn SettingsStore>,
    prober: Arc<dyn Prober>,
    notifier: Arc<Notifier>,
    policy: CheckPolicy,
}

impl HealthChecker {
    pub fn new(
        store: Arc<dyn SettingsStore>,
        prober: Arc<dyn Prober>,
        notifier: Arc<Notifier>,
        policy: CheckPolicy,
    ) -> Self {
        Self {
            store,
            prober,
            notifier,
            policy,
        }
    }

    pub fn policy(&self) -> CheckPolicy {
        self.policy
    }

    pub fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    /// Probe stale (or, with `force`, all) indexers and relays and commit the results
    pub async fn run_check_cycle(&self, force: bool) -> Result<CycleReport> {
        let mut settings = self.store.get_settings()?;
        let mut report = CycleReport::default();

        let outcome = self.check_endpoints(&mut settings, force, &mut report).await;

        if report.status_changed() || force {
            if let Err(e) = self.commit(&settings) {
                return match outcome {
                    Err(probe_err) => {
                        error!(error = %e, "Failed to persist partial cycle results");
                        Err(probe_err.into())
                    }
                    Ok(()) => Err(e),
                };
            }
            report.persisted = true;
            info!(
                "Network service statuses updated and saved ({} probed, {} changed)",
                report.probed,
                report.changed.len()
            );
        } else {
            debug!("No status changes after probing {} endpoint(s)", report.probed);
        }

        outcome.map(|()| report).map_err(Error::from)
    }

    async fn check_endpoints(
        &self,
        settings: &mut Settings,
        force: bool,
        report: &mut CycleReport,
    ) -> std::result::Result<(), NetworkError> {
        let cycle_start = now();

        for record in settings.indexers.iter_mut() {
            if !force && !is_stale(record.last_check, cycle_start, self.policy.indexer_window) {
                continue;
            }

            let previous = record.status;
            record.touch(now());
            // Assume offline until the probe proves otherwise
            record.status = UrlStatus::Offline;
            report.probed += 1;

            let result = self.prober.probe_indexer(&record.url).await;
            if let Ok(status) = &result {
                record.status = *status;
            }
            if record.status != previous {
                report.changed.push(record.url.clone());
            }
            result?;
        }

        for record in settings.relays.iter_mut() {
            if !force && !is_stale(record.last_check, cycle_start, self.policy.relay_window) {
                continue;
            }

            let previous = record.status;
            record.touch(now());
            record.status = UrlStatus::Offline;
            report.probed += 1;

            let result = self.prober.probe_relay(&record.url).await;
            if let Ok(probe) = &result {
                record.status = probe.status;
                // Without a decoded document the last known name stays
                if let Some(name) = &probe.name {
                    record.name = name.clone();
                }
            }
            if record.status != previous {
                report.changed.push(record.url.clone());
            }
            result?;
        }

        Ok(())
    }

    /// Persist the whole settings value, then notify listeners
    fn commit(&self, settings: &Settings) -> Result<()> {
        self.store.set_settings(settings)?;
        self.notifier.notify();
        Ok(())
    }

    /// Mark the first indexer (then relay) on `host` as offline, bypassing
    /// staleness. Returns the demoted URL, or `None` when nothing matched or
    /// the match was already offline.
    pub fn demote_host(&self, host: &str) -> Result<Option<String>> {
        let mut settings = self.store.get_settings()?;

        for category in [Category::Indexer, Category::Relay] {
            let matched = settings
                .endpoints_mut(category)
                .iter_mut()
                .find(|r| same_host(&r.url, host));

            if let Some(record) = matched {
                if record.status == UrlStatus::Offline {
                    continue;
                }
                record.status = UrlStatus::Offline;
                let url = record.url.clone();
                info!("Marking {} {} as Offline due to 404.", category, url);

                self.commit(&settings)?;
                return Ok(Some(url));
            }
        }

        debug!("No online endpoint matches host {}", host);
        Ok(None)
    }

    /// Inspect a response observed while using an endpoint; a 404 demotes the
    /// endpoint serving `url`
    pub fn handle_response_status(&self, status: StatusCode, url: &Url) -> Result<Option<String>> {
        if status.is_success() {
            return Ok(None);
        }

        warn!("Non-success status {} from {}", status, url);
        if status != StatusCode::NOT_FOUND {
            return Ok(None);
        }

        match url.host_str() {
            Some(host) => self.demote_host(host),
            None => Ok(None),
        }
    }

    /// Start a forced cycle in the background. Errors are logged, never returned.
    /// Returns `None` when called outside a tokio runtime.
    pub fn spawn_recovery(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(error = %e, "Cannot schedule recovery check outside a runtime");
                return None;
            }
        };

        let checker = Arc::clone(self);
        Some(handle.spawn(async move {
            if let Err(e) = checker.run_check_cycle(true).await {
                error!(error = %e, "Error during background recovery check");
            }
        }))
    }

    /// React to an error seen while using an endpoint. Transport failures
    /// trigger a background recovery cycle; other kinds are only logged.
    pub fn handle_error(self: &Arc<Self>, err: &Error) -> Option<JoinHandle<()>> {
        if err.is_transport_failure() {
            info!(error = %err, "Transport failure, triggering background service check");
            return self.spawn_recovery();
        }

        match err.as_network() {
            Some(network) => warn!("Network error handled: {} - {}", network.kind, network.message),
            None => error!(error = %err, "Unhandled endpoint error"),
        }
        None
    }

    /// Run non-forced cycles every `interval` until `shutdown` resolves.
    /// A cycle aborted by a transport failure schedules a recovery cycle.
    pub async fn watch<F>(self: Arc<Self>, interval: StdDuration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let policy = self.policy();
        info!(
            "Starting endpoint health checks (interval={:?}, indexer window={}s, relay window={}s)",
            interval,
            policy.indexer_window.num_seconds(),
            policy.relay_window.num_seconds()
        );
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Endpoint health checks shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match self.run_check_cycle(false).await {
                        Ok(report) if report.status_changed() => {
                            info!("Status changed for: {}", report.changed.join(", "));
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!(error = %e, "Health check cycle aborted");
                            self.handle_error(&e);
                        }
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for HealthChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthChecker")
            .field("policy", &self.policy)
            .field("notifier", &self.notifier)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::health::prober::RelayProbe;
    use crate::models::EndpointRecord;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Clone)]
    enum Scripted {
        Online,
        Offline,
        Named(&'static str),
        Fail(ErrorKind),
    }

    #[derive(Default)]
    struct ScriptedProber {
        outcomes: HashMap<String, Scripted>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProber {
        fn with(mut self, url: &str, outcome: Scripted) -> Self {
            self.outcomes.insert(url.to_string(), outcome);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn outcome(&self, url: &str) -> Scripted {
            self.calls.lock().unwrap().push(url.to_string());
            self.outcomes.get(url).cloned().unwrap_or(Scripted::Online)
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe_indexer(&self, url: &str) -> std::result::Result<UrlStatus, NetworkError> {
            match self.outcome(url) {
                Scripted::Online | Scripted::Named(_) => Ok(UrlStatus::Online),
                Scripted::Offline => Ok(UrlStatus::Offline),
                Scripted::Fail(kind) => Err(NetworkError::new(kind, format!("probe of {} failed", url))),
            }
        }

        async fn probe_relay(&self, url: &str) -> std::result::Result<RelayProbe, NetworkError> {
            match self.outcome(url) {
                Scripted::Online => Ok(RelayProbe::online()),
                Scripted::Named(name) => Ok(RelayProbe::with_document(name)),
                Scripted::Offline => Ok(RelayProbe::offline()),
                Scripted::Fail(kind) => Err(NetworkError::new(kind, format!("probe of {} failed", url))),
            }
        }
    }

    /// Memory store that counts writes
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: AtomicUsize,
    }

    impl CountingStore {
        fn new(settings: Settings) -> Self {
            Self {
                inner: MemoryStore::new(settings),
                writes: AtomicUsize::new(0),
            }
        }

        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl SettingsStore for CountingStore {
        fn get_settings(&self) -> Result<Settings> {
            self.inner.get_settings()
        }

        fn set_settings(&self, settings: &Settings) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set_settings(settings)
        }
    }

    struct Harness {
        store: Arc<CountingStore>,
        prober: Arc<ScriptedProber>,
        checker: Arc<HealthChecker>,
        notifications: Arc<AtomicUsize>,
    }

    fn harness(settings: Settings, prober: ScriptedProber) -> Harness {
        let store = Arc::new(CountingStore::new(settings));
        let prober = Arc::new(prober);
        let notifier = Arc::new(Notifier::new());
        let notifications = Arc::new(AtomicUsize::new(0));
        let counter = notifications.clone();
        notifier.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let checker = Arc::new(HealthChecker::new(
            store.clone(),
            prober.clone(),
            notifier,
            CheckPolicy::default(),
        ));

        Harness {
            store,
            prober,
            checker,
            notifications,
        }
    }

    fn sample_settings() -> Settings {
        Settings {
            indexers: vec![
                EndpointRecord::new("https://indexer-a.example"),
                EndpointRecord::new("https://indexer-b.example"),
            ],
            relays: vec![EndpointRecord::new("wss://relay.example")],
            explorers: vec![EndpointRecord::new("https://explorer.example")],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_first_cycle_probes_everything_and_persists() {
        let h = harness(
            sample_settings(),
            ScriptedProber::default()
                .with("https://indexer-b.example", Scripted::Offline)
                .with("wss://relay.example", Scripted::Named("MyRelay")),
        );

        let report = h.checker.run_check_cycle(false).await.unwrap();
        assert_eq!(report.probed, 3);
        assert!(report.persisted);
        assert_eq!(h.store.writes(), 1);
        assert_eq!(h.notifications.load(Ordering::SeqCst), 1);

        let stored = h.store.get_settings().unwrap();
        assert_eq!(stored.indexers[0].status, UrlStatus::Online);
        assert_eq!(stored.indexers[1].status, UrlStatus::Offline);
        assert_eq!(stored.relays[0].status, UrlStatus::Online);
        assert_eq!(stored.relays[0].name, "MyRelay");
        assert!(stored.indexers.iter().all(|r| r.last_check.is_some()));
        // Explorers are never auto-probed
        assert_eq!(stored.explorers[0].status, UrlStatus::Unknown);
        assert!(stored.explorers[0].last_check.is_none());
        assert!(!h.prober.calls().contains(&"https://explorer.example".to_string()));
    }

    #[tokio::test]
    async fn test_second_cycle_within_window_probes_nothing() {
        let h = harness(sample_settings(), ScriptedProber::default());

        h.checker.run_check_cycle(false).await.unwrap();
        let probes_after_first = h.prober.calls().len();

        let report = h.checker.run_check_cycle(false).await.unwrap();
        assert_eq!(report.probed, 0);
        assert_eq!(h.prober.calls().len(), probes_after_first);
    }

    #[tokio::test]
    async fn test_no_change_without_force_skips_persist_and_notify() {
        let recent = now() - Duration::minutes(20);
        let settings = Settings {
            indexers: vec![EndpointRecord::new("https://indexer-a.example")
                .with_status(UrlStatus::Online)
                .with_last_check(recent)],
            ..Default::default()
        };
        let h = harness(settings, ScriptedProber::default());

        let report = h.checker.run_check_cycle(false).await.unwrap();
        assert_eq!(report.probed, 1);
        assert!(!report.persisted);
        assert_eq!(h.store.writes(), 0);
        assert_eq!(h.notifications.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_force_persists_without_changes() {
        let fresh = now();
        let settings = Settings {
            indexers: vec![EndpointRecord::new("https://indexer-a.example")
                .with_status(UrlStatus::Online)
                .with_last_check(fresh)],
            ..Default::default()
        };
        let h = harness(settings, ScriptedProber::default());

        let report = h.checker.run_check_cycle(true).await.unwrap();
        assert_eq!(report.probed, 1);
        assert!(!report.status_changed());
        assert!(report.persisted);
        assert_eq!(h.store.writes(), 1);
        assert_eq!(h.notifications.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_only_eligible_records_get_new_last_check() {
        let fresh = now() - Duration::seconds(30);
        let old = now() - Duration::minutes(11);
        let settings = Settings {
            indexers: vec![
                EndpointRecord::new("https://fresh.example").with_last_check(fresh),
                EndpointRecord::new("https://old.example").with_last_check(old),
            ],
            relays: vec![
                // 90s old: stale for relays (1 min window)
                EndpointRecord::new("wss://relay.example").with_last_check(now() - Duration::seconds(90)),
            ],
            ..Default::default()
        };
        let h = harness(settings, ScriptedProber::default());

        h.checker.run_check_cycle(false).await.unwrap();

        let stored = h.store.get_settings().unwrap();
        assert_eq!(stored.indexers[0].last_check, Some(fresh));
        assert!(stored.indexers[1].last_check.unwrap() > old);
        assert!(stored.relays[0].last_check.unwrap() > fresh);
        assert_eq!(
            h.prober.calls(),
            vec!["https://old.example".to_string(), "wss://relay.example".to_string()]
        );
    }

    #[tokio::test]
    async fn test_probe_error_aborts_cycle_but_commits_progress() {
        let h = harness(
            sample_settings(),
            ScriptedProber::default()
                .with("https://indexer-b.example", Scripted::Fail(ErrorKind::ConnectionFailed)),
        );

        let err = h.checker.run_check_cycle(false).await.unwrap_err();
        assert_eq!(err.as_network().map(|e| e.kind), Some(ErrorKind::ConnectionFailed));

        // The relay after the failing indexer was never probed
        assert_eq!(
            h.prober.calls(),
            vec![
                "https://indexer-a.example".to_string(),
                "https://indexer-b.example".to_string()
            ]
        );

        let stored = h.store.get_settings().unwrap();
        assert_eq!(stored.indexers[0].status, UrlStatus::Online);
        assert_eq!(stored.indexers[1].status, UrlStatus::Offline);
        assert!(stored.indexers[1].last_check.is_some());
        assert_eq!(stored.relays[0].status, UrlStatus::Unknown);
        assert!(stored.relays[0].last_check.is_none());
        assert_eq!(h.store.writes(), 1);
        assert_eq!(h.notifications.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_offline_relay_keeps_known_name() {
        let mut settings = Settings::default();
        let mut relay = EndpointRecord::new("wss://relay.example").with_status(UrlStatus::Online);
        relay.name = "MyRelay".to_string();
        settings.relays.push(relay);

        let h = harness(
            settings,
            ScriptedProber::default().with("wss://relay.example", Scripted::Offline),
        );

        let report = h.checker.run_check_cycle(false).await.unwrap();
        assert_eq!(report.changed, vec!["wss://relay.example".to_string()]);

        let stored = h.store.get_settings().unwrap();
        assert_eq!(stored.relays[0].status, UrlStatus::Offline);
        assert_eq!(stored.relays[0].name, "MyRelay");
    }

    fn named_relay(name: &str) -> Settings {
        let mut relay = EndpointRecord::new("wss://relay.example").with_status(UrlStatus::Online);
        relay.name = name.to_string();
        Settings {
            relays: vec![relay],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_document_without_name_clears_stored_name() {
        let h = harness(
            named_relay("OldName"),
            ScriptedProber::default().with("wss://relay.example", Scripted::Named("")),
        );

        h.checker.run_check_cycle(true).await.unwrap();

        let stored = h.store.get_settings().unwrap();
        assert_eq!(stored.relays[0].status, UrlStatus::Online);
        assert_eq!(stored.relays[0].name, "");
    }

    #[tokio::test]
    async fn test_online_without_document_keeps_stored_name() {
        let h = harness(named_relay("OldName"), ScriptedProber::default());

        h.checker.run_check_cycle(true).await.unwrap();

        assert_eq!(h.store.get_settings().unwrap().relays[0].name, "OldName");
    }

    #[tokio::test]
    async fn test_demote_host_ignores_staleness() {
        let fresh = now();
        let settings = Settings {
            indexers: vec![EndpointRecord::new("https://Indexer-A.example/api")
                .with_status(UrlStatus::Online)
                .with_last_check(fresh)],
            ..Default::default()
        };
        let h = harness(settings, ScriptedProber::default());

        let demoted = h.checker.demote_host("indexer-a.example").unwrap();
        assert_eq!(demoted.as_deref(), Some("https://Indexer-A.example/api"));

        let stored = h.store.get_settings().unwrap();
        assert_eq!(stored.indexers[0].status, UrlStatus::Offline);
        assert_eq!(stored.indexers[0].last_check, Some(fresh));
        assert_eq!(h.notifications.load(Ordering::SeqCst), 1);
        assert!(h.prober.calls().is_empty());
    }

    #[tokio::test]
    async fn test_demote_falls_through_to_relay_when_indexer_already_offline() {
        let settings = Settings {
            indexers: vec![EndpointRecord::new("https://shared.example").with_status(UrlStatus::Offline)],
            relays: vec![EndpointRecord::new("wss://shared.example").with_status(UrlStatus::Online)],
            ..Default::default()
        };
        let h = harness(settings, ScriptedProber::default());

        let demoted = h.checker.demote_host("shared.example").unwrap();
        assert_eq!(demoted.as_deref(), Some("wss://shared.example"));
    }

    #[tokio::test]
    async fn test_demote_unknown_host_is_noop() {
        let h = harness(sample_settings(), ScriptedProber::default());

        assert_eq!(h.checker.demote_host("nowhere.example").unwrap(), None);
        assert_eq!(h.store.writes(), 0);
        assert_eq!(h.notifications.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handle_response_status_only_demotes_on_404() {
        let settings = Settings {
            indexers: vec![EndpointRecord::new("https://indexer-a.example").with_status(UrlStatus::Online)],
            ..Default::default()
        };
        let h = harness(settings, ScriptedProber::default());
        let url = Url::parse("https://indexer-a.example/api/tx/abc").unwrap();

        assert_eq!(h.checker.handle_response_status(StatusCode::OK, &url).unwrap(), None);
        assert_eq!(
            h.checker
                .handle_response_status(StatusCode::INTERNAL_SERVER_ERROR, &url)
                .unwrap(),
            None
        );
        assert!(h
            .checker
            .handle_response_status(StatusCode::NOT_FOUND, &url)
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_connection_failure_triggers_forced_recovery() {
        let fresh = now();
        let settings = Settings {
            indexers: vec![EndpointRecord::new("https://indexer-a.example")
                .with_status(UrlStatus::Online)
                .with_last_check(fresh)],
            ..Default::default()
        };
        let h = harness(settings, ScriptedProber::default());

        let err: Error = NetworkError::new(ErrorKind::ConnectionFailed, "reset by peer").into();
        let handle = h.checker.handle_error(&err).expect("recovery scheduled");
        handle.await.unwrap();

        // Forced: fresh record was probed anyway and settings were committed
        assert_eq!(h.prober.calls().len(), 1);
        assert_eq!(h.store.writes(), 1);
    }

    #[tokio::test]
    async fn test_recovery_errors_are_contained() {
        let h = harness(
            sample_settings(),
            ScriptedProber::default()
                .with("https://indexer-a.example", Scripted::Fail(ErrorKind::Unknown)),
        );

        let err: Error = NetworkError::new(ErrorKind::ConnectionFailed, "timeout").into();
        let handle = h.checker.handle_error(&err).expect("recovery scheduled");
        // The task itself must not panic even though the cycle fails
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_other_error_kinds_do_not_trigger_recovery() {
        let h = harness(sample_settings(), ScriptedProber::default());

        let err: Error = NetworkError::new(ErrorKind::InvalidResponse, "garbage").into();
        assert!(h.checker.handle_error(&err).is_none());
        assert!(h.checker.handle_error(&Error::Config("bad".into())).is_none());
        assert!(h.prober.calls().is_empty());
    }

    #[test]
    fn test_policy_follows_health_config() {
        let config = HealthConfig {
            indexer_recheck_secs: 120,
            relay_recheck_secs: 15,
            ..Default::default()
        };
        let checker = HealthChecker::new(
            Arc::new(MemoryStore::default()),
            Arc::new(ScriptedProber::default()),
            Arc::new(Notifier::new()),
            CheckPolicy::from(&config),
        );

        assert_eq!(checker.policy().indexer_window, Duration::minutes(2));
        assert_eq!(checker.policy().relay_window, Duration::seconds(15));
    }

    #[tokio::test]
    async fn test_watch_stops_on_shutdown() {
        let h = harness(sample_settings(), ScriptedProber::default());

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let watcher = tokio::spawn(h.checker.clone().watch(StdDuration::from_millis(10), async move {
            let _ = rx.await;
        }));

        tokio::time::sleep(StdDuration::from_millis(50)).await;
        tx.send(()).unwrap();
        watcher.await.unwrap();

        // First tick fires immediately and probes all stale endpoints once
        assert_eq!(h.prober.calls().len(), 3);
    }
}
