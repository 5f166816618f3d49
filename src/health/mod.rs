//! Endpoint health tracking: probing, periodic checks, recovery and selection

pub mod checker;
pub mod notify;
pub mod prober;
pub mod selector;

pub use checker::{CheckPolicy, CycleReport, HealthChecker};
pub use notify::{ListenerId, Notifier, StatusListener};
pub use prober::{HttpProber, Prober, RelayProbe, NOSTR_JSON};
pub use selector::select_primary;
