use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Liveness state of a configured endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

impl UrlStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, UrlStatus::Online)
    }
}

impl fmt::Display for UrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UrlStatus::Unknown => "unknown",
            UrlStatus::Online => "online",
            UrlStatus::Offline => "offline",
        };
        f.write_str(s)
    }
}

// Endpoint categories, one list each in Settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Indexer,
    Relay,
    Explorer,
    ChatApp,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Indexer,
        Category::Relay,
        Category::Explorer,
        Category::ChatApp,
    ];

    /// Human-readable name used in messages
    pub fn label(&self) -> &'static str {
        match self {
            Category::Indexer => "indexer",
            Category::Relay => "relay",
            Category::Explorer => "explorer",
            Category::ChatApp => "chat app",
        }
    }

    /// Whether selection for this category looks at status at all
    pub fn has_status(&self) -> bool {
        !matches!(self, Category::ChatApp)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One configured endpoint with its health metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointRecord {
    pub url: String,

    /// Display name reported by a relay; empty for other categories
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub is_primary: bool,

    #[serde(default)]
    pub status: UrlStatus,

    /// Most recent probe attempt; `None` until the first one
    #[serde(default)]
    pub last_check: Option<DateTime<Utc>>,
}

impl EndpointRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: String::new(),
            is_primary: false,
            status: UrlStatus::Unknown,
            last_check: None,
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    pub fn with_status(mut self, status: UrlStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_last_check(mut self, at: DateTime<Utc>) -> Self {
        self.last_check = Some(at);
        self
    }

    /// Record a probe attempt at `now` without moving the timestamp backwards
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_check = Some(match self.last_check {
            Some(prev) if prev > now => prev,
            _ => now,
        });
    }
}

/// The full set of configured endpoints, persisted as one blob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub indexers: Vec<EndpointRecord>,
    #[serde(default)]
    pub relays: Vec<EndpointRecord>,
    #[serde(default)]
    pub explorers: Vec<EndpointRecord>,
    #[serde(default)]
    pub chat_apps: Vec<EndpointRecord>,
}

impl Settings {
    pub fn endpoints(&self, category: Category) -> &[EndpointRecord] {
        match category {
            Category::Indexer => &self.indexers,
            Category::Relay => &self.relays,
            Category::Explorer => &self.explorers,
            Category::ChatApp => &self.chat_apps,
        }
    }

    pub fn endpoints_mut(&mut self, category: Category) -> &mut Vec<EndpointRecord> {
        match category {
            Category::Indexer => &mut self.indexers,
            Category::Relay => &mut self.relays,
            Category::Explorer => &mut self.explorers,
            Category::ChatApp => &mut self.chat_apps,
        }
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.endpoints(*c).is_empty())
    }
}

/// NIP-11 relay information document; only the fields we log or store
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub software: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}
