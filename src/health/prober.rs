//! Single-endpoint liveness probes
//!
//! A probe never fails for an expected negative answer: a non-2xx response is
//! reported as `Offline`. Only transport-level anomalies (and anything we could
//! not classify) come back as a [`NetworkError`], which always implies
//! `Offline` for the probed endpoint.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, error, warn};

use crate::config::HttpClientConfig;
use crate::error::{is_transport_error, Error, NetworkError, Result};
use crate::models::{RelayInfo, UrlStatus};
use crate::utils::{indexer_probe_url, relay_info_url};

/// Media type of NIP-11 relay information documents
pub const NOSTR_JSON: &str = "application/nostr+json";

/// Outcome of a relay probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayProbe {
    pub status: UrlStatus,
    /// Display name from a decoded NIP-11 document (empty when the document
    /// has none); `None` when no document was decoded
    pub name: Option<String>,
}

impl RelayProbe {
    /// Online without a usable information document
    pub fn online() -> Self {
        Self {
            status: UrlStatus::Online,
            name: None,
        }
    }

    /// Online with a decoded information document
    pub fn with_document(name: impl Into<String>) -> Self {
        Self {
            status: UrlStatus::Online,
            name: Some(name.into()),
        }
    }

    pub fn offline() -> Self {
        Self {
            status: UrlStatus::Offline,
            name: None,
        }
    }
}

/// Performs exactly one liveness check against one endpoint
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe_indexer(&self, url: &str) -> std::result::Result<UrlStatus, NetworkError>;

    async fn probe_relay(&self, url: &str) -> std::result::Result<RelayProbe, NetworkError>;
}

/// reqwest-backed prober with a bounded per-request timeout
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(config: &HttpClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create probe client: {}", e)))?;

        Ok(Self::with_client(client))
    }

    /// Use a preconfigured client; it must carry its own timeout
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn classify(kind: &str, url: &str, err: reqwest::Error) -> NetworkError {
        if is_transport_error(&err) {
            error!(error = %err, "Network error checking {} status: {}", kind, url);
            NetworkError::connection_failed(url, err)
        } else {
            error!(error = %err, "Unexpected error checking {} status: {}", kind, url);
            NetworkError::unknown(url, err)
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe_indexer(&self, url: &str) -> std::result::Result<UrlStatus, NetworkError> {
        let probe_url = indexer_probe_url(url).map_err(|e| {
            error!(error = %e, "Invalid indexer URL: {}", url);
            NetworkError::unknown(url, e)
        })?;

        debug!("Checking indexer status: {}", probe_url);
        let response = self
            .client
            .get(probe_url)
            .send()
            .await
            .map_err(|e| Self::classify("indexer", url, e))?;

        if response.status().is_success() {
            debug!("Indexer online: {}", url);
            Ok(UrlStatus::Online)
        } else {
            warn!("Indexer check failed for {}. Status: {}", url, response.status());
            Ok(UrlStatus::Offline)
        }
    }

    async fn probe_relay(&self, url: &str) -> std::result::Result<RelayProbe, NetworkError> {
        let info_url = relay_info_url(url).map_err(|e| {
            error!(error = %e, "Invalid relay URL: {}", url);
            NetworkError::unknown(url, e)
        })?;

        debug!("Checking relay status (NIP-11): {}", info_url);
        let response = self
            .client
            .get(info_url)
            .header(ACCEPT, NOSTR_JSON)
            .send()
            .await
            .map_err(|e| Self::classify("relay", url, e))?;

        if !response.status().is_success() {
            warn!("Relay check failed for {}. Status: {}", url, response.status());
            return Ok(RelayProbe::offline());
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        match content_type.as_deref().map(media_type) {
            Some(mt) if mt.eq_ignore_ascii_case(NOSTR_JSON) || mt.eq_ignore_ascii_case("application/json") => {
                let body = match response.text().await {
                    Ok(body) => body,
                    Err(e) => {
                        warn!(error = %e, "Relay {} returned success status but the body could not be read", url);
                        return Ok(RelayProbe::online());
                    }
                };
                match serde_json::from_str::<RelayInfo>(&body) {
                    Ok(info) => {
                        debug!(
                            software = info.software.as_deref().unwrap_or(""),
                            version = info.version.as_deref().unwrap_or(""),
                            "Relay online: {}, Name: {}",
                            url,
                            info.name.as_deref().unwrap_or("")
                        );
                        Ok(RelayProbe::with_document(info.name.unwrap_or_default()))
                    }
                    Err(e) => {
                        warn!(error = %e, "Relay {} returned success status but failed to parse NIP-11 JSON", url);
                        Ok(RelayProbe::online())
                    }
                }
            }
            _ => {
                warn!(
                    "Relay {} returned success status but unexpected content type: {}",
                    url,
                    content_type.as_deref().unwrap_or("<none>")
                );
                Ok(RelayProbe::online())
            }
        }
    }
}

/// Media type without parameters, e.g. `application/json; charset=utf-8`
fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or("").trim()
}
