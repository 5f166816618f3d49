//! Primary endpoint selection
//!
//! Precedence, first match wins:
//! 1. flagged primary and online
//! 2. flagged primary
//! 3. online (first in configured order)
//! 4. first configured
//!
//! Chat apps have no status dimension and use only steps 2 and 4.

use tracing::{error, warn};

use crate::error::NetworkError;
use crate::models::{Category, EndpointRecord, Settings};

/// Pick the endpoint to use for `category` from `settings`.
///
/// An empty category is a `ConfigurationMissing` error. A result that is not
/// online is returned as a best-effort candidate, not as an error.
pub fn select_primary(
    settings: &Settings,
    category: Category,
) -> Result<&EndpointRecord, NetworkError> {
    let endpoints = settings.endpoints(category);

    let selected = if category.has_status() {
        endpoints
            .iter()
            .find(|e| e.is_primary && e.status.is_online())
            .or_else(|| endpoints.iter().find(|e| e.is_primary))
            .or_else(|| endpoints.iter().find(|e| e.status.is_online()))
            .or_else(|| endpoints.first())
    } else {
        endpoints
            .iter()
            .find(|e| e.is_primary)
            .or_else(|| endpoints.first())
    };

    let Some(selected) = selected else {
        error!("No {} URL available in settings.", category);
        return Err(NetworkError::configuration_missing(category));
    };

    if category.has_status() && !selected.status.is_online() {
        warn!(
            "Using {} {} which is currently marked as {}",
            category, selected.url, selected.status
        );
    }

    Ok(selected)
}
