//! URL utility functions

use url::Url;

/// Well-known sub-path answering with the chain height
pub const INDEXER_PROBE_PATH: &str = "api/v1/block-height/0";

/// Parse URL and extract components
pub fn parse_url(url_str: &str) -> Result<Url, url::ParseError> {
    Url::parse(url_str)
}

/// Liveness URL for an indexer, joined against its base URL
pub fn indexer_probe_url(base: &str) -> Result<Url, url::ParseError> {
    parse_url(base)?.join(INDEXER_PROBE_PATH)
}

/// NIP-11 information URL for a relay: `wss` maps to `https`, anything else to
/// `http`, keeping host and explicit port
pub fn relay_info_url(relay: &str) -> Result<Url, url::ParseError> {
    let url = parse_url(relay)?;
    let scheme = if url.scheme().eq_ignore_ascii_case("wss") {
        "https"
    } else {
        "http"
    };
    let host = url.host_str().ok_or(url::ParseError::EmptyHost)?;
    let port = url.port_or_known_default().unwrap_or(if scheme == "https" { 443 } else { 80 });

    Url::parse(&format!("{}://{}:{}/", scheme, host, port))
}

/// Host component of a configured URL, if it parses
pub fn host_of(url_str: &str) -> Option<String> {
    parse_url(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}

/// Case-insensitive host comparison between a configured URL and a host
pub fn same_host(url_str: &str, host: &str) -> bool {
    host_of(url_str)
        .map(|h| h.eq_ignore_ascii_case(host))
        .unwrap_or(false)
}
