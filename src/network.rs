//! Network (mainnet/testnet) selection

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::error::{Error, Result};
use crate::storage::NetworkStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    /// Guess the network from the URL the client is served from
    pub fn from_url_hint(url: &str) -> Self {
        let url = url.to_ascii_lowercase();
        if url.contains("test") || url.contains("localhost") {
            Network::Testnet
        } else {
            Network::Mainnet
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            other => Err(Error::Config(format!("Unknown network: {}", other))),
        }
    }
}

/// Resolve the active network. A stored choice wins, then `explicit`, then the
/// URL hint. A newly chosen network is written back to `store`.
pub fn select_network(store: &dyn NetworkStore, url: &str, explicit: Option<&str>) -> Result<Network> {
    if let Some(stored) = store.get_network()? {
        return stored.parse();
    }

    let network = match explicit {
        Some(name) => name.parse()?,
        None => Network::from_url_hint(url),
    };

    info!("Selected network {} (url hint: {})", network, url);
    store.set_network(network.name())?;
    Ok(network)
}
