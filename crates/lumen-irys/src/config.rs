//! Client configuration

use crate::{IrysError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Target Irys network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    /// Production network (uploads are permanent and billed)
    Mainnet,
    /// Development network (uploads are pruned after ~60 days)
    Devnet,
}

impl Network {
    /// Default bundler node URL for this network
    pub fn node_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://uploader.irys.xyz",
            Network::Devnet => "https://devnet.irys.xyz",
        }
    }

    /// Default Solana RPC URL for this network
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://api.mainnet-beta.solana.com",
            Network::Devnet => "https://api.devnet.solana.com",
        }
    }

    /// Public retrieval gateway (shared by both networks)
    pub fn gateway_url(&self) -> &'static str {
        "https://gateway.irys.xyz"
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Devnet => write!(f, "devnet"),
        }
    }
}

impl FromStr for Network {
    type Err = IrysError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "devnet" => Ok(Network::Devnet),
            other => Err(IrysError::Configuration(format!(
                "unknown network '{}', expected 'mainnet' or 'devnet'",
                other
            ))),
        }
    }
}

/// Configuration for the Irys client
#[derive(Clone, Debug)]
pub struct IrysConfig {
    /// Target network
    pub network: Network,
    /// Bundler node URL override (defaults to the network's node)
    pub node_url: Option<String>,
    /// Solana RPC URL override (defaults to the network's public RPC)
    pub rpc_url: Option<String>,
    /// Request timeout for node and RPC calls
    pub timeout: Duration,
}

impl Default for IrysConfig {
    fn default() -> Self {
        Self {
            network: Network::Devnet,
            node_url: None,
            rpc_url: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl IrysConfig {
    /// Create a config for the given network
    pub fn new(network: Network) -> Self {
        Self {
            network,
            ..Default::default()
        }
    }

    /// Override the bundler node URL
    pub fn with_node_url(mut self, url: impl Into<String>) -> Self {
        self.node_url = Some(url.into());
        self
    }

    /// Override the Solana RPC URL
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bundler node URL after applying overrides
    pub fn resolved_node_url(&self) -> &str {
        self.node_url
            .as_deref()
            .unwrap_or_else(|| self.network.node_url())
    }

    /// Solana RPC URL after applying overrides
    pub fn resolved_rpc_url(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.network.rpc_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_from_str() {
        assert_eq!("devnet".parse::<Network>().unwrap(), Network::Devnet);
        assert_eq!("MAINNET".parse::<Network>().unwrap(), Network::Mainnet);
        assert!("testnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = IrysConfig::default();
        assert_eq!(config.network, Network::Devnet);
        assert_eq!(config.resolved_node_url(), "https://devnet.irys.xyz");
        assert_eq!(config.resolved_rpc_url(), "https://api.devnet.solana.com");
    }

    #[test]
    fn test_config_overrides() {
        let config = IrysConfig::new(Network::Mainnet)
            .with_node_url("http://localhost:1984")
            .with_rpc_url("http://localhost:8899");
        assert_eq!(config.resolved_node_url(), "http://localhost:1984");
        assert_eq!(config.resolved_rpc_url(), "http://localhost:8899");
    }
}
