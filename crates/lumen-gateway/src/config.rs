//! Gateway configuration

use lumen_irys::Network;

/// Tag value identifying uploads from this deployment
pub const APP_NAME: &str = "Lumen-Protocol-v1";

/// Gateway server configuration
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Target Irys network
    pub network: Network,
    /// Wallet private key (base58); required unless using the memory uploader
    pub private_key: Option<String>,
    /// Solana RPC URL override
    pub rpc_url: Option<String>,
    /// Bundler node URL override
    pub node_url: Option<String>,
    /// Public gateway base for retrieval URLs
    pub gateway_url: String,
    /// Use an in-memory uploader (testing/development)
    pub use_memory_uploader: bool,
    /// Maximum request body size (bytes)
    pub max_body_size: usize,
    /// Timeout for public-gateway fetches (seconds)
    pub upstream_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            network: Network::Devnet,
            private_key: None,
            rpc_url: None,
            node_url: None,
            gateway_url: "https://gateway.irys.xyz".to_string(),
            use_memory_uploader: false,
            max_body_size: 50 * 1024 * 1024, // 50 MB
            upstream_timeout_secs: 30,
        }
    }
}

impl GatewayConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Public retrieval URL for a transaction id
    pub fn data_url(&self, tx_id: &str) -> String {
        format!("{}/{}", self.gateway_url.trim_end_matches('/'), tx_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_handles_trailing_slash() {
        let mut config = GatewayConfig::default();
        config.gateway_url = "https://gateway.irys.xyz/".to_string();
        assert_eq!(config.data_url("abc"), "https://gateway.irys.xyz/abc");
    }
}
