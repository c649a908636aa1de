//! Application state and uploader lifecycle

use crate::config::GatewayConfig;
use lumen_irys::{
    FlexibleUploader, IrysConfig, IrysError, MemoryUploader, NodeUploader, SolanaSigner, Uploader,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    /// Gateway configuration
    pub config: GatewayConfig,
    /// Client for public-gateway fetches
    pub http: reqwest::Client,
    /// Lazily initialized uploader; see [`AppState::uploader`]
    uploader: OnceCell<Arc<FlexibleUploader>>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        Ok(Self {
            config,
            http,
            uploader: OnceCell::new(),
        })
    }

    /// Get the uploader, initializing it on first use.
    ///
    /// Concurrent cold-start callers all await one in-flight construction;
    /// a failed construction leaves the cell unset so the next request
    /// retries from scratch.
    pub async fn uploader(&self) -> Result<Arc<FlexibleUploader>, IrysError> {
        let uploader = self
            .uploader
            .get_or_try_init(|| self.build_uploader())
            .await?;
        Ok(Arc::clone(uploader))
    }

    async fn build_uploader(&self) -> Result<Arc<FlexibleUploader>, IrysError> {
        if self.config.use_memory_uploader {
            warn!("using in-memory uploader - uploads will NOT reach the network!");
            return Ok(Arc::new(FlexibleUploader::Memory(MemoryUploader::new())));
        }

        let secret = self.config.private_key.as_deref().ok_or_else(|| {
            IrysError::Configuration("IRYS_PRIVATE_KEY is not set".to_string())
        })?;
        let signer = SolanaSigner::from_base58(secret)?;

        let mut irys_config = IrysConfig::new(self.config.network)
            .with_timeout(Duration::from_secs(self.config.upstream_timeout_secs));
        if let Some(url) = &self.config.node_url {
            irys_config = irys_config.with_node_url(url);
        }
        if let Some(url) = &self.config.rpc_url {
            irys_config = irys_config.with_rpc_url(url);
        }

        info!(network = %self.config.network, "initializing irys uploader");
        let uploader = NodeUploader::new(irys_config, signer).await?;
        info!(address = %uploader.address(), "irys uploader initialized");

        Ok(Arc::new(FlexibleUploader::Node(uploader)))
    }
}
