//! Lumen Gateway - Irys upload proxy for the Lumen data marketplace

use clap::Parser;
use lumen_gateway::{run_server, GatewayConfig};
use lumen_irys::Network;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "lumen-gateway")]
#[command(about = "Upload gateway bridging the Lumen marketplace onto the Irys storage network")]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "GATEWAY_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3001", env = "IRYS_SERVICE_PORT")]
    port: u16,

    /// Service wallet private key (base58)
    #[arg(long, env = "IRYS_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Irys network (devnet or mainnet)
    #[arg(long, default_value = "devnet", env = "IRYS_NETWORK")]
    network: Network,

    /// Custom Solana RPC endpoint
    #[arg(long, env = "SOLANA_RPC_URL")]
    rpc_url: Option<String>,

    /// Bundler node URL override
    #[arg(long, env = "IRYS_NODE_URL")]
    node_url: Option<String>,

    /// Public gateway base for retrieval URLs
    #[arg(long, default_value = "https://gateway.irys.xyz", env = "IRYS_GATEWAY_URL")]
    gateway_url: String,

    /// Use an in-memory uploader (for testing, uploads will not persist)
    #[arg(long, env = "LUMEN_MEMORY_UPLOADER")]
    memory_uploader: bool,

    /// Enable debug logging
    #[arg(short, long, env = "LUMEN_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Parse arguments
    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("lumen_gateway={},lumen_irys={},tower_http=debug", log_level, log_level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting Lumen Gateway on {}:{} ({})",
        args.host,
        args.port,
        args.network
    );

    if args.memory_uploader {
        tracing::warn!("⚠️  Using in-memory uploader - uploads will NOT reach the network!");
    } else if args.private_key.is_none() {
        tracing::warn!("⚠️  IRYS_PRIVATE_KEY is not set - uploads will fail until it is");
    }

    // Build configuration
    let config = GatewayConfig {
        host: args.host,
        port: args.port,
        network: args.network,
        private_key: args.private_key,
        rpc_url: args.rpc_url,
        node_url: args.node_url,
        gateway_url: args.gateway_url,
        use_memory_uploader: args.memory_uploader,
        ..Default::default()
    };

    // Run the server
    run_server(config).await
}
