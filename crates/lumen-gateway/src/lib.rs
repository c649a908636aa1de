//! # Lumen Gateway
//!
//! Stateless HTTP proxy between the Lumen data marketplace and the Irys
//! decentralized storage network.
//!
//! This crate provides:
//! - **Uploads**: signed data item submission with marketplace tagging
//! - **Retrieval**: streaming proxy against the public gateway
//! - **Pricing & balance**: atomic-unit quotes and wallet info
//! - **Funding**: operational top-ups of the prepaid balance
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  HTTP Clients                       │
//! │        (marketplace frontend, curl, etc.)           │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                  Lumen Gateway                      │
//! ├─────────────────────────────────────────────────────┤
//! │  /health /info /upload /data /price /fund           │
//! ├─────────────────────────────────────────────────────┤
//! │                  lumen-irys                         │
//! │     (data item signing, node API, funding)          │
//! ├─────────────────────────────────────────────────────┤
//! │        Irys Node / Public Gateway / Solana          │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use server::{run_server, run_server_with_shutdown};
pub use state::AppState;
