//! # Lumen Irys Client
//!
//! Client for the Irys decentralized storage network, used by the Lumen
//! upload gateway.
//!
//! This crate provides:
//! - **Data item signing**: ANS-104 envelopes signed with the service's
//!   Solana wallet key
//! - **Uploads**: submission of signed items to a bundler node
//! - **Pricing & balance**: atomic-unit price quotes and prepaid balance
//!   queries
//! - **Funding**: System Program transfers to the node's deposit address,
//!   registered with the node to credit the balance
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             Gateway Handlers            │
//! ├─────────────────────────────────────────┤
//! │             Uploader Trait              │
//! ├───────────────────┬─────────────────────┤
//! │   NodeUploader    │   MemoryUploader    │
//! ├───────────────────┴─────────────────────┤
//! │        Irys Node / Solana RPC           │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use lumen_irys::{IrysConfig, NodeUploader, SolanaSigner, Tag, Uploader};
//!
//! let signer = SolanaSigner::from_base58(&secret)?;
//! let uploader = NodeUploader::new(IrysConfig::default(), signer).await?;
//! let receipt = uploader.upload(data, vec![Tag::new("Content-Type", "text/plain")]).await?;
//! ```

pub mod config;
pub mod data_item;
pub mod deep_hash;
pub mod error;
pub mod memory;
pub mod node;
pub mod signer;
pub mod solana;
pub mod tags;

pub use config::{IrysConfig, Network};
pub use data_item::{DataItem, SIG_TYPE_SOLANA};
pub use deep_hash::{deep_hash, DeepHashChunk};
pub use error::{IrysError, Result};
pub use memory::{MemoryUploader, StoredUpload, FREE_UPLOAD_LIMIT};
pub use node::NodeUploader;
pub use signer::SolanaSigner;
pub use tags::{
    decode_tags, encode_tags, validate_tags, Tag, MAX_TAGS, MAX_TAG_NAME_BYTES,
    MAX_TAG_VALUE_BYTES,
};

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Atomic units per SOL
pub const LAMPORTS_PER_SOL: u128 = 1_000_000_000;

/// Receipt for an accepted upload
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Network transaction id, usable against the public gateway
    pub id: String,
    /// Acceptance timestamp (epoch milliseconds)
    pub timestamp: u64,
}

/// Receipt for a completed funding transfer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FundReceipt {
    /// Chain transaction id of the transfer
    pub id: String,
    /// Transferred amount in atomic units
    pub amount: u64,
}

/// Trait for upload backends
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Public address of the wallet paying for uploads
    fn address(&self) -> &str;

    /// Current prepaid balance in atomic units
    async fn balance(&self) -> Result<u128>;

    /// Price in atomic units for storing `bytes` bytes
    async fn price(&self, bytes: u64) -> Result<u128>;

    /// Upload a payload with the given tags
    async fn upload(&self, data: Bytes, tags: Vec<Tag>) -> Result<UploadReceipt>;

    /// Transfer `amount` atomic units into the prepaid balance
    async fn fund(&self, amount: u64) -> Result<FundReceipt>;
}

/// Uploader backed by either a live node or process memory
pub enum FlexibleUploader {
    /// Live bundler node
    Node(NodeUploader),
    /// In-memory backend (development and tests)
    Memory(MemoryUploader),
}

impl FlexibleUploader {
    /// Check whether uploads reach the real network
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Node(_))
    }
}

#[async_trait]
impl Uploader for FlexibleUploader {
    fn address(&self) -> &str {
        match self {
            Self::Node(uploader) => uploader.address(),
            Self::Memory(uploader) => uploader.address(),
        }
    }

    async fn balance(&self) -> Result<u128> {
        match self {
            Self::Node(uploader) => uploader.balance().await,
            Self::Memory(uploader) => uploader.balance().await,
        }
    }

    async fn price(&self, bytes: u64) -> Result<u128> {
        match self {
            Self::Node(uploader) => uploader.price(bytes).await,
            Self::Memory(uploader) => uploader.price(bytes).await,
        }
    }

    async fn upload(&self, data: Bytes, tags: Vec<Tag>) -> Result<UploadReceipt> {
        match self {
            Self::Node(uploader) => uploader.upload(data, tags).await,
            Self::Memory(uploader) => uploader.upload(data, tags).await,
        }
    }

    async fn fund(&self, amount: u64) -> Result<FundReceipt> {
        match self {
            Self::Node(uploader) => uploader.fund(amount).await,
            Self::Memory(uploader) => uploader.fund(amount).await,
        }
    }
}
