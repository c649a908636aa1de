//! Bundler node HTTP client
//!
//! Speaks the Irys node's public API: pricing, balance queries, data item
//! submission, and balance funding. One `NodeUploader` wraps one wallet and
//! one node; the gateway holds it for the life of the process.

use crate::data_item::DataItem;
use crate::solana::{build_transfer, decode_pubkey, SolanaRpc};
use crate::tags::Tag;
use crate::{FundReceipt, IrysConfig, IrysError, Result, SolanaSigner, UploadReceipt, Uploader};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Token ticker used in node API paths
const TOKEN: &str = "solana";

/// HTTP implementation of [`Uploader`] against an Irys bundler node
#[derive(Debug)]
pub struct NodeUploader {
    client: Client,
    config: IrysConfig,
    signer: SolanaSigner,
    node_url: String,
    rpc: SolanaRpc,
}

impl NodeUploader {
    /// Connect to the configured node.
    ///
    /// Performs a balance probe for the wallet address as a readiness
    /// check, so an unreachable node or a broken key fails here rather
    /// than on the first upload.
    pub async fn new(config: IrysConfig, signer: SolanaSigner) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IrysError::Connection(e.to_string()))?;

        let node_url = config.resolved_node_url().trim_end_matches('/').to_string();
        let rpc = SolanaRpc::new(client.clone(), config.resolved_rpc_url());

        let uploader = Self {
            client,
            config,
            signer,
            node_url,
            rpc,
        };

        let balance = uploader.fetch_balance().await?;
        info!(
            address = %uploader.signer.address(),
            balance,
            network = %uploader.config.network,
            "irys uploader ready"
        );

        Ok(uploader)
    }

    /// The configured network
    pub fn network(&self) -> crate::Network {
        self.config.network
    }

    async fn fetch_balance(&self) -> Result<u128> {
        let url = format!(
            "{}/account/balance/{}?address={}",
            self.node_url,
            TOKEN,
            self.signer.address()
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IrysError::NodeApi(format!(
                "balance query returned {}: {}",
                status, body
            )));
        }

        let body: BalanceResponse = response.json().await.map_err(IrysError::from)?;
        parse_amount(&body.balance)
    }

    async fn node_info(&self) -> Result<NodeInfo> {
        let url = format!("{}/info", self.node_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(IrysError::NodeApi(format!(
                "info query returned {}",
                response.status()
            )));
        }

        response.json().await.map_err(IrysError::from)
    }
}

#[async_trait]
impl Uploader for NodeUploader {
    fn address(&self) -> &str {
        self.signer.address()
    }

    async fn balance(&self) -> Result<u128> {
        self.fetch_balance().await
    }

    #[instrument(skip(self))]
    async fn price(&self, bytes: u64) -> Result<u128> {
        let url = format!("{}/price/{}/{}", self.node_url, TOKEN, bytes);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(IrysError::NodeApi(format!(
                "price query returned {}",
                response.status()
            )));
        }

        let body = response.text().await.map_err(IrysError::from)?;
        body.trim().parse::<u128>().map_err(|_| {
            IrysError::NodeApi(format!("unparseable price response: {}", body.trim()))
        })
    }

    #[instrument(skip(self, data, tags), fields(size = data.len(), tags = tags.len()))]
    async fn upload(&self, data: Bytes, tags: Vec<Tag>) -> Result<UploadReceipt> {
        let item = DataItem::build_and_sign(&self.signer, &data, &tags, None)?;
        debug!(id = %item.id, size = item.len(), "submitting data item");

        let url = format!("{}/tx/{}", self.node_url, TOKEN);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(item.into_bytes())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::PAYMENT_REQUIRED {
            let body = response.text().await.unwrap_or_default();
            return Err(IrysError::InsufficientBalance(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IrysError::NodeApi(format!(
                "upload returned {}: {}",
                status, body
            )));
        }

        let body: UploadResponse = response.json().await.map_err(IrysError::from)?;
        Ok(UploadReceipt {
            id: body.id,
            timestamp: body.timestamp,
        })
    }

    #[instrument(skip(self))]
    async fn fund(&self, amount: u64) -> Result<FundReceipt> {
        let info = self.node_info().await?;
        let deposit = info.addresses.get(TOKEN).ok_or_else(|| {
            IrysError::NodeApi("node advertises no solana deposit address".to_string())
        })?;
        let recipient = decode_pubkey(deposit)?;

        let blockhash = self.rpc.latest_blockhash().await?;
        let (transaction, _) = build_transfer(&self.signer, &recipient, amount, &blockhash)?;
        let tx_id = self.rpc.send_transaction(&transaction).await?;
        debug!(%tx_id, amount, "transfer submitted, registering with node");

        // The node credits the balance once it has seen the transfer.
        let url = format!("{}/account/balance/{}", self.node_url, TOKEN);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "tx_id": tx_id }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IrysError::NodeApi(format!(
                "funding registration returned {}: {}",
                status, body
            )));
        }

        Ok(FundReceipt { id: tx_id, amount })
    }
}

/// Numeric amounts arrive as strings or bare numbers depending on size
fn parse_amount(value: &serde_json::Value) -> Result<u128> {
    match value {
        serde_json::Value::String(s) => s
            .parse::<u128>()
            .map_err(|_| IrysError::NodeApi(format!("unparseable amount: {}", s))),
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| IrysError::NodeApi(format!("unparseable amount: {}", n))),
        other => Err(IrysError::NodeApi(format!("unparseable amount: {}", other))),
    }
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: String,
    #[serde(default)]
    timestamp: u64,
}

/// Node identity and deposit addresses, from `GET /info`
#[derive(Debug, Deserialize)]
struct NodeInfo {
    #[serde(default)]
    addresses: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_amount_accepts_strings_and_numbers() {
        assert_eq!(parse_amount(&json!("123")).unwrap(), 123);
        assert_eq!(parse_amount(&json!(456)).unwrap(), 456);
        assert!(parse_amount(&json!("12.5")).is_err());
        assert!(parse_amount(&json!(null)).is_err());
    }
}
