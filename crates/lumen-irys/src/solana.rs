//! Minimal Solana leg for funding the prepaid balance
//!
//! Funding an Irys account means transferring lamports to the node's
//! deposit address on-chain and then registering the transfer with the
//! node. This module covers the chain half: a System Program transfer
//! built and signed locally, submitted over JSON-RPC.

use crate::{IrysError, Result, SolanaSigner};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, instrument};

/// System Program address (all zeros)
const SYSTEM_PROGRAM: [u8; 32] = [0u8; 32];
/// System Program instruction index for Transfer
const TRANSFER_INSTRUCTION: u32 = 2;

/// Decode a base58 Solana address into raw key bytes
pub fn decode_pubkey(address: &str) -> Result<[u8; 32]> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| IrysError::Chain(format!("invalid address '{}': {}", address, e)))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| IrysError::Chain(format!("address '{}' is not 32 bytes", address)))
}

/// Solana shortvec (compact-u16) length encoding
fn encode_shortvec(len: usize, out: &mut Vec<u8>) {
    let mut rem = len as u16;
    loop {
        let byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

/// Build and sign a legacy transfer transaction.
///
/// Returns the wire-encoded transaction and its base58 signature (the
/// transaction id the node expects when crediting the balance).
pub fn build_transfer(
    signer: &SolanaSigner,
    recipient: &[u8; 32],
    lamports: u64,
    recent_blockhash: &[u8; 32],
) -> Result<(Vec<u8>, String)> {
    let payer = signer.public_key();
    if &payer == recipient {
        return Err(IrysError::Chain(
            "deposit address equals the service wallet address".to_string(),
        ));
    }

    // Message: header, account keys, blockhash, instructions
    let mut message = Vec::with_capacity(3 + 1 + 96 + 32 + 24);
    message.extend_from_slice(&[1, 0, 1]); // 1 signer, 0 readonly signed, 1 readonly unsigned
    encode_shortvec(3, &mut message);
    message.extend_from_slice(&payer);
    message.extend_from_slice(recipient);
    message.extend_from_slice(&SYSTEM_PROGRAM);
    message.extend_from_slice(recent_blockhash);

    encode_shortvec(1, &mut message);
    message.push(2); // program id index
    encode_shortvec(2, &mut message);
    message.extend_from_slice(&[0, 1]); // from, to
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&TRANSFER_INSTRUCTION.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    encode_shortvec(data.len(), &mut message);
    message.extend_from_slice(&data);

    let signature = signer.sign(&message);

    let mut transaction = Vec::with_capacity(1 + 64 + message.len());
    encode_shortvec(1, &mut transaction);
    transaction.extend_from_slice(&signature);
    transaction.extend_from_slice(&message);

    Ok((transaction, bs58::encode(signature).into_string()))
}

/// Thin JSON-RPC client for the two calls funding needs
#[derive(Clone, Debug)]
pub struct SolanaRpc {
    client: Client,
    url: String,
}

impl SolanaRpc {
    /// Create a client against the given RPC endpoint
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Fetch the latest finalized blockhash
    #[instrument(skip(self))]
    pub async fn latest_blockhash(&self) -> Result<[u8; 32]> {
        let result = self
            .call("getLatestBlockhash", json!([{"commitment": "finalized"}]))
            .await?;
        let blockhash = result
            .pointer("/value/blockhash")
            .and_then(Value::as_str)
            .ok_or_else(|| IrysError::Chain("malformed getLatestBlockhash response".to_string()))?;
        decode_pubkey(blockhash)
    }

    /// Submit a wire-encoded transaction, returning its signature
    #[instrument(skip(self, transaction), fields(size = transaction.len()))]
    pub async fn send_transaction(&self, transaction: &[u8]) -> Result<String> {
        let encoded = BASE64.encode(transaction);
        let result = self
            .call("sendTransaction", json!([encoded, {"encoding": "base64"}]))
            .await?;
        result
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| IrysError::Chain("malformed sendTransaction response".to_string()))
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self.client.post(&self.url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(IrysError::Chain(format!(
                "RPC returned {}",
                response.status()
            )));
        }

        let mut value: Value = response.json().await.map_err(IrysError::from)?;
        if let Some(error) = value.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown RPC error");
            return Err(IrysError::Chain(format!("{} failed: {}", method, message)));
        }

        debug!(method, "RPC call succeeded");
        Ok(value["result"].take())
    }
}
