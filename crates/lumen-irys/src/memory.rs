//! In-memory uploader for testing and development

use crate::tags::{validate_tags, Tag};
use crate::{FundReceipt, IrysError, Result, UploadReceipt, Uploader};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Uploads at or below this size are free, mirroring the network's free tier
pub const FREE_UPLOAD_LIMIT: u64 = 100 * 1024;

const MIN_FEE: u128 = 256;
const FEE_PER_BYTE: u128 = 10;

/// A stored upload with its tags
#[derive(Clone, Debug)]
pub struct StoredUpload {
    /// Payload bytes
    pub data: Bytes,
    /// Tags submitted with the payload
    pub tags: Vec<Tag>,
}

/// An in-memory [`Uploader`] with deterministic pricing
#[derive(Clone, Default)]
pub struct MemoryUploader {
    items: Arc<DashMap<String, StoredUpload>>,
    balance: Arc<Mutex<u128>>,
    seq: Arc<AtomicU64>,
}

impl MemoryUploader {
    /// Create an empty uploader with a zero balance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a starting balance (atomic units)
    pub fn with_balance(balance: u128) -> Self {
        let uploader = Self::new();
        *uploader.balance.lock() = balance;
        uploader
    }

    /// Fetch a stored upload by id
    pub fn get(&self, id: &str) -> Option<StoredUpload> {
        self.items.get(id).map(|entry| entry.value().clone())
    }

    /// Number of stored uploads
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing has been uploaded yet
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl Uploader for MemoryUploader {
    fn address(&self) -> &str {
        "memory-uploader"
    }

    async fn balance(&self) -> Result<u128> {
        Ok(*self.balance.lock())
    }

    async fn price(&self, bytes: u64) -> Result<u128> {
        Ok(MIN_FEE + u128::from(bytes) * FEE_PER_BYTE)
    }

    async fn upload(&self, data: Bytes, tags: Vec<Tag>) -> Result<UploadReceipt> {
        validate_tags(&tags)?;

        let size = data.len() as u64;
        if size > FREE_UPLOAD_LIMIT {
            let price = self.price(size).await?;
            let mut balance = self.balance.lock();
            if *balance < price {
                return Err(IrysError::InsufficientBalance(format!(
                    "upload costs {} but balance is {}",
                    price, *balance
                )));
            }
            *balance -= price;
        }

        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(&data);
        hasher.update(seq.to_le_bytes());
        let id = URL_SAFE_NO_PAD.encode(hasher.finalize());

        let timestamp = chrono::Utc::now().timestamp_millis() as u64;
        self.items.insert(id.clone(), StoredUpload { data, tags });

        Ok(UploadReceipt { id, timestamp })
    }

    async fn fund(&self, amount: u64) -> Result<FundReceipt> {
        *self.balance.lock() += u128::from(amount);
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        Ok(FundReceipt {
            id: format!("memory-fund-{}", seq),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_upload_and_get() {
        let uploader = MemoryUploader::new();
        let receipt = uploader
            .upload(Bytes::from_static(b"hello"), vec![Tag::new("Content-Type", "text/plain")])
            .await
            .unwrap();
        assert!(!receipt.id.is_empty());
        assert_eq!(uploader.get(&receipt.id).unwrap().data, Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn test_identical_payloads_get_distinct_ids() {
        let uploader = MemoryUploader::new();
        let a = uploader.upload(Bytes::from_static(b"same"), vec![]).await.unwrap();
        let b = uploader.upload(Bytes::from_static(b"same"), vec![]).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(uploader.len(), 2);
    }

    #[tokio::test]
    async fn test_large_upload_requires_balance() {
        let uploader = MemoryUploader::new();
        let big = Bytes::from(vec![0u8; (FREE_UPLOAD_LIMIT + 1) as usize]);
        let err = uploader.upload(big.clone(), vec![]).await.unwrap_err();
        assert!(matches!(err, IrysError::InsufficientBalance(_)));

        uploader.fund(2_000_000_000).await.unwrap();
        assert!(uploader.upload(big, vec![]).await.is_ok());
    }

    #[tokio::test]
    async fn test_fund_increases_balance() {
        let uploader = MemoryUploader::new();
        let receipt = uploader.fund(1_000).await.unwrap();
        assert_eq!(receipt.amount, 1_000);
        assert_eq!(uploader.balance().await.unwrap(), 1_000);
    }

    #[tokio::test]
    async fn test_rejects_invalid_tags() {
        let uploader = MemoryUploader::new();
        let err = uploader
            .upload(Bytes::from_static(b"x"), vec![Tag::new("", "v")])
            .await
            .unwrap_err();
        assert!(matches!(err, IrysError::InvalidTag(_)));
    }

    proptest! {
        #[test]
        fn prop_price_is_monotonic(a in 1u64..1_000_000, b in 1u64..1_000_000) {
            let uploader = MemoryUploader::new();
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let price_lo = rt.block_on(uploader.price(lo)).unwrap();
            let price_hi = rt.block_on(uploader.price(hi)).unwrap();
            prop_assert!(price_lo <= price_hi);
        }
    }
}
