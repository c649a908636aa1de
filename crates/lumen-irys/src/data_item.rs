//! Signed ANS-104 data items
//!
//! A data item is the unit the bundler node accepts: a signed envelope of
//! owner, optional target/anchor, tags, and payload. The node batches items
//! into chain-level bundles; the item id is derived from the signature, so
//! it is known before the node responds.

use crate::deep_hash::{deep_hash, DeepHashChunk};
use crate::tags::{encode_tags, validate_tags, Tag};
use crate::{Result, SolanaSigner};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

/// ANS-104 signature type for ed25519/Solana wallets
pub const SIG_TYPE_SOLANA: u16 = 4;
/// ed25519 signature length
pub const SIGNATURE_LENGTH: usize = 64;
/// ed25519 public key length
pub const OWNER_LENGTH: usize = 32;

/// A fully signed data item, ready to POST to the bundler node
pub struct DataItem {
    /// Item id: base64url(sha256(signature)), assigned before submission
    pub id: String,
    bytes: Vec<u8>,
}

impl DataItem {
    /// Build and sign a data item over `data` with the given tags.
    ///
    /// `anchor` defaults to 32 random bytes so that identical payloads
    /// produce distinct items; pass a fixed anchor only when determinism is
    /// wanted (tests).
    pub fn build_and_sign(
        signer: &SolanaSigner,
        data: &[u8],
        tags: &[Tag],
        anchor: Option<[u8; 32]>,
    ) -> Result<Self> {
        validate_tags(tags)?;

        let anchor = anchor.unwrap_or_else(rand::random);
        let tag_bytes = encode_tags(tags);
        let owner = signer.public_key();
        let sig_type_str = SIG_TYPE_SOLANA.to_string();

        let message = deep_hash(&DeepHashChunk::List(vec![
            DeepHashChunk::Blob(b"dataitem"),
            DeepHashChunk::Blob(b"1"),
            DeepHashChunk::Blob(sig_type_str.as_bytes()),
            DeepHashChunk::Blob(&owner),
            DeepHashChunk::Blob(b""), // no target
            DeepHashChunk::Blob(&anchor),
            DeepHashChunk::Blob(&tag_bytes),
            DeepHashChunk::Blob(data),
        ]));

        let signature = signer.sign(&message);
        let id = URL_SAFE_NO_PAD.encode(Sha256::digest(signature));

        let mut bytes = Vec::with_capacity(
            2 + SIGNATURE_LENGTH + OWNER_LENGTH + 2 + 32 + 16 + tag_bytes.len() + data.len(),
        );
        bytes.extend_from_slice(&SIG_TYPE_SOLANA.to_le_bytes());
        bytes.extend_from_slice(&signature);
        bytes.extend_from_slice(&owner);
        bytes.push(0); // target absent
        bytes.push(1); // anchor present
        bytes.extend_from_slice(&anchor);
        bytes.extend_from_slice(&(tags.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&(tag_bytes.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&tag_bytes);
        bytes.extend_from_slice(data);

        Ok(Self { id, bytes })
    }

    /// Serialized wire bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume into the wire bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Total serialized size
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the item is empty (never true for a signed item)
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    fn test_signer() -> SolanaSigner {
        SolanaSigner::from_seed([11u8; 32])
    }

    fn test_tags() -> Vec<Tag> {
        vec![
            Tag::new("Content-Type", "text/plain"),
            Tag::new("App-Name", "Lumen-Protocol-v1"),
        ]
    }

    #[test]
    fn test_wire_layout() {
        let signer = test_signer();
        let data = b"hello world";
        let item =
            DataItem::build_and_sign(&signer, data, &test_tags(), Some([5u8; 32])).unwrap();
        let bytes = item.as_bytes();

        // signature type, little-endian
        assert_eq!(&bytes[..2], &[4, 0]);
        // owner follows the signature
        assert_eq!(&bytes[2 + 64..2 + 64 + 32], &signer.public_key());
        // target absent, anchor present
        assert_eq!(bytes[98], 0);
        assert_eq!(bytes[99], 1);
        assert_eq!(&bytes[100..132], &[5u8; 32]);
        // tag count
        assert_eq!(&bytes[132..140], &2u64.to_le_bytes());
        // payload is the tail
        assert!(bytes.ends_with(data));
    }

    #[test]
    fn test_signature_verifies_over_deep_hash() {
        let signer = test_signer();
        let data = b"payload";
        let tags = test_tags();
        let anchor = [9u8; 32];
        let item = DataItem::build_and_sign(&signer, data, &tags, Some(anchor)).unwrap();

        let owner = signer.public_key();
        let tag_bytes = encode_tags(&tags);
        let message = deep_hash(&DeepHashChunk::List(vec![
            DeepHashChunk::Blob(b"dataitem"),
            DeepHashChunk::Blob(b"1"),
            DeepHashChunk::Blob(b"4"),
            DeepHashChunk::Blob(&owner),
            DeepHashChunk::Blob(b""),
            DeepHashChunk::Blob(&anchor),
            DeepHashChunk::Blob(&tag_bytes),
            DeepHashChunk::Blob(data),
        ]));

        let sig_bytes: &[u8; 64] = item.as_bytes()[2..66].try_into().unwrap();
        let signature = Signature::from_bytes(sig_bytes);
        let verifying_key = VerifyingKey::from_bytes(&owner).unwrap();
        assert!(verifying_key.verify(&message, &signature).is_ok());
    }

    #[test]
    fn test_id_is_base64url_of_signature_hash() {
        let item =
            DataItem::build_and_sign(&test_signer(), b"x", &[], Some([0u8; 32])).unwrap();
        let expected = URL_SAFE_NO_PAD.encode(Sha256::digest(&item.as_bytes()[2..66]));
        assert_eq!(item.id, expected);
        assert_eq!(item.id.len(), 43);
    }

    #[test]
    fn test_random_anchor_gives_distinct_ids() {
        let signer = test_signer();
        let a = DataItem::build_and_sign(&signer, b"same", &[], None).unwrap();
        let b = DataItem::build_and_sign(&signer, b"same", &[], None).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_fixed_anchor_is_deterministic() {
        let signer = test_signer();
        let a = DataItem::build_and_sign(&signer, b"same", &[], Some([1u8; 32])).unwrap();
        let b = DataItem::build_and_sign(&signer, b"same", &[], Some([1u8; 32])).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_invalid_tags_rejected() {
        let err = DataItem::build_and_sign(&test_signer(), b"x", &[Tag::new("", "v")], None);
        assert!(err.is_err());
    }
}
