//! Solana-style ed25519 signing keys

use crate::{IrysError, Result};
use ed25519_dalek::{Signer as _, SigningKey};

/// An ed25519 signer holding the service wallet key.
///
/// Accepts the two encodings Solana tooling produces: a base58 64-byte
/// keypair (secret seed followed by the public key) or a base58 32-byte seed.
pub struct SolanaSigner {
    signing_key: SigningKey,
    address: String,
}

impl SolanaSigner {
    /// Parse a signer from a base58-encoded secret key
    pub fn from_base58(secret: &str) -> Result<Self> {
        let bytes = bs58::decode(secret.trim())
            .into_vec()
            .map_err(|e| IrysError::InvalidKey(format!("not valid base58: {}", e)))?;

        let seed: [u8; 32] = match bytes.len() {
            32 => bytes.as_slice().try_into().unwrap(),
            64 => {
                let seed: [u8; 32] = bytes[..32].try_into().unwrap();
                let signer = Self::from_seed(seed);
                // The trailing 32 bytes of a keypair are the public key;
                // a mismatch means a corrupted or truncated secret.
                if signer.public_key() != bytes[32..] {
                    return Err(IrysError::InvalidKey(
                        "public key half does not match the secret seed".to_string(),
                    ));
                }
                return Ok(signer);
            }
            n => {
                return Err(IrysError::InvalidKey(format!(
                    "expected 32 or 64 bytes, got {}",
                    n
                )))
            }
        };

        Ok(Self::from_seed(seed))
    }

    /// Build a signer from a raw 32-byte seed
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        let address = bs58::encode(signing_key.verifying_key().as_bytes()).into_string();
        Self {
            signing_key,
            address,
        }
    }

    /// Base58 public address of this wallet
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Raw 32-byte public key
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Sign a message, returning the 64-byte ed25519 signature
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl std::fmt::Debug for SolanaSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    fn keypair_base58(seed: [u8; 32]) -> String {
        let signing_key = SigningKey::from_bytes(&seed);
        let mut keypair = seed.to_vec();
        keypair.extend_from_slice(signing_key.verifying_key().as_bytes());
        bs58::encode(keypair).into_string()
    }

    #[test]
    fn test_from_seed_address_is_base58_pubkey() {
        let signer = SolanaSigner::from_seed([7u8; 32]);
        let expected = bs58::encode(signer.public_key()).into_string();
        assert_eq!(signer.address(), expected);
    }

    #[test]
    fn test_from_base58_keypair_roundtrip() {
        let encoded = keypair_base58([42u8; 32]);
        let signer = SolanaSigner::from_base58(&encoded).unwrap();
        assert_eq!(signer.public_key(), SolanaSigner::from_seed([42u8; 32]).public_key());
    }

    #[test]
    fn test_from_base58_seed_only() {
        let encoded = bs58::encode([9u8; 32]).into_string();
        let signer = SolanaSigner::from_base58(&encoded).unwrap();
        assert_eq!(signer.address(), SolanaSigner::from_seed([9u8; 32]).address());
    }

    #[test]
    fn test_rejects_mismatched_public_half() {
        let signing_key = SigningKey::from_bytes(&[1u8; 32]);
        let mut keypair = signing_key.to_bytes().to_vec();
        keypair.extend_from_slice(&[0u8; 32]);
        let encoded = bs58::encode(keypair).into_string();
        assert!(matches!(
            SolanaSigner::from_base58(&encoded),
            Err(IrysError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_length() {
        let encoded = bs58::encode([1u8; 16]).into_string();
        assert!(matches!(
            SolanaSigner::from_base58(&encoded),
            Err(IrysError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_signatures_verify() {
        let signer = SolanaSigner::from_seed([3u8; 32]);
        let message = b"lumen upload gateway";
        let signature = Signature::from_bytes(&signer.sign(message));
        let verifying_key = VerifyingKey::from_bytes(&signer.public_key()).unwrap();
        assert!(verifying_key.verify(message, &signature).is_ok());
    }
}
