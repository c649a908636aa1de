//! Error types for the lumen-irys crate

use thiserror::Error;

/// Result type alias using `IrysError`
pub type Result<T> = std::result::Result<T, IrysError>;

/// Errors that can occur while talking to the Irys network
#[derive(Error, Debug)]
pub enum IrysError {
    /// Missing or invalid configuration
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Signing key could not be parsed
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    /// A tag violates the wire-format bounds
    #[error("invalid tag: {0}")]
    InvalidTag(String),

    /// Bundler node API error
    #[error("bundler node API error: {0}")]
    NodeApi(String),

    /// Solana RPC error
    #[error("chain RPC error: {0}")]
    Chain(String),

    /// Prepaid balance is too low for the requested upload
    #[error("insufficient balance: {0}")]
    InsufficientBalance(String),

    /// Connection error
    #[error("connection error: {0}")]
    Connection(String),

    /// Timeout error
    #[error("operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// HTTP error
    #[error("http error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for IrysError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            IrysError::Timeout { seconds: 30 }
        } else if err.is_connect() {
            IrysError::Connection(err.to_string())
        } else {
            IrysError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for IrysError {
    fn from(err: serde_json::Error) -> Self {
        IrysError::Serialization(err.to_string())
    }
}
