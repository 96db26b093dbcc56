//! Error types for the keyturn core.

use thiserror::Error;

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while generating keys, encrypting, decrypting or rekeying.
///
/// Every variant is terminal for the operation that produced it. Nothing is
/// retried and no partial output is returned.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("secure randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid scalar: zero is not a usable key or factor")]
    InvalidScalar,

    #[error("malformed ciphertext: {len} bytes (minimum {min})")]
    MalformedCiphertext { len: usize, min: usize },

    #[error("authentication failed")]
    AuthenticationFailure,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("encryption failed: {0}")]
    Encryption(String),
}

impl From<hex::FromHexError> for CryptoError {
    fn from(e: hex::FromHexError) -> Self {
        CryptoError::Decode(format!("invalid hex: {e}"))
    }
}
