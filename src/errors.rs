//! Error types for chainsign

use thiserror::Error;

/// Main error type for chainsign operations
#[derive(Error, Debug)]
pub enum ChainSignError {
    // Key management errors
    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("key is not exportable")]
    KeyNotExportable,

    // Request validation errors, surfaced with their literal message
    #[error("{0}")]
    BadInput(String),

    // Signature material that decoded but is semantically unusable
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    // Storage errors
    #[error("storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    // Cryptographic primitive failures, fatal to the request
    #[error("cryptographic failure: {0}")]
    Crypto(String),
}

/// Host-facing classification of an error.
///
/// Embedding hosts translate these onto their own transport (HTTP status,
/// RPC code, plugin error frame). The mapping is stable even when the
/// variant set grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    BadInput,
    InvalidSignature,
    Internal,
}

impl ChainSignError {
    #[must_use]
    pub fn key_not_found(name: impl Into<String>) -> Self {
        ChainSignError::KeyNotFound(name.into())
    }

    #[must_use]
    pub fn bad_input(msg: impl Into<String>) -> Self {
        ChainSignError::BadInput(msg.into())
    }

    #[must_use]
    pub fn invalid_signature(msg: impl Into<String>) -> Self {
        ChainSignError::InvalidSignature(msg.into())
    }

    #[must_use]
    pub fn storage(msg: impl Into<String>) -> Self {
        ChainSignError::Storage(msg.into())
    }

    #[must_use]
    pub fn crypto(msg: impl Into<String>) -> Self {
        ChainSignError::Crypto(msg.into())
    }

    /// Classify this error for the hosting runtime.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChainSignError::KeyNotFound(_) => ErrorKind::NotFound,
            ChainSignError::KeyNotExportable => ErrorKind::Forbidden,
            ChainSignError::BadInput(_) => ErrorKind::BadInput,
            ChainSignError::InvalidSignature(_) => ErrorKind::InvalidSignature,
            ChainSignError::Storage(_)
            | ChainSignError::Config(_)
            | ChainSignError::Crypto(_) => ErrorKind::Internal,
        }
    }
}

impl From<serde_json::Error> for ChainSignError {
    fn from(err: serde_json::Error) -> Self {
        ChainSignError::Storage(format!("JSON error: {}", err))
    }
}

impl From<hex::FromHexError> for ChainSignError {
    fn from(err: hex::FromHexError) -> Self {
        ChainSignError::BadInput(format!("invalid hex: {}", err))
    }
}

impl From<base64::DecodeError> for ChainSignError {
    fn from(err: base64::DecodeError) -> Self {
        ChainSignError::BadInput(format!("invalid base64: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ChainSignError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ChainSignError::key_not_found("k1").to_string(),
            "key not found: k1"
        );
        assert_eq!(
            ChainSignError::KeyNotExportable.to_string(),
            "key is not exportable"
        );
        assert_eq!(
            ChainSignError::bad_input("prehashed input must be 32 bytes").to_string(),
            "prehashed input must be 32 bytes"
        );
        assert_eq!(
            ChainSignError::invalid_signature("r and s must be non-zero").to_string(),
            "invalid signature: r and s must be non-zero"
        );
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            ChainSignError::key_not_found("k1").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(ChainSignError::KeyNotExportable.kind(), ErrorKind::Forbidden);
        assert_eq!(
            ChainSignError::bad_input("unsupported hash algorithm: md5").kind(),
            ErrorKind::BadInput
        );
        assert_eq!(
            ChainSignError::invalid_signature("zero component").kind(),
            ErrorKind::InvalidSignature
        );
        assert_eq!(ChainSignError::storage("io").kind(), ErrorKind::Internal);
        assert_eq!(ChainSignError::crypto("ecdsa").kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_from_hex_error() {
        let err: ChainSignError = hex::decode("zz").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::BadInput);
    }

    #[test]
    fn test_from_json_error() {
        let err: ChainSignError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
