//! Request and response contracts
//!
//! The literal field names of these types are the wire contract between
//! the backend and its host. Binary values travel encoded: payloads and
//! signatures as base64, keys and addresses as hex.

use serde::{Deserialize, Serialize};
use std::fmt;

fn default_hash_algorithm() -> String {
    "sha256".to_string()
}

fn default_output_format() -> String {
    "cosmos".to_string()
}

/// Request to create a key under a name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateKeyRequest {
    /// Allow the private key to leave through the export operation
    #[serde(default)]
    pub exportable: bool,
}

/// Key metadata returned by create, read, and import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyResponse {
    pub name: String,
    /// Compressed public key, hex
    pub public_key: String,
    /// EIP-55 checksummed Ethereum address
    pub ethereum_address: String,
    /// Cosmos address bytes, hex
    pub cosmos_address: String,
    pub exportable: bool,
    pub imported: bool,
    pub created_at: i64,
}

/// Signing request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignRequest {
    pub name: String,
    /// Payload, base64
    pub input: String,
    /// When true, `input` is the 32-byte digest itself
    #[serde(default)]
    pub prehashed: bool,
    /// "sha256" or "keccak256"
    #[serde(default = "default_hash_algorithm")]
    pub hash_algorithm: String,
    /// "cosmos" (64-byte r||s) or "der"
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

/// Signing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignResponse {
    /// Signature, base64
    pub signature: String,
    /// Compressed public key, hex
    pub public_key: String,
    pub key_version: u32,
}

/// Verification request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub name: String,
    /// Payload, base64
    pub input: String,
    #[serde(default)]
    pub prehashed: bool,
    #[serde(default = "default_hash_algorithm")]
    pub hash_algorithm: String,
    /// Signature to check, base64 (64-byte r||s or DER)
    pub signature: String,
}

/// Verification response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub public_key: String,
}

/// Key import request
#[derive(Clone, Serialize, Deserialize)]
pub struct ImportKeyRequest {
    /// Private key, hex, optional 0x prefix
    pub private_key: String,
    #[serde(default)]
    pub exportable: bool,
}

impl fmt::Debug for ImportKeyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportKeyRequest")
            .field("private_key", &"[REDACTED]")
            .field("exportable", &self.exportable)
            .finish()
    }
}

/// Export response carrying raw key material
#[derive(Clone, Serialize, Deserialize)]
pub struct ExportKeyResponse {
    pub name: String,
    /// Private key, hex
    pub private_key: String,
}

impl fmt::Debug for ExportKeyResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportKeyResponse")
            .field("name", &self.name)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Key listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListKeysResponse {
    /// Stored key names, sorted
    pub keys: Vec<String>,
}
