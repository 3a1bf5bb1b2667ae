//! Message digest selection
//!
//! Provides:
//! - SHA-256 and Keccak-256 digests for signing input
//! - RIPEMD160 for Cosmos address derivation

use crate::errors::{ChainSignError, Result};
use ripemd::Ripemd160;
use sha2::Sha256;
use sha3::{Digest, Keccak256};
use std::str::FromStr;

/// Digest algorithm applied to signing/verification input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Keccak256,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Keccak256 => "keccak256",
        }
    }

    /// Digest `input` to a 32-byte value
    pub fn digest(&self, input: &[u8]) -> [u8; 32] {
        match self {
            HashAlgorithm::Sha256 => sha256(input),
            HashAlgorithm::Keccak256 => keccak256(input),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = ChainSignError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "keccak256" => Ok(HashAlgorithm::Keccak256),
            other => Err(ChainSignError::bad_input(format!(
                "unsupported hash algorithm: {}",
                other
            ))),
        }
    }
}

/// Compute sha256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute keccak256 hash
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Compute ripemd160 hash
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}
