//! Address derivation
//!
//! Provides:
//! - Ethereum address derivation with EIP-55 checksumming
//! - Cosmos address derivation (RIPEMD160 over SHA-256)
//!
//! Both derivations are pure functions of the public key.

use crate::crypto::hash::{keccak256, ripemd160, sha256};
use crate::errors::{ChainSignError, Result};
use sha3::{Digest, Keccak256};

/// Derive the Ethereum address (20 bytes) from an uncompressed public key
pub fn ethereum_address(uncompressed: &[u8]) -> Result<[u8; 20]> {
    if uncompressed.len() != 65 || uncompressed[0] != 0x04 {
        return Err(ChainSignError::crypto(format!(
            "expected 65-byte uncompressed public key, got {} bytes",
            uncompressed.len()
        )));
    }

    // Skip the 0x04 prefix and hash the remaining 64 bytes
    let hash = keccak256(&uncompressed[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Ok(address)
}

/// Derive the Cosmos address (20 bytes) from a compressed public key
pub fn cosmos_address(compressed: &[u8]) -> Result<[u8; 20]> {
    if compressed.len() != 33 {
        return Err(ChainSignError::crypto(format!(
            "expected 33-byte compressed public key, got {} bytes",
            compressed.len()
        )));
    }

    Ok(ripemd160(&sha256(compressed)))
}

/// Convert an address to checksummed format (EIP-55)
pub fn checksum_address(address: &[u8; 20]) -> String {
    let addr_hex = hex::encode(address);
    let hash = hex::encode(Keccak256::digest(addr_hex.as_bytes()));

    let mut result = String::with_capacity(42);
    result.push_str("0x");

    for (i, c) in addr_hex.chars().enumerate() {
        if c.is_ascii_alphabetic() {
            let hash_char = hash.chars().nth(i).unwrap();
            if hash_char >= '8' {
                result.push(c.to_ascii_uppercase());
            } else {
                result.push(c);
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Verify an address checksum (EIP-55)
pub fn verify_checksum(addr: &str) -> bool {
    let addr = addr.strip_prefix("0x").unwrap_or(addr);

    if addr.len() != 40 {
        return false;
    }

    let Ok(bytes) = hex::decode(addr.to_lowercase()) else {
        return false;
    };

    let mut address = [0u8; 20];
    address.copy_from_slice(&bytes);

    let checksummed = checksum_address(&address);
    let checksummed = checksummed.strip_prefix("0x").unwrap();

    addr == checksummed
}
