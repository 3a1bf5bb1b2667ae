//! Ethereum-compatible signature material
//!
//! Provides:
//! - The 65-byte `r || s || v` signature form
//! - EIP-155 and legacy `v` encoding
//! - Public key recovery from recoverable signatures

use crate::crypto::ecdsa::compressed_public_key;
use crate::errors::{ChainSignError, Result};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

/// Ethereum signature with its encoded `v` value
#[derive(Debug, Clone)]
pub struct EvmSignature {
    pub r: Vec<u8>,
    pub s: Vec<u8>,
    pub v: u64,
}

impl EvmSignature {
    /// Build from a canonical signature and an already-encoded `v`
    pub fn new(signature: &Signature, v: u64) -> Self {
        let (r, s) = signature.split_bytes();
        Self {
            r: r.to_vec(),
            s: s.to_vec(),
            v,
        }
    }

    /// Get the full signature bytes (65 bytes: r || s || v)
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut sig = [0u8; 65];
        sig[0..32].copy_from_slice(&self.r);
        sig[32..64].copy_from_slice(&self.s);
        sig[64] = self.v as u8;
        sig
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

/// `v` for an EIP-155 signature: `chain_id * 2 + 35 + recovery_id`
pub fn eip155_v(chain_id: u64, recovery_id: u8) -> u64 {
    chain_id * 2 + 35 + u64::from(recovery_id)
}

/// `v` for a legacy signature: `27 + recovery_id`
pub fn legacy_v(recovery_id: u8) -> u64 {
    27 + u64::from(recovery_id)
}

/// Decode the recovery id out of an encoded `v`.
///
/// With a positive chain id the EIP-155 rule applies; otherwise the legacy
/// offset of 27 is removed, and a `v` already below 27 is taken as the raw
/// recovery id.
pub fn recovery_id_from_v(v: u64, chain_id: Option<u64>) -> Result<u8> {
    let id = match chain_id {
        Some(chain_id) if chain_id > 0 => v.checked_sub(chain_id * 2 + 35).ok_or_else(|| {
            ChainSignError::invalid_signature(format!(
                "v {} does not encode a recovery id for chain id {}",
                v, chain_id
            ))
        })?,
        _ => {
            if v >= 27 {
                v - 27
            } else {
                v
            }
        }
    };

    if id > 1 {
        return Err(ChainSignError::invalid_signature(format!(
            "recovery id {} out of range",
            id
        )));
    }

    Ok(id as u8)
}

/// Recover the compressed public key from a 65-byte `r || s || v` signature
/// over a 32-byte hash.
pub fn recover_pubkey(hash: &[u8], signature: &[u8], chain_id: Option<u64>) -> Result<Vec<u8>> {
    if hash.len() != 32 {
        return Err(ChainSignError::bad_input(format!(
            "hash must be 32 bytes, got {}",
            hash.len()
        )));
    }
    if signature.len() != 65 {
        return Err(ChainSignError::bad_input(format!(
            "signature must be 65 bytes, got {}",
            signature.len()
        )));
    }

    let id = recovery_id_from_v(u64::from(signature[64]), chain_id)?;
    let recovery_id = RecoveryId::from_byte(id).ok_or_else(|| {
        ChainSignError::invalid_signature(format!("recovery id {} out of range", id))
    })?;

    let parsed = Signature::from_slice(&signature[..64])
        .map_err(|e| ChainSignError::invalid_signature(e.to_string()))?;

    let recovered = VerifyingKey::recover_from_prehash(hash, &parsed, recovery_id)
        .map_err(|e| ChainSignError::invalid_signature(format!("recovery failed: {}", e)))?;

    Ok(compressed_public_key(&recovered))
}
