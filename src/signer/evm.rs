//! EVM transaction signer
//!
//! Produces recoverable secp256k1 signatures over 32-byte transaction
//! hashes, with the v value encoded per EIP-155 or the pre-EIP-155
//! convention.

use crate::crypto::ecdsa::sign_digest;
use crate::crypto::evm::{eip155_v, legacy_v, recover_pubkey, EvmSignature};
use crate::errors::{ChainSignError, Result};
use crate::keystore::KeyCache;
use std::sync::Arc;
use tracing::info;

/// EVM signer over the key cache
pub struct EvmSigner {
    cache: Arc<KeyCache>,
}

impl EvmSigner {
    pub fn new(cache: Arc<KeyCache>) -> Self {
        Self { cache }
    }

    /// Sign a transaction hash with EIP-155 replay protection:
    /// `v = chain_id * 2 + 35 + recovery_id`
    pub fn sign_eip155(&self, name: &str, hash: &[u8], chain_id: u64) -> Result<EvmSignature> {
        self.sign_recoverable(name, hash, Some(chain_id))
    }

    /// Sign a transaction hash with the pre-EIP-155 encoding:
    /// `v = 27 + recovery_id`
    pub fn sign_legacy(&self, name: &str, hash: &[u8]) -> Result<EvmSignature> {
        self.sign_recoverable(name, hash, None)
    }

    fn sign_recoverable(
        &self,
        name: &str,
        hash: &[u8],
        chain_id: Option<u64>,
    ) -> Result<EvmSignature> {
        if hash.len() != 32 {
            return Err(ChainSignError::bad_input(format!(
                "hash must be 32 bytes, got {}",
                hash.len()
            )));
        }
        let mut digest = [0u8; 32];
        digest.copy_from_slice(hash);

        let entry = self
            .cache
            .get(name)?
            .ok_or_else(|| ChainSignError::key_not_found(name))?;

        let signing_key = entry.signing_key()?;
        let (signature, recovery_id) = sign_digest(&signing_key, &digest)?;
        let mut recovery_id = recovery_id.to_byte();

        // Confirm the recovery id before encoding v: recover the public
        // key from the raw 65-byte signature and compare with the
        // signer's key; on mismatch the other candidate is correct.
        let trial = EvmSignature::new(&signature, u64::from(recovery_id));
        let recovered = recover_pubkey(&digest, &trial.to_bytes(), None)?;
        if recovered != entry.public_key {
            recovery_id ^= 1;
        }

        let v = match chain_id {
            Some(id) => eip155_v(id, recovery_id),
            None => legacy_v(recovery_id),
        };

        info!("Signed EVM hash with key: {} (v: {})", name, v);
        Ok(EvmSignature::new(&signature, v))
    }
}
