//! Signing and verification engines
//!
//! Hash-then-sign ECDSA over cached keys. Both engines resolve the digest
//! the same way: callers either supply a 32-byte prehash or raw input
//! hashed with the selected algorithm. Every emitted signature is low-S.

use crate::crypto::ecdsa::{
    encode_signature, parse_signature, sign_digest, verify_digest, SignatureFormat,
};
use crate::crypto::hash::HashAlgorithm;
use crate::errors::{ChainSignError, Result};
use crate::keystore::KeyCache;
use std::sync::Arc;
use tracing::{debug, info};

/// Version tag carried in every signing response
pub const KEY_VERSION: u32 = 1;

/// Resolve the digest to sign or verify
fn digest_input(input: &[u8], prehashed: bool, algorithm: HashAlgorithm) -> Result<[u8; 32]> {
    if prehashed {
        if input.len() != 32 {
            return Err(ChainSignError::bad_input(
                "prehashed input must be 32 bytes",
            ));
        }
        let mut digest = [0u8; 32];
        digest.copy_from_slice(input);
        return Ok(digest);
    }

    Ok(algorithm.digest(input))
}

/// A produced signature plus the identity that made it
#[derive(Debug, Clone)]
pub struct SignOutput {
    pub signature: Vec<u8>,
    /// Compressed public key of the signing key
    pub public_key: Vec<u8>,
    pub key_version: u32,
}

/// Outcome of a verification. A mismatched signature is `valid: false`,
/// never an error.
#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    pub valid: bool,
    pub public_key: Vec<u8>,
}

/// Signing engine over the key cache
pub struct SigningEngine {
    cache: Arc<KeyCache>,
}

impl SigningEngine {
    pub fn new(cache: Arc<KeyCache>) -> Self {
        Self { cache }
    }

    /// Sign input with a named key
    pub fn sign(
        &self,
        name: &str,
        input: &[u8],
        prehashed: bool,
        algorithm: HashAlgorithm,
        format: SignatureFormat,
    ) -> Result<SignOutput> {
        let digest = digest_input(input, prehashed, algorithm)?;

        let entry = self
            .cache
            .get(name)?
            .ok_or_else(|| ChainSignError::key_not_found(name))?;

        let signing_key = entry.signing_key()?;
        let (signature, _) = sign_digest(&signing_key, &digest)?;

        info!(
            "Signed with key: {} ({}/{})",
            name,
            algorithm.as_str(),
            format.as_str()
        );

        Ok(SignOutput {
            signature: encode_signature(&signature, format),
            public_key: entry.public_key.clone(),
            key_version: KEY_VERSION,
        })
    }
}

/// Verification engine over the key cache
pub struct VerificationEngine {
    cache: Arc<KeyCache>,
}

impl VerificationEngine {
    pub fn new(cache: Arc<KeyCache>) -> Self {
        Self { cache }
    }

    /// Verify a signature against a named key. Accepts both the 64-byte
    /// r||s form and DER.
    pub fn verify(
        &self,
        name: &str,
        input: &[u8],
        prehashed: bool,
        algorithm: HashAlgorithm,
        signature: &[u8],
    ) -> Result<VerifyOutcome> {
        let digest = digest_input(input, prehashed, algorithm)?;

        let entry = self
            .cache
            .get(name)?
            .ok_or_else(|| ChainSignError::key_not_found(name))?;

        let Some(parsed) = parse_signature(signature)? else {
            debug!("Unparseable signature for key: {}", name);
            return Ok(VerifyOutcome {
                valid: false,
                public_key: entry.public_key.clone(),
            });
        };

        let valid = verify_digest(&entry.verifying_key()?, &digest, &parsed);
        debug!("Verified with key: {} (valid: {})", name, valid);

        Ok(VerifyOutcome {
            valid,
            public_key: entry.public_key.clone(),
        })
    }
}
