//! secp256k1 ECDSA primitives
//!
//! Provides:
//! - Key construction from raw bytes
//! - Canonical (low-S) signing over 32-byte digests
//! - Cosmos `R||S` and DER signature encodings
//! - Signature parsing and verification

use crate::errors::{ChainSignError, Result};
use k256::{
    ecdsa::{
        signature::hazmat::PrehashVerifier, RecoveryId, Signature, SigningKey, VerifyingKey,
    },
    SecretKey,
};
use rand::rngs::OsRng;
use std::str::FromStr;

/// Wire encoding of an emitted signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureFormat {
    /// 64-byte `r || s`, both big-endian
    #[default]
    Cosmos,
    /// DER `SEQUENCE { INTEGER r, INTEGER s }`
    Der,
}

impl SignatureFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureFormat::Cosmos => "cosmos",
            SignatureFormat::Der => "der",
        }
    }
}

impl FromStr for SignatureFormat {
    type Err = ChainSignError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cosmos" => Ok(SignatureFormat::Cosmos),
            "der" => Ok(SignatureFormat::Der),
            other => Err(ChainSignError::bad_input(format!(
                "unsupported output format: {}",
                other
            ))),
        }
    }
}

/// Generate a new random signing key from the OS entropy source
pub fn generate_signing_key() -> SigningKey {
    SigningKey::random(&mut OsRng)
}

/// Build a signing key from raw private key bytes (32 bytes)
pub fn signing_key_from_bytes(bytes: &[u8]) -> Result<SigningKey> {
    if bytes.len() != 32 {
        return Err(ChainSignError::bad_input(format!(
            "private key must be exactly 32 bytes, got {}",
            bytes.len()
        )));
    }

    let secret_key = SecretKey::from_slice(bytes)
        .map_err(|e| ChainSignError::bad_input(format!("invalid private key: {}", e)))?;

    Ok(SigningKey::from(secret_key))
}

/// Build a verifying key from SEC1 bytes (compressed or uncompressed)
pub fn verifying_key_from_sec1(bytes: &[u8]) -> Result<VerifyingKey> {
    VerifyingKey::from_sec1_bytes(bytes)
        .map_err(|e| ChainSignError::crypto(format!("invalid public key: {}", e)))
}

/// Compressed SEC1 encoding (33 bytes, 0x02/0x03 prefix)
pub fn compressed_public_key(key: &VerifyingKey) -> Vec<u8> {
    key.to_encoded_point(true).as_bytes().to_vec()
}

/// Uncompressed SEC1 encoding (65 bytes, 0x04 prefix)
pub fn uncompressed_public_key(key: &VerifyingKey) -> Vec<u8> {
    key.to_encoded_point(false).as_bytes().to_vec()
}

/// Sign a 32-byte digest, returning the canonical signature and its recovery id
pub fn sign_digest(key: &SigningKey, digest: &[u8; 32]) -> Result<(Signature, RecoveryId)> {
    let (signature, recovery_id) = key
        .sign_prehash_recoverable(digest)
        .map_err(|e| ChainSignError::crypto(format!("signing failed: {}", e)))?;

    // Low-S form is mandatory. If normalization negated s, the recovery id
    // flips to the other candidate point.
    match signature.normalize_s() {
        Some(normalized) => {
            let flipped = RecoveryId::from_byte(recovery_id.to_byte() ^ 1).unwrap_or(recovery_id);
            Ok((normalized, flipped))
        }
        None => Ok((signature, recovery_id)),
    }
}

/// Encode a signature in the requested wire format
pub fn encode_signature(signature: &Signature, format: SignatureFormat) -> Vec<u8> {
    match format {
        SignatureFormat::Cosmos => signature.to_bytes().to_vec(),
        SignatureFormat::Der => signature.to_der().as_bytes().to_vec(),
    }
}

/// Parse signature bytes for verification.
///
/// 64-byte input is read as Cosmos `r || s`; a zero component there is an
/// invalid-signature error because the bytes are malformed rather than merely
/// mismatched. Any other length is tried as DER. `None` means the bytes could
/// not be parsed at all, which verification reports as `valid = false`.
pub fn parse_signature(bytes: &[u8]) -> Result<Option<Signature>> {
    if bytes.len() == 64 {
        let (r, s) = bytes.split_at(32);
        if r.iter().all(|&b| b == 0) || s.iter().all(|&b| b == 0) {
            return Err(ChainSignError::invalid_signature(
                "r and s must be non-zero",
            ));
        }
        Ok(Signature::from_slice(bytes).ok())
    } else {
        Ok(Signature::from_der(bytes).ok())
    }
}

/// Verify a signature over a 32-byte digest.
///
/// Verification is strict low-S: a mathematically valid high-S signature
/// does not verify. Every signature emitted by [`sign_digest`] is already
/// canonical.
pub fn verify_digest(key: &VerifyingKey, digest: &[u8; 32], signature: &Signature) -> bool {
    key.verify_prehash(digest, signature).is_ok()
}
