//! Stored key entry model
//!
//! A `KeyEntry` is the persisted form of one secp256k1 key: the private
//! scalar in a zeroizing wrapper, the derived public keys, and creation
//! metadata. Entries are immutable once constructed; rotation is delete
//! and recreate.
//!
//! Persisted as one JSON document per key at `keys/<name>`, camelCase
//! field names, binary fields base64-encoded.

use crate::crypto::ecdsa::{
    compressed_public_key, signing_key_from_bytes, uncompressed_public_key, verifying_key_from_sec1,
};
use crate::errors::{ChainSignError, Result};
use crate::security::SecureBytes;
use k256::ecdsa::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};

/// Storage path prefix for key documents
pub const STORE_PREFIX: &str = "keys/";

/// Storage path of a named key document
pub fn store_path(name: &str) -> String {
    format!("{}{}", STORE_PREFIX, name)
}

/// One stored key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEntry {
    /// 32-byte secp256k1 scalar, zeroed on drop
    pub private_key: SecureBytes,
    /// 33-byte compressed SEC1 point
    #[serde(with = "b64")]
    pub public_key: Vec<u8>,
    /// 65-byte uncompressed point; recomputed on demand when a document
    /// written by an older producer lacks it
    #[serde(default, skip_serializing_if = "Option::is_none", with = "b64_opt")]
    pub public_key_uncompressed: Option<Vec<u8>>,
    /// Fixed at creation; never flips false -> true
    pub exportable: bool,
    /// Unix seconds
    pub created_at: i64,
    /// True when the key material originated outside this backend
    pub imported: bool,
}

impl KeyEntry {
    /// Build a new entry from a signing key
    pub fn new(signing_key: &SigningKey, exportable: bool, imported: bool) -> Self {
        let verifying_key = signing_key.verifying_key();

        Self {
            private_key: SecureBytes::new(signing_key.to_bytes().to_vec()),
            public_key: compressed_public_key(verifying_key),
            public_key_uncompressed: Some(uncompressed_public_key(verifying_key)),
            exportable,
            created_at: chrono::Utc::now().timestamp(),
            imported,
        }
    }

    /// Reconstruct the signing key from the stored scalar
    pub fn signing_key(&self) -> Result<SigningKey> {
        signing_key_from_bytes(self.private_key.expose())
    }

    /// Parse the stored compressed public key
    pub fn verifying_key(&self) -> Result<VerifyingKey> {
        verifying_key_from_sec1(&self.public_key)
    }

    /// Uncompressed public key, preferring the stored copy
    pub fn uncompressed_public_key(&self) -> Result<Vec<u8>> {
        if let Some(bytes) = &self.public_key_uncompressed {
            return Ok(bytes.clone());
        }
        Ok(uncompressed_public_key(&self.verifying_key()?))
    }

    /// Zero the private key material in place
    pub fn zero_private_key(&mut self) {
        self.private_key.zeroize_now();
    }

    /// Check field lengths after decoding a stored document
    pub fn validate(&self) -> Result<()> {
        if self.private_key.len() != 32 {
            return Err(ChainSignError::storage(format!(
                "corrupt key entry: private key is {} bytes, want 32",
                self.private_key.len()
            )));
        }
        if self.public_key.len() != 33 {
            return Err(ChainSignError::storage(format!(
                "corrupt key entry: public key is {} bytes, want 33",
                self.public_key.len()
            )));
        }
        Ok(())
    }
}

mod b64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

mod b64_opt {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => serializer.serialize_some(&STANDARD.encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => STANDARD
                .decode(encoded)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
