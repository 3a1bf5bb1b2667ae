//! Backend surface
//!
//! `SignerBackend` is the embeddable core: it owns the key cache and the
//! engines, and exposes the key-management and signing operations the
//! host routes requests to. Hosts wire three seams around it: a
//! `SecretStore`, invalidation notifications, and the setup/cleanup
//! lifecycle hooks.

use crate::api::requests::{
    CreateKeyRequest, ExportKeyResponse, ImportKeyRequest, KeyResponse, ListKeysResponse,
    SignRequest, SignResponse, VerifyRequest, VerifyResponse,
};
use crate::config::BackendConfig;
use crate::crypto::address::{checksum_address, cosmos_address, ethereum_address};
use crate::crypto::ecdsa::SignatureFormat;
use crate::crypto::hash::HashAlgorithm;
use crate::errors::{ChainSignError, Result};
use crate::keystore::{InvalidationSink, KeyCache, KeyEntry, KeyLifecycle, SecretStore};
use crate::security::{new_secret_key, setup_process_hardening};
use crate::signer::{EvmSigner, SigningEngine, VerificationEngine};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::info;

/// The embeddable signing backend
pub struct SignerBackend {
    config: BackendConfig,
    cache: Arc<KeyCache>,
    lifecycle: KeyLifecycle,
    signer: SigningEngine,
    verifier: VerificationEngine,
    evm: EvmSigner,
}

impl SignerBackend {
    /// Create a backend over the host's store
    pub fn new(store: Arc<dyn SecretStore>, config: BackendConfig) -> Self {
        let cache = Arc::new(KeyCache::new(store.clone()));
        let lifecycle = KeyLifecycle::new(cache.clone(), store);
        let signer = SigningEngine::new(cache.clone());
        let verifier = VerificationEngine::new(cache.clone());
        let evm = EvmSigner::new(cache.clone());

        Self {
            config,
            cache,
            lifecycle,
            signer,
            verifier,
            evm,
        }
    }

    /// Operator-facing description of the backend
    pub fn description(&self) -> &str {
        &self.config.description
    }

    /// One-time start hook: process hardening per configuration
    pub fn setup(&self) {
        setup_process_hardening(
            self.config.security.disable_core_dumps,
            self.config.security.verify_mlock,
        );
        info!("Backend ready");
    }

    /// One-time stop hook: zeroes and drops all cached key material
    pub fn cleanup(&self) {
        let count = self.cache.cleanup();
        info!("Backend cleanup: cleared {} cached keys", count);
    }

    /// Storage-change notification from the host
    pub fn invalidate(&self, path: &str) {
        self.cache.invalidate(path);
    }

    /// EVM signer for hosts that need recoverable signatures
    pub fn evm_signer(&self) -> &EvmSigner {
        &self.evm
    }

    pub fn create_key(&self, name: &str, request: &CreateKeyRequest) -> Result<KeyResponse> {
        let entry = self.lifecycle.generate(name, request.exportable)?;
        self.key_response(name, &entry)
    }

    pub fn read_key(&self, name: &str) -> Result<KeyResponse> {
        let entry = self
            .lifecycle
            .get(name)?
            .ok_or_else(|| ChainSignError::key_not_found(name))?;
        self.key_response(name, &entry)
    }

    pub fn delete_key(&self, name: &str) -> Result<()> {
        self.lifecycle.delete(name)
    }

    pub fn list_keys(&self) -> Result<ListKeysResponse> {
        Ok(ListKeysResponse {
            keys: self.lifecycle.list()?,
        })
    }

    pub fn import_key(&self, name: &str, request: &ImportKeyRequest) -> Result<KeyResponse> {
        let raw = request
            .private_key
            .strip_prefix("0x")
            .unwrap_or(&request.private_key);
        let material = new_secret_key(hex::decode(raw)?);

        let entry = self.lifecycle.import(name, &material, request.exportable)?;
        self.key_response(name, &entry)
    }

    pub fn export_key(&self, name: &str) -> Result<ExportKeyResponse> {
        let material = self.lifecycle.export(name)?;

        Ok(ExportKeyResponse {
            name: name.to_string(),
            private_key: hex::encode(material.expose_secret()),
        })
    }

    pub fn sign(&self, request: &SignRequest) -> Result<SignResponse> {
        let input = STANDARD.decode(&request.input)?;
        let algorithm: HashAlgorithm = request.hash_algorithm.parse()?;
        let format: SignatureFormat = request.output_format.parse()?;

        let out = self
            .signer
            .sign(&request.name, &input, request.prehashed, algorithm, format)?;

        Ok(SignResponse {
            signature: STANDARD.encode(&out.signature),
            public_key: hex::encode(&out.public_key),
            key_version: out.key_version,
        })
    }

    pub fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse> {
        let input = STANDARD.decode(&request.input)?;
        let signature = STANDARD.decode(&request.signature)?;
        let algorithm: HashAlgorithm = request.hash_algorithm.parse()?;

        let outcome = self.verifier.verify(
            &request.name,
            &input,
            request.prehashed,
            algorithm,
            &signature,
        )?;

        Ok(VerifyResponse {
            valid: outcome.valid,
            public_key: hex::encode(&outcome.public_key),
        })
    }

    fn key_response(&self, name: &str, entry: &KeyEntry) -> Result<KeyResponse> {
        let uncompressed = entry.uncompressed_public_key()?;
        let eth = ethereum_address(&uncompressed)?;
        let cosmos = cosmos_address(&entry.public_key)?;

        Ok(KeyResponse {
            name: name.to_string(),
            public_key: hex::encode(&entry.public_key),
            ethereum_address: checksum_address(&eth),
            cosmos_address: hex::encode(cosmos),
            exportable: entry.exportable,
            imported: entry.imported,
            created_at: entry.created_at,
        })
    }
}

impl InvalidationSink for SignerBackend {
    fn invalidate(&self, path: &str) {
        SignerBackend::invalidate(self, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::address::verify_checksum;
    use crate::errors::ErrorKind;
    use crate::keystore::MemoryStore;

    const KNOWN_PRIVATE_KEY: &str =
        "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
    const KNOWN_ETH_ADDRESS: &str = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23";

    fn backend() -> SignerBackend {
        SignerBackend::new(Arc::new(MemoryStore::new()), BackendConfig::default())
    }

    fn backend_with_store() -> (Arc<MemoryStore>, SignerBackend) {
        let store = Arc::new(MemoryStore::new());
        let backend = SignerBackend::new(store.clone(), BackendConfig::default());
        (store, backend)
    }

    fn sign_request(name: &str, input: &[u8]) -> SignRequest {
        SignRequest {
            name: name.to_string(),
            input: STANDARD.encode(input),
            prehashed: false,
            hash_algorithm: "sha256".to_string(),
            output_format: "cosmos".to_string(),
        }
    }

    fn verify_request(name: &str, input: &[u8], signature: &str) -> VerifyRequest {
        VerifyRequest {
            name: name.to_string(),
            input: STANDARD.encode(input),
            prehashed: false,
            hash_algorithm: "sha256".to_string(),
            signature: signature.to_string(),
        }
    }

    #[test]
    fn test_create_and_read_key() {
        let backend = backend();

        let created = backend
            .create_key("validator", &CreateKeyRequest { exportable: false })
            .unwrap();
        assert_eq!(created.name, "validator");
        assert_eq!(created.public_key.len(), 66);
        assert!(verify_checksum(&created.ethereum_address));
        assert_eq!(created.cosmos_address.len(), 40);
        assert!(!created.exportable);
        assert!(!created.imported);

        let read = backend.read_key("validator").unwrap();
        assert_eq!(read.public_key, created.public_key);
        assert_eq!(read.ethereum_address, created.ethereum_address);
    }

    #[test]
    fn test_read_absent_key() {
        let backend = backend();

        let err = backend.read_key("ghost").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "key not found: ghost");
    }

    #[test]
    fn test_sign_verify_round_trip() {
        let backend = backend();
        backend
            .create_key("k", &CreateKeyRequest::default())
            .unwrap();

        for algorithm in ["sha256", "keccak256"] {
            for format in ["cosmos", "der"] {
                let mut request = sign_request("k", b"payload");
                request.hash_algorithm = algorithm.to_string();
                request.output_format = format.to_string();

                let signed = backend.sign(&request).unwrap();
                assert_eq!(signed.key_version, 1);

                let mut verify = verify_request("k", b"payload", &signed.signature);
                verify.hash_algorithm = algorithm.to_string();

                let outcome = backend.verify(&verify).unwrap();
                assert!(outcome.valid, "{}/{}", algorithm, format);
                assert_eq!(outcome.public_key, signed.public_key);
            }
        }
    }

    #[test]
    fn test_sign_cosmos_signature_is_64_bytes() {
        let backend = backend();
        backend
            .create_key("k", &CreateKeyRequest::default())
            .unwrap();

        let signed = backend.sign(&sign_request("k", b"payload")).unwrap();
        let raw = STANDARD.decode(&signed.signature).unwrap();
        assert_eq!(raw.len(), 64);
    }

    #[test]
    fn test_sign_prehashed() {
        let backend = backend();
        backend
            .create_key("k", &CreateKeyRequest::default())
            .unwrap();

        let digest = HashAlgorithm::Sha256.digest(b"payload");
        let mut request = sign_request("k", &digest);
        request.prehashed = true;

        let signed = backend.sign(&request).unwrap();

        // The digest of the raw payload verifies against it
        let outcome = backend
            .verify(&verify_request("k", b"payload", &signed.signature))
            .unwrap();
        assert!(outcome.valid);
    }

    #[test]
    fn test_sign_prehashed_wrong_length() {
        let backend = backend();
        backend
            .create_key("k", &CreateKeyRequest::default())
            .unwrap();

        let mut request = sign_request("k", &[0u8; 16]);
        request.prehashed = true;

        let err = backend.sign(&request).unwrap_err();
        assert_eq!(err.to_string(), "prehashed input must be 32 bytes");
    }

    #[test]
    fn test_sign_unknown_algorithm() {
        let backend = backend();
        backend
            .create_key("k", &CreateKeyRequest::default())
            .unwrap();

        let mut request = sign_request("k", b"payload");
        request.hash_algorithm = "blake2".to_string();

        let err = backend.sign(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadInput);
        assert_eq!(err.to_string(), "unsupported hash algorithm: blake2");
    }

    #[test]
    fn test_sign_unknown_format() {
        let backend = backend();
        backend
            .create_key("k", &CreateKeyRequest::default())
            .unwrap();

        let mut request = sign_request("k", b"payload");
        request.output_format = "asn1".to_string();

        let err = backend.sign(&request).unwrap_err();
        assert_eq!(err.to_string(), "unsupported output format: asn1");
    }

    #[test]
    fn test_sign_bad_base64_input() {
        let backend = backend();
        backend
            .create_key("k", &CreateKeyRequest::default())
            .unwrap();

        let mut request = sign_request("k", b"payload");
        request.input = "not base64!!".to_string();

        let err = backend.sign(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadInput);
    }

    #[test]
    fn test_verify_tampered_payload() {
        let backend = backend();
        backend
            .create_key("k", &CreateKeyRequest::default())
            .unwrap();

        let signed = backend.sign(&sign_request("k", b"payload")).unwrap();
        let outcome = backend
            .verify(&verify_request("k", b"tampered", &signed.signature))
            .unwrap();
        assert!(!outcome.valid);
    }

    #[test]
    fn test_import_known_key() {
        let backend = backend();

        let imported = backend
            .import_key(
                "imported",
                &ImportKeyRequest {
                    private_key: KNOWN_PRIVATE_KEY.to_string(),
                    exportable: true,
                },
            )
            .unwrap();

        assert_eq!(imported.ethereum_address, KNOWN_ETH_ADDRESS);
        assert!(imported.imported);
        assert!(imported.exportable);
    }

    #[test]
    fn test_import_accepts_0x_prefix() {
        let backend = backend();

        let imported = backend
            .import_key(
                "imported",
                &ImportKeyRequest {
                    private_key: format!("0x{}", KNOWN_PRIVATE_KEY),
                    exportable: false,
                },
            )
            .unwrap();
        assert_eq!(imported.ethereum_address, KNOWN_ETH_ADDRESS);
    }

    #[test]
    fn test_import_rejects_bad_hex() {
        let backend = backend();

        let err = backend
            .import_key(
                "bad",
                &ImportKeyRequest {
                    private_key: "zzzz".to_string(),
                    exportable: false,
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadInput);
    }

    #[test]
    fn test_export_round_trip() {
        let backend = backend();
        backend
            .import_key(
                "k",
                &ImportKeyRequest {
                    private_key: KNOWN_PRIVATE_KEY.to_string(),
                    exportable: true,
                },
            )
            .unwrap();

        let exported = backend.export_key("k").unwrap();
        assert_eq!(exported.name, "k");
        assert_eq!(exported.private_key, KNOWN_PRIVATE_KEY);
    }

    #[test]
    fn test_export_forbidden() {
        let backend = backend();
        backend
            .create_key("sealed", &CreateKeyRequest { exportable: false })
            .unwrap();

        let err = backend.export_key("sealed").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.to_string(), "key is not exportable");
    }

    #[test]
    fn test_delete_key() {
        let backend = backend();
        backend
            .create_key("gone", &CreateKeyRequest::default())
            .unwrap();

        backend.delete_key("gone").unwrap();
        let err = backend.read_key("gone").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        // Deleting again is fine
        backend.delete_key("gone").unwrap();
    }

    #[test]
    fn test_list_keys() {
        let backend = backend();
        backend
            .create_key("b", &CreateKeyRequest::default())
            .unwrap();
        backend
            .create_key("a", &CreateKeyRequest::default())
            .unwrap();

        let listing = backend.list_keys().unwrap();
        assert_eq!(listing.keys, vec!["a", "b"]);
    }

    #[test]
    fn test_invalidation_then_reload() {
        let (store, backend) = backend_with_store();
        let created = backend
            .create_key("k", &CreateKeyRequest::default())
            .unwrap();

        // Cache cleared, but the stored document still resolves reads
        backend.invalidate("keys/");
        let read = backend.read_key("k").unwrap();
        assert_eq!(read.public_key, created.public_key);

        // Once the document is gone and the name invalidated, reads miss
        store.delete("keys/k").unwrap();
        backend.invalidate("keys/k");
        assert_eq!(
            backend.read_key("k").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_cleanup_clears_cache() {
        let backend = backend();
        backend
            .create_key("k", &CreateKeyRequest::default())
            .unwrap();

        backend.cleanup();

        // Still readable through the store afterwards
        assert!(backend.read_key("k").is_ok());
    }

    #[test]
    fn test_setup_runs() {
        let backend = backend();
        backend.setup();
        assert!(backend.description().contains("secp256k1"));
    }

    #[test]
    fn test_response_field_names() {
        let backend = backend();
        backend
            .create_key("k", &CreateKeyRequest::default())
            .unwrap();

        let key = serde_json::to_value(backend.read_key("k").unwrap()).unwrap();
        let key = key.as_object().unwrap();
        for field in [
            "name",
            "public_key",
            "ethereum_address",
            "cosmos_address",
            "exportable",
            "imported",
            "created_at",
        ] {
            assert!(key.contains_key(field), "missing {}", field);
        }

        let signed = serde_json::to_value(backend.sign(&sign_request("k", b"x")).unwrap()).unwrap();
        let signed = signed.as_object().unwrap();
        for field in ["signature", "public_key", "key_version"] {
            assert!(signed.contains_key(field), "missing {}", field);
        }

        let sig = backend.sign(&sign_request("k", b"x")).unwrap().signature;
        let verified =
            serde_json::to_value(backend.verify(&verify_request("k", b"x", &sig)).unwrap())
                .unwrap();
        let verified = verified.as_object().unwrap();
        for field in ["valid", "public_key"] {
            assert!(verified.contains_key(field), "missing {}", field);
        }
    }

    #[test]
    fn test_evm_signer_accessor() {
        let backend = backend();
        backend
            .create_key("k", &CreateKeyRequest::default())
            .unwrap();

        let hash = crate::crypto::hash::keccak256(b"tx");
        let sig = backend.evm_signer().sign_eip155("k", &hash, 1).unwrap();
        assert!(sig.v == 37 || sig.v == 38);
    }
}
