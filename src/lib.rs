//! chainsign - Embeddable secp256k1 key management and signing backend
//!
//! A key-management and transaction-signing core for blockchain
//! infrastructure that:
//! - Generates, imports, and stores secp256k1 keys by name
//! - Signs and verifies with SHA-256 or Keccak-256 digests, emitting
//!   64-byte Cosmos or DER signatures (always low-S)
//! - Produces recoverable EVM signatures with EIP-155 or legacy v values
//! - Derives Ethereum (EIP-55) and Cosmos addresses
//!
//! The crate has no transport and no storage of its own. A host embeds
//! [`SignerBackend`] and supplies a [`SecretStore`] for persistence plus
//! storage-change notifications through [`InvalidationSink`]:
//!
//! ```
//! use chainsign::{BackendConfig, CreateKeyRequest, MemoryStore, SignerBackend};
//! use std::sync::Arc;
//!
//! let backend = SignerBackend::new(Arc::new(MemoryStore::new()), BackendConfig::default());
//! backend.setup();
//!
//! let key = backend.create_key("validator", &CreateKeyRequest::default()).unwrap();
//! assert!(key.ethereum_address.starts_with("0x"));
//! ```
//!
//! # Security
//!
//! - Private keys live in zeroize-on-drop buffers and are zeroed on
//!   delete, eviction, and cleanup
//! - Key material leaves the backend only through the export operation,
//!   and only for keys marked exportable at creation
//! - Debug output of key-carrying types is redacted

pub mod api;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod keystore;
pub mod security;
pub mod signer;

pub use api::{
    CreateKeyRequest, ExportKeyResponse, ImportKeyRequest, KeyResponse, ListKeysResponse,
    SignRequest, SignResponse, SignerBackend, VerifyRequest, VerifyResponse,
};
pub use config::BackendConfig;
pub use crypto::{recover_pubkey, EvmSignature, HashAlgorithm, SignatureFormat};
pub use errors::{ChainSignError, ErrorKind, Result};
pub use keystore::{InvalidationSink, KeyCache, KeyEntry, KeyLifecycle, MemoryStore, SecretStore};
pub use signer::{
    EvmSigner, SignOutput, SigningEngine, VerificationEngine, VerifyOutcome, KEY_VERSION,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
