//! API layer for chainsign
//!
//! Provides:
//! - The embeddable backend surface
//! - Request and response contracts

pub mod backend;
pub mod requests;

pub use backend::SignerBackend;
pub use requests::{
    CreateKeyRequest, ExportKeyResponse, ImportKeyRequest, KeyResponse, ListKeysResponse,
    SignRequest, SignResponse, VerifyRequest, VerifyResponse,
};
