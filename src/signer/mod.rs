//! Signing services
//!
//! This module provides the high-level signing and verification engines
//! over the key cache, plus the EVM-specific recoverable signer.

pub mod engine;
pub mod evm;

pub use engine::{SignOutput, SigningEngine, VerificationEngine, VerifyOutcome, KEY_VERSION};
pub use evm::EvmSigner;
