//! Cryptographic primitives for secp256k1 signing

pub mod address;
pub mod ecdsa;
pub mod evm;
pub mod hash;

pub use address::{checksum_address, cosmos_address, ethereum_address, verify_checksum};
pub use ecdsa::{generate_signing_key, signing_key_from_bytes, SignatureFormat};
pub use evm::{recover_pubkey, EvmSignature};
pub use hash::{keccak256, ripemd160, sha256, HashAlgorithm};
