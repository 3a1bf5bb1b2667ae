//! Security utilities for memory protection and secure handling
//!
//! This module provides:
//! - Memory zeroization to securely erase sensitive data
//! - Process hardening (core dumps, memory-lock availability)

pub mod hardening;
pub mod zeroize;

pub use hardening::{can_lock_memory, setup_process_hardening};
pub use zeroize::{new_secret_key, SecretKey, SecureBytes};
