//! Cryptographic primitives for ChaffVault.
//!
//! This module provides:
//! - AES-256-GCM envelope encryption (`encryption`)
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - The opaque, zeroize-on-drop master key type (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, derive_key, ...};
pub use encryption::{open, seal, Envelope};
pub use kdf::{derive_key, generate_salt, DEFAULT_ITERATIONS, SALT_LEN};
pub use keys::{MasterKey, KEY_LEN};
