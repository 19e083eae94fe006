//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! PBKDF2 is deliberately slow (iteration-based) to resist brute-force
//! attacks on the vault password.  The iteration count is configurable
//! via `.chaffvault.toml`; the default is 100 000.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use super::keys::{MasterKey, KEY_LEN};
use crate::errors::{Result, VaultError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Derive the 32-byte master key from a password and salt.
///
/// The same password + salt + iterations always produce the same key;
/// changing any input changes the output.
pub fn derive_key(password: &[u8], salt: &[u8], iterations: u32) -> Result<MasterKey> {
    if salt.is_empty() {
        return Err(VaultError::KeyDerivationFailed("salt is empty".into()));
    }
    if iterations == 0 {
        return Err(VaultError::KeyDerivationFailed(
            "iteration count must be at least 1".into(),
        ));
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key);

    Ok(MasterKey::from_bytes(key))
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}
