//! The vault's master key type.
//!
//! The vault has exactly one symmetric key, derived from the password.
//! It exists in two representations: this opaque handle (usable for
//! seal/open) and the exported raw 32 bytes (persisted under the fixed
//! `masterKey` store entry and compared during authentication).

use zeroize::Zeroize;

/// Length of the master key in bytes (256 bits, for AES-256-GCM).
pub const KEY_LEN: usize = 32;

/// A 32-byte master key that zeroes its memory when dropped.
///
/// Created by key derivation (or by re-importing exported bytes) and
/// held only for the duration of an unlocked session.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Wrap raw key bytes in an opaque handle (the import direction).
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build an AES cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Export the raw byte form for persistence or comparison.
    ///
    /// Deterministic: the same derivation inputs always export the
    /// same bytes, which is what authentication relies on.
    pub fn export_bytes(&self) -> [u8; KEY_LEN] {
        self.bytes
    }
}
