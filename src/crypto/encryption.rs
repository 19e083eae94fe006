//! AES-256-GCM authenticated encryption.
//!
//! Each call to `seal` generates a fresh random 12-byte nonce and
//! returns an `Envelope` holding the ciphertext (with its 16-byte auth
//! tag) and the nonce as separate fields.  This is the only integrity
//! check in the system: `open` rejects any tampering, corruption, or
//! wrong key with `DecryptionFailed` and never returns partial data.
//!
//! Envelopes are format-agnostic over bytes; callers serialize logical
//! values to JSON before sealing and parse after opening.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use serde::{Deserialize, Serialize};

use super::keys::MasterKey;
use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// One authenticated-encryption operation's output.
///
/// Both fields serialize as base64 strings in JSON, which is the form
/// persisted in the records namespace and carried in export documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Ciphertext plus the 16-byte GCM auth tag.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub ciphertext: Vec<u8>,

    /// The 12-byte nonce used for this envelope. Never reused.
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub nonce: Vec<u8>,
}

/// Encrypt `plaintext` under `key`, producing a fresh envelope.
pub fn seal(key: &MasterKey, plaintext: &[u8]) -> Result<Envelope> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    // Generate a random 12-byte nonce.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    Ok(Envelope {
        ciphertext,
        nonce: nonce.to_vec(),
    })
}

/// Decrypt an envelope produced by `seal`.
///
/// Fails with `DecryptionFailed` when the auth tag does not verify or
/// the envelope is malformed.
pub fn open(key: &MasterKey, envelope: &Envelope) -> Result<Vec<u8>> {
    if envelope.nonce.len() != NONCE_LEN {
        return Err(VaultError::DecryptionFailed);
    }

    let nonce = Nonce::from_slice(&envelope.nonce);

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::DecryptionFailed)?;

    cipher
        .decrypt(nonce, envelope.ciphertext.as_slice())
        .map_err(|_| VaultError::DecryptionFailed)
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
