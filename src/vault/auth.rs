//! Vault authentication state machine.
//!
//! States: uninitialized → initialized/locked → unlocked.  The only
//! transition back from unlocked is dropping the `Session`, which
//! zeroizes the in-memory key.
//!
//! The password-derived key *is* the vault's only key.  Authentication
//! re-derives it from the stored salt and compares the exported bytes
//! against the persisted `masterKey` entry in constant time.  Absence
//! of that entry is the authoritative "not initialized" signal,
//! independent of the metadata flag.
//!
//! "Rotation" is timestamp-only: after 30 days the rotation timestamp
//! is reset on the next successful unlock.  No re-encryption happens;
//! a real rotation would have to re-seal every record, which the
//! contract does not ask for.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde_json::json;
use subtle::ConstantTimeEq;

use super::Vault;
use crate::audit::{self, AuditKind};
use crate::crypto::kdf::{derive_key, generate_salt, DEFAULT_ITERATIONS};
use crate::crypto::keys::{MasterKey, KEY_LEN};
use crate::errors::{Result, VaultError};
use crate::store::Namespace;

/// Fixed store key for the exported master-key bytes (credentials ns).
const MASTER_KEY_ID: &str = "masterKey";

/// Metadata keys.
const SALT_KEY: &str = "salt";
const ROTATION_KEY: &str = "lastKeyRotation";
const INITIALIZED_KEY: &str = "vaultInitialized";
const ITERATIONS_KEY: &str = "kdfIterations";

/// Rotation interval: 30 days in milliseconds.
const ROTATION_INTERVAL_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Capability handle for an unlocked vault.
///
/// Owns the master key for the duration of the session; the key is
/// zeroized when the session is dropped.  Item and chaff operations
/// require a `&Session`, so nothing can touch ciphertext after logout.
pub struct Session {
    key: MasterKey,
}

impl Session {
    pub(crate) fn new(key: MasterKey) -> Self {
        Self { key }
    }

    pub(crate) fn key(&self) -> &MasterKey {
        &self.key
    }
}

impl Vault {
    /// Create the vault: generate a salt, derive the master key from
    /// `password`, and persist the exported key bytes plus metadata.
    ///
    /// No-throw contract: storage failures are recorded as a failed
    /// `vault_init` audit event and reported as `Ok(false)` rather
    /// than an error.  Returns `Ok(false)` as well if the vault is
    /// already initialized.
    pub fn initialize(&mut self, password: &str, iterations: u32) -> Result<bool> {
        if self.is_unlock_required()? {
            let _ = audit::append(
                &self.store,
                AuditKind::VaultInit,
                json!({"success": false, "error": "vault already initialized"}),
            );
            return Ok(false);
        }

        match self.write_initial_state(password, iterations) {
            Ok(()) => {
                let _ = audit::append(
                    &self.store,
                    AuditKind::VaultInit,
                    json!({"success": true}),
                );
                Ok(true)
            }
            Err(e) => {
                let _ = audit::append(
                    &self.store,
                    AuditKind::VaultInit,
                    json!({"success": false, "error": e.to_string()}),
                );
                Ok(false)
            }
        }
    }

    fn write_initial_state(&mut self, password: &str, iterations: u32) -> Result<()> {
        let salt = generate_salt();
        let key = derive_key(password.as_bytes(), &salt, iterations)?;
        let exported = key.export_bytes();
        let now = Utc::now().timestamp_millis();

        self.store.set(
            Namespace::Credentials,
            MASTER_KEY_ID,
            &serde_json::to_string(&BASE64.encode(exported))?,
        )?;
        self.set_meta(SALT_KEY, &json!(BASE64.encode(salt)))?;
        self.set_meta(ROTATION_KEY, &json!(now))?;
        self.set_meta(INITIALIZED_KEY, &json!(true))?;
        self.set_meta(ITERATIONS_KEY, &json!(iterations))?;
        Ok(())
    }

    /// Unlock the vault with `password`.
    ///
    /// Re-derives the key from the stored salt (using the iteration
    /// count recorded at initialization) and compares the exported
    /// bytes against the persisted entry in constant time.  Every
    /// attempt, successful or not, appends an `unlock_attempt` audit
    /// event with the outcome.
    pub fn authenticate(&mut self, password: &str) -> Result<Session> {
        match self.try_authenticate(password) {
            Ok(session) => {
                let _ = audit::append(
                    &self.store,
                    AuditKind::UnlockAttempt,
                    json!({"success": true}),
                );
                self.refresh_rotation_timestamp();
                Ok(session)
            }
            Err(e) => {
                let _ = audit::append(
                    &self.store,
                    AuditKind::UnlockAttempt,
                    json!({"success": false, "error": e.to_string()}),
                );
                Err(e)
            }
        }
    }

    fn try_authenticate(&self, password: &str) -> Result<Session> {
        let salt_b64 = self
            .get_meta(SALT_KEY)?
            .and_then(|v| v.as_str().map(str::to_owned))
            .ok_or(VaultError::AuthDataMissing)?;
        let salt = BASE64
            .decode(&salt_b64)
            .map_err(|_| VaultError::AuthDataMissing)?;

        let iterations = self
            .get_meta(ITERATIONS_KEY)?
            .and_then(|v| v.as_u64())
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_ITERATIONS);

        let derived = derive_key(password.as_bytes(), &salt, iterations)?;

        let stored_b64: String = match self.store.get(Namespace::Credentials, MASTER_KEY_ID)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => return Err(VaultError::MasterKeyMissing),
        };
        let stored = BASE64
            .decode(&stored_b64)
            .map_err(|_| VaultError::MasterKeyMissing)?;
        let stored: [u8; KEY_LEN] = stored
            .try_into()
            .map_err(|_| VaultError::MasterKeyMissing)?;

        // Constant-time comparison of the exported key bytes.
        if bool::from(derived.export_bytes().ct_eq(&stored)) {
            // Import the persisted bytes back into an opaque key.
            Ok(Session::new(MasterKey::from_bytes(stored)))
        } else {
            Err(VaultError::AuthMismatch)
        }
    }

    /// Reset the rotation timestamp if more than 30 days have passed.
    /// Best-effort: a metadata write failure does not fail the unlock.
    fn refresh_rotation_timestamp(&mut self) {
        let now = Utc::now().timestamp_millis();
        let last = self
            .get_meta(ROTATION_KEY)
            .ok()
            .flatten()
            .and_then(|v| v.as_i64());

        if rotation_due(last, now) {
            let _ = self.set_meta(ROTATION_KEY, &json!(now));
        }
    }

    /// True iff a persisted master-key entry exists, i.e. the vault
    /// has been initialized with a password.
    pub fn is_unlock_required(&self) -> Result<bool> {
        Ok(self
            .store
            .get(Namespace::Credentials, MASTER_KEY_ID)?
            .is_some())
    }

    /// Epoch-ms timestamp of the last rotation reset, if recorded.
    pub fn last_rotation(&self) -> Result<Option<i64>> {
        Ok(self.get_meta(ROTATION_KEY)?.and_then(|v| v.as_i64()))
    }

    pub(crate) fn get_meta(&self, key: &str) -> Result<Option<serde_json::Value>> {
        match self.store.get(Namespace::Metadata, key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn set_meta(&mut self, key: &str, value: &serde_json::Value) -> Result<()> {
        self.store
            .set(Namespace::Metadata, key, &serde_json::to_string(value)?)
    }
}

/// A rotation is due when no timestamp is recorded or more than 30
/// days have elapsed since the last one.
fn rotation_due(last: Option<i64>, now: i64) -> bool {
    match last {
        Some(last) => now - last > ROTATION_INTERVAL_MS,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    #[test]
    fn rotation_not_due_within_thirty_days() {
        let now = 100 * DAY_MS;
        assert!(!rotation_due(Some(now - 29 * DAY_MS), now));
        assert!(!rotation_due(Some(now), now));
    }

    #[test]
    fn rotation_due_after_thirty_days() {
        let now = 100 * DAY_MS;
        assert!(rotation_due(Some(now - 31 * DAY_MS), now));
    }

    #[test]
    fn rotation_due_when_timestamp_missing() {
        assert!(rotation_due(None, 0));
    }
}
