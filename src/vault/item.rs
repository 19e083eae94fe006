//! Vault item lifecycle — CRUD over encrypted records.
//!
//! Each item's plaintext (`{name, type, data, createdAt, updatedAt}`
//! in JSON) is sealed into one envelope and persisted under the item
//! id in the records namespace.  Plaintext is never written to the
//! store.  Every mutation appends exactly one audit event and
//! refreshes `updatedAt`, which drives the newest-first listing order.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::auth::Session;
use super::Vault;
use crate::audit::{self, random_suffix, AuditKind};
use crate::crypto::{open, seal, Envelope};
use crate::errors::{Result, VaultError};
use crate::store::Namespace;

/// Length of the random suffix in item ids.
const ID_SUFFIX_LEN: usize = 6;

/// The four item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Password,
    Note,
    Card,
    Other,
}

impl std::str::FromStr for ItemKind {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "password" => Ok(ItemKind::Password),
            "note" => Ok(ItemKind::Note),
            "card" => Ok(ItemKind::Card),
            "other" => Ok(ItemKind::Other),
            _ => Err(VaultError::CommandFailed(format!(
                "unknown item kind '{s}' — use password, note, card, or other"
            ))),
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ItemKind::Password => "password",
            ItemKind::Note => "note",
            ItemKind::Card => "card",
            ItemKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// The persisted (pre-encryption) form of an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredItem {
    name: String,
    #[serde(rename = "type")]
    kind: ItemKind,
    data: Map<String, Value>,
    created_at: i64,
    updated_at: i64,
}

/// A decrypted vault item.
#[derive(Debug, Clone)]
pub struct VaultItem {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    /// Arbitrary field map — possibly chaff-obfuscated by the caller.
    pub data: Map<String, Value>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for `create_item`.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub kind: ItemKind,
    pub data: Map<String, Value>,
}

/// Partial update for `update_item` — present fields replace the
/// stored ones (shallow merge).
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub kind: Option<ItemKind>,
    pub data: Option<Map<String, Value>>,
}

impl Vault {
    /// Encrypt and persist a new item; returns its generated id.
    pub fn create_item(&mut self, session: &Session, item: NewItem) -> Result<String> {
        let now = chrono::Utc::now().timestamp_millis();
        let id = format!("{}_{}", now, random_suffix(ID_SUFFIX_LEN));

        let stored = StoredItem {
            name: item.name,
            kind: item.kind,
            data: item.data,
            created_at: now,
            updated_at: now,
        };
        self.write_record(session, &id, &stored)?;

        audit::append(&self.store, AuditKind::ItemCreate, json!({"id": id}))?;
        Ok(id)
    }

    /// Decrypt and return the item stored under `id`.
    ///
    /// `Ok(None)` when no such record exists; `DecryptionFailed` when
    /// the record is corrupted or the wrong key is active.
    pub fn read_item(&self, session: &Session, id: &str) -> Result<Option<VaultItem>> {
        match self.store.get(Namespace::Records, id)? {
            Some(raw) => Ok(Some(Self::open_record(session, id, &raw)?)),
            None => Ok(None),
        }
    }

    /// Shallow-merge `patch` into the stored item and re-encrypt it.
    pub fn update_item(&mut self, session: &Session, id: &str, patch: ItemPatch) -> Result<()> {
        let raw = self
            .store
            .get(Namespace::Records, id)?
            .ok_or_else(|| VaultError::RecordNotFound(id.to_string()))?;
        let existing = Self::open_record(session, id, &raw)?;

        let stored = StoredItem {
            name: patch.name.unwrap_or(existing.name),
            kind: patch.kind.unwrap_or(existing.kind),
            data: patch.data.unwrap_or(existing.data),
            created_at: existing.created_at,
            updated_at: chrono::Utc::now().timestamp_millis(),
        };
        self.write_record(session, id, &stored)?;

        audit::append(&self.store, AuditKind::ItemUpdate, json!({"id": id}))?;
        Ok(())
    }

    /// Remove the record under `id`.  Unconditional — succeeds whether
    /// or not the record existed.
    pub fn delete_item(&mut self, _session: &Session, id: &str) -> Result<()> {
        self.store.remove(Namespace::Records, id)?;
        audit::append(&self.store, AuditKind::ItemDelete, json!({"id": id}))?;
        Ok(())
    }

    /// Decrypt every record and return them newest-first (by
    /// `updatedAt`).  A record that fails to decrypt or parse is
    /// silently dropped so one corrupt entry cannot block the rest of
    /// the vault.
    pub fn list_items(&self, session: &Session) -> Result<Vec<VaultItem>> {
        let mut items = Vec::new();
        for id in self.store.list_keys(Namespace::Records)? {
            let Some(raw) = self.store.get(Namespace::Records, &id)? else {
                continue;
            };
            if let Ok(item) = Self::open_record(session, &id, &raw) {
                items.push(item);
            }
        }

        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(items)
    }

    fn write_record(&mut self, session: &Session, id: &str, stored: &StoredItem) -> Result<()> {
        let plaintext = serde_json::to_vec(stored)?;
        let envelope = seal(session.key(), &plaintext)?;
        self.store
            .set(Namespace::Records, id, &serde_json::to_string(&envelope)?)
    }

    fn open_record(session: &Session, id: &str, raw: &str) -> Result<VaultItem> {
        // A store value that is not a valid envelope counts as
        // corruption, same as a failed auth tag.
        let envelope: Envelope =
            serde_json::from_str(raw).map_err(|_| VaultError::DecryptionFailed)?;
        let plaintext = open(session.key(), &envelope)?;
        let stored: StoredItem =
            serde_json::from_slice(&plaintext).map_err(|_| VaultError::DecryptionFailed)?;

        Ok(VaultItem {
            id: id.to_string(),
            name: stored.name,
            kind: stored.kind,
            data: stored.data,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        })
    }
}
