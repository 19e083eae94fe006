//! Audit log — append-only operation history.
//!
//! Every vault mutation and every authentication attempt appends one
//! event to the `audit` namespace.  Events are never updated or
//! removed, and they are excluded from export documents.
//!
//! Retrieval pages before it sorts: entries are enumerated in store
//! key order, `offset` entries are skipped and up to `limit` taken,
//! and only *then* is the selected page sorted by timestamp
//! descending.  When the log exceeds `limit + offset`, which events
//! appear depends on that enumeration order.  This ordering is part of
//! the contract, not an accident.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Result;
use crate::store::{KvStore, Namespace};

/// Length of the random suffix in generated ids.
const ID_SUFFIX_LEN: usize = 6;

/// The kinds of events the engine records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    VaultInit,
    UnlockAttempt,
    ItemCreate,
    ItemUpdate,
    ItemDelete,
    Import,
}

/// A single audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique id, `log_<epoch-ms>_<random suffix>`. Also the store key.
    pub id: String,

    /// Event tag.
    #[serde(rename = "type")]
    pub kind: AuditKind,

    /// Event time in epoch milliseconds. Drives retrieval ordering.
    pub timestamp: i64,

    /// Arbitrary event payload (outcomes, counts, error messages).
    pub details: Value,
}

/// Append an event with the current timestamp.
pub fn append(store: &KvStore, kind: AuditKind, details: Value) -> Result<()> {
    let now = Utc::now().timestamp_millis();
    let event = AuditEvent {
        id: format!("log_{}_{}", now, random_suffix(ID_SUFFIX_LEN)),
        kind,
        timestamp: now,
        details,
    };
    append_event(store, &event)
}

/// Persist a fully built event under its id.
pub fn append_event(store: &KvStore, event: &AuditEvent) -> Result<()> {
    let json = serde_json::to_string(event)?;
    store.set(Namespace::Audit, &event.id, &json)
}

/// Retrieve a page of audit events.
///
/// Skips `offset` entries and takes up to `limit` in store enumeration
/// order, then sorts the selected page by timestamp descending.
/// Entries that fail to parse are skipped rather than aborting the
/// query.
pub fn query(store: &KvStore, limit: usize, offset: usize) -> Result<Vec<AuditEvent>> {
    let mut all: Vec<AuditEvent> = Vec::new();
    store.iterate(Namespace::Audit, |_key, value| {
        if let Ok(event) = serde_json::from_str::<AuditEvent>(value) {
            all.push(event);
        }
        Ok(())
    })?;

    let mut page: Vec<AuditEvent> = all.into_iter().skip(offset).take(limit).collect();
    page.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(page)
}

/// A random alphanumeric suffix for generated ids.
pub(crate) fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
