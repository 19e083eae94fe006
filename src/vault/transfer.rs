//! Whole-vault export and merge-import.
//!
//! The export document snapshots the metadata and records namespaces —
//! never the credentials entry and never the audit history.  Records
//! stay ciphertext in the export, so the file is safe to move around;
//! reading its contents still requires the vault password.
//!
//! Import is a best-effort batch merge: every entry in the document is
//! upserted, entries not present in the document are left untouched,
//! and a crash mid-import can leave a partial merge.  That is a
//! documented limitation of the format, not something this layer
//! papers over.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Vault;
use crate::audit::{self, AuditKind};
use crate::crypto::Envelope;
use crate::errors::{Result, VaultError};
use crate::store::Namespace;

/// The export file format: one UTF-8 JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Snapshot of the metadata namespace.
    pub meta: BTreeMap<String, Value>,
    /// Snapshot of the records namespace (still ciphertext).
    pub data: BTreeMap<String, Envelope>,
    /// When the export was produced, epoch milliseconds.
    pub timestamp: i64,
}

/// How many entries an import applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportCounts {
    pub meta: usize,
    pub data: usize,
}

impl Vault {
    /// Snapshot metadata and records into an export document.
    pub fn export_all(&self) -> Result<ExportDocument> {
        let mut meta = BTreeMap::new();
        self.store.iterate(Namespace::Metadata, |key, value| {
            let parsed: Value = serde_json::from_str(value)?;
            meta.insert(key.to_string(), parsed);
            Ok(())
        })?;

        let mut data = BTreeMap::new();
        self.store.iterate(Namespace::Records, |key, value| {
            let envelope: Envelope = serde_json::from_str(value)?;
            data.insert(key.to_string(), envelope);
            Ok(())
        })?;

        Ok(ExportDocument {
            meta,
            data,
            timestamp: Utc::now().timestamp_millis(),
        })
    }

    /// Merge-import an export document: upsert every entry into the
    /// corresponding namespace, then append one `import` audit event
    /// with the applied counts.
    pub fn import_all(&mut self, doc: &ExportDocument) -> Result<ImportCounts> {
        for (key, value) in &doc.meta {
            self.store
                .set(Namespace::Metadata, key, &serde_json::to_string(value)?)?;
        }
        for (key, envelope) in &doc.data {
            self.store
                .set(Namespace::Records, key, &serde_json::to_string(envelope)?)?;
        }

        let counts = ImportCounts {
            meta: doc.meta.len(),
            data: doc.data.len(),
        };
        audit::append(
            &self.store,
            AuditKind::Import,
            json!({"metaCount": counts.meta, "dataCount": counts.data}),
        )?;
        Ok(counts)
    }

    /// Parse a JSON export document and merge-import it.
    ///
    /// Fails with `ImportCorrupt` (before touching the store) when the
    /// input does not parse as the expected shape.
    pub fn import_json(&mut self, json: &str) -> Result<ImportCounts> {
        let doc: ExportDocument =
            serde_json::from_str(json).map_err(|e| VaultError::ImportCorrupt(e.to_string()))?;
        self.import_all(&doc)
    }
}
