//! The vault engine facade.
//!
//! `Vault` wraps the partitioned store and exposes the whole engine
//! surface: authentication (`auth`), item lifecycle (`item`), and
//! export/import (`transfer`).  The unlocked master key is never held
//! by the vault itself — `authenticate` hands out a `Session`
//! capability, and dropping it is logout.

pub mod auth;
pub mod item;
pub mod transfer;

use std::path::Path;

use crate::errors::Result;
use crate::store::KvStore;

pub use auth::Session;
pub use item::{ItemKind, ItemPatch, NewItem, VaultItem};
pub use transfer::{ExportDocument, ImportCounts};

/// The main vault handle.
///
/// Mutating operations take `&mut self`, so two mutations of the same
/// record cannot interleave through one handle.
pub struct Vault {
    store: KvStore,
}

impl Vault {
    /// Open (or create) a vault database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            store: KvStore::open(path)?,
        })
    }

    /// Open an in-memory vault. Used by tests.
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            store: KvStore::in_memory()?,
        })
    }

    /// Access the underlying partitioned store.
    pub fn store(&self) -> &KvStore {
        &self.store
    }

    /// Retrieve a page of audit events (see `audit::query` for the
    /// paging contract).
    pub fn query_audit(&self, limit: usize, offset: usize) -> Result<Vec<crate::audit::AuditEvent>> {
        crate::audit::query(&self.store, limit, offset)
    }
}
