//! Partitioned key-value store backed by SQLite.
//!
//! All persistent state lives in a single local database with one table:
//!
//! ```text
//! kv (namespace TEXT, key TEXT, value TEXT, PRIMARY KEY (namespace, key))
//! ```
//!
//! The composite primary key gives us four fully isolated namespaces —
//! a key in one namespace can never collide with the same key in another.
//! Values are JSON text supplied by the callers; this layer never
//! interprets them.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::errors::{Result, VaultError};

/// The four partitions of the vault store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Exported master-key bytes (the single `masterKey` entry).
    Credentials,
    /// Encrypted item envelopes, keyed by item id.
    Records,
    /// Vault metadata: salt, rotation timestamp, initialized flag.
    Metadata,
    /// Append-only audit events, keyed by event id.
    Audit,
}

impl Namespace {
    /// Stable string form used in the `namespace` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Credentials => "credentials",
            Namespace::Records => "records",
            Namespace::Metadata => "metadata",
            Namespace::Audit => "audit",
        }
    }
}

/// Handle to the vault's backing database.
pub struct KvStore {
    conn: Connection,
}

impl KvStore {
    /// Open (or create) the store at `path`.
    ///
    /// Creates the parent directory if needed and restricts the database
    /// file to owner-only permissions on Unix.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Restrict the database file to the owner (it holds ciphertext
        // and the exported master-key bytes).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(path, perms);
        }

        Self::from_connection(conn)
    }

    /// Open an in-memory store. Used by tests.
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                namespace TEXT NOT NULL,
                key       TEXT NOT NULL,
                value     TEXT NOT NULL,
                PRIMARY KEY (namespace, key)
            );",
        )?;
        Ok(Self { conn })
    }

    /// Insert or overwrite `key` in `ns`.
    pub fn set(&self, ns: Namespace, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (namespace, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT (namespace, key) DO UPDATE SET value = excluded.value",
            rusqlite::params![ns.as_str(), key, value],
        )?;
        Ok(())
    }

    /// Fetch the value stored under `key` in `ns`, if any.
    pub fn get(&self, ns: Namespace, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv WHERE namespace = ?1 AND key = ?2")?;
        let mut rows = stmt.query(rusqlite::params![ns.as_str(), key])?;

        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Remove `key` from `ns`. Succeeds whether or not the key existed.
    pub fn remove(&self, ns: Namespace, key: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM kv WHERE namespace = ?1 AND key = ?2",
            rusqlite::params![ns.as_str(), key],
        )?;
        Ok(())
    }

    /// List every key in `ns`, ordered by key.
    ///
    /// The ordering is part of the contract: audit-log paging skips
    /// entries in exactly this enumeration order.
    pub fn list_keys(&self, ns: Namespace) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv WHERE namespace = ?1 ORDER BY key")?;
        let rows = stmt.query_map(rusqlite::params![ns.as_str()], |row| row.get(0))?;

        let mut keys = Vec::new();
        for key in rows {
            keys.push(key?);
        }
        Ok(keys)
    }

    /// Visit every `(key, value)` pair in `ns`, in key order.
    pub fn iterate<F>(&self, ns: Namespace, mut visitor: F) -> Result<()>
    where
        F: FnMut(&str, &str) -> Result<()>,
    {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM kv WHERE namespace = ?1 ORDER BY key")?;
        let rows = stmt.query_map(rusqlite::params![ns.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            visitor(&key, &value)?;
        }
        Ok(())
    }

    /// Delete every entry in `ns`. Other namespaces are untouched.
    pub fn clear(&self, ns: Namespace) -> Result<()> {
        self.conn.execute(
            "DELETE FROM kv WHERE namespace = ?1",
            rusqlite::params![ns.as_str()],
        )?;
        Ok(())
    }

    /// Number of entries in `ns`.
    pub fn count(&self, ns: Namespace) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM kv WHERE namespace = ?1",
            rusqlite::params![ns.as_str()],
            |row| row.get(0),
        )?;
        usize::try_from(count).map_err(|_| VaultError::Storage("row count overflow".into()))
    }

    /// Return the path to the store database for a given vault directory.
    pub fn db_path(vault_dir: &Path) -> PathBuf {
        vault_dir.join("vault.db")
    }
}
