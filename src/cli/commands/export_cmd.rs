//! `chaffvault export` — write the vault's metadata and encrypted
//! records to a JSON document.
//!
//! The export never contains the master key or the audit history, and
//! records stay ciphertext — the file can be moved around freely, but
//! reading its contents still requires the vault password.

use std::fs;

use crate::cli::{output, resolve_paths, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::Vault;

/// Execute the `export` command.
pub fn execute(cli: &Cli, output_path: Option<&str>) -> Result<()> {
    let (_settings, db_path) = resolve_paths(cli)?;

    let vault = Vault::open(&db_path)?;
    if !vault.is_unlock_required()? {
        return Err(VaultError::CommandFailed(
            "no vault to export — run `chaffvault init` first".into(),
        ));
    }

    let doc = vault.export_all()?;
    let json = serde_json::to_string_pretty(&doc)
        .map_err(|e| VaultError::Serialization(e.to_string()))?;

    match output_path {
        Some(path) => {
            fs::write(path, &json)?;
            output::success(&format!(
                "Exported {} records and {} metadata entries to {path}",
                doc.data.len(),
                doc.meta.len()
            ));
        }
        None => println!("{json}"),
    }
    Ok(())
}
