//! `chaffvault import` — merge a previously exported JSON document
//! into the vault.

use std::fs;

use crate::cli::{output, resolve_paths, Cli};
use crate::errors::Result;
use crate::vault::Vault;

/// Execute the `import` command.
pub fn execute(cli: &Cli, file: &str) -> Result<()> {
    let (_settings, db_path) = resolve_paths(cli)?;

    let json = fs::read_to_string(file)?;

    let mut vault = Vault::open(&db_path)?;
    let counts = vault.import_json(&json)?;

    output::success(&format!(
        "Imported {} records and {} metadata entries from {file}",
        counts.data, counts.meta
    ));
    output::tip("Existing entries not present in the document were left untouched.");
    Ok(())
}
