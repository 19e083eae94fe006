//! `chaffvault show` — decrypt and display one item.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::chaff::{remove_chaff, ChaffField};
use crate::cli::{output, prompt_password, resolve_paths, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::Vault;

/// Execute the `show` command.
///
/// Chaff-obfuscated items are detected by their field shape and
/// de-chaffed automatically; `--raw` prints the stored fields as-is.
pub fn execute(cli: &Cli, id: &str, raw: bool) -> Result<()> {
    let (_settings, db_path) = resolve_paths(cli)?;

    let mut vault = Vault::open(&db_path)?;
    let password = prompt_password()?;
    let session = vault.authenticate(&password)?;

    let item = vault
        .read_item(&session, id)?
        .ok_or_else(|| VaultError::RecordNotFound(id.to_string()))?;

    output::info(&format!("{} ({}, {})", item.name, item.kind, item.id));

    let fields = if raw {
        item.data
    } else {
        match as_chaffed(&item.data) {
            Some(obfuscated) => remove_chaff(&obfuscated),
            None => item.data,
        }
    };

    for (key, value) in &fields {
        println!("  {key} = {value}");
    }
    Ok(())
}

/// Try to interpret a stored field map as chaff output.
///
/// Only succeeds when every value has the ChaffField shape, so plain
/// items are never mangled.
fn as_chaffed(data: &Map<String, Value>) -> Option<HashMap<String, ChaffField>> {
    let mut obfuscated = HashMap::with_capacity(data.len());
    for (key, value) in data {
        let entry: ChaffField = serde_json::from_value(value.clone()).ok()?;
        obfuscated.insert(key.clone(), entry);
    }
    Some(obfuscated)
}
