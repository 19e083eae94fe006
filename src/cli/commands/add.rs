//! `chaffvault add` — create a new encrypted item.

use serde_json::{Map, Value};

use crate::chaff::add_chaff;
use crate::cli::fields::parse_field_pairs;
use crate::cli::{output, prompt_password, resolve_paths, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::{NewItem, Vault};

/// Execute the `add` command.
pub fn execute(cli: &Cli, name: &str, kind: &str, fields: &[String], chaff: bool) -> Result<()> {
    let (settings, db_path) = resolve_paths(cli)?;
    let kind = kind.parse()?;
    let fields = parse_field_pairs(fields)?;

    let mut vault = Vault::open(&db_path)?;
    let password = prompt_password()?;
    let session = vault.authenticate(&password)?;

    let data = if chaff {
        obfuscate(&fields, settings.chaff_ratio)?
    } else {
        fields
    };

    let id = vault.create_item(
        &session,
        NewItem {
            name: name.to_string(),
            kind,
            data,
        },
    )?;

    output::success(&format!("Added item '{name}' ({id})"));
    if chaff {
        output::info(&format!(
            "Fields are chaff-obfuscated ({} decoys per field).",
            settings.chaff_ratio
        ));
    }
    Ok(())
}

/// Run the field map through the chaff layer and re-serialize the
/// obfuscated entries as the item's stored data.
fn obfuscate(fields: &Map<String, Value>, ratio: u32) -> Result<Map<String, Value>> {
    let obfuscated = add_chaff(fields, ratio);

    let mut data = Map::new();
    for (key, entry) in obfuscated {
        let value = serde_json::to_value(entry)
            .map_err(|e| VaultError::Serialization(e.to_string()))?;
        data.insert(key, value);
    }
    Ok(data)
}
