//! `chaffvault edit` — update an existing item.

use crate::cli::fields::parse_field_pairs;
use crate::cli::{output, prompt_password, resolve_paths, Cli};
use crate::errors::Result;
use crate::vault::{ItemPatch, Vault};

/// Execute the `edit` command.
///
/// `KEY=VALUE` pairs replace the whole stored field map; name and kind
/// are changed only when the flags are given.
pub fn execute(
    cli: &Cli,
    id: &str,
    name: Option<&str>,
    kind: Option<&str>,
    fields: &[String],
) -> Result<()> {
    let (_settings, db_path) = resolve_paths(cli)?;

    let patch = ItemPatch {
        name: name.map(str::to_owned),
        kind: kind.map(str::parse).transpose()?,
        data: if fields.is_empty() {
            None
        } else {
            Some(parse_field_pairs(fields)?)
        },
    };

    let mut vault = Vault::open(&db_path)?;
    let password = prompt_password()?;
    let session = vault.authenticate(&password)?;

    vault.update_item(&session, id, patch)?;
    output::success(&format!("Updated item {id}"));
    Ok(())
}
