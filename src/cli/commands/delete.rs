//! `chaffvault delete` — remove an item from the vault.

use dialoguer::Confirm;

use crate::cli::{output, prompt_password, resolve_paths, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::Vault;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: &str, force: bool) -> Result<()> {
    let (_settings, db_path) = resolve_paths(cli)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete item {id}?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("failed to read confirmation: {e}")))?;
        if !confirmed {
            return Err(VaultError::UserCancelled);
        }
    }

    let mut vault = Vault::open(&db_path)?;
    let password = prompt_password()?;
    let session = vault.authenticate(&password)?;

    vault.delete_item(&session, id)?;
    output::success(&format!("Deleted item {id}"));
    Ok(())
}
