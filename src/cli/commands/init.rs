//! `chaffvault init` — create a new vault.

use crate::cli::{output, prompt_new_password, resolve_paths, Cli};
use crate::errors::{Result, VaultError};
use crate::vault::Vault;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (settings, db_path) = resolve_paths(cli)?;

    let mut vault = Vault::open(&db_path)?;
    if vault.is_unlock_required()? {
        output::tip("Use `chaffvault add` to store items in the existing vault.");
        return Err(VaultError::CommandFailed(format!(
            "a vault already exists at {}",
            db_path.display()
        )));
    }

    let password = prompt_new_password()?;

    if !vault.initialize(&password, settings.pbkdf2_iterations)? {
        return Err(VaultError::CommandFailed(
            "vault initialization failed — see `chaffvault audit` for details".into(),
        ));
    }

    output::success(&format!("Vault created at {}", db_path.display()));
    output::tip("Run `chaffvault add <name> KEY=VALUE ...` to add an item.");
    output::tip("Run `chaffvault list` to see all items.");
    Ok(())
}
