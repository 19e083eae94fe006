//! `chaffvault list` — list all items, newest first.

use crate::cli::{output, prompt_password, resolve_paths, Cli};
use crate::errors::Result;
use crate::vault::Vault;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_settings, db_path) = resolve_paths(cli)?;

    let mut vault = Vault::open(&db_path)?;
    let password = prompt_password()?;
    let session = vault.authenticate(&password)?;

    let items = vault.list_items(&session)?;
    output::print_items_table(&items);
    Ok(())
}
