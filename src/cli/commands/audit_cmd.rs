//! `chaffvault audit` — display the audit log.
//!
//! Usage:
//!   chaffvault audit               # show the first 50-entry page
//!   chaffvault audit --last 20     # page size 20
//!   chaffvault audit --offset 50   # skip the first 50 entries

use crate::cli::{output, resolve_paths, Cli};
use crate::errors::Result;
use crate::vault::Vault;

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, offset: usize) -> Result<()> {
    let (_settings, db_path) = resolve_paths(cli)?;

    let vault = Vault::open(&db_path)?;
    let events = vault.query_audit(last, offset)?;

    if events.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    output::print_audit_table(&events);
    Ok(())
}
