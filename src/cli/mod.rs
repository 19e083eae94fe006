//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod fields;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};

/// Minimum password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// ChaffVault CLI: encrypted secret vault with chaff obfuscation.
#[derive(Parser)]
#[command(
    name = "chaffvault",
    about = "Encrypted secret vault with chaff obfuscation",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: .chaffvault, or vault_dir from .chaffvault.toml)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Initialize a new vault
    Init,

    /// Add an item (fields as KEY=VALUE pairs)
    Add {
        /// Item name (e.g. "Bank")
        name: String,

        /// Item kind: password, note, card, or other
        #[arg(short, long, default_value = "password")]
        kind: String,

        /// Item fields as KEY=VALUE pairs
        #[arg(trailing_var_arg = true)]
        fields: Vec<String>,

        /// Obfuscate the fields with decoys before encrypting
        #[arg(long)]
        chaff: bool,
    },

    /// Show a decrypted item
    Show {
        /// Item id (see `chaffvault list`)
        id: String,

        /// Print stored fields as-is, without removing chaff
        #[arg(long)]
        raw: bool,
    },

    /// List all items (newest first)
    List,

    /// Edit an item (fields as KEY=VALUE pairs replace the stored data)
    Edit {
        /// Item id
        id: String,

        /// New item name
        #[arg(long)]
        name: Option<String>,

        /// New item kind
        #[arg(long)]
        kind: Option<String>,

        /// Replacement fields as KEY=VALUE pairs
        #[arg(trailing_var_arg = true)]
        fields: Vec<String>,
    },

    /// Delete an item
    Delete {
        /// Item id
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Export metadata and encrypted records to a JSON document
    Export {
        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Merge-import a previously exported JSON document
    Import {
        /// Path to the export file
        file: String,
    },

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,

        /// Number of entries to skip before the page is taken
        #[arg(long, default_value = "0")]
        offset: usize,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve settings and the vault database path for this invocation.
///
/// `--vault-dir` overrides the config file's `vault_dir`.
pub fn resolve_paths(cli: &Cli) -> Result<(Settings, PathBuf)> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;
    if let Some(ref dir) = cli.vault_dir {
        settings.vault_dir = dir.clone();
    }
    let db_path = settings.db_path(&cwd);
    Ok((settings, db_path))
}

/// Get the vault password, trying in order:
/// 1. `CHAFFVAULT_PASSWORD` env var (CI/scripting)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("CHAFFVAULT_PASSWORD") {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation and a minimum length.
///
/// The `CHAFFVAULT_PASSWORD` env var bypasses the prompt (it still has
/// to meet the minimum length).
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("CHAFFVAULT_PASSWORD") {
        if !pw.is_empty() {
            check_password_strength(&pw)?;
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt("Choose a vault password")
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
    );
    check_password_strength(&pw)?;

    let confirm = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt("Confirm vault password")
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
    );

    if *pw != *confirm {
        return Err(VaultError::PasswordMismatch);
    }
    Ok(pw)
}

fn check_password_strength(pw: &str) -> Result<()> {
    if pw.len() < MIN_PASSWORD_LEN {
        return Err(VaultError::CommandFailed(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
