use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};

/// Project-level configuration, loaded from `.chaffvault.toml`.
///
/// Every field has a sensible default so ChaffVault works
/// out-of-the-box without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the project root) holding the vault
    /// database.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// PBKDF2 iteration count used at vault initialization
    /// (default: 100 000).
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// Decoys generated per real field by the chaff layer (default: 3).
    #[serde(default = "default_chaff_ratio")]
    pub chaff_ratio: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".chaffvault".to_string()
}

fn default_pbkdf2_iterations() -> u32 {
    crate::crypto::DEFAULT_ITERATIONS
}

fn default_chaff_ratio() -> u32 {
    crate::chaff::DEFAULT_RATIO
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            chaff_ratio: default_chaff_ratio(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".chaffvault.toml";

    /// Load settings from `<project_dir>/.chaffvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigInvalid(format!("failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.pbkdf2_iterations == 0 {
            return Err(VaultError::ConfigInvalid(
                "pbkdf2_iterations must be at least 1".into(),
            ));
        }

        Ok(settings)
    }

    /// Build the full path to the vault database.
    ///
    /// Example: `project_dir/.chaffvault/vault.db`
    pub fn db_path(&self, project_dir: &Path) -> PathBuf {
        crate::store::KvStore::db_path(&project_dir.join(&self.vault_dir))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
