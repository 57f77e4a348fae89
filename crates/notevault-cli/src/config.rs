use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use notevault_core::crypto::{DEFAULT_ITERATIONS, DEFAULT_SALT};

use crate::constants::{APP_DIR, INIT_SALT_BYTES};
use crate::errors::CliError;

#[derive(Debug, Serialize, Deserialize)]
pub struct NotevaultConfig {
    pub vault: VaultSection,
    #[serde(default)]
    pub encryption: EncryptionSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VaultSection {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EncryptionSection {
    /// Base64-encoded key derivation salt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,

    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Master secret; `NOTEVAULT_MASTER_KEY` takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_key: Option<String>,
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

impl Default for EncryptionSection {
    fn default() -> Self {
        Self {
            salt: None,
            iterations: DEFAULT_ITERATIONS,
            master_key: None,
        }
    }
}

impl EncryptionSection {
    /// Decoded salt, falling back to the built-in default.
    pub fn salt_bytes(&self) -> anyhow::Result<Vec<u8>> {
        match self.salt.as_deref() {
            Some(encoded) => STANDARD.decode(encoded.trim()).map_err(|e| {
                CliError::config_with_hint(
                    format!("Invalid [encryption] salt: {}", e),
                    "Hint: The salt must be standard base64.",
                )
                .into()
            }),
            None => Ok(DEFAULT_SALT.to_vec()),
        }
    }
}

impl NotevaultConfig {
    /// Config for a fresh vault with a random salt.
    pub fn new(db_path: &Path) -> Self {
        Self {
            vault: VaultSection {
                path: db_path.to_string_lossy().to_string(),
            },
            encryption: EncryptionSection {
                salt: Some(generate_salt()),
                ..EncryptionSection::default()
            },
        }
    }
}

/// Random base64 salt for a new installation.
pub fn generate_salt() -> String {
    let mut salt = [0u8; INIT_SALT_BYTES];
    OsRng.fill_bytes(&mut salt);
    STANDARD.encode(salt)
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_db_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("notes.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<NotevaultConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &NotevaultConfig) -> anyhow::Result<()> {
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    notevault_core::fs::write_atomic(path, contents.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    Ok(home_dir()?.join(".config").join(APP_DIR))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join(APP_DIR))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
