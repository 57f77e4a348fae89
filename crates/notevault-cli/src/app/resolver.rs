//! Path resolution for config and database files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, NotevaultConfig};
use crate::errors::CliError;

/// Resolve the config file path from `--config`/`NOTEVAULT_CONFIG` or XDG.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    match cli.config.clone() {
        Some(path) => Ok(path),
        None => default_config_path(),
    }
}

/// Resolve the database path from `--db`/`NOTEVAULT_DB` or the config.
pub fn resolve_db_path(
    cli: &Cli,
    config: Option<&NotevaultConfig>,
    config_path: &Path,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.db.clone() {
        return Ok(path);
    }

    match config {
        Some(config) => Ok(PathBuf::from(&config.vault.path)),
        None => Err(CliError::not_found(
            missing_config_message(config_path),
            "Hint: Run `notevault init`, or pass --db /path/to/notes.db.",
        )
        .into()),
    }
}

/// Error message when the config file is missing.
fn missing_config_message(config_path: &Path) -> String {
    format!("No notevault config found at {}", config_path.display())
}
