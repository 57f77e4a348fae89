//! Application context for the Notevault CLI.
//!
//! Bundles CLI arguments with the cancellation token for the current
//! invocation and knows how to assemble a `NoteService`.

use std::sync::Arc;

use secrecy::SecretString;

use notevault_core::crypto::require_secret;
use notevault_core::{CancellationToken, CipherEngine, EncryptionSettings, NoteService};
use notevault_core::SqliteNoteStore;

use crate::cli::Cli;
use crate::config::{read_config, EncryptionSection, NotevaultConfig};

use super::resolver::{resolve_config_path, resolve_db_path};

/// Application context shared by every command handler.
pub struct AppContext<'a> {
    cli: &'a Cli,
    cancel: CancellationToken,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli, cancel: CancellationToken) -> Self {
        Self { cli, cancel }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Token cancelled on Ctrl-C.
    pub fn cancel(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Load the config file if it exists.
    pub fn load_config(&self) -> anyhow::Result<Option<NotevaultConfig>> {
        let path = resolve_config_path(self.cli)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(read_config(&path)?))
    }

    fn master_secret(&self, section: &EncryptionSection) -> anyhow::Result<SecretString> {
        let value = self
            .cli
            .master_key
            .clone()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| section.master_key.clone());
        Ok(require_secret(value)?)
    }

    /// Build key derivation settings from the environment and config.
    pub fn encryption_settings(
        &self,
        config: Option<&NotevaultConfig>,
    ) -> anyhow::Result<EncryptionSettings> {
        let default_section = EncryptionSection::default();
        let section = config.map_or(&default_section, |c| &c.encryption);

        Ok(EncryptionSettings::new(self.master_secret(section)?)
            .with_salt(section.salt_bytes()?)
            .with_iterations(section.iterations))
    }

    /// Open the database and derive the note key.
    pub async fn open_service(&self) -> anyhow::Result<NoteService<SqliteNoteStore>> {
        let config_path = resolve_config_path(self.cli)?;
        let config = self.load_config()?;
        let db_path = resolve_db_path(self.cli, config.as_ref(), &config_path)?;

        let settings = self.encryption_settings(config.as_ref())?;
        let cipher = tokio::task::spawn_blocking(move || CipherEngine::from_settings(&settings))
            .await
            .map_err(|e| anyhow::anyhow!("Key derivation task failed: {}", e))??;

        let store = SqliteNoteStore::open(db_path).await?;
        Ok(NoteService::new(store, Arc::new(cipher)))
    }
}
