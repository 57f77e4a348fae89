//! Init command handler.

use notevault_core::SqliteNoteStore;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_db_path, read_config, write_config, NotevaultConfig};
use crate::errors::CliError;

pub async fn handle_init(ctx: &AppContext<'_>, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path(ctx.cli())?;

    let previous = if config_path.exists() {
        if !args.force {
            return Err(CliError::invalid_input(format!(
                "Config already exists at {}\nHint: Use `notevault init --force` to rewrite it.",
                config_path.display()
            ))
            .into());
        }
        Some(read_config(&config_path)?)
    } else {
        None
    };

    let db_path = match ctx.cli().db.clone() {
        Some(path) => path,
        None => default_db_path()?,
    };

    let mut config = NotevaultConfig::new(&db_path);
    if let Some(previous) = previous {
        // Notes already written stay readable only under the same salt.
        config.encryption = previous.encryption;
    }

    write_config(&config_path, &config)?;
    SqliteNoteStore::open(&db_path).await?;

    if !ctx.quiet() {
        println!("Config written to {}", config_path.display());
        println!("Database ready at {}", db_path.display());
        if ctx.cli().master_key.is_none() && config.encryption.master_key.is_none() {
            println!("\nSet NOTEVAULT_MASTER_KEY before adding notes.");
        }
    }
    Ok(())
}
