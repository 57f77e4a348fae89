//! Notevault CLI - encrypted-at-rest notes from the command line
//!
//! This is the command-line interface for Notevault. It wires config,
//! logging and Ctrl-C handling around the core note service.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use notevault_core::{CancellationToken, VaultError, VERSION};

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{init, misc, notes};
use crate::errors::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    let ctx = AppContext::new(&cli, cancel);
    if let Err(e) = run(&ctx, &cli).await {
        report_and_exit(e);
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked from the flags.
fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report_and_exit(e: anyhow::Error) -> ! {
    if let Some(cli_error) = e.downcast_ref::<CliError>() {
        cli_error.exit();
    }
    if let Some(cli_error) = e.downcast_ref::<VaultError>().and_then(CliError::from_vault) {
        cli_error.exit();
    }

    eprintln!("Error: {:#}", e);
    std::process::exit(1);
}

async fn run(ctx: &AppContext<'_>, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => {
            init::handle_init(ctx, args).await?;
        }
        Some(Commands::Add(args)) => {
            notes::handle_add(ctx, args).await?;
        }
        Some(Commands::Show(args)) => {
            notes::handle_show(ctx, args).await?;
        }
        Some(Commands::List(args)) => {
            notes::handle_list(ctx, args).await?;
        }
        Some(Commands::Edit(args)) => {
            notes::handle_edit(ctx, args).await?;
        }
        Some(Commands::Delete(args)) => {
            notes::handle_delete(ctx, args).await?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            println!("Notevault v{}", VERSION);
            println!("\nQuickstart:");
            println!("  notevault init");
            println!("  export NOTEVAULT_MASTER_KEY=...");
            println!("  notevault add --owner alice --body \"Hello\"");
            println!("  notevault list --owner alice");
            println!("  notevault show <id>");
            println!("\nRun `notevault --help` for full usage.");
        }
    }

    Ok(())
}
