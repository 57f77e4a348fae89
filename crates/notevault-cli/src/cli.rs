use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use notevault_core::VERSION;

use crate::constants::{CONFIG_ENV, DB_ENV, MASTER_KEY_ENV};

/// Notevault - encrypted-at-rest notes from the command line
#[derive(Parser)]
#[command(name = "notevault")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = CONFIG_ENV, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the note database (overrides config)
    #[arg(long, global = true, env = DB_ENV, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Master secret used to derive the note key
    #[arg(long, global = true, env = MASTER_KEY_ENV, hide_env_values = true, hide = true)]
    pub master_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Owner of the new note
    #[arg(long, value_name = "OWNER")]
    pub owner: String,

    /// Note body (read from stdin when omitted)
    #[arg(long)]
    pub body: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Owner whose notes are listed
    #[arg(long, value_name = "OWNER")]
    pub owner: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// New note body (read from stdin when omitted)
    #[arg(long)]
    pub body: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Note ID
    #[arg(value_name = "ID")]
    pub id: i64,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file with a fresh salt and create the database
    Init(InitArgs),

    /// Encrypt and store a new note
    Add(AddArgs),

    /// Show a note by ID
    Show(ShowArgs),

    /// List an owner's notes, newest first
    List(ListArgs),

    /// Replace a note's content
    Edit(EditArgs),

    /// Delete a note by ID
    Delete(DeleteArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
