//! CLI command definitions and dispatch.
//!
//! Each group of subcommands lives in its own submodule:
//! - `fetch`: `fetch`, `search` and `load` over files and directories
//! - `lookup`: one-off remote queries and the response cache
//! - `settings`: showing and editing the config file

mod fetch;
mod lookup;
mod settings;

use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::runtime::{Builder, Runtime};

use crate::lyrics::{AutoConfirm, HeadlessPrompter, Method, Prompter};

use super::prompt::TerminalPrompter;

pub use fetch::{cmd_fetch, cmd_load};
pub use lookup::{cmd_clear_cache, cmd_lookup};
pub use settings::{cmd_config_path, cmd_config_set, cmd_config_show};

/// Lyrics Minder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Lookup service root (overrides the config file)
    #[arg(long, env = "LYRICS_MINDER_BASE_URL", global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch lyrics by exact match for a file or directory
    Fetch {
        /// Audio file or directory
        path: PathBuf,
        /// Overwrite existing lyrics without asking
        #[arg(short, long)]
        yes: bool,
        /// Track length to query with, as M:SS or H:MM:SS (overrides tags)
        #[arg(long)]
        duration: Option<String>,
        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
    },
    /// Search for lyrics by title and pick a result
    Search {
        /// Audio file or directory
        path: PathBuf,
        /// Take the top result and overwrite without asking
        #[arg(short, long)]
        yes: bool,
        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
    },
    /// Load files; fetch lyrics in the background if auto_fetch_on_load is set
    Load {
        /// Audio file or directory
        path: PathBuf,
        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
    },
    /// Query the lookup service without touching any file
    Lookup {
        #[arg(long)]
        artist: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        album: String,
        /// Track length as M:SS or H:MM:SS
        #[arg(long)]
        duration: String,
    },
    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Delete cached lookup responses
    ClearCache,
}

/// `config` subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current settings
    Show,
    /// Change one lyrics setting
    Set {
        /// auto_fetch_on_load, auto_overwrite or save_lrc_file
        key: String,
        #[arg(action = clap::ArgAction::Set, value_parser = clap::builder::BoolishValueParser::new())]
        value: bool,
    },
    /// Print the config file location
    Path,
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let base_url = cli.base_url.as_deref();

    match &cli.command {
        Commands::Fetch {
            path,
            yes,
            duration,
            recursive,
        } => cmd_fetch(
            &runtime()?,
            path,
            Method::Get,
            prompter(*yes),
            duration.as_deref(),
            *recursive,
            base_url,
        ),
        Commands::Search {
            path,
            yes,
            recursive,
        } => cmd_fetch(
            &runtime()?,
            path,
            Method::Search,
            prompter(*yes),
            None,
            *recursive,
            base_url,
        ),
        Commands::Load { path, recursive } => cmd_load(&runtime()?, path, *recursive, base_url),
        Commands::Lookup {
            artist,
            title,
            album,
            duration,
        } => cmd_lookup(&runtime()?, artist, title, album, duration, base_url),
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Set { key, value } => cmd_config_set(key, *value),
            ConfigAction::Path => cmd_config_path(),
        },
        Commands::ClearCache => cmd_clear_cache(),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Lookups for one run share a single thread.
fn runtime() -> anyhow::Result<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}

/// `--yes` confirms everything; otherwise ask on a terminal, or decline.
fn prompter(yes: bool) -> Box<dyn Prompter> {
    if yes {
        Box::new(AutoConfirm)
    } else if std::io::stdin().is_terminal() {
        Box::new(TerminalPrompter::new())
    } else {
        tracing::info!("stdin is not a terminal, existing lyrics will be kept");
        Box::new(HeadlessPrompter)
    }
}
