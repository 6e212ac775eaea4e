//! Lyrics Minder - LRCLIB lyrics for local audio files.
//!
//! Looks tracks up on LRCLIB and reconciles the result with what the files
//! already carry: the embedded lyrics tag and a `<file>.lrc` sidecar. Existing
//! sidecars are never rewritten, and existing lyrics are only replaced when
//! the user agrees or `auto_overwrite` is set.

pub mod cli;
pub mod config;
pub mod duration;
pub mod error;
pub mod library;
pub mod lookup;
pub mod lyrics;
pub mod metadata;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // RUST_LOG wins over -v
    let default_level = if args.verbose {
        "lyrics_minder=debug"
    } else {
        "lyrics_minder=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    cli::run_command(&args)
}
