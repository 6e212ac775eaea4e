//! Command-line interface for lyrics-minder.
//!
//! This module provides CLI commands for fetching, searching and inspecting
//! lyrics for local audio files, and for editing the settings file.

mod commands;
mod prompt;

pub use commands::{Cli, Commands, run_command};
pub use prompt::TerminalPrompter;
