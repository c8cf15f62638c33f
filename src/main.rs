//! `pagelet` CLI entry point
//!
//! Parses arguments, runs the command, and prints failures through
//! [`user_friendly_error`] so that they come with suggestions.
//!
//! Commands:
//! - `resolve` - Expand ids through a resource map and print the result
//! - `assemble` - Fill a page's asset hooks or produce a pagelet envelope

use anyhow::Result;
use clap::Parser;
use pagelet_kit::cli;
use pagelet_kit::core::user_friendly_error;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            // Convert to user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
