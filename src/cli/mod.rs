//! Command-line interface for pagelet-kit.
//!
//! The `pagelet` binary exposes the render pipeline for build scripts and for
//! debugging resource maps:
//!
//! - `resolve` - Expand ids through the catalog and print what a page would load
//! - `assemble` - Splice asset markup into a page, or produce a pagelet envelope
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//! - `--config <FILE>` - Render settings (defaults to `./pagelet.toml` when present)
//!
//! # Examples
//!
//! ```bash
//! # What does the home page pull in?
//! pagelet resolve --catalog map.json views/home dialog
//!
//! # Machine-readable, with a priority group
//! pagelet resolve --catalog map.json --priority 2 --json views/home
//!
//! # Fill the hooks of a built page
//! pagelet assemble --catalog map.json --page index.html --require views/home -o out.html
//!
//! # Envelope for an async pagelet request
//! pagelet assemble --catalog map.json --page feed.html --pagelet layout.feed --require feed
//! ```

mod assemble;
mod resolve;

pub use assemble::AssembleCommand;
pub use resolve::ResolveCommand;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::catalog::ResourceCatalog;
use crate::config::RenderConfig;
use crate::constants::CONFIG_FILE_NAME;

/// Settings derived from global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive; `None` leaves logging to `RUST_LOG` only.
    pub log_level: Option<String>,

    /// Explicit render configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create a CLI configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` takes precedence over the flag-derived level. Output goes to
    /// stderr so that stdout only carries command results. Calling this twice is
    /// harmless; the second subscriber is ignored.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("error"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Render settings from `--config`, else `./pagelet.toml`, else defaults.
    ///
    /// # Errors
    ///
    /// Fails when the chosen file cannot be loaded or does not validate.
    pub fn render_config(&self) -> Result<RenderConfig> {
        if let Some(path) = &self.config_path {
            return RenderConfig::load_from(path);
        }
        let local = Path::new(CONFIG_FILE_NAME);
        if local.is_file() {
            return RenderConfig::load_from(local);
        }
        Ok(RenderConfig::default())
    }
}

/// Main CLI structure for the `pagelet` binary.
#[derive(Parser)]
#[command(
    name = "pagelet",
    about = "Page asset aggregation - resolve component resources and assemble pages",
    version,
    long_about = "Resolves component ids against a resource map, orders their scripts and \
                  styles, packs them into combo URLs and splices the markup into pages."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging and detailed information.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the render configuration file.
    ///
    /// Defaults to `pagelet.toml` in the current directory when it exists.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve ids and print the collected resources.
    ///
    /// See [`ResolveCommand`] for options.
    Resolve(ResolveCommand),

    /// Fill the asset hooks of a page, or build a pagelet envelope.
    ///
    /// See [`AssembleCommand`] for options.
    Assemble(AssembleCommand),
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// # Errors
    ///
    /// Returns the command's error with context for [`user_friendly_error`].
    ///
    /// [`user_friendly_error`]: crate::core::user_friendly_error
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Build a [`CliConfig`] from the parsed global flags.
    ///
    /// - **Verbose mode**: "debug"
    /// - **Quiet mode**: "error"
    /// - **Default mode**: "info"
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();
        let render_config = config.render_config()?;

        match self.command {
            Commands::Resolve(cmd) => cmd.execute(render_config),
            Commands::Assemble(cmd) => cmd.execute(render_config),
        }
    }
}

/// Load the catalog named on the command line.
fn load_catalog(path: &Path) -> Result<Arc<ResourceCatalog>> {
    let catalog = ResourceCatalog::load(path)
        .with_context(|| format!("Failed to load resource catalog from {}", path.display()))?;
    Ok(Arc::new(catalog))
}
