//! Resolve component ids and print what a page would load.
//!
//! ```bash
//! pagelet resolve --catalog map.json views/home dialog
//! pagelet resolve --catalog map.json --priority 1 --json views/home
//! ```
//!
//! Text output lists the collected locations per kind in load order, followed by
//! the combo URLs when the catalog (or configuration) enables combo mode, and the
//! ids that could not be found:
//!
//! ```text
//! js
//!   /public/c/base/base.js
//!   /public/c/dialog/dialog.js
//! css
//!   /public/c/dialog/dialog.css
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;

use super::load_catalog;
use crate::config::RenderConfig;
use crate::core::ResourceKind;
use crate::render::RenderContext;

/// Arguments of `pagelet resolve`.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Resource map produced by the asset build
    #[arg(long, value_name = "FILE")]
    pub catalog: PathBuf,

    /// Priority group for every id; higher groups load later in combo mode
    #[arg(long, value_name = "N")]
    pub priority: Option<u32>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Component or page ids, e.g. `dialog` or `views/home`
    #[arg(required = true, value_name = "IDS")]
    pub ids: Vec<String>,
}

impl ResolveCommand {
    /// Run the command.
    ///
    /// Missing ids are reported but do not fail the command.
    ///
    /// # Errors
    ///
    /// Fails when the catalog cannot be loaded or the JSON output cannot be encoded.
    pub fn execute(self, config: RenderConfig) -> Result<()> {
        let catalog = load_catalog(&self.catalog)?;
        let mut ctx = RenderContext::new(catalog, config);

        for id in &self.ids {
            ctx.require(id, self.priority);
        }

        let kinds = [ResourceKind::Script, ResourceKind::Style, ResourceKind::Other];

        if self.json {
            let mut locations = serde_json::Map::new();
            let mut combo = serde_json::Map::new();
            for kind in kinds {
                locations.insert(kind.to_string(), json!(ctx.collector().locations(kind)));
                if ctx.combo_enabled() && kind != ResourceKind::Other {
                    combo.insert(kind.to_string(), json!(ctx.asset_urls(kind)));
                }
            }
            let output = json!({
                "resources": locations,
                "combo": combo,
                "unresolved": ctx.unresolved(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        for kind in kinds {
            let locations = ctx.collector().locations(kind);
            if locations.is_empty() {
                continue;
            }
            println!("{}", kind.to_string().bold());
            for location in locations {
                println!("  {location}");
            }
        }

        if ctx.combo_enabled() {
            println!("{}", "combo".bold());
            for kind in [ResourceKind::Script, ResourceKind::Style] {
                for url in ctx.asset_urls(kind) {
                    println!("  {url}");
                }
            }
        }

        for id in ctx.unresolved() {
            eprintln!("{} unresolved: {}", "⚠".yellow(), id);
        }

        Ok(())
    }
}
