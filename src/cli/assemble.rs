//! Splice asset markup into a page.
//!
//! The page file is rendered as a Tera template (with `--data` as its context),
//! the requested ids are collected, and the page's hooks are replaced by the
//! resulting `<link>`/`<script>` markup:
//!
//! ```bash
//! pagelet assemble --catalog map.json --page index.html --require views/home,dialog
//! ```
//!
//! With `--pagelet` the rendered page becomes the body of that pagelet scope and
//! the output is the JSON envelope an async pagelet request expects:
//!
//! ```bash
//! pagelet assemble --catalog map.json --page feed.html --pagelet layout.feed --require feed
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use super::load_catalog;
use crate::config::RenderConfig;
use crate::constants::PAGELET_SEPARATOR;
use crate::render::RenderContext;
use crate::templating::TeraEngine;

/// Arguments of `pagelet assemble`.
#[derive(Args, Debug)]
pub struct AssembleCommand {
    /// Resource map produced by the asset build
    #[arg(long, value_name = "FILE")]
    pub catalog: PathBuf,

    /// Page template containing the asset hooks
    #[arg(long, value_name = "FILE")]
    pub page: PathBuf,

    /// JSON file used as the page template context
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Comma-separated ids to collect
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub require: Vec<String>,

    /// Full id of the pagelet the page renders; switches output to the JSON envelope
    #[arg(long, value_name = "ID")]
    pub pagelet: Option<String>,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl AssembleCommand {
    /// Run the command.
    ///
    /// # Errors
    ///
    /// Fails when an input cannot be read or parsed, when the page template fails
    /// to render, or when the output cannot be written.
    pub fn execute(self, config: RenderConfig) -> Result<()> {
        let catalog = load_catalog(&self.catalog)?;
        let engine = TeraEngine::new(config.template_root.clone());
        let mut ctx = RenderContext::new(catalog, config);

        let source = std::fs::read_to_string(&self.page)
            .with_context(|| format!("Failed to read page: {}", self.page.display()))?;
        let context = match &self.data {
            Some(path) => read_json(path)?,
            None => serde_json::Value::Null,
        };
        let page_name = self.page.display().to_string();
        let page = engine.render_source(&page_name, &source, &context)?;

        let result = match &self.pagelet {
            Some(full_id) => {
                ctx.use_pagelets(full_id);
                let segments: Vec<&str> = full_id.split(PAGELET_SEPARATOR).collect();
                open_scopes(&mut ctx, &segments, &self.require, page)?;
                ctx.render("")?
            }
            None => {
                require_all(&mut ctx, &self.require);
                ctx.render(&page)?
            }
        };

        match &self.output {
            Some(path) => std::fs::write(path, result)
                .with_context(|| format!("Failed to write output: {}", path.display()))?,
            None => print!("{result}"),
        }
        Ok(())
    }
}

/// Enter each segment of the pagelet path, collect `ids` inside the innermost
/// scope, and close everything again with `body` as the innermost output.
fn open_scopes(
    ctx: &mut RenderContext,
    segments: &[&str],
    ids: &[String],
    body: String,
) -> crate::core::Result<()> {
    let Some((first, rest)) = segments.split_first() else {
        require_all(ctx, ids);
        return Ok(());
    };
    ctx.pagelet(first.trim(), |ctx| {
        if rest.is_empty() {
            require_all(ctx, ids);
            Ok(body)
        } else {
            open_scopes(ctx, rest, ids, body)?;
            Ok(String::new())
        }
    })?;
    Ok(())
}

fn require_all(ctx: &mut RenderContext, ids: &[String]) {
    for id in ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
        ctx.require(id, None);
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse data file as JSON: {}", path.display()))
}
