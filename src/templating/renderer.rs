//! Tera-backed template engine.
//!
//! Templates are read from disk relative to the configured template root and rendered
//! with a fresh `Tera` instance per call, so no template state survives between
//! renders.

use std::path::{Path, PathBuf};
use tera::{Context as TeraContext, Tera};

use super::TemplateEngine;
use crate::core::{PageletError, Result};

/// Renders catalog template locations with Tera.
#[derive(Debug, Clone, Default)]
pub struct TeraEngine {
    /// Directory template locations are resolved against
    root: Option<PathBuf>,
}

impl TeraEngine {
    /// Create an engine resolving locations against `root` (or as-is when `None`).
    #[must_use]
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            root,
        }
    }

    /// File system path of a template location.
    ///
    /// Locations are URIs such as `/views/home/home.tpl`; with a root they are
    /// joined below it.
    #[must_use]
    pub fn resolve_path(&self, location: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(location.trim_start_matches('/')),
            None => PathBuf::from(location),
        }
    }

    /// Render template source directly.
    ///
    /// # Errors
    ///
    /// Returns [`PageletError::TemplateRenderFailed`] when the context is not an
    /// object (or null) or when Tera fails to parse or execute the template.
    pub fn render_source(
        &self,
        name: &str,
        source: &str,
        context: &serde_json::Value,
    ) -> Result<String> {
        let tera_context = if context.is_null() {
            TeraContext::new()
        } else {
            TeraContext::from_serialize(context).map_err(|e| render_failed(name, &e))?
        };

        // Fresh instance per render; a Tera instance is just a few empty maps
        let mut tera = Tera::default();
        tera.render_str(source, &tera_context).map_err(|e| render_failed(name, &e))
    }

    fn read(&self, location: &str, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| PageletError::TemplateRenderFailed {
            location: location.to_string(),
            reason: format!("cannot read {}: {e}", path.display()),
        })
    }
}

impl TemplateEngine for TeraEngine {
    fn render_file(&self, location: &str, context: &serde_json::Value) -> Result<String> {
        let path = self.resolve_path(location);
        tracing::debug!("Rendering template {} from {}", location, path.display());
        let source = self.read(location, &path)?;
        self.render_source(location, &source, context)
    }
}

fn render_failed(location: &str, error: &tera::Error) -> PageletError {
    PageletError::TemplateRenderFailed {
        location: location.to_string(),
        reason: format_tera_error(error),
    }
}

/// Flatten a Tera error chain into one readable message.
///
/// Tera reports failures against the internal name `__tera_one_off`; those mentions
/// are removed so the message only talks about the template.
#[must_use]
pub fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut all_messages = vec![error.to_string()];
    let mut current_error: Option<&dyn Error> = error.source();
    while let Some(err) = current_error {
        all_messages.push(err.to_string());
        current_error = err.source();
    }

    let messages: Vec<String> = all_messages
        .into_iter()
        .map(|msg| {
            msg.replace("while rendering '__tera_one_off'", "")
                .replace("Failed to render '__tera_one_off'", "Template rendering failed")
                .replace("Failed to parse '__tera_one_off'", "Template syntax error")
                .replace("'__tera_one_off'", "template")
                .trim()
                .to_string()
        })
        .filter(|cleaned| {
            !cleaned.is_empty()
                && cleaned != "Template rendering failed"
                && cleaned != "Template syntax error"
        })
        .collect();

    if messages.is_empty() {
        "Template syntax error".to_string()
    } else {
        messages.join("\n  -> ")
    }
}
