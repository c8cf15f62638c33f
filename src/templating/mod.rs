//! Template execution seam.
//!
//! Page and fragment templates are compiled and executed by an external engine; the
//! asset aggregator only needs "render the template at this location with this data".
//! [`TemplateEngine`] is that seam, used by
//! [`RenderContext::include`](crate::render::RenderContext::include).
//!
//! [`TeraEngine`] is the bundled implementation. Any
//! `Fn(&str, &serde_json::Value) -> Result<String>` closure is an engine too, which
//! keeps tests and embedders free of file system fixtures:
//!
//! ```rust
//! use pagelet_kit::templating::TemplateEngine;
//!
//! let engine = |location: &str, ctx: &serde_json::Value| -> pagelet_kit::core::Result<String> {
//!     Ok(format!("<!-- {location} -->{}", ctx["name"].as_str().unwrap_or("")))
//! };
//! let html = engine.render_file("/views/a.tpl", &serde_json::json!({"name": "x"})).unwrap();
//! assert_eq!(html, "<!-- /views/a.tpl -->x");
//! ```

mod renderer;

pub use renderer::{TeraEngine, format_tera_error};

use crate::core::Result;

/// Renders a template resource to text.
pub trait TemplateEngine {
    /// Render the template stored at `location` (a catalog URI) with `context`.
    ///
    /// # Errors
    ///
    /// Implementations return [`PageletError::TemplateRenderFailed`] when the
    /// template cannot be read or executed.
    ///
    /// [`PageletError::TemplateRenderFailed`]: crate::core::PageletError::TemplateRenderFailed
    fn render_file(&self, location: &str, context: &serde_json::Value) -> Result<String>;
}

impl<F> TemplateEngine for F
where
    F: Fn(&str, &serde_json::Value) -> Result<String>,
{
    fn render_file(&self, location: &str, context: &serde_json::Value) -> Result<String> {
        self(location, context)
    }
}
