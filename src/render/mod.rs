//! Page assembly.
//!
//! A [`RenderContext`] lives exactly as long as one page render. Template code calls
//! into it while executing (`require`, `include`, `add_script`, pagelet scopes) and
//! the finished template text is handed to [`RenderContext::render`], which consumes
//! the context and produces the response body:
//!
//! - **Whole page**: the first style hook is replaced by `<link>` tags and the last
//!   script hook by `<script>` tags, the `pagelet.init(...)` bootstrap, and the inline
//!   scripts.
//! - **Pagelet mode** (after [`use_pagelets`](RenderContext::use_pagelets)): a JSON
//!   envelope `{html, data, js, css, title, script}` carrying only the requested
//!   fragments and the assets collected inside them.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pagelet_kit::catalog::ResourceCatalog;
//! use pagelet_kit::config::RenderConfig;
//! use pagelet_kit::core::{ResourceDescriptor, ResourceKind};
//! use pagelet_kit::render::RenderContext;
//!
//! let catalog = Arc::new(ResourceCatalog::new([ResourceDescriptor::new(
//!     "components/app/app.js",
//!     "/public/c/app/app.js",
//!     ResourceKind::Script,
//! )]));
//!
//! let mut ctx = RenderContext::new(catalog, RenderConfig::default());
//! assert!(ctx.require("app", None));
//! let page = ctx.render("<body><!--PAGELET_JS_HOOK--></body>").unwrap();
//! assert!(page.contains(r#"<script src="/public/c/app/app.js"></script>"#));
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::ResourceCatalog;
use crate::collector::{DependencyCollector, normalize};
use crate::combo::ComboUriBuilder;
use crate::config::RenderConfig;
use crate::constants::TEMPLATE_EXTENSION;
use crate::core::{PageletError, ResourceKind, Result};
use crate::pagelet::{MatchState, PageletScopeTracker};
use crate::templating::TemplateEngine;

/// JSON body returned for a pagelet request.
#[derive(Debug, Serialize)]
struct PageletEnvelope<'a> {
    html: &'a BTreeMap<String, String>,
    data: &'a BTreeMap<String, serde_json::Value>,
    js: Vec<&'a str>,
    css: Vec<&'a str>,
    title: &'a str,
    script: &'a [String],
}

/// Per-render state: collected resources, pagelet scopes, inline scripts and data.
#[derive(Debug)]
pub struct RenderContext {
    collector: DependencyCollector,
    tracker: PageletScopeTracker,
    combo: ComboUriBuilder,
    combo_enabled: bool,
    scripts: Vec<String>,
    data: BTreeMap<String, serde_json::Value>,
}

impl RenderContext {
    /// Start a render against `catalog`.
    ///
    /// Combo mode follows `config.combo` when set and the catalog's flag otherwise.
    #[must_use]
    pub fn new(catalog: Arc<ResourceCatalog>, config: RenderConfig) -> Self {
        let combo_enabled = config.combo.unwrap_or_else(|| catalog.combo());
        let combo = ComboUriBuilder::new(catalog.combo_pattern(), config.max_url_length)
            .with_strip_prefix(config.combo_strip_prefix.clone());
        Self {
            collector: DependencyCollector::new(catalog, config),
            tracker: PageletScopeTracker::default(),
            combo,
            combo_enabled,
            scripts: Vec::new(),
            data: BTreeMap::new(),
        }
    }

    /// Switch to pagelet mode for the comma-separated full ids in `ids`.
    pub fn use_pagelets(&mut self, ids: &str) {
        self.tracker.use_pagelets(ids);
        self.sync_suppression();
    }

    /// Whether a partial render was requested.
    #[must_use]
    pub const fn is_pagelet_mode(&self) -> bool {
        self.tracker.is_active()
    }

    /// Whether combo URLs are emitted.
    #[must_use]
    pub const fn combo_enabled(&self) -> bool {
        self.combo_enabled
    }

    /// Collect `id` with its dependencies.
    ///
    /// An id matching nothing in the catalog is logged and recorded; the render goes
    /// on without it. Returns whether the id was found (always `true` while
    /// suppressed).
    pub fn require(&mut self, id: &str, priority: Option<u32>) -> bool {
        let found = self.collector.resolve(id, priority);
        if !found {
            tracing::warn!("Resource '{}' not found in catalog", id);
            self.collector.note_unresolved(id);
        }
        found
    }

    /// Render a component template and collect its resources.
    ///
    /// A dot-free `file` is first looked up as a template (`card` ->
    /// `components/card/card.tpl`) and rendered through `engine` when present. The
    /// template id (or `file` itself when no template exists) is then required, which
    /// pulls in the template's declared dependencies or the plain script/style.
    ///
    /// Returns the rendered markup, empty when there was no template. When neither a
    /// template nor a resource exists the failure is logged and recorded.
    ///
    /// # Errors
    ///
    /// Propagates [`PageletError::TemplateRenderFailed`] from the engine.
    pub fn include(
        &mut self,
        file: &str,
        priority: Option<u32>,
        context: &serde_json::Value,
        engine: &dyn TemplateEngine,
    ) -> Result<String> {
        let mut id = file.to_string();
        let mut html = String::new();
        let mut found = false;

        if !file.contains('.') {
            let template_id = normalize(file, TEMPLATE_EXTENSION, self.collector.config());
            if let Some(location) = self.collector.uri(&template_id).map(str::to_string) {
                html = engine.render_file(&location, context)?;
                found = true;
                id = template_id;
            }
        }

        found |= self.collector.resolve(&id, priority);
        if !found {
            tracing::error!("Unable to load resource '{}'", id);
            self.collector.note_unresolved(&id);
        }
        Ok(html)
    }

    /// Queue an inline script; dropped while suppressed.
    pub fn add_script(&mut self, code: impl Into<String>) {
        if !self.tracker.is_suppressed() {
            self.scripts.push(code.into());
        }
    }

    /// Attach a data fragment to the pagelet envelope; dropped while suppressed.
    pub fn add_data(&mut self, id: impl Into<String>, value: serde_json::Value) {
        if !self.tracker.is_suppressed() {
            self.data.insert(id.into(), value);
        }
    }

    /// Open a pagelet scope. The caller must skip the body on [`MatchState::None`].
    pub fn pagelet_start(&mut self, id: &str) -> MatchState {
        let state = self.tracker.enter(id);
        self.sync_suppression();
        state
    }

    /// Close the innermost pagelet scope, returning `output` unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PageletError::UnbalancedScope`] when no scope is open.
    pub fn pagelet_end(&mut self, output: String) -> Result<String> {
        let output = self.tracker.leave(output)?;
        self.sync_suppression();
        Ok(output)
    }

    /// Run `body` inside the pagelet scope `id`.
    ///
    /// Returns `Ok(None)` without calling `body` when the scope is not matched. The
    /// scope is closed even when `body` fails.
    ///
    /// # Errors
    ///
    /// Returns the error from `body`, or a scope bookkeeping error.
    pub fn pagelet<F>(&mut self, id: &str, body: F) -> Result<Option<String>>
    where
        F: FnOnce(&mut Self) -> Result<String>,
    {
        if !self.pagelet_start(id).is_match() {
            return Ok(None);
        }
        match body(self) {
            Ok(output) => self.pagelet_end(output).map(Some),
            Err(e) => {
                self.pagelet_end(String::new())?;
                Err(e)
            }
        }
    }

    /// Set the page title (kept for the pagelet envelope). Returns `title`.
    pub fn title(&mut self, title: impl Into<String>) -> String {
        self.tracker.set_title(title.into())
    }

    /// Ids and dependencies that could not be resolved so far.
    #[must_use]
    pub fn unresolved(&self) -> &[String] {
        self.collector.unresolved()
    }

    /// Collector holding the resources gathered so far.
    #[must_use]
    pub const fn collector(&self) -> &DependencyCollector {
        &self.collector
    }

    /// Script markup: asset tags, bootstrap call, then inline scripts.
    #[must_use]
    pub fn render_js(&self) -> String {
        let mut html = String::new();
        for url in self.asset_urls(ResourceKind::Script) {
            html.push_str(&format!("<script src=\"{url}\"></script>\n"));
        }

        let mut used = self.public_locations(ResourceKind::Script);
        used.extend(self.public_locations(ResourceKind::Style));
        html.push_str(&format!(
            "<script>pagelet.init({},{},{});</script>\n",
            u8::from(self.combo_enabled),
            json_literal(self.collector.catalog().combo_pattern()),
            json_literal(&used),
        ));

        if !self.scripts.is_empty() {
            if self.combo_enabled {
                html.push_str("<script>");
                for code in &self.scripts {
                    html.push_str(&format!("!function(){{{code}}}();"));
                }
                html.push_str("</script>\n");
            } else {
                for code in &self.scripts {
                    html.push_str(&format!("<script>!function(){{{code}}}();</script>\n"));
                }
            }
        }
        html
    }

    /// Style markup: one `<link>` per URL.
    #[must_use]
    pub fn render_css(&self) -> String {
        self.asset_urls(ResourceKind::Style)
            .iter()
            .map(|url| format!("<link rel=\"stylesheet\" href=\"{url}\">\n"))
            .collect()
    }

    /// Finish the render.
    ///
    /// # Errors
    ///
    /// Returns [`PageletError::UnclosedScopes`] when pagelet scopes are still open and
    /// [`PageletError::EnvelopeSerializeFailed`] when the envelope cannot be encoded.
    pub fn render(self, out: &str) -> Result<String> {
        self.tracker.ensure_closed()?;

        if self.tracker.is_active() {
            return self.render_envelope();
        }

        let config = self.collector.config();
        let mut page = out.to_string();
        if let Some(pos) = page.find(config.css_hook.as_str()) {
            page.replace_range(pos..pos + config.css_hook.len(), &self.render_css());
        }
        if let Some(pos) = page.rfind(config.js_hook.as_str()) {
            page.replace_range(pos..pos + config.js_hook.len(), &self.render_js());
        }
        tracing::debug!(
            "Rendered page with {} script(s) and {} style(s)",
            self.collector.locations(ResourceKind::Script).len(),
            self.collector.locations(ResourceKind::Style).len()
        );
        Ok(page)
    }

    fn render_envelope(&self) -> Result<String> {
        let envelope = PageletEnvelope {
            html: self.tracker.outputs(),
            data: &self.data,
            js: self.public_locations(ResourceKind::Script),
            css: self.public_locations(ResourceKind::Style),
            title: self.tracker.title(),
            script: &self.scripts,
        };
        serde_json::to_string(&envelope).map_err(|e| PageletError::EnvelopeSerializeFailed {
            reason: e.to_string(),
        })
    }

    /// URLs emitted for `kind`: combo batches when combo is on, the collected
    /// locations otherwise.
    #[must_use]
    pub fn asset_urls(&self, kind: ResourceKind) -> Vec<String> {
        let locations = self.collector.locations(kind);
        if self.combo_enabled {
            self.combo.build_batches(locations, &self.collector.location_groups())
        } else {
            locations.to_vec()
        }
    }

    /// Collected locations as exposed to the client loader.
    fn public_locations(&self, kind: ResourceKind) -> Vec<&str> {
        self.collector
            .locations(kind)
            .iter()
            .map(|location| {
                if self.combo_enabled { self.combo.rewrite(location) } else { location.as_str() }
            })
            .collect()
    }

    fn sync_suppression(&mut self) {
        self.collector.set_suppressed(self.tracker.is_suppressed());
    }
}

fn json_literal<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
