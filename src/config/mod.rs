//! Configuration management for pagelet-kit
//!
//! Every render is driven by an explicit [`RenderConfig`] value handed to
//! [`RenderContext::new`](crate::render::RenderContext::new). Nothing is read from
//! process-wide state during a render, so two renders with different settings can
//! run side by side without interfering.
//!
//! # Configuration File (`pagelet.toml`)
//!
//! All keys are optional; missing keys fall back to the defaults shown here.
//!
//! ```toml
//! # Advisory ceiling for a single combo URL
//! max_url_length = 2000
//!
//! # Namespace prepended to ids such as "dialog" -> "components/dialog/dialog.js"
//! default_namespace = "components"
//! reserved_namespaces = ["views", "components"]
//!
//! # Removed from locations before they are packed into combo URLs
//! combo_strip_prefix = "/public/"
//!
//! js_hook = "<!--PAGELET_JS_HOOK-->"
//! css_hook = "<!--PAGELET_CSS_HOOK-->"
//!
//! # Directory templates are resolved against ("/views" suffix is dropped)
//! template_root = "/srv/site"
//!
//! # Force combo mode on/off regardless of the catalog flag
//! # combo = false
//! ```
//!
//! # Modules
//!
//! - `parser` - Generic TOML parsing with file path context

mod parser;

pub use parser::parse_config;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_COMBO_STRIP_PREFIX, DEFAULT_CSS_HOOK, DEFAULT_JS_HOOK, DEFAULT_MAX_URL_LENGTH,
    DEFAULT_NAMESPACE, DEFAULT_RESERVED_NAMESPACES,
};
use crate::core::PageletError;

/// Settings for one render.
///
/// Cheap to clone; a server typically loads it once and clones it into every
/// [`RenderContext`](crate::render::RenderContext).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Advisory maximum length of one combo URL.
    pub max_url_length: usize,

    /// Namespace prepended to ids outside the reserved namespaces.
    pub default_namespace: String,

    /// Top-level namespaces that normalization leaves as they are.
    pub reserved_namespaces: Vec<String>,

    /// Prefix stripped from locations before combo packing.
    pub combo_strip_prefix: String,

    /// Marker replaced by script markup (last occurrence).
    pub js_hook: String,

    /// Marker replaced by style markup (first occurrence).
    pub css_hook: String,

    /// Directory that template locations are resolved against.
    pub template_root: Option<PathBuf>,

    /// Overrides the catalog's `combo` flag when set.
    pub combo: Option<bool>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_url_length: DEFAULT_MAX_URL_LENGTH,
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            reserved_namespaces: DEFAULT_RESERVED_NAMESPACES.iter().map(ToString::to_string).collect(),
            combo_strip_prefix: DEFAULT_COMBO_STRIP_PREFIX.to_string(),
            js_hook: DEFAULT_JS_HOOK.to_string(),
            css_hook: DEFAULT_CSS_HOOK.to_string(),
            template_root: None,
            combo: None,
        }
    }
}

impl RenderConfig {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, is not valid TOML, contains unknown keys,
    /// or fails [`validate`](Self::validate).
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config: Self = parse_config(path)?;
        if let Some(root) = config.template_root.take() {
            config = config.with_template_root(&root.to_string_lossy());
        }
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        tracing::debug!("Loaded render configuration from {}", path.display());
        Ok(config)
    }

    /// Set the template root, dropping a trailing `/views` directory.
    ///
    /// Page templates historically live in `<root>/views`, while template locations in
    /// the catalog are relative to `<root>`. An empty result leaves the root unset.
    #[must_use]
    pub fn with_template_root(mut self, root: &str) -> Self {
        let trimmed = if let Ok(re) = Regex::new(r"/(views/?)?$") {
            re.replace(root, "").into_owned()
        } else {
            root.to_string()
        };
        if !trimmed.is_empty() {
            self.template_root = Some(PathBuf::from(trimmed));
        }
        self
    }

    /// Check the settings for values that would make rendering meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`PageletError::ConfigError`] for a zero URL length, an empty
    /// namespace, empty hooks, or identical hooks.
    pub fn validate(&self) -> Result<(), PageletError> {
        if self.max_url_length == 0 {
            return Err(config_error("max_url_length must be greater than zero"));
        }
        if self.default_namespace.is_empty() || self.default_namespace.contains('/') {
            return Err(config_error("default_namespace must be a single non-empty path segment"));
        }
        if self.js_hook.is_empty() || self.css_hook.is_empty() {
            return Err(config_error("js_hook and css_hook must not be empty"));
        }
        if self.js_hook == self.css_hook {
            return Err(config_error("js_hook and css_hook must be distinct"));
        }
        Ok(())
    }

    /// Whether `id` starts with one of the reserved namespaces followed by `/`.
    #[must_use]
    pub fn is_reserved(&self, id: &str) -> bool {
        self.reserved_namespaces.iter().any(|ns| {
            id.strip_prefix(ns.as_str()).is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

fn config_error(message: &str) -> PageletError {
    PageletError::ConfigError {
        message: message.to_string(),
    }
}
