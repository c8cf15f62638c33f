//! Read-only resource catalog.
//!
//! The catalog is the resource map emitted by the asset build: a JSON document that
//! maps every canonical id to its deployed URI, type, and dependency ids, plus the
//! combo settings of the deployment.
//!
//! ```json
//! {
//!   "res": {
//!     "components/dialog/dialog.js": {
//!       "uri": "/public/c/dialog/dialog.js",
//!       "type": "js",
//!       "deps": ["components/overlay/overlay.js", "dialog.css"]
//!     }
//!   },
//!   "combo": true,
//!   "comboPattern": "/co??%s"
//! }
//! ```
//!
//! A catalog is loaded once per process and shared between renders through an
//! [`Arc`](std::sync::Arc); nothing in it changes after loading, so concurrent renders
//! read it without locking.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::constants::{COMBO_SLOT, DEFAULT_COMBO_PATTERN};
use crate::core::{PageletError, ResourceDescriptor, Result};

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(alias = "resources")]
    res: HashMap<String, ResourceDescriptor>,
    #[serde(default)]
    combo: bool,
    #[serde(default, rename = "comboPattern", alias = "combo_pattern")]
    combo_pattern: Option<String>,
}

/// Immutable lookup table from canonical id to [`ResourceDescriptor`].
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    resources: HashMap<String, ResourceDescriptor>,
    combo: bool,
    combo_pattern: String,
}

impl ResourceCatalog {
    /// Create a catalog from descriptors; each descriptor's `id` becomes its key.
    ///
    /// Combo mode is off and the default pattern is used; see [`with_combo`].
    ///
    /// [`with_combo`]: Self::with_combo
    pub fn new(resources: impl IntoIterator<Item = ResourceDescriptor>) -> Self {
        Self {
            resources: resources.into_iter().map(|r| (r.id.clone(), r)).collect(),
            combo: false,
            combo_pattern: DEFAULT_COMBO_PATTERN.to_string(),
        }
    }

    /// Enable or disable combo mode, optionally overriding the pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PageletError::CatalogParseError`] when the pattern does not contain
    /// exactly one `%s` slot.
    pub fn with_combo(mut self, combo: bool, pattern: Option<&str>) -> Result<Self> {
        if let Some(pattern) = pattern {
            validate_pattern(pattern, "<inline>")?;
            self.combo_pattern = pattern.to_string();
        }
        self.combo = combo;
        Ok(self)
    }

    /// Parse a catalog document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`PageletError::CatalogParseError`] when the document is not valid JSON,
    /// lacks the `res` map, or declares a pattern without exactly one slot.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::parse(json, "<inline>")
    }

    /// Load a catalog document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`PageletError::CatalogNotFound`] when the file cannot be read and
    /// [`PageletError::CatalogParseError`] when its content is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|_| PageletError::CatalogNotFound {
                path: path.display().to_string(),
            })?;
        let catalog = Self::parse(&content, &path.display().to_string())?;
        tracing::debug!(
            "Loaded resource catalog {} ({} entries, combo: {})",
            path.display(),
            catalog.len(),
            catalog.combo
        );
        Ok(catalog)
    }

    fn parse(json: &str, file: &str) -> Result<Self> {
        let document: CatalogDocument =
            serde_json::from_str(json).map_err(|e| PageletError::CatalogParseError {
                file: file.to_string(),
                reason: e.to_string(),
            })?;

        let combo_pattern = match document.combo_pattern {
            Some(pattern) if !pattern.is_empty() => {
                validate_pattern(&pattern, file)?;
                pattern
            }
            _ => DEFAULT_COMBO_PATTERN.to_string(),
        };

        let resources = document
            .res
            .into_iter()
            .map(|(id, mut descriptor)| {
                descriptor.id.clone_from(&id);
                (id, descriptor)
            })
            .collect();

        Ok(Self {
            resources,
            combo: document.combo,
            combo_pattern,
        })
    }

    /// Look up a descriptor by its exact canonical id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ResourceDescriptor> {
        self.resources.get(id)
    }

    /// Whether an entry exists for the exact canonical id.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.resources.contains_key(id)
    }

    /// Whether the deployment serves combo URLs.
    #[must_use]
    pub const fn combo(&self) -> bool {
        self.combo
    }

    /// Combo URL pattern with a single `%s` slot.
    #[must_use]
    pub fn combo_pattern(&self) -> &str {
        &self.combo_pattern
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

fn validate_pattern(pattern: &str, file: &str) -> Result<()> {
    let slots = pattern.matches(COMBO_SLOT).count();
    if slots != 1 {
        return Err(PageletError::CatalogParseError {
            file: file.to_string(),
            reason: format!(
                "comboPattern must contain exactly one '{COMBO_SLOT}' slot, found {slots} in '{pattern}'"
            ),
        });
    }
    Ok(())
}
