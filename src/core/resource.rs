//! Resource abstractions for pagelet-kit
//!
//! A resource is a static asset (script, style sheet, template, ...) registered in the
//! [`ResourceCatalog`] under a canonical id. This module defines the kind
//! enumeration and the immutable descriptor that the catalog hands out.
//!
//! # Serialization
//!
//! Catalog documents are produced by asset build tools that use short type names,
//! so [`ResourceKind`] accepts both spellings:
//!
//! ```rust
//! use pagelet_kit::core::ResourceKind;
//!
//! let kind: ResourceKind = serde_json::from_str("\"js\"").unwrap();
//! assert_eq!(kind, ResourceKind::Script);
//!
//! let kind: ResourceKind = serde_json::from_str("\"style\"").unwrap();
//! assert_eq!(kind, ResourceKind::Style);
//!
//! // Anything else (templates, images, ...) is `Other`
//! let kind: ResourceKind = serde_json::from_str("\"tpl\"").unwrap();
//! assert_eq!(kind, ResourceKind::Other);
//! ```
//!
//! [`ResourceCatalog`]: crate::catalog::ResourceCatalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a catalog resource
///
/// Collected locations are bucketed per kind; only scripts and styles produce
/// markup, other kinds are tracked for dependency purposes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceKind {
    /// JavaScript file, rendered as `<script src>`
    Script,
    /// Style sheet, rendered as `<link rel="stylesheet">`
    Style,
    /// Any other asset (templates, fonts, ...)
    Other,
}

impl ResourceKind {
    /// Short name used by catalog documents and the pagelet envelope.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Script => "js",
            Self::Style => "css",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "js" | "script" => Self::Script,
            "css" | "style" => Self::Style,
            _ => Self::Other,
        })
    }
}

impl From<String> for ResourceKind {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Immutable metadata of one catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Canonical id; filled in from the catalog key when loading
    #[serde(default, skip_serializing)]
    pub id: String,

    /// Deployed URI of the asset
    #[serde(rename = "uri", alias = "location")]
    pub location: String,

    /// Asset category
    #[serde(rename = "type", alias = "kind", default = "default_kind")]
    pub kind: ResourceKind,

    /// Ids this resource depends on, in declaration order
    #[serde(default, alias = "dependsOn")]
    pub deps: Vec<String>,
}

const fn default_kind() -> ResourceKind {
    ResourceKind::Other
}

impl ResourceDescriptor {
    /// Create a descriptor without dependencies.
    pub fn new(id: impl Into<String>, location: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
            kind,
            deps: Vec::new(),
        }
    }

    /// Builder-style helper to attach dependency ids.
    #[must_use]
    pub fn with_deps<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deps = deps.into_iter().map(Into::into).collect();
        self
    }
}
