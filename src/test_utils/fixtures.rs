//! Test fixtures for catalogs, configuration files and page templates

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::ResourceCatalog;

/// Catalog used across tests.
///
/// - `base` and `dialog` are plain components, `dialog` depends on `base` and its
///   own stylesheet
/// - `card` is a template component whose script and style come in through the
///   template's dependencies
/// - `theme` only ships a stylesheet
/// - `broken` depends on an id that does not exist
/// - `views/home` is a page script
const SAMPLE_RESOURCES: &str = r#"{
    "components/base/base.js": { "uri": "/public/c/base/base.js", "type": "js" },
    "components/base/base.css": { "uri": "/public/c/base/base.css", "type": "css" },
    "components/dialog/dialog.js": {
      "uri": "/public/c/dialog/dialog.js",
      "type": "js",
      "deps": ["components/base/base.js", "components/dialog/dialog.css"]
    },
    "components/dialog/dialog.css": { "uri": "/public/c/dialog/dialog.css", "type": "css" },
    "components/card/card.tpl": {
      "uri": "/public/c/card/card.tpl",
      "type": "tpl",
      "deps": ["components/card/card.js", "components/card/card.css"]
    },
    "components/card/card.js": { "uri": "/public/c/card/card.js", "type": "js" },
    "components/card/card.css": { "uri": "/public/c/card/card.css", "type": "css" },
    "components/theme/theme.css": { "uri": "/public/c/theme/theme.css", "type": "css" },
    "components/broken/broken.js": {
      "uri": "/public/c/broken/broken.js",
      "type": "js",
      "deps": ["components/ghost/ghost.js"]
    },
    "views/home/home.js": {
      "uri": "/public/v/home/home.js",
      "type": "js",
      "deps": ["components/dialog/dialog.js"]
    }
}"#;

/// Test fixture for resource catalog files
#[derive(Clone, Debug)]
pub struct CatalogFixture {
    pub content: String,
    pub name: String,
}

impl CatalogFixture {
    /// Sample catalog with combo mode off
    pub fn sample() -> Self {
        Self {
            name: "map.json".to_string(),
            content: format!("{{\"res\": {SAMPLE_RESOURCES}}}"),
        }
    }

    /// Sample catalog served through combo URLs with the default pattern
    pub fn combo() -> Self {
        Self {
            name: "map.json".to_string(),
            content: format!("{{\"res\": {SAMPLE_RESOURCES}, \"combo\": true}}"),
        }
    }

    /// Not a JSON document
    pub fn invalid_json() -> Self {
        Self {
            name: "map.json".to_string(),
            content: "{ \"res\": { ".to_string(),
        }
    }

    /// Parse the fixture into a catalog.
    pub fn catalog(&self) -> Result<ResourceCatalog> {
        ResourceCatalog::from_json_str(&self.content).context("Failed to parse catalog fixture")
    }

    /// Write the fixture into `dir`, returning the file path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        write_file(dir, &self.name, &self.content)
    }
}

/// Test fixture for `pagelet.toml`
#[derive(Clone, Debug)]
pub struct ConfigFixture {
    pub content: String,
}

impl ConfigFixture {
    /// Short combo URLs and a stripped `/public/` prefix
    pub fn short_urls() -> Self {
        Self {
            content: "max_url_length = 40\ncombo = true\n".to_string(),
        }
    }

    /// Unknown key, rejected by the loader
    pub fn unknown_key() -> Self {
        Self {
            content: "max_url_lenght = 40\n".to_string(),
        }
    }

    /// Write the fixture as `pagelet.toml` into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        write_file(dir, crate::constants::CONFIG_FILE_NAME, &self.content)
    }
}

/// Page shell with both hooks
pub const PAGE_SHELL: &str = "<html><head><!--PAGELET_CSS_HOOK--></head><body><main></main><!--PAGELET_JS_HOOK--></body></html>";

fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&path, content)
        .with_context(|| format!("Failed to write fixture: {}", path.display()))?;
    Ok(path)
}
