//! Generic configuration parsing utilities.
//!
//! Reads a TOML file into any `DeserializeOwned` type, attaching the file path to
//! both read and parse failures:
//!
//! ```text
//! Failed to parse config file: /path/to/pagelet.toml
//! Caused by:
//!     unknown field `max_url_lenght`
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Parse a TOML configuration file into the specified type.
///
/// # Examples
///
/// ```rust,no_run
/// use pagelet_kit::config::{RenderConfig, parse_config};
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let config: RenderConfig = parse_config(Path::new("pagelet.toml"))?;
/// println!("max combo url length: {}", config.max_url_length);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Fails when the file cannot be read or its content does not deserialize into `T`.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}
