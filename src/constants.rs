//! Global constants used throughout pagelet-kit.
//!
//! Default values for configuration fields and the markers recognized in
//! rendered page output. Defining them centrally keeps [`RenderConfig`]
//! defaults and the tests that rely on them in agreement.
//!
//! [`RenderConfig`]: crate::config::RenderConfig

/// Placeholder replaced by generated `<script>` markup (last occurrence).
pub const DEFAULT_JS_HOOK: &str = "<!--PAGELET_JS_HOOK-->";

/// Placeholder replaced by generated `<link>` markup (first occurrence).
pub const DEFAULT_CSS_HOOK: &str = "<!--PAGELET_CSS_HOOK-->";

/// Substitution slot inside a combo pattern.
pub const COMBO_SLOT: &str = "%s";

/// Combo pattern used when the catalog does not declare one.
pub const DEFAULT_COMBO_PATTERN: &str = "/co??%s";

/// Approximate upper bound for a single combo URL (advisory).
///
/// Browsers and CDNs commonly start rejecting URLs somewhere past 2KB, so
/// batches are packed to stay under this length whenever a single item allows it.
pub const DEFAULT_MAX_URL_LENGTH: usize = 2000;

/// Namespace prepended to ids that are not rooted in a reserved namespace.
pub const DEFAULT_NAMESPACE: &str = "components";

/// Top-level namespaces that are left untouched by normalization.
pub const DEFAULT_RESERVED_NAMESPACES: [&str; 2] = ["views", "components"];

/// Location prefix removed before a location is packed into a combo URL.
pub const DEFAULT_COMBO_STRIP_PREFIX: &str = "/public/";

/// Group assigned to locations that were never given a priority.
pub const DEFAULT_GROUP: u32 = 0;

/// Extension tried first when resolving an id.
pub const SCRIPT_EXTENSION: &str = ".js";

/// Extension tried when the script lookup misses.
pub const STYLE_EXTENSION: &str = ".css";

/// Extension used by `include` to locate template resources.
pub const TEMPLATE_EXTENSION: &str = ".tpl";

/// Separator joining nested pagelet ids into a full id.
pub const PAGELET_SEPARATOR: char = '.';

/// Default configuration file name looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = "pagelet.toml";
