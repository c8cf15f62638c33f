//! pagelet-kit - server-side page asset aggregation
//!
//! While a page template executes, components announce the scripts and
//! stylesheets they need. pagelet-kit collects those requests, expands them through
//! the resource map produced by the asset build, orders them dependencies-first,
//! packs them into combo URLs, and splices the resulting markup into the page. The
//! same render can instead produce only selected regions ("pagelets") together with
//! the assets those regions need, for asynchronous partial page updates.
//!
//! # Architecture Overview
//!
//! - [`catalog`] - Read-only resource map (`id -> {uri, type, deps}`), shared by all renders
//! - [`collector`] - Per-render id normalization, deduplication and dependency expansion
//! - [`combo`] - Packing locations into length-bounded combo URLs by priority group
//! - [`pagelet`] - Nested pagelet scope state machine for partial renders
//! - [`render`] - [`RenderContext`](render::RenderContext), the per-render entry point
//! - [`templating`] - Template engine seam with a Tera implementation
//!
//! ## Supporting Modules
//! - [`config`] - Render settings loaded from `pagelet.toml`
//! - [`constants`] - Default hooks, patterns and extensions
//! - [`core`] - Error types and resource descriptors
//! - [`cli`] - The `pagelet` command-line interface
//!
//! # Rendering a Page
//!
//! ```rust
//! use std::sync::Arc;
//! use pagelet_kit::catalog::ResourceCatalog;
//! use pagelet_kit::config::RenderConfig;
//! use pagelet_kit::render::RenderContext;
//!
//! let catalog = ResourceCatalog::from_json_str(r#"{
//!     "res": {
//!         "components/base/base.js": { "uri": "/public/c/base/base.js", "type": "js" },
//!         "components/dialog/dialog.js": {
//!             "uri": "/public/c/dialog/dialog.js",
//!             "type": "js",
//!             "deps": ["components/base/base.js", "components/dialog/dialog.css"]
//!         },
//!         "components/dialog/dialog.css": { "uri": "/public/c/dialog/dialog.css", "type": "css" }
//!     }
//! }"#).unwrap();
//!
//! let mut ctx = RenderContext::new(Arc::new(catalog), RenderConfig::default());
//! ctx.require("dialog", None);
//!
//! let page = ctx
//!     .render("<head><!--PAGELET_CSS_HOOK--></head><body><!--PAGELET_JS_HOOK--></body>")
//!     .unwrap();
//! assert!(page.contains(r#"<link rel="stylesheet" href="/public/c/dialog/dialog.css">"#));
//! assert!(page.find("base.js") < page.find("dialog.js"));
//! ```
//!
//! # Partial Renders
//!
//! ```rust
//! # use std::sync::Arc;
//! # use pagelet_kit::catalog::ResourceCatalog;
//! # use pagelet_kit::config::RenderConfig;
//! # use pagelet_kit::render::RenderContext;
//! let catalog = Arc::new(ResourceCatalog::new(Vec::new()));
//! let mut ctx = RenderContext::new(catalog, RenderConfig::default());
//! ctx.use_pagelets("layout.feed");
//!
//! ctx.pagelet("layout", |ctx| {
//!     ctx.pagelet("feed", |_| Ok("<ul></ul>".to_string()))?;
//!     ctx.pagelet("sidebar", |_| unreachable!())?;
//!     Ok(String::new())
//! })
//! .unwrap();
//!
//! let envelope = ctx.render("").unwrap();
//! assert!(envelope.contains(r#""layout.feed":"<ul></ul>""#));
//! ```

pub mod catalog;
pub mod cli;
pub mod collector;
pub mod combo;
pub mod config;
pub mod constants;
pub mod core;
pub mod pagelet;
pub mod render;
pub mod templating;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
