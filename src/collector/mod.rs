//! Per-render dependency collection.
//!
//! The [`DependencyCollector`] records every resource a page asks for while its
//! template executes. Ids are normalized into canonical catalog ids, deduplicated,
//! and expanded through their declared dependencies so that each location is
//! collected exactly once, dependencies before dependents.
//!
//! # Normalization
//!
//! Template authors refer to components by short ids. [`normalize`] turns them into
//! catalog keys for a given extension:
//!
//! | id                           | `.js` canonical id                |
//! |------------------------------|-----------------------------------|
//! | `dialog`                     | `components/dialog/dialog.js`     |
//! | `ui/dialog`                  | `components/ui/dialog/dialog.js`  |
//! | `components/dialog/dialog.js`| `components/dialog/dialog.js`     |
//! | `views/home`                 | `views/home/home.js`              |
//!
//! Lookup tries the script extension first and falls back to the style extension, so
//! `require("dialog")` finds `dialog.css` when the component has no script.
//!
//! # Priority groups
//!
//! Every `resolve` call carries an optional priority. The collector keeps the
//! highest priority ever requested for each id (`None` is lowest) even for ids that
//! turn out to be missing or are requested inside a suppressed pagelet scope. At
//! render time [`location_groups`](DependencyCollector::location_groups) converts the
//! map to location keys for the [`combo`](crate::combo) builder.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::catalog::ResourceCatalog;
use crate::config::RenderConfig;
use crate::constants::{SCRIPT_EXTENSION, STYLE_EXTENSION};
use crate::core::{ResourceDescriptor, ResourceKind};

/// Turn a raw id into a canonical catalog id for `ext`.
///
/// An id without any `.` gets its last path segment repeated with `ext` appended
/// (`widget` -> `widget/widget.js`). An id that is not rooted in one of the reserved
/// namespaces is prefixed with the default namespace.
#[must_use]
pub fn normalize(id: &str, ext: &str, config: &RenderConfig) -> String {
    let mut normalized = id.to_string();
    if !id.contains('.') {
        let last = id.rsplit('/').next().unwrap_or(id);
        normalized.push('/');
        normalized.push_str(last);
        normalized.push_str(ext);
    }

    if config.is_reserved(&normalized) {
        normalized
    } else {
        format!("{}/{}", config.default_namespace, normalized)
    }
}

enum Located<'c> {
    /// Canonical id was collected earlier in this render
    Resolved,
    /// Neither the script nor the style spelling exists
    Missing,
    Found(String, &'c ResourceDescriptor),
}

enum Step {
    Visit(String),
    Emit(ResourceKind, String),
}

/// Resource collection state for a single render.
///
/// Created fresh for every render and dropped with it; it must never be shared
/// between renders.
#[derive(Debug)]
pub struct DependencyCollector {
    catalog: Arc<ResourceCatalog>,
    config: RenderConfig,
    by_kind: BTreeMap<ResourceKind, Vec<String>>,
    group_of: BTreeMap<String, Option<u32>>,
    resolved: HashSet<String>,
    unresolved: Vec<String>,
    suppressed: bool,
}

impl DependencyCollector {
    /// Create an empty collector for one render.
    #[must_use]
    pub fn new(catalog: Arc<ResourceCatalog>, config: RenderConfig) -> Self {
        Self {
            catalog,
            config,
            by_kind: BTreeMap::new(),
            group_of: BTreeMap::new(),
            resolved: HashSet::new(),
            unresolved: Vec::new(),
            suppressed: false,
        }
    }

    /// Mark whether the render is currently inside a suppressed pagelet scope.
    ///
    /// While suppressed, [`resolve`](Self::resolve) only records priorities.
    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
    }

    /// Whether collection is currently suppressed.
    #[must_use]
    pub const fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Collect `id` and everything it depends on.
    ///
    /// Returns `false` only when `id` itself matches no catalog entry under either
    /// extension. Missing transitive dependencies do not fail the call; they are
    /// reported through `tracing` and listed in [`unresolved`](Self::unresolved).
    pub fn resolve(&mut self, id: &str, priority: Option<u32>) -> bool {
        self.record_priority(id, priority);
        if self.suppressed {
            tracing::trace!("Skipping '{}' inside suppressed pagelet scope", id);
            return true;
        }

        let catalog = Arc::clone(&self.catalog);
        let (canonical, descriptor) = match self.locate(&catalog, id) {
            Located::Resolved => return true,
            Located::Missing => return false,
            Located::Found(canonical, descriptor) => (canonical, descriptor),
        };

        let mut work = Vec::new();
        self.expand(canonical, descriptor, &mut work);

        while let Some(step) = work.pop() {
            match step {
                Step::Emit(kind, location) => {
                    tracing::debug!("Collected {} resource {}", kind, location);
                    self.by_kind.entry(kind).or_default().push(location);
                }
                Step::Visit(dep) => {
                    self.record_priority(&dep, priority);
                    match self.locate(&catalog, &dep) {
                        Located::Resolved => {}
                        Located::Missing => {
                            tracing::warn!("Dependency '{}' of '{}' not found in catalog", dep, id);
                            self.note_unresolved(&dep);
                        }
                        Located::Found(canonical, descriptor) => {
                            self.expand(canonical, descriptor, &mut work);
                        }
                    }
                }
            }
        }

        true
    }

    /// Mark `canonical` resolved and schedule its dependencies, then itself.
    ///
    /// The work-list is a stack: dependencies are pushed in reverse so they pop in
    /// declaration order, each fully expanded before the next one and before the
    /// dependent's own location is emitted.
    fn expand(&mut self, canonical: String, descriptor: &ResourceDescriptor, work: &mut Vec<Step>) {
        self.resolved.insert(canonical);
        work.push(Step::Emit(descriptor.kind, descriptor.location.clone()));
        for dep in descriptor.deps.iter().rev() {
            work.push(Step::Visit(dep.clone()));
        }
    }

    fn locate<'c>(&self, catalog: &'c ResourceCatalog, id: &str) -> Located<'c> {
        for ext in [SCRIPT_EXTENSION, STYLE_EXTENSION] {
            let canonical = normalize(id, ext, &self.config);
            if self.resolved.contains(&canonical) {
                return Located::Resolved;
            }
            if let Some(descriptor) = catalog.get(&canonical) {
                return Located::Found(canonical, descriptor);
            }
        }
        Located::Missing
    }

    fn record_priority(&mut self, id: &str, priority: Option<u32>) {
        let current = self.group_of.entry(id.to_string()).or_insert(None);
        if priority > *current {
            *current = priority;
        }
    }

    /// Record an id that could not be resolved (deduplicated).
    pub fn note_unresolved(&mut self, id: &str) {
        if !self.unresolved.iter().any(|u| u == id) {
            self.unresolved.push(id.to_string());
        }
    }

    /// Descriptor for `id` under its script spelling, else its style spelling.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<&ResourceDescriptor> {
        self.catalog
            .get(&normalize(id, SCRIPT_EXTENSION, &self.config))
            .or_else(|| self.catalog.get(&normalize(id, STYLE_EXTENSION, &self.config)))
    }

    /// Location of the catalog entry with exactly this canonical id.
    #[must_use]
    pub fn uri(&self, id: &str) -> Option<&str> {
        self.catalog.get(id).map(|r| r.location.as_str())
    }

    /// Convert the id-keyed priorities into location-keyed groups.
    ///
    /// Ids without a catalog entry are reported and skipped. When several ids map to
    /// the same location the highest priority wins; locations whose priority was
    /// never set are left out so they fall into the default group.
    #[must_use]
    pub fn location_groups(&self) -> HashMap<String, u32> {
        let mut groups: HashMap<String, Option<u32>> = HashMap::new();
        for (id, priority) in &self.group_of {
            match self.lookup(id) {
                Some(descriptor) => {
                    let current = groups.entry(descriptor.location.clone()).or_insert(None);
                    if *priority > *current {
                        *current = *priority;
                    }
                }
                None => tracing::warn!("No catalog entry for grouped resource '{}'", id),
            }
        }
        groups
            .into_iter()
            .filter_map(|(location, priority)| priority.map(|p| (location, p)))
            .collect()
    }

    /// Highest priority recorded for the raw `id`.
    #[must_use]
    pub fn priority(&self, id: &str) -> Option<u32> {
        self.group_of.get(id).copied().flatten()
    }

    /// Collected locations of one kind, in discovery order.
    #[must_use]
    pub fn locations(&self, kind: ResourceKind) -> &[String] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// All collected locations grouped by kind.
    #[must_use]
    pub const fn by_kind(&self) -> &BTreeMap<ResourceKind, Vec<String>> {
        &self.by_kind
    }

    /// Whether the canonical id has been collected.
    #[must_use]
    pub fn is_resolved(&self, canonical: &str) -> bool {
        self.resolved.contains(canonical)
    }

    /// Ids that could not be found, in the order they were first reported.
    #[must_use]
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// Configuration this collector normalizes with.
    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Catalog this collector resolves against.
    #[must_use]
    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }
}
