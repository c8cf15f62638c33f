//! Combo URL construction.
//!
//! A combo URL asks the CDN for several assets in one request by substituting a
//! comma-joined list of locations into a pattern such as `/co??%s`:
//!
//! ```text
//! /co??c/base/base.js,c/dialog/dialog.js,c/app/app.js
//! ```
//!
//! [`ComboUriBuilder::build_batches`] splits a kind's collected locations into such
//! URLs. Locations are first partitioned by priority group and groups are emitted in
//! ascending numeric order, so that a group's assets are requested before the next
//! group's. Inside a group a single greedy pass packs as many locations as fit under
//! the configured length. The ceiling is advisory: a location that alone exceeds it is
//! still emitted as its own batch.

use std::collections::{BTreeMap, HashMap};

use crate::constants::{COMBO_SLOT, DEFAULT_GROUP};

/// Packs locations into combo URLs.
#[derive(Debug, Clone)]
pub struct ComboUriBuilder {
    pattern: String,
    max_length: usize,
    strip_prefix: String,
}

impl ComboUriBuilder {
    /// Create a builder for `pattern` (one `%s` slot) and an advisory length ceiling.
    pub fn new(pattern: impl Into<String>, max_length: usize) -> Self {
        Self {
            pattern: pattern.into(),
            max_length,
            strip_prefix: String::new(),
        }
    }

    /// Remove `prefix` from the start of every location before packing it.
    #[must_use]
    pub fn with_strip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.strip_prefix = prefix.into();
        self
    }

    /// Location as it appears inside a combo URL.
    #[must_use]
    pub fn rewrite<'l>(&self, location: &'l str) -> &'l str {
        if self.strip_prefix.is_empty() {
            return location;
        }
        location.strip_prefix(self.strip_prefix.as_str()).unwrap_or(location)
    }

    /// Length the pattern adds to every URL once the slot is filled.
    #[must_use]
    pub fn overhead(&self) -> usize {
        self.pattern.len().saturating_sub(COMBO_SLOT.len())
    }

    /// Split `locations` into combo URLs.
    ///
    /// `groups` maps an original (un-rewritten) location to its priority group;
    /// locations without an entry fall into group 0. Output order is ascending group,
    /// then emission order within the group.
    #[must_use]
    pub fn build_batches(&self, locations: &[String], groups: &HashMap<String, u32>) -> Vec<String> {
        let mut partitions: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
        for location in locations {
            let group = groups.get(location).copied().unwrap_or(DEFAULT_GROUP);
            partitions.entry(group).or_default().push(self.rewrite(location));
        }

        let overhead = self.overhead();
        let mut urls = Vec::new();

        for (group, items) in partitions {
            let before = urls.len();
            let mut fragment = String::new();

            for item in items {
                if !fragment.is_empty() && overhead + fragment.len() + item.len() > self.max_length
                {
                    urls.push(self.fill(&fragment));
                    fragment.clear();
                }
                if !fragment.is_empty() {
                    fragment.push(',');
                }
                fragment.push_str(item);
            }

            if !fragment.is_empty() {
                urls.push(self.fill(&fragment));
            }

            tracing::debug!("Combo group {} packed into {} url(s)", group, urls.len() - before);
        }

        urls
    }

    fn fill(&self, fragment: &str) -> String {
        self.pattern.replacen(COMBO_SLOT, fragment, 1)
    }
}

/// Build combo URLs without any location rewriting.
///
/// Convenience wrapper around [`ComboUriBuilder::build_batches`].
#[must_use]
pub fn build_batches(
    locations: &[String],
    groups: &HashMap<String, u32>,
    max_length: usize,
    pattern: &str,
) -> Vec<String> {
    ComboUriBuilder::new(pattern, max_length).build_batches(locations, groups)
}
