//! Nested pagelet scope tracking.
//!
//! A pagelet is a named region of a page that can be rendered on its own. Templates
//! open and close pagelet scopes as they execute; scopes nest, and the dot-joined
//! path of local ids from the root (`layout.main.feed`) is the scope's full id.
//!
//! For a partial render the caller names the full ids it wants. The
//! [`PageletScopeTracker`] then decides for every scope the template opens:
//!
//! | state          | meaning                                               |
//! |----------------|-------------------------------------------------------|
//! | `None`         | not requested and no requested scope below: skip body |
//! | `AncestorPath` | a requested scope lies below: keep descending         |
//! | `Exact`        | requested: capture the body output                    |
//! | `InsideExact`  | below a requested scope: render unconditionally       |
//!
//! Without a partial request every scope is `InsideExact`, i.e. the whole page renders.
//!
//! ```rust
//! use pagelet_kit::pagelet::{MatchState, PageletScopeTracker};
//!
//! let mut tracker = PageletScopeTracker::default();
//! tracker.use_pagelets("layout.main");
//!
//! assert_eq!(tracker.enter("layout"), MatchState::AncestorPath);
//! assert_eq!(tracker.enter("main"), MatchState::Exact);
//! assert_eq!(tracker.enter("item"), MatchState::InsideExact);
//! tracker.leave(String::from("<li>")).unwrap();
//! tracker.leave(String::from("<main>...</main>")).unwrap();
//! assert_eq!(tracker.enter("aside"), MatchState::None);
//! // leave "layout"
//! tracker.leave(String::new()).unwrap();
//!
//! assert_eq!(tracker.outputs()["layout.main"], "<main>...</main>");
//! ```

use std::collections::BTreeMap;

use crate::constants::PAGELET_SEPARATOR;
use crate::core::{PageletError, Result};

/// Decision for one entered scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchState {
    /// Not requested and nothing requested below; the body is skipped
    None,
    /// A requested scope is nested somewhere below
    AncestorPath,
    /// This scope is one of the requested targets
    Exact,
    /// An enclosing scope is a requested target
    InsideExact,
}

impl MatchState {
    /// Whether the scope body should execute at all.
    #[must_use]
    pub const fn is_match(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Whether an enclosing-or-self match covers everything below.
    #[must_use]
    pub const fn covers_children(self) -> bool {
        matches!(self, Self::Exact | Self::InsideExact)
    }
}

/// One open scope on the tracker's stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageletFrame {
    /// Id as written in the template
    pub local_id: String,
    /// Dot-joined path from the root scope
    pub full_id: String,
    /// Decision made when the scope was entered
    pub state: MatchState,
}

/// Stack-based state machine deciding which scopes are captured, skipped, or
/// rendered inline. One tracker per render.
#[derive(Debug, Default)]
pub struct PageletScopeTracker {
    active: bool,
    targets: Vec<String>,
    stack: Vec<PageletFrame>,
    outputs: BTreeMap<String, String>,
    capturing: bool,
    title: String,
}

impl PageletScopeTracker {
    /// Request a partial render of the comma-separated full ids in `ids`.
    ///
    /// Whitespace around ids is ignored. Blank input leaves the tracker in whole-page
    /// mode. Every requested id gets an (initially empty) output slot.
    pub fn use_pagelets(&mut self, ids: &str) {
        for id in ids.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            if !self.targets.iter().any(|t| t == id) {
                self.targets.push(id.to_string());
            }
            self.outputs.entry(id.to_string()).or_default();
            self.active = true;
        }
        if self.active {
            tracing::debug!("Pagelet mode enabled for: {}", self.targets.join(", "));
        }
    }

    /// Whether a partial render was requested.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether an `Exact` scope is currently open.
    #[must_use]
    pub const fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Whether side effects (resources, scripts, data) must be dropped right now.
    ///
    /// True in pagelet mode whenever no requested scope is open.
    #[must_use]
    pub const fn is_suppressed(&self) -> bool {
        self.active && !self.capturing
    }

    /// Requested full ids in request order.
    #[must_use]
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Full id a scope named `local_id` would get at the current depth.
    #[must_use]
    pub fn full_id(&self, local_id: &str) -> String {
        let mut full_id = String::new();
        for frame in &self.stack {
            full_id.push_str(&frame.local_id);
            full_id.push(PAGELET_SEPARATOR);
        }
        full_id.push_str(local_id);
        full_id
    }

    /// Enter a scope and decide how its body is treated.
    ///
    /// A frame is pushed for every state except [`MatchState::None`]; for `None` the
    /// caller must skip the body and must not call [`leave`](Self::leave).
    pub fn enter(&mut self, local_id: &str) -> MatchState {
        let full_id = self.full_id(local_id);

        // whole-page mode, or nested below a requested scope
        let state = if !self.active
            || self.stack.last().is_some_and(|top| top.state.covers_children())
        {
            MatchState::InsideExact
        } else {
            self.check(&full_id)
        };

        tracing::trace!("Pagelet '{}' entered as {:?}", full_id, state);

        if state.is_match() {
            if state == MatchState::Exact {
                self.capturing = true;
            }
            self.stack.push(PageletFrame {
                local_id: local_id.to_string(),
                full_id,
                state,
            });
        }
        state
    }

    fn check(&self, full_id: &str) -> MatchState {
        if self.targets.iter().any(|t| t == full_id) {
            return MatchState::Exact;
        }
        let is_ancestor = self.targets.iter().any(|t| {
            t.strip_prefix(full_id).is_some_and(|rest| rest.starts_with(PAGELET_SEPARATOR))
        });
        if is_ancestor { MatchState::AncestorPath } else { MatchState::None }
    }

    /// Leave the innermost scope, returning `output` unchanged.
    ///
    /// If the scope was an `Exact` match, `output` is also stored under its full id.
    ///
    /// # Errors
    ///
    /// Returns [`PageletError::UnbalancedScope`] when no scope is open.
    pub fn leave(&mut self, output: String) -> Result<String> {
        let frame = self.stack.pop().ok_or(PageletError::UnbalancedScope)?;
        if frame.state == MatchState::Exact {
            tracing::debug!("Captured pagelet '{}' ({} bytes)", frame.full_id, output.len());
            self.outputs.insert(frame.full_id, output.clone());
            self.capturing = false;
        }
        Ok(output)
    }

    /// Innermost open frame.
    #[must_use]
    pub fn current(&self) -> Option<&PageletFrame> {
        self.stack.last()
    }

    /// Number of open scopes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Fail if any scope is still open.
    ///
    /// # Errors
    ///
    /// Returns [`PageletError::UnclosedScopes`] naming the innermost open scope.
    pub fn ensure_closed(&self) -> Result<()> {
        match self.stack.last() {
            Some(frame) => Err(PageletError::UnclosedScopes {
                count: self.stack.len(),
                open: frame.full_id.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Record the page title; only kept in pagelet mode. Returns `title`.
    pub fn set_title(&mut self, title: String) -> String {
        if self.active {
            self.title.clone_from(&title);
        }
        title
    }

    /// Last title recorded in pagelet mode.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Captured output per requested full id.
    #[must_use]
    pub const fn outputs(&self) -> &BTreeMap<String, String> {
        &self.outputs
    }

    /// Consume the tracker, returning captured outputs and the title.
    #[must_use]
    pub fn into_outputs(self) -> (BTreeMap<String, String>, String) {
        (self.outputs, self.title)
    }
}
