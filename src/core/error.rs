//! Error handling for pagelet-kit
//!
//! This module provides the error type shared by every component of the crate and
//! the user-facing wrapper the CLI uses to print it. The error system follows two
//! principles:
//! 1. **Strongly-typed errors** for precise handling in library code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`PageletError`] - Enumerated failure cases of catalog loading, configuration,
//!   scope bookkeeping, templating, and output serialization
//! - [`ErrorContext`] - Wrapper that adds a suggestion and details for display
//!
//! Unresolvable resource ids are deliberately *not* errors: a render continues with
//! the resource absent and the id is reported through `tracing` instead.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pagelet_kit::core::{PageletError, user_friendly_error};
//!
//! fn load() -> Result<(), PageletError> {
//!     Err(PageletError::CatalogNotFound {
//!         path: "map.json".to_string(),
//!     })
//! }
//!
//! if let Err(e) = load() {
//!     let ctx = user_friendly_error(anyhow::Error::from(e));
//!     ctx.display();
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for pagelet-kit operations
#[derive(Error, Debug)]
pub enum PageletError {
    /// Catalog file does not exist or cannot be read
    ///
    /// A render cannot proceed without the catalog, so this is fatal at startup.
    #[error("Resource catalog not found: {path}")]
    CatalogNotFound {
        /// Path that was expected to contain the catalog
        path: String,
    },

    /// Catalog content is not a valid catalog document
    #[error("Invalid resource catalog in {file}: {reason}")]
    CatalogParseError {
        /// Path (or `<inline>`) of the catalog that failed to parse
        file: String,
        /// Underlying parser message
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// A pagelet scope was closed without a matching open
    ///
    /// This indicates a structural mismatch in the caller's scope nesting; the
    /// collected output can no longer be trusted.
    #[error("Pagelet scope closed without a matching open")]
    UnbalancedScope,

    /// Rendering was requested while pagelet scopes were still open
    #[error("{count} pagelet scope(s) still open at render time: {open}")]
    UnclosedScopes {
        /// Number of frames left on the stack
        count: usize,
        /// Full id of the innermost open frame
        open: String,
    },

    /// Template rendering failed
    #[error("Failed to render template '{location}': {reason}")]
    TemplateRenderFailed {
        /// Location of the template in the catalog
        location: String,
        /// Reason reported by the template engine
        reason: String,
    },

    /// Pagelet envelope could not be serialized
    #[error("Failed to serialize pagelet envelope: {reason}")]
    EnvelopeSerializeFailed {
        /// Reason reported by the serializer
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for PageletError {
    fn clone(&self) -> Self {
        match self {
            Self::CatalogNotFound {
                path,
            } => Self::CatalogNotFound {
                path: path.clone(),
            },
            Self::CatalogParseError {
                file,
                reason,
            } => Self::CatalogParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::UnbalancedScope => Self::UnbalancedScope,
            Self::UnclosedScopes {
                count,
                open,
            } => Self::UnclosedScopes {
                count: *count,
                open: open.clone(),
            },
            Self::TemplateRenderFailed {
                location,
                reason,
            } => Self::TemplateRenderFailed {
                location: location.clone(),
                reason: reason.clone(),
            },
            Self::EnvelopeSerializeFailed {
                reason,
            } => Self::EnvelopeSerializeFailed {
                reason: reason.clone(),
            },
            // io::Error and toml::de::Error are not Clone; keep their message
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error wrapper carrying a suggestion and details for terminal display
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: PageletError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details.
    #[must_use]
    pub const fn new(error: PageletError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach additional details explaining the error.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with a suggestion where one is known.
///
/// Errors that are not a [`PageletError`] (or an IO error somewhere in the chain)
/// are wrapped as [`PageletError::Other`] carrying the full context chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(pagelet_error) = error.downcast_ref::<PageletError>() {
        return create_error_context(pagelet_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::NotFound {
            return ErrorContext::new(PageletError::Other {
                message: format!("{error:#}"),
            })
            .with_suggestion("Check that the file exists and the path is correct");
        }
    }

    ErrorContext::new(PageletError::Other {
        message: format!("{error:#}"),
    })
}

fn create_error_context(error: PageletError) -> ErrorContext {
    match &error {
        PageletError::CatalogNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Pass the resource map produced by your asset build with --catalog")
            .with_details("Every render resolves ids against the catalog; it must exist up front"),
        PageletError::CatalogParseError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion(
                "The catalog must be a JSON object with a \"res\" map of {uri, type, deps} entries",
            ),
        PageletError::ConfigError {
            ..
        }
        | PageletError::TomlError(_) => ErrorContext::new(error)
            .with_suggestion("Check pagelet.toml for misspelled keys or wrong value types"),
        PageletError::UnbalancedScope
        | PageletError::UnclosedScopes {
            ..
        } => ErrorContext::new(error)
            .with_details("Every pagelet start must be paired with exactly one pagelet end"),
        PageletError::TemplateRenderFailed {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the template syntax and that every referenced variable exists"),
        _ => ErrorContext::new(error),
    }
}
