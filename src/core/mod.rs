//! Core types for pagelet-kit
//!
//! This module holds the types every other component builds on:
//!
//! - [`PageletError`] / [`ErrorContext`] - error enum and its user-facing wrapper
//! - [`ResourceKind`] / [`ResourceDescriptor`] - catalog entry model
//!
//! # Error First Design
//!
//! Operations that can fail return a [`Result`] carrying a [`PageletError`]. The one
//! intentional exception is resolving an unknown resource id, which is reported
//! through `tracing` and recorded on the collector rather than aborting the render.

pub mod error;
pub mod resource;

pub use error::{ErrorContext, PageletError, user_friendly_error};
pub use resource::{ResourceDescriptor, ResourceKind};

/// Result alias used across the library.
pub type Result<T, E = PageletError> = std::result::Result<T, E>;
