//! Integration test suite for pagelet-kit
//!
//! End-to-end tests for the render pipeline through the library API and for the
//! `pagelet` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **render_pipeline**: Catalog, templates, config files and renders together
//! - **resolve**: `pagelet resolve` output in text and JSON form
//! - **assemble**: `pagelet assemble` for whole pages and pagelet envelopes

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod assemble;
mod render_pipeline;
mod resolve;
