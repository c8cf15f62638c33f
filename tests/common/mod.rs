//! Common test utilities for pagelet-kit integration tests

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use pagelet_kit::test_utils::CatalogFixture;

/// Scratch directory holding a catalog, pages and templates
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
}

impl TestProject {
    /// Create an empty project directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        fs::create_dir_all(&project_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// Project with the sample catalog written to `map.json`
    pub fn with_catalog(fixture: &CatalogFixture) -> Result<Self> {
        let project = Self::new()?;
        fixture.write_to(&project.project_dir)?;
        Ok(project)
    }

    /// Get the project directory path
    pub fn path(&self) -> &Path {
        &self.project_dir
    }

    /// Write a file below the project directory
    pub fn write_file(&self, path: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.project_dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write {}", file_path.display()))?;
        Ok(file_path)
    }

    /// Read a file below the project directory
    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))
    }

    /// `pagelet` command running inside the project directory
    pub fn pagelet(&self) -> Command {
        let mut cmd = Command::cargo_bin("pagelet").unwrap();
        cmd.current_dir(&self.project_dir).env("NO_COLOR", "1").env_remove("RUST_LOG");
        cmd
    }
}
