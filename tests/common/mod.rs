//! Shared test utilities for E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = ProjectFixture::new()
//!         .with_root(manifests::ROOT_EXPORT)
//!         .with_file("res/app.css", "body {}");
//!     fixture.command().arg("dump").assert().success();
//! }
//! ```

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::ProjectFixture;
}

/// Common manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// Root package without resources.
    pub const EMPTY_ROOT: &str = r#"{"name": "acme/app"}"#;

    /// Root package exporting `res` as `/app`.
    pub const ROOT_EXPORT: &str = r#"{
    "name": "acme/app",
    "extra": {"resources": {"export": {"/app": "res"}}}
}"#;

    /// Invalid JSON for error testing.
    pub const INVALID_JSON: &str = "{\"name\": ";
}

/// A temporary project directory with a root manifest and installed packages.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = ProjectFixture::new()
///     .with_root(manifests::EMPTY_ROOT)
///     .with_package("acme/blog", r#"{"export": {"/acme/blog": "res"}}"#)
///     .with_file("vendor/acme/blog/res/style.css", "body {}");
/// ```
pub struct ProjectFixture {
    temp_dir: assert_fs::TempDir,
    packages: Vec<serde_json::Value>,
}

impl ProjectFixture {
    /// Create a new fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
            packages: Vec::new(),
        }
    }

    /// Write `composer.json` with the given content.
    pub fn with_root(self, content: &str) -> Self {
        self.with_file("composer.json", content)
    }

    /// Install a package under `vendor/<name>` with the given resources section.
    ///
    /// Packages are recorded in `installed.json` in the order they are added.
    pub fn with_package(mut self, name: &str, resources: &str) -> Self {
        let resources: serde_json::Value =
            serde_json::from_str(resources).expect("Invalid resources JSON");
        self.packages.push(serde_json::json!({
            "name": name,
            "version": "1.0.0",
            "install-path": format!("../{}", name),
            "extra": {"resources": resources},
        }));
        self.temp_dir
            .child("vendor")
            .child(name)
            .create_dir_all()
            .expect("Failed to create package directory");

        let installed = serde_json::json!({ "packages": self.packages });
        self.with_file(
            "vendor/composer/installed.json",
            &serde_json::to_string_pretty(&installed).expect("Failed to encode installed.json"),
        )
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the generated cache file.
    pub fn cache_path(&self) -> PathBuf {
        self.path().join("vendor/composer/resources.json")
    }

    /// Path of the generated stub.
    pub fn stub_path(&self) -> PathBuf {
        self.path().join("vendor/resource-locator.php")
    }

    /// Parsed content of the generated cache file.
    #[allow(dead_code)]
    pub fn cache(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.cache_path()).expect("Failed to read cache");
        serde_json::from_str(&content).expect("Invalid cache JSON")
    }

    /// The physical path `relative` resolves to on this machine.
    #[allow(dead_code)]
    pub fn canonical(&self, relative: &str) -> String {
        std::fs::canonicalize(self.path().join(relative))
            .expect("Failed to canonicalize")
            .display()
            .to_string()
    }

    /// Create a command running in the fixture directory.
    pub fn command(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("resource-locator");
        cmd.current_dir(self.path())
            .env_remove("COMPOSER_VENDOR_DIR")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
