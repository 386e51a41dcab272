//! # Configuration
//!
//! This module covers the two kinds of configuration the pipeline reads:
//!
//! - **Host configuration (`Config`)**: key/value settings from the `config`
//!   section of the project manifest, with defaults and environment overrides.
//!   The pipeline only needs `vendor-dir`, but the lookup is generic.
//!
//! - **Resource declarations (`ResourceConfig`)**: the `extra.resources` block
//!   every package may carry. It declares which logical paths the package
//!   exports, which packages it overrides, and which tags to attach.
//!
//! ## Resource declaration format
//!
//! ```json
//! {
//!     "extra": {
//!         "resources": {
//!             "export": { "/acme/blog": "resources" },
//!             "override": "acme/theme",
//!             "override-order": ["acme/theme", "acme/blog"],
//!             "tag": { "/acme/blog/css/*.css": ["acme/css"] }
//!         }
//!     }
//! }
//! ```
//!
//! `override` and tag values accept either a single string or a list.
//! `override-order` is only honored on the root package.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Name of the configuration key holding the vendor directory.
pub const VENDOR_DIR_KEY: &str = "vendor-dir";

/// Environment variable that overrides the configured vendor directory.
pub const VENDOR_DIR_ENV: &str = "COMPOSER_VENDOR_DIR";

/// Name given to a root package that does not declare one.
pub const ROOT_PACKAGE_NAME: &str = "__root__";

static PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([_.-]?[a-z0-9]+)*/[a-z0-9](([_.]?|-{0,2})[a-z0-9]+)*$")
        .expect("package name pattern is valid")
});

/// Host configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: BTreeMap<String, String>,
}

impl Config {
    /// Create a configuration holding only the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from the `config` section of a manifest.
    ///
    /// String, number and boolean values are kept; nested values are ignored.
    /// The `COMPOSER_VENDOR_DIR` environment variable takes precedence over
    /// the manifest's `vendor-dir`.
    pub fn from_manifest(section: &BTreeMap<String, serde_json::Value>) -> Self {
        let mut config = Self::new();
        for (key, value) in section {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => continue,
            };
            config.set(key, value);
        }

        if let Ok(vendor_dir) = env::var(VENDOR_DIR_ENV) {
            if !vendor_dir.is_empty() {
                config.set(VENDOR_DIR_KEY, vendor_dir);
            }
        }

        config
    }

    /// Set a configuration value
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Look up a configuration value, falling back to the built-in default
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .or_else(|| default_value(key))
    }

    /// The vendor directory, as configured (may be relative to the working directory)
    pub fn vendor_dir(&self) -> PathBuf {
        PathBuf::from(self.get(VENDOR_DIR_KEY).unwrap_or("vendor"))
    }
}

fn default_value(key: &str) -> Option<&'static str> {
    match key {
        VENDOR_DIR_KEY => Some("vendor"),
        _ => None,
    }
}

/// Resource declarations of a single package
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceConfig {
    /// Logical path to physical path (relative to the install path)
    #[serde(default)]
    pub export: BTreeMap<String, String>,
    /// Names of packages whose resources this package supersedes
    #[serde(default, rename = "override", deserialize_with = "one_or_many")]
    pub overrides: Vec<String>,
    /// Explicit precedence between packages, later entries win (root only)
    #[serde(default, rename = "override-order")]
    pub override_order: Vec<String>,
    /// Glob selector to tag names
    #[serde(default, deserialize_with = "tag_map")]
    pub tag: BTreeMap<String, Vec<String>>,
}

impl ResourceConfig {
    /// Check that every referenced package name is well-formed
    pub fn validate(&self) -> Result<()> {
        for name in self.overrides.iter().chain(&self.override_order) {
            validate_package_name(name)?;
        }
        for (selector, tags) in &self.tag {
            if tags.iter().any(|t| t.trim().is_empty()) {
                return Err(Error::ConfigParse {
                    message: format!("Empty tag name for selector '{}'", selector),
                    hint: None,
                });
            }
        }
        Ok(())
    }

    /// Whether the package declares anything at all
    pub fn is_empty(&self) -> bool {
        self.export.is_empty()
            && self.overrides.is_empty()
            && self.override_order.is_empty()
            && self.tag.is_empty()
    }
}

/// Validate a package name against the `vendor/name` convention
pub fn validate_package_name(name: &str) -> Result<()> {
    if name == ROOT_PACKAGE_NAME || PACKAGE_NAME.is_match(name) {
        Ok(())
    } else {
        Err(Error::ConfigParse {
            message: format!("Invalid package name '{}'", name),
            hint: Some("Package names are lowercase and look like 'vendor/name'".to_string()),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(OneOrMany::deserialize(deserializer)?.into())
}

fn tag_map<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, OneOrMany>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, v)| (k, v.into())).collect())
}
