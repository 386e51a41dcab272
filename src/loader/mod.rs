//! # Repository Loader
//!
//! The loader aggregates the resource declarations of every package into a
//! single [`ResourceRepository`]. It is driven in four steps, always in this
//! order:
//!
//! 1.  **`load_package`**: called once per package, root package first. Each
//!     call normalizes the package's exported paths and records them; nothing
//!     is written to the repository yet.
//!
//! 2.  **`validate_overrides`**: computes the precedence order between
//!     packages from their `override` declarations and the root package's
//!     `override-order`, and fails if two unordered packages claim the same
//!     logical path (or nested ones).
//!
//! 3.  **`apply_overrides`**: adds every package's exports to the repository
//!     in precedence order, so overriding packages replace what they override.
//!
//! 4.  **`apply_tags`**: matches every tag selector against the final set of
//!     logical paths and tags the matches.
//!
//! Splitting loading from applying means conflicts are detected before the
//! repository is touched, regardless of the order packages were loaded in.

mod overrides;
mod tags;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::package::Package;
use crate::path::{self, normalize_logical};
use crate::repository::ResourceRepository;

/// A package's declarations after normalization
#[derive(Debug, Clone)]
struct LoadedPackage {
    name: String,
    /// Normalized logical path -> canonical physical path, sorted by logical path
    exports: Vec<(String, PathBuf)>,
    /// Names of the packages this one overrides
    overrides: Vec<String>,
    /// (selector, tag) pairs
    tags: Vec<(String, String)>,
}

/// Aggregates package resources into a repository
#[derive(Debug)]
pub struct RepositoryLoader<'a> {
    repository: &'a mut ResourceRepository,
    /// Packages in load order
    packages: Vec<LoadedPackage>,
    /// Root package's explicit precedence list
    override_order: Vec<String>,
    /// Indices into `packages`, lowest precedence first
    precedence: Option<Vec<usize>>,
}

impl<'a> RepositoryLoader<'a> {
    pub fn new(repository: &'a mut ResourceRepository) -> Self {
        Self {
            repository,
            packages: Vec::new(),
            override_order: Vec::new(),
            precedence: None,
        }
    }

    /// Record a package's resource declarations.
    ///
    /// The first package loaded is treated as the root package: only its
    /// `override-order` is honored. Physical paths are resolved against
    /// `install_path` and must exist.
    pub fn load_package(&mut self, package: &Package, install_path: &Path) -> Result<()> {
        if self.packages.iter().any(|p| p.name == package.name) {
            return Err(Error::Conflict {
                path: package.name.clone(),
                message: "package is loaded more than once".to_string(),
            });
        }

        let config = package.resources();
        config.validate()?;

        let is_root = self.packages.is_empty();
        if !config.override_order.is_empty() {
            if is_root {
                self.override_order = config.override_order.clone();
            } else {
                warn!(
                    "Ignoring \"override-order\" of {}: only the root package may declare it",
                    package.name
                );
            }
        }

        let mut exports = BTreeMap::new();
        for (logical, physical) in &config.export {
            let normalized = normalize_logical(logical).map_err(|reason| Error::InvalidResource {
                package: package.name.clone(),
                path: logical.clone(),
                message: reason.to_string(),
            })?;
            let resolved = path::normalize(install_path.join(physical))?;
            if exports.insert(normalized.clone(), resolved).is_some() {
                return Err(Error::InvalidResource {
                    package: package.name.clone(),
                    path: normalized,
                    message: "declared more than once".to_string(),
                });
            }
        }

        let tags = config
            .tag
            .iter()
            .flat_map(|(selector, tags)| tags.iter().map(move |t| (selector.clone(), t.clone())))
            .collect();

        debug!(
            "Loaded {} from {} ({} resources)",
            package.pretty_name(),
            install_path.display(),
            exports.len()
        );

        self.packages.push(LoadedPackage {
            name: package.name.clone(),
            exports: exports.into_iter().collect(),
            overrides: config.overrides.clone(),
            tags,
        });
        self.precedence = None;
        Ok(())
    }

    /// Names of the loaded packages, in load order
    pub fn package_names(&self) -> Vec<&str> {
        self.packages.iter().map(|p| p.name.as_str()).collect()
    }

    /// The precedence order, computing it on first use
    fn precedence(&mut self) -> Result<Vec<usize>> {
        if let Some(order) = &self.precedence {
            return Ok(order.clone());
        }
        let order = overrides::resolve_precedence(&self.packages, &self.override_order)?;
        self.precedence = Some(order.clone());
        Ok(order)
    }
}
