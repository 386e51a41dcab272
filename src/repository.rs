//! In-memory resource repository
//!
//! The repository is the accumulation target of a pipeline run: a map from
//! logical paths to physical paths plus an index of tags. Both are ordered so
//! that serializing the same repository twice yields identical output.

use crate::error::{Error, Result};
use crate::path::{is_ancestor_or_self, join_logical, to_slash};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Logical path -> physical path mapping with tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRepository {
    /// Mapped resources, keyed by logical path
    resources: BTreeMap<String, PathBuf>,
    /// Tag name -> tagged logical paths
    tags: BTreeMap<String, BTreeSet<String>>,
}

impl ResourceRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a repository from its serialized parts
    pub fn from_parts(
        resources: BTreeMap<String, PathBuf>,
        tags: BTreeMap<String, BTreeSet<String>>,
    ) -> Self {
        Self { resources, tags }
    }

    /// Map a logical path to a physical path.
    ///
    /// Replaces the mapping at `logical` and every mapping nested below it,
    /// so the new physical path is the one that resolves for the whole subtree.
    pub fn add<P: Into<PathBuf>>(&mut self, logical: &str, physical: P) {
        let shadowed: Vec<String> = self
            .resources
            .range(logical.to_string()..)
            .map(|(k, _)| k)
            .take_while(|k| k.starts_with(logical))
            .filter(|k| is_ancestor_or_self(logical, k))
            .cloned()
            .collect();
        for key in shadowed {
            self.resources.remove(&key);
        }
        self.resources.insert(logical.to_string(), physical.into());
    }

    /// Get the physical path mapped at exactly `logical`
    pub fn get(&self, logical: &str) -> Option<&Path> {
        self.resources.get(logical).map(PathBuf::as_path)
    }

    /// Check if a mapping exists at exactly `logical`
    pub fn contains(&self, logical: &str) -> bool {
        self.resources.contains_key(logical)
    }

    /// Resolve a logical path through its longest mapped ancestor.
    ///
    /// `/acme/blog/css/style.css` resolves through a mapping of `/acme/blog`
    /// to `<physical>/css/style.css`. The result is not checked for existence.
    pub fn resolve(&self, logical: &str) -> Option<PathBuf> {
        // Longest key first, so nested mappings win over their ancestors
        self.resources
            .range(..=logical.to_string())
            .rev()
            .find(|(key, _)| is_ancestor_or_self(key, logical))
            .map(|(key, physical)| {
                let rest = logical[key.len()..].trim_start_matches('/');
                if rest.is_empty() {
                    physical.clone()
                } else {
                    physical.join(rest)
                }
            })
    }

    /// Every logical path reachable through the repository.
    ///
    /// Includes the mapped paths themselves and, for mapped directories,
    /// everything below them on disk. A subtree claimed by a nested mapping
    /// is only walked through that mapping, so every returned path resolves
    /// to a file or directory that exists.
    pub fn walk(&self) -> Result<BTreeSet<String>> {
        let mut paths = BTreeSet::new();
        for (logical, physical) in &self.resources {
            paths.insert(logical.clone());
            if !physical.is_dir() {
                continue;
            }
            let walker = WalkDir::new(physical)
                .min_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| match entry.path().strip_prefix(physical) {
                    Ok(relative) if relative.as_os_str().is_empty() => true,
                    Ok(relative) => !self.contains(&join_logical(logical, &to_slash(relative))),
                    Err(_) => true,
                });
            for entry in walker {
                let entry = entry.map_err(|e| Error::Filesystem {
                    message: format!("Failed to walk '{}': {}", physical.display(), e),
                })?;
                if let Ok(relative) = entry.path().strip_prefix(physical) {
                    paths.insert(join_logical(logical, &to_slash(relative)));
                }
            }
        }
        Ok(paths)
    }

    /// Attach a tag to a logical path
    pub fn tag(&mut self, logical: &str, tag: &str) {
        self.tags
            .entry(tag.to_string())
            .or_default()
            .insert(logical.to_string());
    }

    /// Logical paths carrying the given tag
    pub fn paths_with_tag(&self, tag: &str) -> Vec<&str> {
        self.tags
            .get(tag)
            .map(|paths| paths.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Iterate over all mappings as (logical, physical) pairs, in order
    pub fn resources(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.resources
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// The full tag index
    pub fn tags(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.tags
    }

    /// Get the number of mappings
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if the repository is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Split the repository into its raw maps
    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<String, PathBuf>,
        BTreeMap<String, BTreeSet<String>>,
    ) {
        (self.resources, self.tags)
    }
}
