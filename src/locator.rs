//! Cache-backed resource locator
//!
//! The runtime counterpart of [`crate::dump`]: it loads a serialized
//! repository and resolves logical paths to physical ones without touching
//! any package manifests.

use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults::{CACHE_FILE_NAME, CACHE_FORMAT_VERSION};
use crate::dump::CacheFile;
use crate::error::{Error, Result};
use crate::repository::ResourceRepository;

/// Resolves logical paths through a serialized repository
#[derive(Debug, Clone)]
pub struct CacheLocator {
    repository: ResourceRepository,
}

impl CacheLocator {
    /// Load the cache written into `cache_dir`
    pub fn open<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let path = cache_dir.as_ref().join(CACHE_FILE_NAME);
        let content = fs::read_to_string(&path).map_err(|e| Error::Cache {
            message: format!("Failed to read '{}': {}", path.display(), e),
        })?;
        let cache: CacheFile = serde_json::from_str(&content)?;

        if cache.version != CACHE_FORMAT_VERSION {
            return Err(Error::Cache {
                message: format!(
                    "Unsupported cache version {} in '{}' (expected {})",
                    cache.version,
                    path.display(),
                    CACHE_FORMAT_VERSION
                ),
            });
        }

        Ok(Self {
            repository: ResourceRepository::from_parts(cache.resources, cache.tags),
        })
    }

    /// Resolve a logical path to an existing physical path
    pub fn locate(&self, logical: &str) -> Result<PathBuf> {
        let normalized = crate::path::normalize_logical(logical).map_err(|_| {
            Error::ResourceNotFound {
                path: logical.to_string(),
            }
        })?;
        match self.repository.resolve(&normalized) {
            Some(physical) if physical.exists() => Ok(physical),
            _ => Err(Error::ResourceNotFound { path: normalized }),
        }
    }

    /// Logical paths carrying the given tag
    pub fn paths_with_tag(&self, tag: &str) -> Vec<&str> {
        self.repository.paths_with_tag(tag)
    }

    /// Every mapping, ordered by logical path
    pub fn resources(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.repository.resources()
    }

    /// All known tag names
    pub fn tags(&self) -> Vec<&str> {
        self.repository.tags().keys().map(String::as_str).collect()
    }
}
