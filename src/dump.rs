//! Writing the generated artifacts
//!
//! This is the last step of the pipeline. It persists the aggregated
//! repository and emits the locator stub.
//!
//! ## Artifacts
//!
//! 1.  **Cache (`<vendor>/composer/resources.json`)**: the repository as
//!     pretty-printed JSON. All maps are ordered, so identical repositories
//!     produce byte-identical files.
//!
//! 2.  **Stub (`<vendor>/resource-locator.php`)**: a fixed script that builds
//!     a cache-backed locator rooted at the cache directory. It only depends
//!     on the directory layout, never on the repository contents.
//!
//! Both files are overwritten unconditionally.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::{
    locator_path, CACHE_DIR_NAME, CACHE_FILE_NAME, CACHE_FORMAT_VERSION, LOCATOR_FILE_NAME,
};
use crate::error::{Error, Result};
use crate::repository::ResourceRepository;

/// On-disk representation of a repository
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CacheFile {
    pub version: u32,
    #[serde(default)]
    pub resources: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub tags: BTreeMap<String, BTreeSet<String>>,
}

/// The stub written to `<vendor>/resource-locator.php`
pub fn locator_stub() -> String {
    format!(
        "<?php\n\
         \n\
         // {LOCATOR_FILE_NAME} @generated by resource-locator\n\
         \n\
         use ResourceLocator\\CacheLocator;\n\
         \n\
         return new CacheLocator(__DIR__ . '/{CACHE_DIR_NAME}');\n"
    )
}

/// Serialize a repository into `target_dir`.
///
/// The directory must already exist.
pub fn dump_repository(repository: &ResourceRepository, target_dir: &Path) -> Result<PathBuf> {
    let (resources, tags) = repository.clone().into_parts();
    let cache = CacheFile {
        version: CACHE_FORMAT_VERSION,
        resources,
        tags,
    };

    let mut content = serde_json::to_string_pretty(&cache)?;
    content.push('\n');

    let path = target_dir.join(CACHE_FILE_NAME);
    write_file(&path, &content)?;
    log::debug!("Wrote {} resources to {}", repository.len(), path.display());
    Ok(path)
}

/// Write the locator stub directly under `vendor_dir`.
pub fn write_locator_stub(vendor_dir: &Path) -> Result<PathBuf> {
    let path = locator_path(vendor_dir);
    write_file(&path, &locator_stub())?;
    Ok(path)
}

/// Create a directory and its parents if it does not exist yet
pub fn ensure_directory_exists(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::Filesystem {
        message: format!("Failed to create directory '{}': {}", dir.display(), e),
    })
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::Filesystem {
        message: format!("Failed to write file '{}': {}", path.display(), e),
    })
}
