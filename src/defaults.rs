//! Fixed names of the generated artifacts.
//!
//! These are shared by the writer, the locator and the CLI so that every
//! part agrees on where the cache lives.

use std::path::{Path, PathBuf};

/// Subdirectory of the vendor directory holding the cache.
pub const CACHE_DIR_NAME: &str = "composer";

/// File name of the serialized repository inside the cache directory.
pub const CACHE_FILE_NAME: &str = "resources.json";

/// File name of the generated stub, directly under the vendor directory.
pub const LOCATOR_FILE_NAME: &str = "resource-locator.php";

/// Version of the cache format written by this crate.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// Returns the cache directory for a vendor directory.
pub fn cache_dir(vendor_dir: &Path) -> PathBuf {
    vendor_dir.join(CACHE_DIR_NAME)
}

/// Returns the stub path for a vendor directory.
pub fn locator_path(vendor_dir: &Path) -> PathBuf {
    vendor_dir.join(LOCATOR_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_paths() {
        let vendor = Path::new("/project/vendor");
        assert_eq!(cache_dir(vendor), PathBuf::from("/project/vendor/composer"));
        assert_eq!(
            locator_path(vendor),
            PathBuf::from("/project/vendor/resource-locator.php")
        );
    }
}
