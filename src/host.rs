//! # Host Model
//!
//! The `Host` bundles everything the pipeline needs from the package manager:
//! its configuration, the root package, the repository of installed packages
//! and the installation manager. It is read-only; the pipeline never writes
//! back to the host's files.
//!
//! `Host::load` reads the on-disk state of a project:
//!
//! - `composer.json` in the working directory (the root manifest).
//! - `<vendor>/composer/installed.json` (the installed packages, if any).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::package::{InstallationManager, Package, PackageRepository};

/// File name of the root manifest.
pub const MANIFEST_FILE: &str = "composer.json";

/// Location of the installed packages list, relative to the vendor directory.
pub const INSTALLED_FILE: &str = "composer/installed.json";

#[derive(Deserialize)]
struct RootManifest {
    #[serde(default)]
    config: BTreeMap<String, serde_json::Value>,
    #[serde(flatten)]
    package: Package,
}

/// The host's state, as seen by the pipeline
#[derive(Debug, Clone)]
pub struct Host {
    config: Config,
    root_package: Package,
    repository: PackageRepository,
    installation_manager: InstallationManager,
}

impl Host {
    /// Assemble a host from its parts
    pub fn new(config: Config, root_package: Package, repository: PackageRepository) -> Self {
        let installation_manager = InstallationManager::new(config.vendor_dir());
        Self {
            config,
            root_package,
            repository,
            installation_manager,
        }
    }

    /// Load the host from a project directory.
    ///
    /// Relative paths in the configuration stay relative; they are resolved
    /// against the process working directory, which the caller is expected
    /// to have set to `working_dir`.
    pub fn load(working_dir: &Path) -> Result<Self> {
        let manifest_path = working_dir.join(MANIFEST_FILE);
        let content = fs::read_to_string(&manifest_path).map_err(|e| Error::Manifest {
            path: manifest_path.display().to_string(),
            message: e.to_string(),
        })?;
        let manifest: RootManifest =
            serde_json::from_str(&content).map_err(|e| Error::Manifest {
                path: manifest_path.display().to_string(),
                message: e.to_string(),
            })?;

        let config = Config::from_manifest(&manifest.config);
        let vendor_dir = config.vendor_dir();
        let vendor_dir = if vendor_dir.is_absolute() {
            vendor_dir
        } else {
            working_dir.join(vendor_dir)
        };
        let repository = PackageRepository::from_installed_json(&vendor_dir.join(INSTALLED_FILE))?;

        log::debug!(
            "Loaded {} with {} installed packages",
            manifest.package.pretty_name(),
            repository.packages().len()
        );

        Ok(Self::new(config, manifest.package, repository))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn root_package(&self) -> &Package {
        &self.root_package
    }

    pub fn repository(&self) -> &PackageRepository {
        &self.repository
    }

    pub fn installation_manager(&self) -> &InstallationManager {
        &self.installation_manager
    }
}
