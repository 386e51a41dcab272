//! Installed packages and where they live on disk

use crate::config::{ResourceConfig, ROOT_PACKAGE_NAME};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Version reported for a root package without an explicit version.
pub const ROOT_PACKAGE_VERSION: &str = "1.0.0+no-version-set";

/// A package known to the host
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Package {
    /// Package name (`vendor/name`)
    #[serde(default = "root_name")]
    pub name: String,
    /// Version string as reported by the host
    #[serde(default = "root_version")]
    pub version: String,
    /// Install location recorded by the host, relative to `<vendor>/composer`
    #[serde(default, rename = "install-path")]
    pub install_path: Option<PathBuf>,
    /// Free-form metadata; the resource declarations live here
    #[serde(default)]
    pub extra: PackageExtra,
}

/// The `extra` block of a package
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PackageExtra {
    #[serde(default)]
    pub resources: ResourceConfig,
}

fn root_name() -> String {
    ROOT_PACKAGE_NAME.to_string()
}

fn root_version() -> String {
    ROOT_PACKAGE_VERSION.to_string()
}

impl Package {
    /// Create a package without any resource declarations
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            install_path: None,
            extra: PackageExtra::default(),
        }
    }

    /// Attach resource declarations
    pub fn with_resources(mut self, resources: ResourceConfig) -> Self {
        self.extra.resources = resources;
        self
    }

    /// The package's resource declarations
    pub fn resources(&self) -> &ResourceConfig {
        &self.extra.resources
    }

    /// `name@version`, used in log and error messages
    pub fn pretty_name(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InstalledFile {
    // Newer layout: {"packages": [...], "dev": true, ...}
    Wrapped { packages: Vec<Package> },
    Bare(Vec<Package>),
}

/// The host's repository of installed packages
#[derive(Debug, Clone, Default)]
pub struct PackageRepository {
    packages: Vec<Package>,
}

impl PackageRepository {
    /// Create a repository from an ordered list of packages
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    /// Read the host's `installed.json`.
    ///
    /// A missing file means nothing is installed yet and yields an empty
    /// repository. Package order is preserved exactly as written.
    pub fn from_installed_json(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No installed packages file at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let file: InstalledFile = serde_json::from_str(&content).map_err(|e| Error::Manifest {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let packages = match file {
            InstalledFile::Wrapped { packages } => packages,
            InstalledFile::Bare(packages) => packages,
        };
        Ok(Self::new(packages))
    }

    /// Installed packages, in host order
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }
}

/// Maps packages to their install locations
#[derive(Debug, Clone)]
pub struct InstallationManager {
    vendor_dir: PathBuf,
}

impl InstallationManager {
    pub fn new<P: Into<PathBuf>>(vendor_dir: P) -> Self {
        Self {
            vendor_dir: vendor_dir.into(),
        }
    }

    /// Where the given package is installed.
    ///
    /// A recorded relative `install-path` is resolved against
    /// `<vendor>/composer`; without one the package lives in
    /// `<vendor>/<name>`.
    pub fn install_path(&self, package: &Package) -> PathBuf {
        match &package.install_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.vendor_dir.join("composer").join(path),
            None => self.vendor_dir.join(&package.name),
        }
    }
}
