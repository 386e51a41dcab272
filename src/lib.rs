//! # Resource Locator Library
//!
//! This library generates a resource locator for a PHP project managed by a
//! Composer-compatible package manager. Packages declare *logical paths*
//! (such as `/acme/blog/css`) that map onto directories or files inside their
//! installation. After every install or update the library aggregates those
//! declarations into one repository, writes it to a cache, and emits a small
//! stub the project's runtime loads to resolve logical paths.
//!
//! ## Quick Example
//!
//! ```
//! use resource_locator::repository::ResourceRepository;
//!
//! let mut repo = ResourceRepository::new();
//! repo.add("/acme/blog", "/project/vendor/acme/blog/res");
//! repo.tag("/acme/blog", "acme/assets");
//!
//! assert_eq!(
//!     repo.resolve("/acme/blog/css/style.css").unwrap(),
//!     std::path::PathBuf::from("/project/vendor/acme/blog/res/css/style.css")
//! );
//! assert_eq!(repo.paths_with_tag("acme/assets"), vec!["/acme/blog"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Host (`host`, `package`, `config`)**: A read-only view of the package
//!   manager's state: configuration, root package, installed packages and
//!   where they are installed.
//! - **Repository (`repository`)**: The mapping from logical paths to physical
//!   paths, plus tags attached to logical paths.
//! - **Loader (`loader`)**: Aggregates every package's declarations into a
//!   repository, resolving overrides and applying tags.
//! - **Dump and Locator (`dump`, `locator`)**: Persist the repository and
//!   read it back at runtime.
//! - **Plugin (`plugin`)**: The event-driven entry point that ties it all
//!   together and guarantees the pipeline runs at most once per process.
//!
//! ## Execution Flow
//!
//! [`plugin::LocatorPlugin::on_lifecycle_event`] runs these steps:
//!
//! 1.  **Paths**: Ensure the vendor directory exists and normalize it and the
//!     working directory.
//! 2.  **Loading**: Load the root package, then every installed package.
//! 3.  **Overrides**: Validate and apply the precedence between packages.
//! 4.  **Tags**: Attach tags to the matching logical paths.
//! 5.  **Output**: Write the cache and the locator stub into the vendor
//!     directory.

pub mod config;
pub mod defaults;
pub mod dump;
pub mod error;
pub mod host;
pub mod loader;
pub mod locator;
pub mod output;
pub mod package;
pub mod path;
pub mod plugin;
pub mod repository;

#[cfg(test)]
mod path_proptest;
