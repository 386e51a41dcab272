//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `resource-locator` library. It uses the `thiserror` library to create a
//! single `Error` enum that covers every failure mode of the build pipeline
//! and of the cache locator.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors. Each
//!   variant carries enough context (paths, package names) to be reported
//!   directly to the user.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The variants fall into a few groups:
//!
//! - Filesystem failures while creating directories or writing artifacts.
//! - Path resolution failures for paths that must exist.
//! - Resource conflicts and override cycles between packages.
//! - Manifest and configuration parsing errors.
//! - Cache and lookup errors raised by the locator.
//!
//! None of these are recoverable within a pipeline run: every error aborts
//! the run and is propagated to the caller.

use thiserror::Error;

/// Main error type for resource-locator operations
#[derive(Error, Debug)]
pub enum Error {
    /// A directory or file could not be created or written.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// A path that must exist could not be canonicalized.
    #[error("Path resolution error for '{path}': {message}")]
    PathResolution { path: String, message: String },

    /// Two packages claim the same (or a nested) logical path and neither
    /// overrides the other.
    #[error("Resource conflict for {path}: {message}")]
    Conflict { path: String, message: String },

    /// The override declarations of the loaded packages form a cycle.
    #[error("Cycle detected in package overrides: {cycle}")]
    CycleDetected { cycle: String },

    /// A manifest file is missing or malformed.
    #[error("Manifest error in {path}: {message}")]
    Manifest { path: String, message: String },

    /// A resource declaration block is invalid.
    ///
    /// Optionally carries a hint about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A package declares a resource that cannot be used.
    #[error("Invalid resource '{path}' in package {package}: {message}")]
    InvalidResource {
        package: String,
        path: String,
        message: String,
    },

    /// A logical path has no mapping in the cache, or its target is gone.
    #[error("Resource not found: {path}")]
    ResourceNotFound { path: String },

    /// The serialized cache cannot be read.
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
