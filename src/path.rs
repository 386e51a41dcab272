//! Path manipulation utilities for resource-locator
//!
//! Two kinds of paths flow through the pipeline:
//!
//! - **Physical paths** point at real files and directories. They are
//!   canonicalized with [`normalize`] so the cache never contains relative
//!   paths, symlinks or platform-specific prefixes.
//! - **Logical paths** are the names packages export their resources under.
//!   They always use `/` as the separator and are cleaned up with
//!   [`normalize_logical`].

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::{Path, PathBuf};

/// Canonicalize a filesystem path.
///
/// Resolves symlinks and relative components and returns an absolute path.
/// Fails with [`Error::PathResolution`] if the path does not exist.
pub fn normalize<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let canonical = fs::canonicalize(path).map_err(|e| Error::PathResolution {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(strip_verbatim_prefix(canonical))
}

#[cfg(windows)]
fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    // `\\?\C:\dir` -> `C:\dir`; UNC and device paths are left alone
    match path.to_str() {
        Some(s) if s.starts_with(r"\\?\") && s.as_bytes().get(5) == Some(&b':') => {
            PathBuf::from(&s[4..])
        }
        _ => path,
    }
}

#[cfg(not(windows))]
fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    path
}

/// Normalize a logical resource path.
///
/// Backslashes become `/`, repeated separators collapse and `.` segments
/// and trailing separators are dropped. A leading `/` is preserved.
///
/// Returns the reason as an error if the path is empty or contains `..`.
pub fn normalize_logical(path: &str) -> std::result::Result<String, &'static str> {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');

    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err("'..' segments are not allowed in logical paths"),
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return if absolute {
            Ok("/".to_string())
        } else {
            Err("logical path is empty")
        };
    }

    let joined = segments.join("/");
    Ok(if absolute {
        format!("/{}", joined)
    } else {
        joined
    })
}

/// Check whether `ancestor` equals `path` or is one of its parent segments.
///
/// Unlike a plain string prefix test, `/acme/blog` is not an ancestor of
/// `/acme/blogger`.
pub fn is_ancestor_or_self(ancestor: &str, path: &str) -> bool {
    if ancestor == path {
        return true;
    }
    if ancestor == "/" {
        return path.starts_with('/');
    }
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}

/// Append a relative segment to a logical path.
pub fn join_logical(base: &str, relative: &str) -> String {
    if base == "/" {
        format!("/{}", relative)
    } else {
        format!("{}/{}", base, relative)
    }
}

/// Render a relative filesystem path with `/` separators.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// `*` stays within one segment, `**` spans segments.
const SELECTOR_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled tag selector over logical paths
#[derive(Debug, Clone)]
pub struct Selector {
    pattern: Pattern,
}

impl Selector {
    /// Compile a glob selector; invalid globs fail with [`Error::Glob`]
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Pattern::new(pattern).map_err(Error::Glob)?;
        Ok(Self { pattern })
    }

    /// Check whether a logical path matches
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.matches_with(path, SELECTOR_OPTIONS)
    }
}
