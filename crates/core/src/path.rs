//! Targets and key mapping
//!
//! Object keys always use `/` separators and are relative to the local root.
//! This module converts between local paths and keys and parses the
//! positional target given to each command.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Token selecting every item
pub const ALL_TOKEN: &str = ".";

/// Invalidation path covering the whole distribution
pub const INVALIDATE_ALL: &str = "/*";

/// What a command operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Every local file or every remote object
    All,
    /// A single key relative to the local root
    Key(String),
}

impl Target {
    /// Parse a command-line target
    ///
    /// `.` selects everything. Any other value is kept verbatim as the
    /// object key; see [`normalize_key`] for the forms used on local paths
    /// and CDN paths.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw == ALL_TOKEN {
            return Ok(Target::All);
        }
        if raw.is_empty() {
            return Err(Error::InvalidPath("target cannot be empty".into()));
        }
        Ok(Target::Key(raw.to_string()))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Target::All)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::All => f.write_str(ALL_TOKEN),
            Target::Key(key) => f.write_str(key),
        }
    }
}

/// A user-typed local path as a key: `/` separators, no leading `./`
pub fn normalize_key(raw: &str) -> String {
    let mut key = raw.replace('\\', "/");
    while let Some(rest) = key.strip_prefix("./") {
        key = rest.to_string();
    }
    key
}

/// Path of `local_path` relative to `local_root`, as an object key
pub fn to_remote_key(local_path: &Path, local_root: &Path) -> Result<String> {
    let relative = local_path.strip_prefix(local_root).map_err(|_| {
        Error::InvalidPath(format!(
            "{} is not under {}",
            local_path.display(),
            local_root.display()
        ))
    })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().replace('\\', "/")),
            Component::CurDir => {}
            _ => {
                return Err(Error::InvalidPath(format!(
                    "{} cannot be mapped to a key",
                    local_path.display()
                )));
            }
        }
    }

    if segments.is_empty() {
        return Err(Error::InvalidPath(format!(
            "{} is the local root itself",
            local_path.display()
        )));
    }
    Ok(segments.join("/"))
}

/// Local destination for `key` under `local_root`
///
/// Keys that would resolve outside the root are rejected.
pub fn to_local_path(key: &str, local_root: &Path) -> Result<PathBuf> {
    if key.is_empty() || key.starts_with('/') {
        return Err(Error::InvalidPath(format!("'{key}' is not a relative key")));
    }

    let mut path = local_root.to_path_buf();
    for segment in key.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(Error::InvalidPath(format!(
                    "'{key}' escapes the local root"
                )));
            }
            part => path.push(part),
        }
    }

    if path == local_root {
        return Err(Error::InvalidPath(format!("'{key}' names no file")));
    }
    Ok(path)
}

/// Create any missing parent directories of `path`
pub fn create_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Create the local root if it does not exist yet
pub fn ensure_local_root(local_root: &Path) -> Result<()> {
    if !local_root.exists() {
        tracing::debug!(root = %local_root.display(), "creating local root");
        std::fs::create_dir_all(local_root)?;
    }
    Ok(())
}

/// CDN path for a target, always starting with `/`
pub fn invalidation_path(target: &Target) -> String {
    match target {
        Target::All => INVALIDATE_ALL.to_string(),
        Target::Key(key) => format!("/{}", normalize_key(key).trim_start_matches('/')),
    }
}
