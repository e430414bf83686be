//! Path safety for archive entries and stored media paths.
//!
//! Nothing read from an archive is joined onto a filesystem path without
//! passing through one of these functions first.

use std::path::{Component, Path, PathBuf};

use crate::error::BackupError;

fn is_absolute(value: &str) -> bool {
    value.starts_with(['/', '\\']) || Path::new(value).has_root() || {
        // Windows drive prefix such as `C:`.
        let bytes = value.as_bytes();
        bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
    }
}

fn segments(value: &str) -> Vec<&str> {
    value
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

/// Normalize a stored media path to a path relative to its `prefix`
/// directory (`"full"` or `"thumbs"`).
///
/// Returns `None` for absolute paths, paths with a `..` segment, and paths
/// with nothing left after the prefix is stripped.
#[must_use]
pub fn normalize_media_subpath(value: &str, prefix: &str) -> Option<PathBuf> {
    if value.is_empty() || is_absolute(value) {
        return None;
    }

    let parts = segments(value);
    if parts.contains(&"..") {
        return None;
    }

    let rest = match parts.iter().position(|p| *p == prefix) {
        Some(idx) => &parts[idx + 1..],
        None => &parts[..],
    };
    if rest.is_empty() {
        return None;
    }

    Some(rest.iter().collect())
}

/// Validate an archive entry name and return it as a relative path.
///
/// # Errors
///
/// Returns `BackupError::UnsafePath` if the name is absolute or contains a
/// parent-directory segment.
pub fn safe_entry_path(name: &str) -> Result<PathBuf, BackupError> {
    if is_absolute(name) {
        return Err(BackupError::UnsafePath(name.to_string()));
    }
    let parts = segments(name);
    if parts.contains(&"..") {
        return Err(BackupError::UnsafePath(name.to_string()));
    }

    let path: PathBuf = parts.iter().collect();
    // Catch anything the separator split did not normalize.
    if path
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(BackupError::UnsafePath(name.to_string()));
    }
    Ok(path)
}
