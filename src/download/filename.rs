//! Output filename selection and path resolution for downloads.
//!
//! Priority: explicit name from the caller, then the basename of the
//! server-suggested name, then `download_<id>`.

use std::path::{Path, PathBuf};

/// Filename used when neither the caller nor the server supplies one.
#[must_use]
pub fn default_filename(identifier: &str) -> String {
    format!("download_{identifier}")
}

/// Reduces a server-suggested name to its last path component.
///
/// Both `/` and `\` count as separators regardless of platform. Returns
/// `None` when nothing usable is left (empty, `.`, `..`).
#[must_use]
pub fn safe_basename(name: &str) -> Option<&str> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    match base {
        "" | "." | ".." => None,
        other => Some(other),
    }
}

/// Picks the filename to save under.
#[must_use]
pub fn resolve_output_filename(
    explicit: Option<&str>,
    suggested: Option<&str>,
    identifier: &str,
) -> String {
    if let Some(explicit) = explicit.filter(|name| !name.is_empty()) {
        return explicit.to_string();
    }
    suggested
        .and_then(safe_basename)
        .map_or_else(|| default_filename(identifier), str::to_string)
}

/// Joins the output directory (current directory when absent) and filename.
///
/// An absolute explicit filename replaces the directory, as `Path::join` does.
#[must_use]
pub fn resolve_output_path(output_dir: Option<&Path>, filename: &str) -> PathBuf {
    output_dir.unwrap_or_else(|| Path::new(".")).join(filename)
}
