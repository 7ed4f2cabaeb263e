//! Finding the directory a python project lives in

use anyhow::Context;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Files or directories whose presence makes a directory a project root, checked in this order
pub const PROJECT_MARKERS: &[&str] = &[
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "project.ini",
    ".git",
    ".hg",
];

/// Walks up from `start` to the first directory containing one of [PROJECT_MARKERS].
///
/// Falls back to the home directory if no ancestor has a marker, and to `start` if there is no
/// home directory either. Never fails.
pub fn find_project_root(start: &Path) -> PathBuf {
    find_root_with_markers(start, PROJECT_MARKERS)
        .or_else(|| {
            debug!(
                "No project marker above {}, using the home directory",
                start.display()
            );
            dirs::home_dir()
        })
        .unwrap_or_else(|| start.to_path_buf())
}

/// `PROJECT_DIR` if set and not empty, otherwise the project root above the current directory
pub fn discover_project_root() -> anyhow::Result<PathBuf> {
    if let Some(project_dir) = env::var_os("PROJECT_DIR").filter(|dir| !dir.is_empty()) {
        debug!("Using PROJECT_DIR {}", Path::new(&project_dir).display());
        return Ok(PathBuf::from(project_dir));
    }
    let current_dir = env::current_dir().context("Couldn't get current directory ಠ_ಠ")?;
    Ok(find_project_root(&current_dir))
}

/// The first of `start` and its ancestors that contains any of `markers`. The walk stops at the
/// filesystem root, where the parent of a directory is the directory itself.
fn find_root_with_markers(start: &Path, markers: &[&str]) -> Option<PathBuf> {
    let start = if start.is_relative() {
        env::current_dir().ok()?.join(start)
    } else {
        start.to_path_buf()
    };
    for ancestor in start.ancestors() {
        if let Some(marker) = markers.iter().find(|marker| ancestor.join(marker).exists()) {
            debug!("Found {} in {}", marker, ancestor.display());
            return Some(ancestor.to_path_buf());
        }
    }
    None
}
