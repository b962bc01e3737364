//! Directory traversal with the indexing candidate policy.

use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Extensions indexed when the caller does not supply a set.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "md", "txt", "py", "go", "js", "ts", "json", "yaml", "yml",
];

/// Directory names that are never descended into.
const SKIP_DIRS: &[&str] = &["node_modules", "__pycache__"];

/// Recursive walker yielding files eligible for indexing.
///
/// A file is a candidate when it is a regular file, its extension
/// (case-insensitive) is in the allowed set, and no component of its path
/// under the walk root is hidden or a skipped directory. Traversal order is
/// unspecified.
#[derive(Debug, Clone)]
pub struct FileWalker {
    extensions: HashSet<String>,
}

impl Default for FileWalker {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl FileWalker {
    /// Walker restricted to the given extensions (leading dots and case are
    /// normalized away).
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Lazily walk `root`, yielding candidate file paths.
    pub fn walk(&self, root: &Path) -> impl Iterator<Item = PathBuf> + '_ {
        // Hidden filtering comes from the walker itself; gitignore handling
        // is disabled because the candidate policy is extension-based only.
        WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(true)
            .filter_entry(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_none_or(|name| !SKIP_DIRS.contains(&name))
            })
            .build()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| entry.into_path())
            .filter(move |path| self.has_allowed_extension(path))
    }

    fn has_allowed_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.contains(&e.to_ascii_lowercase()))
    }
}
