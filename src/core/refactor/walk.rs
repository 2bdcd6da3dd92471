//! Candidate file discovery: a sorted recursive walk filtered by suffix.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Which files the walker yields.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Recognized file suffixes, without the leading dot (`ts`, `tsx`).
    pub extensions: Vec<String>,
    /// Directory names skipped at any depth.
    pub skip_dirs: Vec<String>,
}

impl WalkOptions {
    pub fn new(extensions: Vec<String>, skip_dirs: Vec<String>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|e| e.trim().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            extensions,
            skip_dirs,
        }
    }

    fn matches(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| {
            file_name.len() > ext.len() + 1
                && file_name.ends_with(ext.as_str())
                && file_name.as_bytes()[file_name.len() - ext.len() - 1] == b'.'
        })
    }

    fn skips(&self, dir_name: &str) -> bool {
        self.skip_dirs.iter().any(|d| d == dir_name)
    }
}

/// Recursively collect candidate files under `root`, sorted by name within
/// each directory. Symlinked directories are not followed.
///
/// Any directory that cannot be listed aborts the walk.
pub fn walk_files(root: &Path, options: &WalkOptions) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(Error::validation_invalid_argument(
            "root",
            format!("Directory not found: {}", root.display()),
        ));
    }
    if !root.is_dir() {
        return Err(Error::validation_invalid_argument(
            "root",
            format!("Not a directory: {}", root.display()),
        ));
    }

    let mut files = Vec::new();
    walk_recursive(root, options, &mut files)?;
    Ok(files)
}

fn walk_recursive(dir: &Path, options: &WalkOptions, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("list {}", dir.display())))
    })?;

    let mut entries = entries.collect::<std::io::Result<Vec<_>>>().map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("list {}", dir.display())))
    })?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        let file_type = entry.file_type().map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("stat {}", path.display())))
        })?;

        if file_type.is_dir() {
            if options.skips(&name) {
                continue;
            }
            walk_recursive(&path, options, files)?;
        } else if path.is_file() && options.matches(&name) {
            // Symlinked files are included; writes resolve to the target.
            files.push(path);
        }
    }

    Ok(())
}
