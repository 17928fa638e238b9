use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::core::error::{InjectError, InjectResult};

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Matching files, sorted.
    pub files: Vec<PathBuf>,
    /// Entries that could not be read during the walk.
    pub skipped_count: usize,
}

/// Ignore list split into literal path prefixes and glob patterns.
#[derive(Debug, Default)]
pub struct IgnoreSet {
    base_dir: PathBuf,
    literal_paths: Vec<PathBuf>,
    globs: Vec<Pattern>,
}

impl IgnoreSet {
    /// Literal entries are resolved against `base_dir`; absolute ones are
    /// kept as they are. Globs match either the full path or the path
    /// relative to `base_dir`.
    pub fn new(base_dir: &Path, patterns: &[String]) -> InjectResult<Self> {
        let mut set = Self {
            base_dir: base_dir.to_path_buf(),
            ..Self::default()
        };
        for p in patterns {
            if is_glob_pattern(p) {
                let pattern = Pattern::new(p).map_err(|e| InjectError::InvalidPattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })?;
                set.globs.push(pattern);
            } else {
                set.literal_paths.push(base_dir.join(p));
            }
        }
        Ok(set)
    }

    pub fn add_path(&mut self, path: impl Into<PathBuf>) {
        self.literal_paths.push(path.into());
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        if self
            .literal_paths
            .iter()
            .any(|ignore_path| path.starts_with(ignore_path))
        {
            return true;
        }
        // Globs may be written against the full path or relative to the base.
        let path_str = path.to_string_lossy();
        let relative = path
            .strip_prefix(&self.base_dir)
            .ok()
            .map(|p| p.to_string_lossy());
        self.globs.iter().any(|p| {
            p.matches(&path_str) || relative.as_deref().is_some_and(|r| p.matches(r))
        })
    }
}

/// Walk `base_dir` and collect files with one of `extensions` that are not
/// ignored.
pub fn scan_files(base_dir: &Path, extensions: &[String], ignores: &IgnoreSet) -> ScanResult {
    let mut files = Vec::new();
    let mut skipped_count = 0;

    for entry in WalkDir::new(base_dir) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                tracing::warn!(error = %e, "cannot access path");
                continue;
            }
        };
        let path = entry.path();

        if ignores.is_ignored(path) {
            continue;
        }

        if entry.file_type().is_file() && has_extension(path, extensions) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    tracing::debug!(
        root = %base_dir.display(),
        files = files.len(),
        skipped = skipped_count,
        "scanned source files"
    );

    ScanResult {
        files,
        skipped_count,
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|allowed| allowed.trim_start_matches('.') == ext)
        })
}
