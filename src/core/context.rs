use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use crate::{
    core::{
        error::{InjectError, InjectResult},
        inject::InjectMode,
    },
    issues::{Diagnostic, Report},
};

/// Thread-safe collector for diagnostics raised by worker threads.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    /// File paths under this directory are stored relative to it.
    root: Option<PathBuf>,
    diagnostics: Mutex<Vec<Diagnostic>>,
    warnings: AtomicUsize,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::default()
        }
    }

    pub fn push(&self, diagnostic: impl Into<Diagnostic>) {
        let mut diagnostic = diagnostic.into();
        if let Some(root) = &self.root {
            diagnostic.relativize(root);
        }
        tracing::warn!(
            file = diagnostic.file_path(),
            rule = %diagnostic.report_rule(),
            "{}",
            diagnostic.message()
        );
        self.warnings.fetch_add(1, Ordering::Relaxed);
        // Poisoning leaves the vector intact.
        let mut guard = self
            .diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.push(diagnostic);
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }

    /// All collected diagnostics, sorted by file and line.
    pub fn into_sorted(self) -> Vec<Diagnostic> {
        let mut diagnostics = self
            .diagnostics
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        diagnostics
    }
}

/// Everything one injection run needs, passed explicitly to each component.
#[derive(Debug)]
pub struct RunContext {
    pub root: PathBuf,
    pub mode: InjectMode,
    pub dry_run: bool,
    pub extensions: Vec<String>,
    /// Glob patterns or literal paths (relative to `root`) to skip.
    pub ignores: Vec<String>,
    pub on_replace: Option<String>,
    pub formatter_timeout: Duration,
    /// Worker bound; 0 lets rayon decide.
    pub jobs: usize,
    /// File name of the identifier module, searched for under `root`.
    pub identifier_module: String,
    /// Name the identifier module is imported as.
    pub identifier_alias: String,
    pub sink: DiagnosticSink,
    pub cancel: Arc<AtomicBool>,
}

impl RunContext {
    /// Create a context for `root` with default settings.
    ///
    /// Fails if `root` is missing or not a directory.
    pub fn new(root: impl AsRef<Path>, mode: InjectMode) -> InjectResult<Self> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(InjectError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(InjectError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            mode,
            dry_run: false,
            extensions: vec!["ts".to_string(), "tsx".to_string()],
            ignores: vec!["**/node_modules/**".to_string()],
            on_replace: None,
            formatter_timeout: Duration::from_secs(30),
            jobs: 0,
            identifier_module: "tKeys.ts".to_string(),
            identifier_alias: "tKeys".to_string(),
            sink: DiagnosticSink::for_root(root),
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Path relative to the root, for display.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::issues::TokenizationIssue;

    #[test]
    fn test_new_rejects_missing_root() {
        let dir = tempdir().unwrap();
        let err = RunContext::new(dir.path().join("missing"), InjectMode::Comment).unwrap_err();
        assert!(matches!(err, InjectError::RootNotFound { .. }));
    }

    #[test]
    fn test_new_rejects_file_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.ts");
        std::fs::write(&file, "").unwrap();
        let err = RunContext::new(&file, InjectMode::Comment).unwrap_err();
        assert!(matches!(err, InjectError::NotADirectory { .. }));
    }

    #[test]
    fn test_display_path() {
        let dir = tempdir().unwrap();
        let ctx = RunContext::new(dir.path(), InjectMode::Comment).unwrap();
        assert_eq!(
            ctx.display_path(&dir.path().join("src").join("a.ts")),
            "src/a.ts"
        );
    }

    #[test]
    fn test_sink_relativizes_paths() {
        let dir = tempdir().unwrap();
        let ctx = RunContext::new(dir.path(), InjectMode::Comment).unwrap();
        ctx.sink.push(TokenizationIssue {
            file_path: dir.path().join("src").join("a.ts").to_string_lossy().to_string(),
            error: "boom".to_string(),
        });
        ctx.sink.push(TokenizationIssue {
            file_path: "/elsewhere/b.ts".to_string(),
            error: "boom".to_string(),
        });

        let files: Vec<String> = ctx
            .sink
            .into_sorted()
            .iter()
            .map(|d| d.file_path().to_string())
            .collect();
        assert_eq!(files, vec!["/elsewhere/b.ts", "src/a.ts"]);
    }

    #[test]
    fn test_sink_collects_from_threads() {
        let sink = Arc::new(DiagnosticSink::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    sink.push(Diagnostic::Tokenization(TokenizationIssue {
                        file_path: format!("{}.ts", i),
                        error: "boom".to_string(),
                    }));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(sink.warning_count(), 4);
        let sink = Arc::try_unwrap(sink).unwrap();
        let files: Vec<String> = sink
            .into_sorted()
            .iter()
            .map(|d| d.file_path().to_string())
            .collect();
        assert_eq!(files, vec!["0.ts", "1.ts", "2.ts", "3.ts"]);
    }
}
