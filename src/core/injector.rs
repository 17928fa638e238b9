//! The directory injector: discover files, run the strategy on each one in
//! parallel, and write back the ones that changed.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use rayon::prelude::*;
use tempfile::NamedTempFile;

use crate::{
    core::{
        context::RunContext,
        error::{InjectError, InjectResult},
        file_scanner::{IgnoreSet, scan_files},
        formatter::FormatterHook,
        inject::{Inject, Strategy},
        key_map::TranslationKeyMap,
        tokenizer::tokenize,
    },
    issues::{Diagnostic, ExternalCommandIssue, TokenizationIssue},
};

/// One file the run rewrote (or would rewrite, under dry-run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    /// Path relative to the run root, with forward slashes.
    pub display_path: String,
    pub replacements: usize,
    pub import_added: bool,
    pub formatted: bool,
}

/// Aggregate result of a run.
#[derive(Debug, Default)]
pub struct InjectSummary {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub replacements: usize,
    pub warnings: usize,
    pub dry_run: bool,
    /// The run was interrupted; files not yet started were left alone.
    pub cancelled: bool,
    pub changes: Vec<FileChange>,
    pub diagnostics: Vec<Diagnostic>,
}

struct Worker<'a> {
    ctx: &'a RunContext,
    strategy: &'a Strategy,
    formatter: Option<FormatterHook>,
}

impl Worker<'_> {
    /// `Ok(None)` for files that were skipped or did not change.
    fn process(&self, path: &Path) -> InjectResult<Option<FileChange>> {
        if self.ctx.is_cancelled() {
            return Ok(None);
        }
        let display_path = self.ctx.display_path(path);

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(source) => {
                self.skip(
                    &display_path,
                    InjectError::Read {
                        path: path.to_path_buf(),
                        source,
                    },
                );
                return Ok(None);
            }
        };

        let mut stream = match tokenize(path, &content) {
            Ok(stream) => stream,
            Err(e) => {
                self.skip(&display_path, e);
                return Ok(None);
            }
        };

        let outcome = self.strategy.inject(&mut stream, &self.ctx.sink)?;
        if !stream.is_changed() {
            tracing::trace!(file = %display_path, "no changes");
            return Ok(None);
        }

        let mut change = FileChange {
            path: path.to_path_buf(),
            display_path,
            replacements: outcome.replacements,
            import_added: outcome.import_added,
            formatted: false,
        };

        if self.ctx.dry_run {
            tracing::info!(
                file = %change.display_path,
                replacements = change.replacements,
                "would update file"
            );
            return Ok(Some(change));
        }

        write_atomic(path, &stream.concat())?;
        tracing::info!(
            file = %change.display_path,
            replacements = change.replacements,
            "updated file"
        );

        if let Some(formatter) = &self.formatter {
            match formatter.run(path) {
                Ok(()) => change.formatted = true,
                Err(e) => {
                    let output = match &e {
                        InjectError::ExternalCommand { output, .. } => output.clone(),
                        _ => String::new(),
                    };
                    self.ctx.sink.push(ExternalCommandIssue {
                        file_path: change.display_path.clone(),
                        command: formatter.command().to_string(),
                        error: e.to_string(),
                        output,
                    });
                }
            }
        }

        Ok(Some(change))
    }

    fn skip(&self, display_path: &str, error: InjectError) {
        self.ctx.sink.push(TokenizationIssue {
            file_path: display_path.to_string(),
            error: error.to_string(),
        });
    }
}

/// Run the strategy for `ctx.mode` over every matching file under the root.
///
/// Recoverable problems end up in [`InjectSummary::diagnostics`]. An `Err`
/// is fatal: configuration problems before any file is touched, or a failed
/// write (files already written stay written).
pub fn inject_directory(
    ctx: RunContext,
    key_map: Arc<TranslationKeyMap>,
) -> InjectResult<InjectSummary> {
    let strategy = Strategy::for_context(&ctx, key_map)?;

    let mut ignores = IgnoreSet::new(&ctx.root, &ctx.ignores)?;
    if let Some(module) = strategy.protected_path() {
        ignores.add_path(module);
    }

    let scan = scan_files(&ctx.root, &ctx.extensions, &ignores);
    tracing::info!(
        root = %ctx.root.display(),
        mode = %ctx.mode,
        files = scan.files.len(),
        dry_run = ctx.dry_run,
        "starting injection"
    );

    let worker = Worker {
        ctx: &ctx,
        strategy: &strategy,
        formatter: ctx
            .on_replace
            .as_deref()
            .and_then(|command| FormatterHook::new(command, ctx.formatter_timeout)),
    };

    let process_all = || -> InjectResult<Vec<FileChange>> {
        let results: Vec<Option<FileChange>> = scan
            .files
            .par_iter()
            .map(|path| worker.process(path))
            .collect::<InjectResult<_>>()?;
        Ok(results.into_iter().flatten().collect())
    };

    let mut changes = match rayon::ThreadPoolBuilder::new()
        .num_threads(ctx.jobs)
        .build()
    {
        Ok(pool) => pool.install(process_all)?,
        Err(e) => {
            tracing::warn!(error = %e, "falling back to the global thread pool");
            process_all()?
        }
    };

    let cancelled = ctx.is_cancelled();
    if cancelled {
        tracing::warn!("interrupted; remaining files were not processed");
    }

    changes.sort_by(|a, b| a.path.cmp(&b.path));

    let warnings = ctx.sink.warning_count();
    let dry_run = ctx.dry_run;
    drop(worker);
    let diagnostics = ctx.sink.into_sorted();

    Ok(InjectSummary {
        files_scanned: scan.files.len(),
        files_changed: changes.len(),
        replacements: changes.iter().map(|c| c.replacements).sum(),
        warnings,
        dry_run,
        cancelled,
        changes,
        diagnostics,
    })
}

/// Replace `path` with `content` through a temp file in the same directory,
/// so the file is never observed half-written.
pub fn write_atomic(path: &Path, content: &str) -> InjectResult<()> {
    let write_error = |source| InjectError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(content.as_bytes()).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;
    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_error)?;
    }
    tmp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}
