//! Report formatting and printing utilities.
//!
//! Diagnostics are printed cargo-style, followed by the per-file change list
//! and a one-line summary. Kept out of `core` so skiver can be used as a
//! library without any terminal output.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::core::{FileChange, InjectSummary, parsers::json::MessageScanWarning};
use crate::issues::{Diagnostic, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print the whole result of an inject run to stdout.
pub fn print_inject(summary: &InjectSummary) {
    print_inject_to(summary, &mut io::stdout().lock());
}

pub fn print_inject_to<W: Write>(summary: &InjectSummary, writer: &mut W) {
    report_to(&summary.diagnostics, writer);
    print_changes_to(&summary.changes, summary.dry_run, writer);
    print_summary_to(summary, writer);
}

/// Print diagnostics in cargo-style format.
///
/// Diagnostics are expected in [`DiagnosticSink::into_sorted`] order.
///
/// [`DiagnosticSink::into_sorted`]: crate::core::DiagnosticSink::into_sorted
pub fn report_to<W: Write>(diagnostics: &[Diagnostic], writer: &mut W) {
    let max_line_width = calculate_max_line_width(diagnostics);
    for diagnostic in diagnostics {
        print_diagnostic(diagnostic, writer, max_line_width);
    }
}

/// One line per rewritten file.
pub fn print_changes_to<W: Write>(changes: &[FileChange], dry_run: bool, writer: &mut W) {
    let verb = if dry_run { "Would update" } else { "Updated" };
    for change in changes {
        let mut parts = vec![format!(
            "{} {}",
            change.replacements,
            if change.replacements == 1 {
                "replacement"
            } else {
                "replacements"
            }
        )];
        if change.import_added {
            parts.push("import added".to_string());
        }
        if change.formatted {
            parts.push("formatted".to_string());
        }
        let _ = writeln!(
            writer,
            "{:>12} {} ({})",
            verb.bold().green(),
            change.display_path,
            parts.join(", ")
        );
    }
}

pub fn print_summary_to<W: Write>(summary: &InjectSummary, writer: &mut W) {
    let files = |n: usize| if n == 1 { "file" } else { "files" };

    let changed = if summary.dry_run {
        format!(
            "{} {} would change",
            summary.files_changed,
            files(summary.files_changed)
        )
    } else {
        format!(
            "{} {} changed",
            summary.files_changed,
            files(summary.files_changed)
        )
    };
    let body = format!(
        "Scanned {} {}, {}, {} {}",
        summary.files_scanned,
        files(summary.files_scanned),
        changed,
        summary.warnings,
        if summary.warnings == 1 {
            "warning"
        } else {
            "warnings"
        }
    );

    if !summary.changes.is_empty() || !summary.diagnostics.is_empty() {
        let _ = writeln!(writer);
    }

    if summary.cancelled {
        let _ = writeln!(
            writer,
            "{} {} {}",
            FAILURE_MARK.red(),
            body.red(),
            "(interrupted)".bold().red()
        );
    } else if summary.warnings > 0 {
        let _ = writeln!(writer, "{} {}", FAILURE_MARK.yellow(), body.yellow());
    } else {
        let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), body.green());
    }

    if summary.dry_run && summary.files_changed > 0 {
        let _ = writeln!(
            writer,
            "{} dry run, no files were written",
            "note:".bold()
        );
    }
}

/// Warn about locale files that could not be loaded.
pub fn print_message_warnings(warnings: &[MessageScanWarning], verbose: bool) {
    print_message_warnings_to(warnings, verbose, &mut io::stderr().lock());
}

pub fn print_message_warnings_to<W: Write>(
    warnings: &[MessageScanWarning],
    verbose: bool,
    writer: &mut W,
) {
    if warnings.is_empty() {
        return;
    }
    if verbose {
        for warning in warnings {
            let _ = writeln!(
                writer,
                "{} {}: {}",
                "warning:".bold().yellow(),
                warning.file_path,
                warning.error
            );
        }
    } else {
        let _ = writeln!(
            writer,
            "{} {} locale file(s) could not be loaded (use {} for details)",
            "warning:".bold().yellow(),
            warnings.len(),
            "-v".cyan()
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_diagnostic<W: Write>(diagnostic: &Diagnostic, writer: &mut W, max_line_width: usize) {
    let severity = diagnostic.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        diagnostic.message(),
        diagnostic.report_rule().to_string().dimmed().cyan()
    );

    match diagnostic.location() {
        ReportLocation::Source {
            path,
            line,
            col,
            source_line,
        } => {
            let _ = writeln!(writer, "  {} {}:{}:{}", "-->".blue(), path, line, col);
            print_source_line(writer, severity, line, col, source_line, max_line_width);
        }
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
    }

    for detail in diagnostic.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            detail,
            width = max_line_width
        );
    }

    if let Some(hint) = diagnostic.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

fn print_source_line<W: Write>(
    writer: &mut W,
    severity: Severity,
    line: usize,
    col: usize,
    source_line: &str,
    max_line_width: usize,
) {
    let caret_char = match severity {
        Severity::Error => "^".red(),
        Severity::Warning => "^".yellow(),
    };

    let _ = writeln!(
        writer,
        "{:>width$} {}",
        "",
        "|".blue(),
        width = max_line_width
    );
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        line.to_string().blue(),
        "|".blue(),
        source_line,
        width = max_line_width
    );

    // col is 1-based and counts chars; pad by display width.
    let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        caret_char,
        width = max_line_width,
        padding = caret_padding
    );
}

fn calculate_max_line_width(diagnostics: &[Diagnostic]) -> usize {
    diagnostics
        .iter()
        .filter_map(|d| match d.location() {
            ReportLocation::Source { line, .. } => Some(line),
            ReportLocation::File { .. } => None,
        })
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}
