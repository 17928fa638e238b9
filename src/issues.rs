//! Diagnostics produced while injecting.
//!
//! Every diagnostic is a recoverable problem: the occurrence or file it
//! concerns was skipped and the run continued. Each one carries what the
//! reporter needs to print it in cargo style.

use std::path::Path;

use enum_dispatch::enum_dispatch;

use crate::core::tokenizer::Token;

// ============================================================
// Severity and Rule
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    RestrictionMismatch,
    TokenizeError,
    OnReplaceFailed,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::RestrictionMismatch => write!(f, "restriction-mismatch"),
            Rule::TokenizeError => write!(f, "tokenize-error"),
            Rule::OnReplaceFailed => write!(f, "on-replace-failed"),
        }
    }
}

// ============================================================
// Diagnostic Types
// ============================================================

/// A known key was found in a string literal, but no rule-set accepted its
/// surroundings, so the literal was left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionMismatchIssue {
    pub file_path: String,
    /// 1-based line of the literal.
    pub line: usize,
    /// 1-based column (in characters) of the literal.
    pub col: usize,
    pub source_line: String,
    pub key: String,
    /// Tokens around the literal (up to 8 before, 3 after).
    pub window: Vec<Token>,
    /// `(rule-set name, first failing restriction)` per rule-set.
    pub failures: Vec<(String, String)>,
}

impl RestrictionMismatchIssue {
    pub fn window_text(&self) -> String {
        self.window
            .iter()
            .map(|t| t.value.as_str())
            .collect::<String>()
            .replace('\n', "\u{21b5}")
    }
}

/// A file that was skipped because it could not be read or tokenized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizationIssue {
    pub file_path: String,
    pub error: String,
}

/// The on-replace command failed or timed out. The rewritten file is
/// already on disk, unformatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommandIssue {
    pub file_path: String,
    pub command: String,
    pub error: String,
    pub output: String,
}

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    RestrictionMismatch(RestrictionMismatchIssue),
    Tokenization(TokenizationIssue),
    ExternalCommand(ExternalCommandIssue),
}

impl Diagnostic {
    pub fn file_path(&self) -> &str {
        match self {
            Diagnostic::RestrictionMismatch(i) => &i.file_path,
            Diagnostic::Tokenization(i) => &i.file_path,
            Diagnostic::ExternalCommand(i) => &i.file_path,
        }
    }

    /// Rewrite an absolute file path under `root` to a root-relative one with
    /// forward slashes. Paths outside `root` are left alone.
    pub fn relativize(&mut self, root: &Path) {
        let file_path = match self {
            Diagnostic::RestrictionMismatch(i) => &mut i.file_path,
            Diagnostic::Tokenization(i) => &mut i.file_path,
            Diagnostic::ExternalCommand(i) => &mut i.file_path,
        };
        let relative = match Path::new(file_path.as_str()).strip_prefix(root) {
            Ok(relative) => relative.to_string_lossy().replace('\\', "/"),
            Err(_) => return,
        };
        *file_path = relative;
    }

    /// Stable order for reporting: by file, then line, then rule.
    pub fn sort_key(&self) -> (&str, usize, Rule) {
        let line = match self {
            Diagnostic::RestrictionMismatch(i) => i.line,
            _ => 0,
        };
        (self.file_path(), line, self.report_rule())
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
pub enum ReportLocation<'a> {
    /// A line in a source file, with the line text for context display.
    Source {
        path: &'a str,
        line: usize,
        col: usize,
        source_line: &'a str,
    },
    /// File-level only.
    File { path: &'a str },
}

/// Uniform view of a diagnostic for the reporter.
#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message (key, error, ...).
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity {
        Severity::Warning
    }

    fn report_rule(&self) -> Rule;

    fn hint(&self) -> Option<String> {
        None
    }

    /// Extra lines for `= note:` output.
    fn details(&self) -> Vec<String> {
        Vec::new()
    }
}

impl Report for RestrictionMismatchIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::Source {
            path: &self.file_path,
            line: self.line,
            col: self.col,
            source_line: &self.source_line,
        }
    }

    fn message(&self) -> String {
        self.key.clone()
    }

    fn report_rule(&self) -> Rule {
        Rule::RestrictionMismatch
    }

    fn hint(&self) -> Option<String> {
        Some("found key, but no call-site rule matched; the literal was left unchanged".to_string())
    }

    fn details(&self) -> Vec<String> {
        let mut lines = vec![format!("tokens: {}", self.window_text())];
        lines.extend(
            self.failures
                .iter()
                .map(|(set, restriction)| format!("{}: expected {}", set, restriction)),
        );
        lines
    }
}

impl Report for TokenizationIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_rule(&self) -> Rule {
        Rule::TokenizeError
    }

    fn hint(&self) -> Option<String> {
        Some("the file was skipped".to_string())
    }
}

impl Report for ExternalCommandIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }

    fn report_rule(&self) -> Rule {
        Rule::OnReplaceFailed
    }

    fn hint(&self) -> Option<String> {
        Some(format!(
            "the file was written but '{}' did not complete",
            self.command
        ))
    }

    fn details(&self) -> Vec<String> {
        self.output
            .lines()
            .filter(|l| !l.trim().is_empty())
            .take(5)
            .map(|l| format!("output: {}", l))
            .collect()
    }
}
