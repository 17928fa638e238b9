//! Typed errors raised by the injection pipeline.
//!
//! Errors fall into two classes: fatal ones stop the run (configuration
//! problems and failed writes), recoverable ones are turned into
//! diagnostics and the run continues with the next file.

use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("Source directory '{}' does not exist", path.display())]
    RootNotFound { path: PathBuf },

    #[error("'{}' is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error(
        "Failed to find the {name} file under '{}'.\n\
         Hint: generate it first with 'skiver generate --path src/{name}'",
        root.display()
    )]
    IdentifierModuleNotFound { name: String, root: PathBuf },

    #[error("Invalid ignore pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to compute import path from '{}' to '{}'", from.display(), to.display())]
    ImportPath { from: PathBuf, to: PathBuf },

    #[error("Failed to tokenize '{}': {reason}", path.display())]
    Tokenization { path: PathBuf, reason: String },

    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Command '{command}' failed on '{}': {reason}", path.display())]
    ExternalCommand {
        command: String,
        path: PathBuf,
        reason: String,
        output: String,
    },

    #[error("Command '{command}' timed out after {}s on '{}'", timeout.as_secs_f32(), path.display())]
    Timeout {
        command: String,
        path: PathBuf,
        timeout: Duration,
    },
}

impl InjectError {
    /// Whether the error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        match self {
            InjectError::RootNotFound { .. }
            | InjectError::NotADirectory { .. }
            | InjectError::IdentifierModuleNotFound { .. }
            | InjectError::InvalidPattern { .. }
            | InjectError::ImportPath { .. }
            | InjectError::Write { .. } => true,
            InjectError::Tokenization { .. }
            | InjectError::Read { .. }
            | InjectError::ExternalCommand { .. }
            | InjectError::Timeout { .. } => false,
        }
    }
}

pub type InjectResult<T> = Result<T, InjectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let write = InjectError::Write {
            path: PathBuf::from("a.ts"),
            source: io::Error::other("disk full"),
        };
        assert!(write.is_fatal());

        let tokenize = InjectError::Tokenization {
            path: PathBuf::from("a.ts"),
            reason: "unterminated template literal".to_string(),
        };
        assert!(!tokenize.is_fatal());

        let timeout = InjectError::Timeout {
            command: "prettier".to_string(),
            path: PathBuf::from("a.ts"),
            timeout: Duration::from_secs(1),
        };
        assert!(!timeout.is_fatal());
    }

    #[test]
    fn test_module_not_found_message_has_hint() {
        let err = InjectError::IdentifierModuleNotFound {
            name: "tKeys.ts".to_string(),
            root: PathBuf::from("src"),
        };
        let msg = err.to_string();
        assert!(msg.contains("tKeys.ts"));
        assert!(msg.contains("skiver generate"));
    }
}
