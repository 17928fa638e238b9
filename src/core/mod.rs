//! Core injection engine.
//!
//! ## Pipeline
//!
//! 1. **Load**: `parsers::json` flattens the locale files into a
//!    [`TranslationKeyMap`]
//! 2. **Discover**: `file_scanner` walks the root for source files
//! 3. **Rewrite**: `injector` tokenizes each file and hands the stream to the
//!    strategy picked from `inject::InjectMode`; `restriction` decides which
//!    literals are key usages in identifier mode
//! 4. **Persist**: changed files are written atomically and optionally passed
//!    to the `formatter` hook
//!
//! `generate` renders the identifier module that identifier mode imports.

pub mod context;
pub mod error;
pub mod file_scanner;
pub mod formatter;
pub mod generate;
pub mod inject;
pub mod injector;
pub mod key_map;
pub mod parsers;
pub mod restriction;
pub mod tokenizer;

pub use context::{DiagnosticSink, RunContext};
pub use error::{InjectError, InjectResult};
pub use inject::InjectMode;
pub use injector::{FileChange, InjectSummary, inject_directory};
pub use key_map::{LocaleValues, TranslationKeyMap};
