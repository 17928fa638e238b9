//! Skiver - translation key injector for JS/TS projects
//!
//! Skiver reads a project's locale message files and rewrites the source tree
//! so that translation keys are easier to work with: either by annotating
//! each line that uses a key with the translated values, or by replacing the
//! quoted key literals with references into a generated identifier module.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Tokenizer, restriction engine, strategies and the directory injector
//! - `issues`: Diagnostic type definitions and reporting

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
