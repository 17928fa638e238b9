//! Injection strategies.
//!
//! Two closed variants, chosen once per run from [`InjectMode`]:
//!
//! - `comment`: annotates each key usage with a trailing
//!   `// skiver: (en) ...;` comment listing its locale values
//! - `identifier`: rewrites key literals at recognized call sites into
//!   member accesses on the generated identifier module, and imports it

pub mod comment;
pub mod identifier;
pub mod import_path;

use std::sync::Arc;

use clap::ValueEnum;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

pub use comment::CommentStrategy;
pub use identifier::IdentifierStrategy;

use crate::core::{
    context::{DiagnosticSink, RunContext},
    error::InjectResult,
    key_map::TranslationKeyMap,
    restriction::default_restriction_sets,
    tokenizer::TokenStream,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InjectMode {
    /// Append locale values as a trailing comment
    #[default]
    Comment,
    /// Replace key literals with identifier-module references
    #[value(alias = "tKeys")]
    #[serde(alias = "tKeys")]
    IdentifierReplacement,
}

impl std::fmt::Display for InjectMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InjectMode::Comment => write!(f, "comment"),
            InjectMode::IdentifierReplacement => write!(f, "identifier-replacement"),
        }
    }
}

/// What a strategy did to one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectOutcome {
    pub replacements: usize,
    pub import_added: bool,
}

#[enum_dispatch]
pub trait Inject {
    /// Rewrite `stream` in memory.
    ///
    /// Leaves the stream untouched (and unchanged) when nothing matched.
    /// Per-occurrence problems go to `sink`; an `Err` is fatal for the run.
    fn inject(&self, stream: &mut TokenStream, sink: &DiagnosticSink)
    -> InjectResult<InjectOutcome>;
}

#[enum_dispatch(Inject)]
#[derive(Debug)]
pub enum Strategy {
    Comment(CommentStrategy),
    Identifier(IdentifierStrategy),
}

impl Strategy {
    /// Build the strategy for `ctx.mode`.
    ///
    /// Both modes look for the identifier module under the root so it can be
    /// kept out of the scan. Only identifier mode needs it, so only there is a
    /// missing module an error, raised before any file is touched.
    pub fn for_context(ctx: &RunContext, key_map: Arc<TranslationKeyMap>) -> InjectResult<Self> {
        match ctx.mode {
            InjectMode::Comment => {
                let module_path =
                    import_path::find_identifier_module(&ctx.root, &ctx.identifier_module).ok();
                Ok(CommentStrategy::new(key_map)?
                    .protecting(module_path)
                    .into())
            }
            InjectMode::IdentifierReplacement => {
                let module_path =
                    import_path::find_identifier_module(&ctx.root, &ctx.identifier_module)?;
                tracing::debug!(module = %module_path.display(), "found identifier module");
                Ok(IdentifierStrategy::new(
                    key_map,
                    default_restriction_sets(),
                    ctx.identifier_alias.clone(),
                    module_path,
                )
                .into())
            }
        }
    }

    /// The identifier module file, which must never be rewritten itself.
    pub fn protected_path(&self) -> Option<&std::path::Path> {
        match self {
            Strategy::Comment(s) => s.module_path(),
            Strategy::Identifier(s) => Some(s.module_path()),
        }
    }
}
