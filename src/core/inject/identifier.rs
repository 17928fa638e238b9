use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use super::{Inject, InjectOutcome, import_path::relative_import_path};
use crate::{
    core::{
        context::DiagnosticSink,
        error::InjectResult,
        key_map::TranslationKeyMap,
        restriction::{Restriction, RestrictionSet, SetMatch, match_sets},
        tokenizer::{Token, TokenKind, TokenStream},
    },
    issues::RestrictionMismatchIssue,
};

const WINDOW_BEFORE: usize = 8;
const WINDOW_AFTER: usize = 3;

/// Replaces `t("foo.bar")` with `t(tKeys.foo.bar)` and imports the module.
///
/// Keys are emitted verbatim after the alias, so a key containing characters
/// that are not valid in a member chain (e.g. `-`) produces invalid code.
#[derive(Debug)]
pub struct IdentifierStrategy {
    key_map: Arc<TranslationKeyMap>,
    rule_sets: Vec<RestrictionSet>,
    alias: String,
    module_path: PathBuf,
}

impl IdentifierStrategy {
    pub fn new(
        key_map: Arc<TranslationKeyMap>,
        rule_sets: Vec<RestrictionSet>,
        alias: String,
        module_path: PathBuf,
    ) -> Self {
        Self {
            key_map,
            rule_sets,
            alias,
            module_path,
        }
    }

    pub fn module_path(&self) -> &Path {
        &self.module_path
    }

    fn mismatch(
        &self,
        stream: &TokenStream,
        index: usize,
        key: &str,
        failures: Vec<&Restriction>,
    ) -> RestrictionMismatchIssue {
        let tokens = stream.tokens();
        let position = stream.position_of(index);
        let start = index.saturating_sub(WINDOW_BEFORE);
        let end = (index + WINDOW_AFTER + 1).min(tokens.len());

        RestrictionMismatchIssue {
            file_path: stream.file_path.to_string_lossy().to_string(),
            line: position.line,
            col: position.col,
            source_line: position.line_text,
            key: key.to_string(),
            window: tokens[start..end].to_vec(),
            failures: self
                .rule_sets
                .iter()
                .zip(failures)
                .map(|(set, failed)| (set.name.clone(), failed.to_string()))
                .collect(),
        }
    }

    /// Whether the file already has `import <alias> ...`.
    fn imports_alias(&self, tokens: &[Token]) -> bool {
        let mut significant = tokens.iter().filter(|t| {
            !matches!(
                t.kind,
                TokenKind::Text | TokenKind::CommentSingle | TokenKind::CommentMultiline
            )
        });
        while let Some(token) = significant.next() {
            if token.kind == TokenKind::Keyword && token.value == "import" {
                if let Some(next) = significant.next()
                    && next.kind == TokenKind::Name
                    && next.value == self.alias
                {
                    return true;
                }
            }
        }
        false
    }
}

/// The literal's content without its delimiters.
pub fn strip_quotes(token: &Token) -> &str {
    let value = token.value.as_str();
    match token.kind {
        TokenKind::StringDouble => value.trim_matches('"'),
        TokenKind::StringSingle => value.trim_matches('\''),
        TokenKind::StringBacktick => value.trim_matches('`'),
        _ => value.trim_matches(|c| c == '"' || c == '\'' || c == '`'),
    }
}

impl Inject for IdentifierStrategy {
    fn inject(
        &self,
        stream: &mut TokenStream,
        sink: &DiagnosticSink,
    ) -> InjectResult<InjectOutcome> {
        let mut staged: Option<Vec<Token>> = None;
        let mut replacements = 0;

        {
            let tokens = stream.tokens();
            for (index, token) in tokens.iter().enumerate() {
                if !token.kind.is_string() {
                    continue;
                }
                let key = strip_quotes(token);
                if !self.key_map.contains_key(key) {
                    continue;
                }

                match match_sets(&self.rule_sets, index, tokens) {
                    SetMatch::Matched(set) => {
                        tracing::debug!(
                            file = %stream.file_path.display(),
                            key,
                            set = %self.rule_sets[set].name,
                            "replacing key literal"
                        );
                        let staged = staged.get_or_insert_with(|| tokens.to_vec());
                        staged[index] = Token::new(TokenKind::Name, format!("{}.{}", self.alias, key));
                        replacements += 1;
                    }
                    SetMatch::Mismatch(failures) => {
                        sink.push(self.mismatch(stream, index, key, failures));
                    }
                }
            }
        }

        let Some(mut staged) = staged else {
            return Ok(InjectOutcome::default());
        };

        let import_added = !self.imports_alias(&staged);
        if import_added {
            let specifier = relative_import_path(&stream.file_path, &self.module_path)?;
            staged.insert(
                0,
                Token::text(format!("import {} from \"{}\"\n", self.alias, specifier)),
            );
        }
        stream.set_tokens(staged);

        Ok(InjectOutcome {
            replacements,
            import_added,
        })
    }
}
