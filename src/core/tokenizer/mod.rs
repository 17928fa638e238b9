//! Lossless tokenization of source files.
//!
//! A [`TokenStream`] holds the tokens of one file. Concatenating the values
//! of an untouched stream reproduces the file byte-for-byte; strategies
//! rewrite a file by staging a new token sequence and swapping it in with
//! [`TokenStream::set_tokens`].

mod language;
mod lexer;

use std::path::{Path, PathBuf};

pub use language::Language;

use crate::core::error::{InjectError, InjectResult};

/// Semantic kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Whitespace, and text inserted by rewrites.
    Text,
    CommentSingle,
    CommentMultiline,
    Keyword,
    Name,
    StringDouble,
    StringSingle,
    StringBacktick,
    Number,
    Operator,
    Punctuation,
    /// Input no lexer rule recognized.
    Error,
}

impl TokenKind {
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            TokenKind::StringDouble | TokenKind::StringSingle | TokenKind::StringBacktick
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Text => "text",
            TokenKind::CommentSingle => "comment",
            TokenKind::CommentMultiline => "block-comment",
            TokenKind::Keyword => "keyword",
            TokenKind::Name => "name",
            TokenKind::StringDouble => "string-double",
            TokenKind::StringSingle => "string-single",
            TokenKind::StringBacktick => "string-backtick",
            TokenKind::Number => "number",
            TokenKind::Operator => "operator",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Error => "error",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(TokenKind::Text, value)
    }
}

/// Tokens of one source file.
#[derive(Debug, Clone)]
pub struct TokenStream {
    pub file_path: PathBuf,
    pub language: Language,
    tokens: Vec<Token>,
    changed: bool,
}

impl TokenStream {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Replace the whole token sequence and mark the stream as changed.
    pub fn set_tokens(&mut self, tokens: Vec<Token>) {
        self.tokens = tokens;
        self.changed = true;
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Rebuild the file text from the token values.
    pub fn concat(&self) -> String {
        let len = self.tokens.iter().map(|t| t.value.len()).sum();
        let mut out = String::with_capacity(len);
        for token in &self.tokens {
            out.push_str(&token.value);
        }
        out
    }

    /// Where the token at `index` starts, and the full text of that line.
    pub fn position_of(&self, index: usize) -> SourcePosition {
        let before: String = self.tokens[..index.min(self.tokens.len())]
            .iter()
            .map(|t| t.value.as_str())
            .collect();
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let head = &before[line_start..];

        let mut line_text = head.to_string();
        for token in &self.tokens[index.min(self.tokens.len())..] {
            match token.value.find('\n') {
                Some(end) => {
                    line_text.push_str(&token.value[..end]);
                    break;
                }
                None => line_text.push_str(&token.value),
            }
        }

        SourcePosition {
            line: before.matches('\n').count() + 1,
            col: head.chars().count() + 1,
            line_text: line_text.trim_end_matches('\r').to_string(),
        }
    }
}

/// 1-based location of a token in its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: usize,
    pub col: usize,
    pub line_text: String,
}

/// Tokenize `content` read from `file_path`.
///
/// The analyzer is chosen from the extension, falling back to sniffing the
/// content. Never touches the disk.
pub fn tokenize(file_path: &Path, content: &str) -> InjectResult<TokenStream> {
    let language =
        Language::detect(file_path, content).ok_or_else(|| InjectError::Tokenization {
            path: file_path.to_path_buf(),
            reason: "no lexer available for this file".to_string(),
        })?;

    let tokens = lexer::lex(language, content).map_err(|reason| InjectError::Tokenization {
        path: file_path.to_path_buf(),
        reason,
    })?;

    tracing::trace!(
        file = %file_path.display(),
        lexer = language.name(),
        tokens = tokens.len(),
        "tokenized"
    );

    Ok(TokenStream {
        file_path: file_path.to_path_buf(),
        language,
        tokens,
        changed: false,
    })
}
