use logos::Logos;

use super::{Language, Token, TokenKind};

/// Raw tokens produced by logos for JavaScript-family sources.
///
/// Whitespace is a token, not skipped, so every byte of the input ends up in
/// exactly one token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \t\r\n\x0C]+")]
    Whitespace,
    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,
    #[regex(r#""([^"\\\n]|\\[\s\S])*""#)]
    DoubleQuoted,
    #[regex(r"'([^'\\\n]|\\[\s\S])*'")]
    SingleQuoted,
    #[regex(r"`([^`\\]|\\[\s\S])*`")]
    Backtick,
    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?n?")]
    #[regex(r"0[xXoObB][0-9a-fA-F_]+n?")]
    Number,
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Word,
    #[regex(r"=>|\.\.\.|\?\?=?|\?\.|\?|:|&&=?|\|\|=?|\+\+|--|~|===?|!==?|=|(<<|>>>?|[-<>+*%&|^/!])=?")]
    Operator,
    #[regex(r"[{}()\[\];,.#@\\]")]
    Punctuation,
}

impl RawToken {
    fn kind(self, language: Language, slice: &str) -> TokenKind {
        match self {
            RawToken::Whitespace => TokenKind::Text,
            RawToken::LineComment => TokenKind::CommentSingle,
            RawToken::BlockComment => TokenKind::CommentMultiline,
            RawToken::DoubleQuoted => TokenKind::StringDouble,
            RawToken::SingleQuoted => TokenKind::StringSingle,
            RawToken::Backtick => TokenKind::StringBacktick,
            RawToken::Number => TokenKind::Number,
            RawToken::Word if language.is_keyword(slice) => TokenKind::Keyword,
            RawToken::Word => TokenKind::Name,
            RawToken::Operator => TokenKind::Operator,
            RawToken::Punctuation => TokenKind::Punctuation,
        }
    }
}

/// Lex `source` into a lossless token sequence.
///
/// Unrecognized input is emitted one character at a time as
/// [`TokenKind::Error`] and lexing resumes right after it, so a stray quote
/// in JSX text does not swallow the rest of the line. The only hard failure
/// is a template literal that never closes.
pub(super) fn lex(language: Language, source: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut base = 0;

    'restart: while base < source.len() {
        let rest = &source[base..];
        let mut lexer = RawToken::lexer(rest);

        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let slice = &rest[span.clone()];

            match result {
                Ok(raw) => tokens.push(Token::new(raw.kind(language, slice), slice)),
                Err(()) => {
                    if slice.starts_with('`') {
                        let line = source[..base + span.start].matches('\n').count() + 1;
                        return Err(format!("unterminated template literal on line {}", line));
                    }
                    let Some(ch) = rest[span.start..].chars().next() else {
                        break 'restart;
                    };
                    let end = span.start + ch.len_utf8();
                    tokens.push(Token::new(TokenKind::Error, &rest[span.start..end]));
                    base += end;
                    continue 'restart;
                }
            }
        }

        break;
    }

    Ok(merge_error_runs(tokens))
}

/// Collapse consecutive single-character error tokens into one token.
fn merge_error_runs(tokens: Vec<Token>) -> Vec<Token> {
    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.kind == TokenKind::Error
            && let Some(last) = merged.last_mut()
            && last.kind == TokenKind::Error
        {
            last.value.push_str(&token.value);
            continue;
        }
        merged.push(token);
    }
    merged
}
