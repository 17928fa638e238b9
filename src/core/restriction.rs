//! Positional rules that decide whether a string literal is a key usage.
//!
//! A [`Restriction`] looks at the token at a fixed offset from a candidate
//! string token and checks its kind and value. A [`RestrictionSet`] groups
//! restrictions that must all hold (AND); alternatives attached with
//! [`Restriction::or`] are tried when the restriction itself fails (OR).
//!
//! ```
//! use skiver::core::restriction::Restriction;
//! use skiver::core::tokenizer::{Token, TokenKind};
//!
//! let tokens = vec![
//!     Token::new(TokenKind::Name, "t"),
//!     Token::new(TokenKind::Punctuation, "("),
//!     Token::new(TokenKind::StringDouble, "\"a.b\""),
//! ];
//! let open_paren = Restriction::at(-1)
//!     .kinds(&[TokenKind::Punctuation])
//!     .values(&["("]);
//! assert!(open_paren.matches(2, &tokens));
//! ```

use std::fmt;

use crate::core::tokenizer::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restriction {
    /// Position relative to the candidate token; negative looks behind.
    pub offset: isize,
    pub allowed_kinds: Vec<TokenKind>,
    pub allowed_values: Vec<String>,
    /// Alternatives evaluated when this restriction does not match.
    pub alternatives: Vec<Restriction>,
}

impl Restriction {
    pub fn at(offset: isize) -> Self {
        Self {
            offset,
            allowed_kinds: Vec::new(),
            allowed_values: Vec::new(),
            alternatives: Vec::new(),
        }
    }

    pub fn kinds(mut self, kinds: &[TokenKind]) -> Self {
        self.allowed_kinds.extend_from_slice(kinds);
        self
    }

    pub fn values(mut self, values: &[&str]) -> Self {
        self.allowed_values
            .extend(values.iter().map(|v| v.to_string()));
        self
    }

    pub fn or(mut self, alternative: Restriction) -> Self {
        self.alternatives.push(alternative);
        self
    }

    /// Check the token at `candidate + offset`.
    ///
    /// An offset outside the token slice never satisfies the restriction's
    /// own predicate; only its alternatives can still match.
    pub fn matches(&self, candidate: usize, tokens: &[Token]) -> bool {
        if let Some(token) = self.token_at(candidate, tokens)
            && self.own_match(token)
        {
            return true;
        }

        self.alternatives
            .iter()
            .any(|alt| alt.matches(candidate, tokens))
    }

    fn token_at<'a>(&self, candidate: usize, tokens: &'a [Token]) -> Option<&'a Token> {
        let index = candidate.checked_add_signed(self.offset)?;
        tokens.get(index)
    }

    fn own_match(&self, token: &Token) -> bool {
        let kind_match = if self.allowed_kinds.is_empty() {
            self.alternatives.is_empty()
        } else {
            self.allowed_kinds.contains(&token.kind)
        };
        if !kind_match {
            return false;
        }

        self.allowed_values.is_empty() || self.allowed_values.iter().any(|v| *v == token.value)
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token at {:+}", self.offset)?;
        if !self.allowed_kinds.is_empty() {
            let kinds: Vec<String> = self.allowed_kinds.iter().map(|k| k.to_string()).collect();
            write!(f, " of kind {}", kinds.join("|"))?;
        }
        if !self.allowed_values.is_empty() {
            let values: Vec<String> = self
                .allowed_values
                .iter()
                .map(|v| format!("{:?}", v))
                .collect();
            write!(f, " equal to {}", values.join("|"))?;
        }
        for alt in &self.alternatives {
            write!(f, ", or {}", alt)?;
        }
        Ok(())
    }
}

/// Restrictions that must all match for a call-site shape to be recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionSet {
    pub name: String,
    pub restrictions: Vec<Restriction>,
}

impl RestrictionSet {
    pub fn new(name: impl Into<String>, restrictions: Vec<Restriction>) -> Self {
        Self {
            name: name.into(),
            restrictions,
        }
    }

    pub fn matches(&self, candidate: usize, tokens: &[Token]) -> bool {
        self.first_failure(candidate, tokens).is_none()
    }

    /// The first restriction that does not match, if any.
    pub fn first_failure(&self, candidate: usize, tokens: &[Token]) -> Option<&Restriction> {
        self.restrictions
            .iter()
            .find(|r| !r.matches(candidate, tokens))
    }
}

/// Result of checking a candidate against every rule-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetMatch<'a> {
    /// Index of the first rule-set that matched.
    Matched(usize),
    /// No rule-set matched; the failing restriction of each set, in order.
    Mismatch(Vec<&'a Restriction>),
}

/// Try rule-sets in declaration order; the first full match wins.
pub fn match_sets<'a>(sets: &'a [RestrictionSet], candidate: usize, tokens: &[Token]) -> SetMatch<'a> {
    let mut failures = Vec::with_capacity(sets.len());
    for (index, set) in sets.iter().enumerate() {
        match set.first_failure(candidate, tokens) {
            None => {
                tracing::trace!(set = %set.name, candidate, "rule-set matched");
                return SetMatch::Matched(index);
            }
            Some(failed) => {
                tracing::trace!(set = %set.name, candidate, restriction = %failed, "rule-set did not match");
                failures.push(failed);
            }
        }
    }
    SetMatch::Mismatch(failures)
}

/// Call-site shapes recognized in TypeScript and JavaScript sources.
pub fn default_restriction_sets() -> Vec<RestrictionSet> {
    vec![
        // t("foo.bar")  t("foo.bar", opts)  t("foo.bar" as any)
        RestrictionSet::new(
            "translation-call",
            vec![
                Restriction::at(-2)
                    .kinds(&[TokenKind::Name])
                    .values(&["t", "tt"]),
                Restriction::at(-1)
                    .kinds(&[TokenKind::Punctuation])
                    .values(&["("]),
                Restriction::at(1)
                    .kinds(&[TokenKind::Punctuation])
                    .values(&[")", ","])
                    .or(Restriction::at(2)
                        .kinds(&[TokenKind::Keyword])
                        .values(&["as"])),
            ],
        ),
        // tKey: "foo.bar"
        RestrictionSet::new(
            "key-property",
            vec![
                Restriction::at(-3)
                    .kinds(&[TokenKind::Name])
                    .values(&["tKey"]),
                Restriction::at(-2)
                    .kinds(&[TokenKind::Operator])
                    .values(&[":"]),
                Restriction::at(-1).kinds(&[TokenKind::Text]).values(&[" "]),
            ],
        ),
    ]
}
