use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use regex::{Captures, Regex, RegexBuilder};

use super::{Inject, InjectOutcome};
use crate::core::{
    context::DiagnosticSink,
    error::{InjectError, InjectResult},
    key_map::{LocaleValues, TranslationKeyMap},
    tokenizer::{Token, TokenStream},
};

/// Marker that starts every annotation.
pub const ANNOTATION_MARKER: &str = "// skiver: ";

/// Appends `// skiver: (en) Hello; (no) Hei;` after each line that uses a key.
#[derive(Debug)]
pub struct CommentStrategy {
    key_map: Arc<TranslationKeyMap>,
    /// `None` when there are no keys to look for.
    pattern: Option<Regex>,
    module_path: Option<PathBuf>,
}

impl CommentStrategy {
    pub fn new(key_map: Arc<TranslationKeyMap>) -> InjectResult<Self> {
        let pattern = if key_map.is_empty() {
            None
        } else {
            Some(build_pattern(&key_map)?)
        };
        Ok(Self {
            key_map,
            pattern,
            module_path: None,
        })
    }

    /// Remember the identifier module so the injector can skip it. Its
    /// values are key literals and would all be annotated otherwise.
    pub fn protecting(mut self, module_path: Option<PathBuf>) -> Self {
        self.module_path = module_path;
        self
    }

    pub fn module_path(&self) -> Option<&Path> {
        self.module_path.as_deref()
    }

    fn rewrite_line(&self, caps: &Captures<'_>) -> Option<String> {
        let prefix = &caps[1];
        let key = &caps[2];
        let suffix = &caps[3];
        let rest = &caps[4];
        let eol = &caps[5];

        if prefix.trim_start().starts_with("//") {
            return None;
        }

        let (rest, previous) = match rest.find(ANNOTATION_MARKER) {
            Some(at) => (
                &rest[..at],
                Some(rest[at + ANNOTATION_MARKER.len()..].trim_end()),
            ),
            None => (rest, None),
        };

        let Some(values) = self.key_map.get(key) else {
            unreachable!("pattern matched {key:?}, which is not in the key map");
        };
        let annotation = render_annotation(values)?;
        if previous == Some(annotation.as_str()) {
            return None;
        }

        let mut line = format!("{}{}{}", prefix, key, suffix);
        if rest.trim() == "," {
            line.push_str(", ");
        } else if !line.ends_with(char::is_whitespace) {
            line.push(' ');
        }
        line.push_str(ANNOTATION_MARKER);
        line.push_str(&annotation);
        if rest.trim() != "," && !rest.trim().is_empty() {
            line.push_str(eol);
            line.push('\n');
            line.push_str(rest);
        }
        line.push_str(eol);
        Some(line)
    }
}

/// `(en) Hello; (no) Hei;` for the non-empty values, or `None` if there are
/// none.
pub fn render_annotation(values: &LocaleValues) -> Option<String> {
    let mut annotation = String::new();
    for (locale, value) in values {
        if value.is_empty() {
            continue;
        }
        annotation.push_str(&format!("({}) {}; ", locale, value));
    }
    if annotation.is_empty() {
        return None;
    }

    let mut annotation = annotation.replace("\r\n", " ").replace('\n', " ");
    if annotation.ends_with(' ') {
        annotation.pop();
    }
    Some(annotation)
}

/// `prefix-with-quote | key | closing-quote brackets ; spaces | rest | eol`
fn build_pattern(key_map: &TranslationKeyMap) -> InjectResult<Regex> {
    let keys: Vec<String> = key_map.keys().map(regex::escape).collect();
    let source = format!(
        r#"(?m)^([^\r\n]*?["'`])({})(["'`][)\]}}]*;?[ \t]*)([^\r\n]*)(\r?)$"#,
        keys.join("|")
    );
    RegexBuilder::new(&source)
        .size_limit(256 * (1 << 20))
        .build()
        .map_err(|e| InjectError::InvalidPattern {
            pattern: "<translation keys>".to_string(),
            reason: e.to_string(),
        })
}

impl Inject for CommentStrategy {
    fn inject(
        &self,
        stream: &mut TokenStream,
        _sink: &DiagnosticSink,
    ) -> InjectResult<InjectOutcome> {
        let Some(pattern) = &self.pattern else {
            return Ok(InjectOutcome::default());
        };

        let mut text = stream.concat();
        let mut replacements = 0;
        // A remainder moved to its own line may hold more keys. Each pass
        // only splits lines, so this settles.
        loop {
            let mut pass = 0;
            let rewritten = pattern.replace_all(&text, |caps: &Captures<'_>| {
                match self.rewrite_line(caps) {
                    Some(line) => {
                        pass += 1;
                        line
                    }
                    None => caps[0].to_string(),
                }
            });
            if pass == 0 {
                break;
            }
            replacements += pass;
            text = rewritten.into_owned();
        }

        if replacements == 0 {
            return Ok(InjectOutcome::default());
        }

        tracing::debug!(
            file = %stream.file_path.display(),
            replacements,
            "annotated key usages"
        );
        stream.set_tokens(vec![Token::text(text)]);

        Ok(InjectOutcome {
            replacements,
            import_added: false,
        })
    }
}
