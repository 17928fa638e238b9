use std::path::Path;

/// Source languages the tokenizer has an analyzer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    TypeScript,
    JavaScript,
}

const JS_KEYWORDS: &[&str] = &[
    "async",
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "from",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "let",
    "new",
    "null",
    "of",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

const TS_KEYWORDS: &[&str] = &[
    "abstract",
    "any",
    "as",
    "asserts",
    "boolean",
    "declare",
    "enum",
    "implements",
    "infer",
    "interface",
    "is",
    "keyof",
    "namespace",
    "never",
    "number",
    "private",
    "protected",
    "public",
    "readonly",
    "satisfies",
    "string",
    "symbol",
    "type",
    "unique",
    "unknown",
];

impl Language {
    pub fn name(&self) -> &'static str {
        match self {
            Language::TypeScript => "TypeScript",
            Language::JavaScript => "JavaScript",
        }
    }

    /// Select an analyzer from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts" | "tsx" | "mts" | "cts") => Some(Language::TypeScript),
            Some("js" | "jsx" | "mjs" | "cjs") => Some(Language::JavaScript),
            _ => None,
        }
    }

    /// Guess the analyzer from the content when the extension is unknown.
    ///
    /// A shebang decides first. Otherwise TypeScript-only syntax wins over
    /// plain module syntax.
    pub fn sniff(content: &str) -> Option<Self> {
        if content.starts_with("#!") {
            let first_line = content.lines().next().unwrap_or_default();
            if first_line.contains("ts-node") || first_line.contains("tsx") {
                return Some(Language::TypeScript);
            }
            if first_line.contains("node") {
                return Some(Language::JavaScript);
            }
        }

        const TS_HINTS: &[&str] = &[
            "import type ",
            "export type ",
            "interface ",
            ": string",
            ": number",
            ": boolean",
            " as const",
            "<script lang=\"ts\">",
        ];
        if TS_HINTS.iter().any(|hint| content.contains(hint)) {
            return Some(Language::TypeScript);
        }

        const JS_HINTS: &[&str] = &[
            "import ",
            "export ",
            "require(",
            "module.exports",
            "function ",
            "const ",
            "=> ",
        ];
        if JS_HINTS.iter().any(|hint| content.contains(hint)) {
            return Some(Language::JavaScript);
        }

        None
    }

    /// Resolve the analyzer for a file: extension first, then content.
    pub fn detect(path: &Path, content: &str) -> Option<Self> {
        Self::from_path(path).or_else(|| Self::sniff(content))
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        match self {
            Language::JavaScript => JS_KEYWORDS.contains(&word),
            Language::TypeScript => JS_KEYWORDS.contains(&word) || TS_KEYWORDS.contains(&word),
        }
    }
}
