//! Renders the identifier module imported by identifier mode.
//!
//! Every key becomes a nested property whose value is the full key, so
//! `tKeys.foo.bar === "foo.bar"`:
//!
//! ```ts
//! const tKeys = {
//!   foo: {
//!     bar: "foo.bar",
//!   },
//! } as const;
//!
//! export default tKeys;
//! ```

use std::collections::BTreeMap;

use crate::core::key_map::TranslationKeyMap;

pub const GENERATED_HEADER: &str = "// Generated by skiver. Do not edit by hand.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Leaf(String),
    Branch(BTreeMap<String, Node>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    pub source: String,
    /// Keys emitted as leaves.
    pub key_count: usize,
    /// Keys dropped because other keys nest under them.
    pub skipped: Vec<String>,
}

pub fn render_identifier_module(key_map: &TranslationKeyMap, alias: &str) -> GeneratedModule {
    let mut root: BTreeMap<String, Node> = BTreeMap::new();
    let mut skipped = Vec::new();

    for key in key_map.keys() {
        insert(&mut root, key, &mut skipped);
    }
    skipped.sort();
    skipped.dedup();

    let mut source = String::new();
    source.push_str(GENERATED_HEADER);
    source.push('\n');
    source.push_str(&format!("const {} = {{\n", alias));
    let key_count = render_branch(&root, 1, &mut source);
    source.push_str("} as const;\n\n");
    source.push_str(&format!("export default {};\n", alias));

    GeneratedModule {
        source,
        key_count,
        skipped,
    }
}

fn insert(root: &mut BTreeMap<String, Node>, key: &str, skipped: &mut Vec<String>) {
    let segments: Vec<&str> = key.split('.').collect();
    let (last, parents) = match segments.split_last() {
        Some(split) => split,
        None => return,
    };

    let mut current = root;
    for segment in parents {
        let node = current
            .entry(segment.to_string())
            .or_insert_with(|| Node::Branch(BTreeMap::new()));
        if let Node::Leaf(existing) = node {
            skipped.push(existing.clone());
            *node = Node::Branch(BTreeMap::new());
        }
        let Node::Branch(children) = node else {
            unreachable!("node was just made a branch");
        };
        current = children;
    }

    match current.get(*last) {
        Some(Node::Branch(_)) => skipped.push(key.to_string()),
        _ => {
            current.insert(last.to_string(), Node::Leaf(key.to_string()));
        }
    }
}

fn render_branch(branch: &BTreeMap<String, Node>, depth: usize, out: &mut String) -> usize {
    let indent = "  ".repeat(depth);
    let mut leaves = 0;
    for (segment, node) in branch {
        match node {
            Node::Leaf(key) => {
                out.push_str(&format!("{}{}: {},\n", indent, property(segment), quote(key)));
                leaves += 1;
            }
            Node::Branch(children) => {
                out.push_str(&format!("{}{}: {{\n", indent, property(segment)));
                leaves += render_branch(children, depth + 1, out);
                out.push_str(&format!("{}}},\n", indent));
            }
        }
    }
    leaves
}

/// Whether `name` can be written as a bare property name or identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn property(segment: &str) -> String {
    if is_identifier(segment) {
        segment.to_string()
    } else {
        quote(segment)
    }
}

fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key_map(keys: &[&str]) -> TranslationKeyMap {
        keys.iter().map(|k| (*k, "en", "x")).collect()
    }

    #[test]
    fn test_nested_module() {
        let module = render_identifier_module(&key_map(&["foo.bar", "foo.baz", "nav"]), "tKeys");
        assert_eq!(module.key_count, 3);
        assert!(module.skipped.is_empty());
        assert_eq!(
            module.source,
            "// Generated by skiver. Do not edit by hand.\n\
             const tKeys = {\n\
             \x20 foo: {\n\
             \x20   bar: \"foo.bar\",\n\
             \x20   baz: \"foo.baz\",\n\
             \x20 },\n\
             \x20 nav: \"nav\",\n\
             } as const;\n\
             \n\
             export default tKeys;\n"
        );
    }

    #[test]
    fn test_quoted_segments() {
        let module = render_identifier_module(&key_map(&["faq.0.q", "sign-in.title"]), "k");
        assert!(module.source.contains("  \"sign-in\": {\n    title: \"sign-in.title\",\n"));
        assert!(module.source.contains("  faq: {\n    \"0\": {\n      q: \"faq.0.q\",\n"));
    }

    #[test]
    fn test_leaf_and_prefix_conflict() {
        let module = render_identifier_module(&key_map(&["a", "a.b", "c.d", "c.d.e"]), "tKeys");
        assert_eq!(module.skipped, vec!["a".to_string(), "c.d".to_string()]);
        assert_eq!(module.key_count, 2);
        assert_eq!(module.source.lines().nth(2), Some("  a: {"));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("foo"));
        assert!(is_identifier("_foo$1"));
        assert!(!is_identifier("1foo"));
        assert!(!is_identifier("sign-in"));
        assert!(!is_identifier(""));
    }
}
