use crate::types::{LineRange, TextPoint};
use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;
use unicode_segmentation::UnicodeSegmentation;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static DOC_LINE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*\*[ \t]?").expect("valid regex"));

/// Source text covered by a node
pub(crate) fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

/// Text of a named field, if present
pub(crate) fn field_text<'s>(node: Node<'_>, field: &str, source: &'s str) -> Option<&'s str> {
    node.child_by_field_name(field)
        .map(|child| node_text(child, source))
}

pub(crate) fn start_line(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

/// 1-indexed last line, not counting a trailing newline the node may swallow
pub(crate) fn end_line(node: Node<'_>) -> usize {
    let end = node.end_position();
    if end.column == 0 && end.row > node.start_position().row {
        end.row
    } else {
        end.row + 1
    }
}

pub(crate) fn start_point(node: Node<'_>) -> TextPoint {
    let start = node.start_position();
    TextPoint {
        line: start.row + 1,
        column: start.column,
    }
}

/// Structured doc block (`/** ... */`), as opposed to an ordinary comment
pub(crate) fn is_doc_comment(text: &str) -> bool {
    text.starts_with("/**") && !text.starts_with("/**/")
}

/// Doc comment sitting directly above a node (no blank line in between)
pub(crate) fn leading_doc<'t>(node: Node<'t>, source: &str) -> Option<Node<'t>> {
    let prev = node.prev_sibling()?;
    if prev.kind() != "comment" || !is_doc_comment(node_text(prev, source)) {
        return None;
    }
    if end_line(prev) + 1 < start_line(node) {
        return None;
    }
    Some(prev)
}

/// Line range of a node extended over its doc block, plus the cleaned doc text
pub(crate) fn span(node: Node<'_>, source: &str) -> (LineRange, Option<String>) {
    let end = end_line(node);
    match leading_doc(node, source) {
        Some(doc) => (
            LineRange::new(start_line(doc), end),
            Some(clean_doc(node_text(doc, source))),
        ),
        None => (LineRange::new(start_line(node), end), None),
    }
}

/// Strip comment delimiters and leading asterisks from a doc block
pub(crate) fn clean_doc(raw: &str) -> String {
    let inner = raw
        .trim()
        .trim_start_matches("/**")
        .trim_end_matches("*/");
    let stripped = DOC_LINE_PREFIX.replace_all(inner, "");
    stripped
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Collapse all whitespace runs into single spaces
pub(crate) fn squash(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// One-line preview truncated to `max` graphemes
pub(crate) fn preview(text: &str, max: usize) -> String {
    let flat = squash(text);
    if flat.graphemes(true).count() <= max {
        return flat;
    }
    let mut out: String = flat.graphemes(true).take(max).collect();
    out.push_str("...");
    out
}

/// Grapheme length of text once whitespace is squashed
pub(crate) fn display_len(text: &str) -> usize {
    squash(text).graphemes(true).count()
}

/// Remove surrounding quotes from a string literal
pub(crate) fn unquote(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

/// Named children of a node, collected so the cursor borrow ends
pub(crate) fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// All children (named and anonymous)
pub(crate) fn children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Check for an anonymous token child such as `default` or `type`
pub(crate) fn has_token(node: Node<'_>, token: &str) -> bool {
    children(node)
        .iter()
        .any(|child| !child.is_named() && child.kind() == token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_doc() {
        let raw = "/**\n   * Adds numbers.\n   *\n   * @param a first\n   */";
        assert_eq!(clean_doc(raw), "Adds numbers.\n\n@param a first");
        assert_eq!(clean_doc("/** One liner */"), "One liner");
    }

    #[test]
    fn test_doc_comment_detection() {
        assert!(is_doc_comment("/** docs */"));
        assert!(!is_doc_comment("/* plain */"));
        assert!(!is_doc_comment("// line"));
        assert!(!is_doc_comment("/**/"));
    }

    #[test]
    fn test_preview_truncates_graphemes() {
        assert_eq!(preview("foo(\n  bar\n)", 40), "foo( bar )");
        assert_eq!(preview("abcdefgh", 4), "abcd...");
        assert_eq!(preview("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'./mod'"), "./mod");
        assert_eq!(unquote("\"react\""), "react");
    }
}
