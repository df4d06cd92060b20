//! Embedding-text collapse: nested bodies replaced by one-line signature stubs.

use codeslice_symbols::Symbol;

/// Replace the inclusive line span `start..=end` (offsets into the parent's lines)
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LineEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

/// Apply edits back to front over a copy of the lines
pub(crate) fn apply_edits(lines: &[&str], mut edits: Vec<LineEdit>) -> String {
    let mut out: Vec<String> = lines.iter().map(|line| (*line).to_string()).collect();
    edits.sort_by(|a, b| b.start.cmp(&a.start));
    for edit in edits {
        if edit.start > edit.end || edit.end >= out.len() {
            continue;
        }
        out.splice(edit.start..=edit.end, std::iter::once(edit.replacement));
    }
    out.join("\n")
}

fn indent_of(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

/// Build the collapsed text for `parent` given its chunkable children.
///
/// `lines` are the parent's own lines. Children sharing the parent's first or last line
/// stay inline, since replacing them would eat the parent's header or closing line.
pub(crate) fn collapse(parent: &Symbol, lines: &[&str], children: &[&Symbol]) -> String {
    let edits: Vec<LineEdit> = children
        .iter()
        .filter(|child| child.kind.is_body_bearing())
        .filter(|child| {
            child.start_line() > parent.start_line() && child.end_line() < parent.end_line()
        })
        .map(|child| {
            let start = child.start_line() - parent.start_line();
            let end = child.end_line() - parent.start_line();
            let indent = lines.get(start).map(|line| indent_of(line)).unwrap_or("");
            LineEdit {
                start,
                end,
                replacement: format!("{indent}{};", child.signature),
            }
        })
        .collect();

    apply_edits(lines, edits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_edits_apply_back_to_front() {
        let lines = vec!["a", "b", "c", "d", "e", "f"];
        let edits = vec![
            LineEdit {
                start: 1,
                end: 2,
                replacement: "B".to_string(),
            },
            LineEdit {
                start: 3,
                end: 4,
                replacement: "D".to_string(),
            },
        ];
        assert_eq!(apply_edits(&lines, edits), "a\nB\nD\nf");
    }

    #[test]
    fn test_out_of_range_edit_is_ignored() {
        let lines = vec!["a", "b"];
        let edits = vec![LineEdit {
            start: 1,
            end: 5,
            replacement: "X".to_string(),
        }];
        assert_eq!(apply_edits(&lines, edits), "a\nb");
    }

    #[test]
    fn test_indent_of() {
        assert_eq!(indent_of("    return 1;"), "    ");
        assert_eq!(indent_of("\tx"), "\t");
        assert_eq!(indent_of("x"), "");
    }
}
