//! Snapshot text rendering: header, imports, declarations, then wrapped targets.

use crate::config::SnapshotConfig;
use crate::resolver::{Resolved, Target};
use codeslice_symbols::{LineRange, Symbol};
use std::collections::HashSet;
use std::ptr;

/// Verbatim text of an inclusive line range
pub(crate) fn line_span(lines: &[&str], range: LineRange) -> String {
    let start = range.start_line.saturating_sub(1).min(lines.len());
    let end = range.end_line.min(lines.len()).max(start);
    lines[start..end].join("\n")
}

fn indent_of(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

/// Line holding the container's opening brace
fn brace_line(container: &Symbol, lines: &[&str]) -> usize {
    match container.body_start {
        Some(point) => point.line,
        None => (container.start_line()..=container.end_line())
            .find(|&line| {
                lines
                    .get(line.saturating_sub(1))
                    .is_some_and(|text| text.contains('{'))
            })
            .unwrap_or(container.start_line()),
    }
}

fn container_indent<'l>(container: &Symbol, lines: &[&'l str]) -> &'l str {
    lines
        .get(brace_line(container, lines).saturating_sub(1))
        .copied()
        .map(indent_of)
        .unwrap_or("")
}

/// Container text up to and including the opening brace of its body
pub(crate) fn header_text(container: &Symbol, lines: &[&str]) -> String {
    let start = container.start_line();
    let brace = brace_line(container, lines);

    let mut out: Vec<&str> = (start..brace)
        .filter_map(|line| lines.get(line.saturating_sub(1)).copied())
        .collect();

    let last = lines.get(brace.saturating_sub(1)).copied().unwrap_or("");
    let column = container.body_start.map(|point| point.column);
    let cut = column
        .and_then(|c| last.get(..=c))
        .filter(|head| head.ends_with('{'))
        .or_else(|| last.find('{').map(|pos| &last[..=pos]))
        .unwrap_or(last);
    out.push(cut);
    out.join("\n")
}

/// The container's own closing line when it is pure punctuation, else a synthesized brace
fn closing_line(container: &Symbol, lines: &[&str]) -> String {
    let last = lines
        .get(container.end_line().saturating_sub(1))
        .copied()
        .unwrap_or("");
    let trimmed = last.trim();
    if trimmed.starts_with('}')
        && trimmed
            .chars()
            .all(|c| matches!(c, '}' | ')' | ']' | ';' | ','))
    {
        last.to_string()
    } else {
        format!("{}}}", container_indent(container, lines))
    }
}

/// Indent every line by `indent` unless the text is already indented
fn reindent(text: &str, indent: &str) -> String {
    let first = text.lines().find(|line| !line.trim().is_empty());
    if first.map_or(true, |line| line.starts_with([' ', '\t'])) {
        return text.to_string();
    }
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) struct Renderer<'a, 'f> {
    pub config: &'a SnapshotConfig,
    pub lines: &'a [&'a str],
    pub targets: &'a [Target<'f>],
    pub dependencies: &'a [Resolved<'f>],
}

impl<'f> Renderer<'_, 'f> {
    pub(crate) fn render(&self, relative_path: &str) -> String {
        let mut sections = vec![format!("{} {relative_path}", self.config.header_prefix)];

        let mut seen = HashSet::new();
        let imports: Vec<&str> = self
            .dependencies
            .iter()
            .filter(|dep| dep.kind.is_import())
            .map(|dep| dep.text.as_str())
            .filter(|text| seen.insert(*text))
            .collect();
        if !imports.is_empty() {
            sections.push(imports.join("\n"));
        }

        sections.extend(
            self.dependencies
                .iter()
                .filter(|dep| !dep.kind.is_import() && dep.owner.is_none())
                .map(|dep| dep.text.clone()),
        );

        let mut tail: Vec<(usize, String)> = self
            .targets
            .iter()
            .filter(|target| target.ancestors.is_empty())
            .map(|target| (target.range.start_line, target.text.clone()))
            .collect();

        let mut roots: Vec<&'f Symbol> = Vec::new();
        for target in self.targets {
            if let Some(root) = target.ancestors.first() {
                if !roots.iter().any(|seen| ptr::eq(*seen, *root)) {
                    roots.push(*root);
                }
            }
        }
        tail.extend(
            roots
                .into_iter()
                .map(|root| (root.start_line(), self.container(root))),
        );
        tail.sort_by_key(|(line, _)| *line);
        sections.extend(tail.into_iter().map(|(_, text)| text));

        let mut out = sections.join("\n\n");
        out.push('\n');
        out
    }

    /// Wrapper for one container: header, in-scope members and targets, closing line
    fn container(&self, container: &'f Symbol) -> String {
        let member_indent = format!(
            "{}{}",
            container_indent(container, self.lines),
            self.config.indent_unit
        );

        let mut entries: Vec<(usize, String)> = Vec::new();
        for dep in self.dependencies {
            if dep.owner.is_some_and(|owner| ptr::eq(owner, container)) {
                entries.push((dep.range.start_line, reindent(&dep.text, &member_indent)));
            }
        }

        let mut nested: Vec<&'f Symbol> = Vec::new();
        for target in self.targets {
            let Some(pos) = target
                .ancestors
                .iter()
                .position(|ancestor| ptr::eq(*ancestor, container))
            else {
                continue;
            };
            match target.ancestors.get(pos + 1) {
                Some(child) => {
                    if !nested.iter().any(|seen| ptr::eq(*seen, *child)) {
                        nested.push(*child);
                    }
                }
                None => entries.push((
                    target.range.start_line,
                    reindent(&target.text, &member_indent),
                )),
            }
        }
        for child in nested {
            entries.push((child.start_line(), self.container(child)));
        }

        entries.sort_by_key(|(line, _)| *line);
        let body = entries
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "{}\n{body}\n{}",
            header_text(container, self.lines),
            closing_line(container, self.lines)
        )
    }
}
