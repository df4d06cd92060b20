use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive, 1-indexed line range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRange {
    pub start_line: usize,
    pub end_line: usize,
}

impl LineRange {
    #[must_use]
    pub const fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    /// Check if this range fully contains another one
    #[must_use]
    pub const fn contains(&self, other: &LineRange) -> bool {
        self.start_line <= other.start_line && other.end_line <= self.end_line
    }

    /// Check if a line falls inside this range
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// Check if two ranges share at least one line
    #[must_use]
    pub const fn overlaps(&self, other: &LineRange) -> bool {
        self.start_line <= other.end_line && other.start_line <= self.end_line
    }

    /// Get the number of lines in this range
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

/// A position in the source (1-indexed line, 0-indexed byte column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextPoint {
    pub line: usize,
    pub column: usize,
}

/// Kind of an extracted symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Function,
    Method,
    Constructor,
    Getter,
    Setter,
    Class,
    Interface,
    Type,
    Enum,
    EnumMember,
    Variable,
    Const,
    Property,
    Namespace,
    /// Unnamed call, construct or index signature of a container type
    Signature,
    StaticBlock,
    Import,
    ReExport,
    Expression,
    Comment,
}

impl SymbolKind {
    /// Kinds whose declaration can contain nested declarations
    #[must_use]
    pub const fn is_body_bearing(self) -> bool {
        matches!(
            self,
            Self::Function
                | Self::Method
                | Self::Constructor
                | Self::Getter
                | Self::Setter
                | Self::Class
                | Self::Interface
                | Self::Enum
                | Self::Namespace
                | Self::StaticBlock
        )
    }

    /// Non-declaration content collected at the file root
    #[must_use]
    pub const fn is_root_content(self) -> bool {
        matches!(
            self,
            Self::Import | Self::ReExport | Self::Expression | Self::Comment
        )
    }

    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Constructor => "constructor",
            Self::Getter => "getter",
            Self::Setter => "setter",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Type => "type",
            Self::Enum => "enum",
            Self::EnumMember => "enumMember",
            Self::Variable => "variable",
            Self::Const => "const",
            Self::Property => "property",
            Self::Namespace => "namespace",
            Self::Signature => "signature",
            Self::StaticBlock => "staticBlock",
            Self::Import => "import",
            Self::ReExport => "reExport",
            Self::Expression => "expression",
            Self::Comment => "comment",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Modifier {
    Exported,
    Default,
    Declare,
    Public,
    Private,
    Protected,
    Abstract,
    Static,
    Override,
    Readonly,
    Async,
    Generator,
    Optional,
    Const,
}

impl Modifier {
    /// Keyword as it appears in a signature, if it has one
    #[must_use]
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Exported => Some("export"),
            Self::Default => Some("default"),
            Self::Declare => Some("declare"),
            Self::Public => Some("public"),
            Self::Private => Some("private"),
            Self::Protected => Some("protected"),
            Self::Abstract => Some("abstract"),
            Self::Static => Some("static"),
            Self::Override => Some("override"),
            Self::Readonly => Some("readonly"),
            Self::Async => Some("async"),
            Self::Const => Some("const"),
            Self::Generator | Self::Optional => None,
        }
    }
}

/// Ordered set of modifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifiers(BTreeSet<Modifier>);

impl Modifiers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.0.insert(modifier);
    }

    #[must_use]
    pub fn contains(&self, modifier: Modifier) -> bool {
        self.0.contains(&modifier)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.0.iter().copied()
    }

    /// Merge another set into this one
    pub fn extend(&mut self, other: &Modifiers) {
        self.0.extend(other.iter());
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A named or structural unit extracted from source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// 0 for symbols at the file root
    pub depth: usize,
    pub parent_name: Option<String>,
    pub range: LineRange,
    /// Short declarative header without the body
    pub signature: String,
    pub modifiers: Modifiers,
    pub doc: Option<String>,
    pub exported: bool,
    /// Opening brace of the body, for symbols that have one
    pub body_start: Option<TextPoint>,
    pub children: Vec<Symbol>,
}

impl Symbol {
    #[must_use]
    pub const fn start_line(&self) -> usize {
        self.range.start_line
    }

    #[must_use]
    pub const fn end_line(&self) -> usize {
        self.range.end_line
    }

    /// Visit this symbol and all descendants in pre-order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Symbol)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Re-root this symbol (and its subtree) under a new depth and parent
    pub(crate) fn reparent(&mut self, depth: usize, parent_name: Option<String>) {
        self.depth = depth;
        self.parent_name = parent_name;
        let own_name = self.name.clone();
        for child in &mut self.children {
            child.reparent(depth + 1, Some(own_name.clone()));
        }
    }
}

/// One identifier introduced by a named import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBinding {
    pub imported: String,
    pub local: String,
    pub type_only: bool,
}

/// A parsed import statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDecl {
    pub start_line: usize,
    pub end_line: usize,
    /// Literal statement text
    pub text: String,
    /// Module specifier without quotes
    pub source: String,
    pub type_only: bool,
    pub default_name: Option<String>,
    pub namespace_name: Option<String>,
    pub named: Vec<ImportBinding>,
}

impl ImportDecl {
    /// Identifiers this import introduces into the file scope
    #[must_use]
    pub fn local_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        if let Some(name) = &self.default_name {
            names.push(name.as_str());
        }
        if let Some(name) = &self.namespace_name {
            names.push(name.as_str());
        }
        names.extend(self.named.iter().map(|binding| binding.local.as_str()));
        names
    }

    /// Import that only runs the module for its side effects
    #[must_use]
    pub fn is_side_effect(&self) -> bool {
        self.default_name.is_none() && self.namespace_name.is_none() && self.named.is_empty()
    }

    /// Whether a local name is bound as a type-only import
    #[must_use]
    pub fn is_type_binding(&self, local: &str) -> bool {
        self.type_only
            || self
                .named
                .iter()
                .any(|binding| binding.local == local && binding.type_only)
    }
}

/// Result of extracting symbols from one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFile {
    pub file_path: String,
    pub relative_path: String,
    pub language: Language,
    pub symbols: Vec<Symbol>,
    pub imports: Vec<ImportDecl>,
    pub total_lines: usize,
    pub has_syntax_errors: bool,
}

impl ParsedFile {
    /// Iterate every symbol in the tree in pre-order
    pub fn all_symbols(&self) -> Vec<&Symbol> {
        let mut out = Vec::new();
        for symbol in &self.symbols {
            symbol.walk(&mut |s| out.push(s));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_range_relations() {
        let outer = LineRange::new(10, 20);
        assert!(outer.contains(&LineRange::new(12, 15)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&LineRange::new(9, 15)));
        assert!(outer.overlaps(&LineRange::new(20, 25)));
        assert!(!outer.overlaps(&LineRange::new(21, 25)));
        assert!(outer.contains_line(20));
        assert_eq!(outer.line_count(), 11);
    }

    #[test]
    fn test_body_bearing_kinds() {
        assert!(SymbolKind::Function.is_body_bearing());
        assert!(SymbolKind::Interface.is_body_bearing());
        assert!(SymbolKind::StaticBlock.is_body_bearing());
        assert!(!SymbolKind::Const.is_body_bearing());
        assert!(!SymbolKind::Property.is_body_bearing());
        assert!(!SymbolKind::Type.is_body_bearing());
    }

    #[test]
    fn test_modifiers_are_ordered() {
        let modifiers: Modifiers = [Modifier::Async, Modifier::Exported, Modifier::Static]
            .into_iter()
            .collect();
        let ordered: Vec<_> = modifiers.iter().collect();
        assert_eq!(
            ordered,
            vec![Modifier::Exported, Modifier::Static, Modifier::Async]
        );
    }

    #[test]
    fn test_import_local_names() {
        let import = ImportDecl {
            start_line: 1,
            end_line: 1,
            text: "import React, { useState as useS, type FC } from 'react';".to_string(),
            source: "react".to_string(),
            type_only: false,
            default_name: Some("React".to_string()),
            namespace_name: None,
            named: vec![
                ImportBinding {
                    imported: "useState".to_string(),
                    local: "useS".to_string(),
                    type_only: false,
                },
                ImportBinding {
                    imported: "FC".to_string(),
                    local: "FC".to_string(),
                    type_only: true,
                },
            ],
        };
        assert_eq!(import.local_names(), vec!["React", "useS", "FC"]);
        assert!(!import.is_side_effect());
        assert!(import.is_type_binding("FC"));
        assert!(!import.is_type_binding("useS"));
    }
}
