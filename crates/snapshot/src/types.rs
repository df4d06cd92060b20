use serde::{Deserialize, Serialize};

/// What a pulled-in declaration is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyKind {
    Import,
    TypeImport,
    Constant,
    Variable,
    TypeAlias,
    Interface,
    Enum,
    /// Property-like member of a container enclosing a target
    MemberProperty,
    /// Container enclosing a target; rendered as a wrapper, never standalone
    ContainerDeclaration,
    Function,
    Other,
}

impl DependencyKind {
    #[must_use]
    pub const fn is_import(self) -> bool {
        matches!(self, Self::Import | Self::TypeImport)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::TypeImport => "typeImport",
            Self::Constant => "constant",
            Self::Variable => "variable",
            Self::TypeAlias => "typeAlias",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::MemberProperty => "memberProperty",
            Self::ContainerDeclaration => "containerDeclaration",
            Self::Function => "function",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A same-file declaration a snapshot pulled in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub start_line: usize,
    pub end_line: usize,
    pub kind: DependencyKind,
    pub name: String,
    /// Rendered text (the header only, for containers)
    pub source_text: String,
}

/// A minimal excerpt of one file around a set of target chunks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Rendered text, ending with a newline
    pub snapshot: String,
    pub relative_path: String,
    /// Distinct targets requested
    pub target_count: usize,
    pub dependency_count: usize,
    /// Dependencies in file order
    pub dependencies: Vec<Dependency>,
}

impl Snapshot {
    /// Dependencies of one kind
    pub fn dependencies_of(&self, kind: DependencyKind) -> impl Iterator<Item = &Dependency> {
        self.dependencies.iter().filter(move |dep| dep.kind == kind)
    }
}
