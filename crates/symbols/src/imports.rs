//! Import and re-export statement parsing.

use crate::text::{field_text, has_token, named_children, node_text, squash, unquote};
use crate::types::{ImportBinding, ImportDecl};
use tree_sitter::Node;

/// Form of a re-export statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReExportForm {
    /// `export * from 'm'`
    Wildcard,
    /// `export * as ns from 'm'`
    Namespace(String),
    /// `export { a, b as c } from 'm'` or a local `export { a }` list
    Named(Vec<String>),
}

/// A parsed re-export statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReExport {
    pub form: ReExportForm,
    pub source: Option<String>,
}

impl ReExport {
    /// Display name used for the symbol
    pub(crate) fn display_name(&self) -> String {
        let form = match &self.form {
            ReExportForm::Wildcard => "*".to_string(),
            ReExportForm::Namespace(alias) => format!("* as {alias}"),
            ReExportForm::Named(names) => format!("{{ {} }}", names.join(", ")),
        };
        match &self.source {
            Some(source) => format!("{form} from {source}"),
            None => form,
        }
    }
}

/// Parse an `import_statement` or TS `import_alias` node
pub(crate) fn parse_import(node: Node<'_>, source: &str) -> Option<ImportDecl> {
    let text = node_text(node, source).trim().to_string();
    let start_line = node.start_position().row + 1;
    let end_line = crate::text::end_line(node);

    if node.kind() == "import_alias" {
        // import Foo = Bar.Baz;
        let parts = named_children(node);
        let local = parts.first().map(|n| node_text(*n, source).to_string())?;
        let target = parts
            .get(1)
            .map(|n| node_text(*n, source).to_string())
            .unwrap_or_default();
        return Some(ImportDecl {
            start_line,
            end_line,
            text,
            source: target,
            type_only: false,
            default_name: Some(local),
            namespace_name: None,
            named: Vec::new(),
        });
    }

    let mut import = ImportDecl {
        start_line,
        end_line,
        text,
        source: field_text(node, "source", source)
            .map(|s| unquote(s).to_string())
            .unwrap_or_default(),
        type_only: has_token(node, "type") || has_token(node, "typeof"),
        default_name: None,
        namespace_name: None,
        named: Vec::new(),
    };

    for child in named_children(node) {
        match child.kind() {
            "import_clause" => read_import_clause(child, source, &mut import),
            "import_require_clause" => {
                // import fs = require('fs');
                if let Some(ident) = named_children(child)
                    .into_iter()
                    .find(|n| n.kind() == "identifier")
                {
                    import.default_name = Some(node_text(ident, source).to_string());
                }
                if let Some(src) = field_text(child, "source", source) {
                    import.source = unquote(src).to_string();
                }
            }
            _ => {}
        }
    }

    Some(import)
}

fn read_import_clause(clause: Node<'_>, source: &str, import: &mut ImportDecl) {
    for part in named_children(clause) {
        match part.kind() {
            "identifier" => import.default_name = Some(node_text(part, source).to_string()),
            "namespace_import" => {
                import.namespace_name = named_children(part)
                    .into_iter()
                    .find(|n| n.kind() == "identifier")
                    .map(|n| node_text(n, source).to_string());
            }
            "named_imports" => {
                for specifier in named_children(part) {
                    if specifier.kind() != "import_specifier" {
                        continue;
                    }
                    let Some(imported) = field_text(specifier, "name", source) else {
                        continue;
                    };
                    let imported = unquote(imported).to_string();
                    let local = field_text(specifier, "alias", source)
                        .map(str::to_string)
                        .unwrap_or_else(|| imported.clone());
                    import.named.push(ImportBinding {
                        imported,
                        local,
                        type_only: has_token(specifier, "type")
                            || has_token(specifier, "typeof"),
                    });
                }
            }
            _ => {}
        }
    }
}

/// Parse an `export_statement` that re-exports bindings rather than declaring them
pub(crate) fn parse_reexport(node: Node<'_>, source: &str) -> Option<ReExport> {
    let module = field_text(node, "source", source).map(|s| unquote(s).to_string());

    for child in named_children(node) {
        match child.kind() {
            "namespace_export" => {
                let alias = named_children(child)
                    .last()
                    .map(|n| unquote(node_text(*n, source)).to_string())
                    .unwrap_or_default();
                return Some(ReExport {
                    form: ReExportForm::Namespace(alias),
                    source: module,
                });
            }
            "export_clause" => {
                let names = named_children(child)
                    .into_iter()
                    .filter(|spec| spec.kind() == "export_specifier")
                    .map(|spec| squash(node_text(spec, source)))
                    .collect();
                return Some(ReExport {
                    form: ReExportForm::Named(names),
                    source: module,
                });
            }
            _ => {}
        }
    }

    if module.is_some() && has_token(node, "*") {
        return Some(ReExport {
            form: ReExportForm::Wildcard,
            source: module,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexport_display_names() {
        let wildcard = ReExport {
            form: ReExportForm::Wildcard,
            source: Some("./a".to_string()),
        };
        assert_eq!(wildcard.display_name(), "* from ./a");

        let ns = ReExport {
            form: ReExportForm::Namespace("utils".to_string()),
            source: Some("./utils".to_string()),
        };
        assert_eq!(ns.display_name(), "* as utils from ./utils");

        let local = ReExport {
            form: ReExportForm::Named(vec!["a".to_string(), "b as c".to_string()]),
            source: None,
        };
        assert_eq!(local.display_name(), "{ a, b as c }");
    }
}
