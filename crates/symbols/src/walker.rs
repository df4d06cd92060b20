//! Tree walk that turns a syntax tree into a symbol tree.

use crate::config::ExtractorConfig;
use crate::imports::{parse_import, parse_reexport};
use crate::text::{
    children, display_len, end_line, field_text, has_token, is_doc_comment, leading_doc,
    named_children, node_text, preview, span, squash, start_line, start_point, unquote,
};
use crate::types::{ImportDecl, LineRange, Modifier, Modifiers, Symbol, SymbolKind, TextPoint};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tree_sitter::Node;

static LEGACY_EXPORT_TARGET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:module\.exports|(?:module\.)?exports\.([A-Za-z_$][A-Za-z0-9_$]*))$")
        .expect("valid regex")
});

/// Declaration node together with the statement that carries its range and doc
#[derive(Clone, Copy)]
struct Decl<'t> {
    node: Node<'t>,
    outer: Node<'t>,
}

pub(crate) struct Walker<'s> {
    source: &'s str,
    config: &'s ExtractorConfig,
}

impl<'s> Walker<'s> {
    pub(crate) fn new(source: &'s str, config: &'s ExtractorConfig) -> Self {
        Self { source, config }
    }

    /// Walk the program node: declarations plus root content
    pub(crate) fn root(&self, program: Node<'_>) -> (Vec<Symbol>, Vec<ImportDecl>) {
        let mut declarations = Vec::new();
        let mut content = Vec::new();
        let mut imports = Vec::new();
        let mut comments = Vec::new();

        for node in named_children(program) {
            match node.kind() {
                "comment" => comments.push(node),
                "import_statement" | "import_alias" => {
                    if let Some(import) = parse_import(node, self.source) {
                        content.push(self.import_symbol(node, &import));
                        imports.push(import);
                    }
                }
                "export_statement" if Self::is_reexport(node) => {
                    if let Some(symbol) = self.reexport_symbol(node) {
                        content.push(symbol);
                    }
                }
                "expression_statement" => {
                    if let Some(symbol) = self.legacy_export(node) {
                        declarations.push(symbol);
                    } else if Self::wrapped_namespace(node).is_some() {
                        declarations.extend(self.statement(node));
                    } else {
                        content.push(self.expression_symbol(node));
                    }
                }
                _ => declarations.extend(self.statement(node)),
            }
        }

        content.extend(self.orphan_comments(&comments));

        // Root content never shares lines with an extracted declaration
        content.retain(|item| {
            !declarations
                .iter()
                .any(|decl: &Symbol| decl.range.contains_line(item.start_line()))
        });
        content.sort_by_key(|item| item.start_line());
        content.dedup_by_key(|item| item.start_line());

        declarations.extend(content);
        let mut symbols = finalize_siblings(declarations, None);
        for symbol in &mut symbols {
            symbol.reparent(0, None);
        }
        (symbols, imports)
    }

    /// Declarations introduced by one statement
    fn statement(&self, node: Node<'_>) -> Vec<Symbol> {
        self.declaration(
            Decl {
                node,
                outer: node,
            },
            Modifiers::new(),
        )
    }

    fn declaration(&self, decl: Decl<'_>, modifiers: Modifiers) -> Vec<Symbol> {
        match decl.node.kind() {
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                vec![self.function(decl, modifiers)]
            }
            "class_declaration" | "abstract_class_declaration" | "class" => {
                vec![self.class(decl, modifiers)]
            }
            "interface_declaration" => vec![self.interface(decl, modifiers)],
            "type_alias_declaration" => vec![self.type_alias(decl, modifiers)],
            "enum_declaration" => vec![self.enumeration(decl, modifiers)],
            "lexical_declaration" | "variable_declaration" => {
                self.variables(decl, modifiers).into_iter().collect()
            }
            "internal_module" | "module" => vec![self.namespace(decl, modifiers)],
            "ambient_declaration" => self.ambient(decl, modifiers),
            "export_statement" => self.export(decl.node),
            "expression_statement" => match Self::wrapped_namespace(decl.node) {
                Some(inner) => vec![self.namespace(
                    Decl {
                        node: inner,
                        outer: decl.outer,
                    },
                    modifiers,
                )],
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Named declarations directly inside a statement block
    fn block(&self, body: Node<'_>) -> Vec<Symbol> {
        let mut out = Vec::new();
        for node in named_children(body) {
            out.extend(self.statement(node));
        }
        finalize_siblings(out, Some(LineRange::new(start_line(body), end_line(body))))
    }

    fn export(&self, node: Node<'_>) -> Vec<Symbol> {
        let mut modifiers: Modifiers = [Modifier::Exported].into_iter().collect();
        let is_default = has_token(node, "default");
        if is_default {
            modifiers.insert(Modifier::Default);
        }

        if let Some(inner) = node.child_by_field_name("declaration") {
            return self.declaration(Decl { node: inner, outer: node }, modifiers);
        }

        if has_token(node, "=") {
            // export = Foo;
            let value = named_children(node).into_iter().last();
            return value
                .map(|value| self.assigned_value("export =", value, node, modifiers))
                .into_iter()
                .collect();
        }

        if is_default {
            if let Some(value) = node.child_by_field_name("value") {
                return vec![self.default_export(value, node, modifiers)];
            }
        }

        Vec::new()
    }

    fn default_export(&self, value: Node<'_>, outer: Node<'_>, modifiers: Modifiers) -> Symbol {
        let value = unwrap_expression(value);
        let decl = Decl { node: value, outer };
        match value.kind() {
            "class" => self.class(decl, modifiers),
            "function_expression" | "function" | "generator_function" => {
                self.function(decl, modifiers)
            }
            _ => self.assigned_value("default", value, outer, modifiers),
        }
    }

    fn ambient(&self, decl: Decl<'_>, mut modifiers: Modifiers) -> Vec<Symbol> {
        modifiers.insert(Modifier::Declare);
        let parts = named_children(decl.node);

        if has_token(decl.node, "global") {
            // declare global { ... }
            let body = parts.into_iter().find(|n| n.kind() == "statement_block");
            let (range, doc) = span(decl.outer, self.source);
            return vec![self.symbol(
                SymbolKind::Namespace,
                "global".to_string(),
                range,
                "declare global".to_string(),
                modifiers,
                doc,
                body.map(start_point),
                body.map(|b| self.block(b)).unwrap_or_default(),
            )];
        }

        parts
            .into_iter()
            .filter(|n| n.kind() != "comment")
            .flat_map(|inner| {
                self.declaration(
                    Decl {
                        node: inner,
                        outer: decl.outer,
                    },
                    modifiers.clone(),
                )
            })
            .collect()
    }

    fn function(&self, decl: Decl<'_>, mut modifiers: Modifiers) -> Symbol {
        let node = decl.node;
        collect_modifiers(node, self.source, &mut modifiers);
        if matches!(
            node.kind(),
            "generator_function_declaration" | "generator_function"
        ) {
            modifiers.insert(Modifier::Generator);
        }

        let declared = field_text(node, "name", self.source);
        let name = declared.unwrap_or("default").to_string();
        let star = if modifiers.contains(Modifier::Generator) {
            "*"
        } else {
            ""
        };
        let signature = format!(
            "{}function{star}{}{}",
            prefix(&modifiers),
            declared.map(|n| format!(" {n}")).unwrap_or_default(),
            self.callable_tail(node)
        );

        let body = node.child_by_field_name("body");
        let (range, doc) = span(decl.outer, self.source);
        self.symbol(
            SymbolKind::Function,
            name,
            range,
            signature,
            modifiers,
            doc,
            body.map(start_point),
            body.map(|b| self.block(b)).unwrap_or_default(),
        )
    }

    fn class(&self, decl: Decl<'_>, mut modifiers: Modifiers) -> Symbol {
        let node = decl.node;
        collect_modifiers(node, self.source, &mut modifiers);
        if node.kind() == "abstract_class_declaration" {
            modifiers.insert(Modifier::Abstract);
        }

        let declared = field_text(node, "name", self.source);
        let name = declared.unwrap_or("default").to_string();
        let mut signature = format!("{}class", prefix(&modifiers));
        if let Some(declared) = declared {
            signature.push(' ');
            signature.push_str(declared);
        }
        if let Some(params) = field_text(node, "type_parameters", self.source) {
            signature.push_str(&squash(params));
        }
        if let Some(heritage) = named_children(node)
            .into_iter()
            .find(|n| n.kind() == "class_heritage")
        {
            signature.push(' ');
            signature.push_str(&squash(node_text(heritage, self.source)));
        }

        let body = node.child_by_field_name("body");
        let (range, doc) = span(decl.outer, self.source);
        self.symbol(
            SymbolKind::Class,
            name,
            range,
            signature,
            modifiers,
            doc,
            body.map(start_point),
            body.map(|b| self.class_members(b)).unwrap_or_default(),
        )
    }

    fn class_members(&self, body: Node<'_>) -> Vec<Symbol> {
        let mut members = Vec::new();
        let mut counters = SignatureCounters::default();

        for member in named_children(body) {
            match member.kind() {
                "method_definition" | "method_signature" | "abstract_method_signature" => {
                    members.push(self.method(member));
                }
                "public_field_definition" | "field_definition" => {
                    members.push(self.field(member));
                }
                "class_static_block" => {
                    let block = member.child_by_field_name("body");
                    let (range, doc) = span(member, self.source);
                    members.push(self.symbol(
                        SymbolKind::StaticBlock,
                        "static".to_string(),
                        range,
                        "static".to_string(),
                        [Modifier::Static].into_iter().collect(),
                        doc,
                        block.map(start_point),
                        block.map(|b| self.block(b)).unwrap_or_default(),
                    ));
                }
                "index_signature" => {
                    members.push(self.unnamed_signature(member, counters.next("index-signature")));
                }
                _ => {}
            }
        }

        finalize_siblings(members, Some(LineRange::new(start_line(body), end_line(body))))
    }

    fn method(&self, node: Node<'_>) -> Symbol {
        let mut modifiers = Modifiers::new();
        collect_modifiers(node, self.source, &mut modifiers);
        if node.kind() == "abstract_method_signature" {
            modifiers.insert(Modifier::Abstract);
        }

        let name_node = node.child_by_field_name("name");
        let name = name_node
            .map(|n| node_text(n, self.source).to_string())
            .unwrap_or_default();
        if name_node.is_some_and(|n| n.kind() == "private_property_identifier") {
            modifiers.insert(Modifier::Private);
        }

        let accessor = accessor_kind(node);
        let kind = match accessor {
            Some("get") => SymbolKind::Getter,
            Some("set") => SymbolKind::Setter,
            _ if name == "constructor" => SymbolKind::Constructor,
            _ => SymbolKind::Method,
        };

        let mut signature = prefix(&modifiers);
        if let Some(accessor) = accessor {
            signature.push_str(accessor);
            signature.push(' ');
        }
        if modifiers.contains(Modifier::Generator) {
            signature.push('*');
        }
        signature.push_str(&name);
        if modifiers.contains(Modifier::Optional) {
            signature.push('?');
        }
        signature.push_str(&self.callable_tail(node));

        let body = node.child_by_field_name("body");
        let (range, doc) = span(node, self.source);
        self.symbol(
            kind,
            unquote(&name).to_string(),
            range,
            signature,
            modifiers,
            doc,
            body.map(start_point),
            body.map(|b| self.block(b)).unwrap_or_default(),
        )
    }

    fn field(&self, node: Node<'_>) -> Symbol {
        let mut modifiers = Modifiers::new();
        collect_modifiers(node, self.source, &mut modifiers);

        let name_node = node
            .child_by_field_name("name")
            .or_else(|| node.child_by_field_name("property"));
        let name = name_node
            .map(|n| node_text(n, self.source).to_string())
            .unwrap_or_default();
        if name_node.is_some_and(|n| n.kind() == "private_property_identifier") {
            modifiers.insert(Modifier::Private);
        }

        let mut signature = format!("{}{name}", prefix(&modifiers));
        if modifiers.contains(Modifier::Optional) {
            signature.push('?');
        }
        if let Some(ty) = field_text(node, "type", self.source) {
            signature.push_str(&squash(ty));
        }

        let (range, doc) = span(node, self.source);
        self.symbol(
            SymbolKind::Property,
            unquote(&name).to_string(),
            range,
            signature,
            modifiers,
            doc,
            None,
            Vec::new(),
        )
    }

    fn interface(&self, decl: Decl<'_>, modifiers: Modifiers) -> Symbol {
        let node = decl.node;
        let name = field_text(node, "name", self.source)
            .unwrap_or_default()
            .to_string();
        let mut signature = format!("{}interface {name}", prefix(&modifiers));
        if let Some(params) = field_text(node, "type_parameters", self.source) {
            signature.push_str(&squash(params));
        }
        if let Some(extends) = named_children(node)
            .into_iter()
            .find(|n| n.kind() == "extends_type_clause")
        {
            signature.push(' ');
            signature.push_str(&squash(node_text(extends, self.source)));
        }

        let body = node.child_by_field_name("body");
        let (range, doc) = span(decl.outer, self.source);
        self.symbol(
            SymbolKind::Interface,
            name,
            range,
            signature,
            modifiers,
            doc,
            body.map(start_point),
            body.map(|b| self.type_members(b)).unwrap_or_default(),
        )
    }

    /// Members of an interface body or object type literal
    fn type_members(&self, body: Node<'_>) -> Vec<Symbol> {
        let mut members = Vec::new();
        let mut counters = SignatureCounters::default();

        for member in named_children(body) {
            match member.kind() {
                "property_signature" => members.push(self.field(member)),
                "method_signature" => members.push(self.method(member)),
                "call_signature" => {
                    members.push(self.unnamed_signature(member, counters.next("call-signature")));
                }
                "construct_signature" => {
                    members.push(
                        self.unnamed_signature(member, counters.next("construct-signature")),
                    );
                }
                "index_signature" => {
                    members.push(self.unnamed_signature(member, counters.next("index-signature")));
                }
                _ => {}
            }
        }

        finalize_siblings(members, Some(LineRange::new(start_line(body), end_line(body))))
    }

    fn unnamed_signature(&self, node: Node<'_>, name: String) -> Symbol {
        let mut modifiers = Modifiers::new();
        collect_modifiers(node, self.source, &mut modifiers);
        let signature = squash(node_text(node, self.source))
            .trim_end_matches([';', ','])
            .to_string();
        let (range, doc) = span(node, self.source);
        self.symbol(
            SymbolKind::Signature,
            name,
            range,
            signature,
            modifiers,
            doc,
            None,
            Vec::new(),
        )
    }

    fn type_alias(&self, decl: Decl<'_>, modifiers: Modifiers) -> Symbol {
        let node = decl.node;
        let name = field_text(node, "name", self.source)
            .unwrap_or_default()
            .to_string();
        let mut signature = format!("{}type {name}", prefix(&modifiers));
        if let Some(params) = field_text(node, "type_parameters", self.source) {
            signature.push_str(&squash(params));
        }

        let value = node.child_by_field_name("value");
        if let Some(value) = value {
            let text = node_text(value, self.source);
            if display_len(text) <= self.config.max_inline_type_chars {
                signature.push_str(" = ");
                signature.push_str(&squash(text));
            }
        }

        let object_type = value.filter(|v| v.kind() == "object_type");
        let (range, doc) = span(decl.outer, self.source);
        self.symbol(
            SymbolKind::Type,
            name,
            range,
            signature,
            modifiers,
            doc,
            object_type.map(start_point),
            object_type
                .map(|body| self.type_members(body))
                .unwrap_or_default(),
        )
    }

    fn enumeration(&self, decl: Decl<'_>, mut modifiers: Modifiers) -> Symbol {
        let node = decl.node;
        if has_token(node, "const") {
            modifiers.insert(Modifier::Const);
        }
        let name = field_text(node, "name", self.source)
            .unwrap_or_default()
            .to_string();
        let signature = format!("{}enum {name}", prefix(&modifiers));

        let body = node.child_by_field_name("body");
        let members = body
            .map(|body| {
                let members = named_children(body)
                    .into_iter()
                    .filter(|m| m.kind() != "comment")
                    .map(|member| self.enum_member(member))
                    .collect();
                finalize_siblings(members, Some(LineRange::new(start_line(body), end_line(body))))
            })
            .unwrap_or_default();

        let (range, doc) = span(decl.outer, self.source);
        self.symbol(
            SymbolKind::Enum,
            name,
            range,
            signature,
            modifiers,
            doc,
            body.map(start_point),
            members,
        )
    }

    fn enum_member(&self, member: Node<'_>) -> Symbol {
        let name = if member.kind() == "enum_assignment" {
            field_text(member, "name", self.source).unwrap_or_default()
        } else {
            node_text(member, self.source)
        };
        let (range, doc) = span(member, self.source);
        self.symbol(
            SymbolKind::EnumMember,
            unquote(name).to_string(),
            range,
            squash(node_text(member, self.source)),
            Modifiers::new(),
            doc,
            None,
            Vec::new(),
        )
    }

    /// `const`/`let`/`var` statement; one symbol per statement
    fn variables(&self, decl: Decl<'_>, modifiers: Modifiers) -> Option<Symbol> {
        let node = decl.node;
        let keyword = children(node)
            .into_iter()
            .find(|c| matches!(c.kind(), "const" | "let" | "var"))
            .map(|c| c.kind())
            .unwrap_or("var");
        let kind = if keyword == "const" {
            SymbolKind::Const
        } else {
            SymbolKind::Variable
        };

        let declarators: Vec<Node<'_>> = named_children(node)
            .into_iter()
            .filter(|n| n.kind() == "variable_declarator")
            .collect();
        let first = *declarators.first()?;

        let names: Vec<String> = declarators
            .iter()
            .filter_map(|d| field_text(*d, "name", self.source))
            .map(squash)
            .collect();
        let name = names.join(", ");

        let mut signature = format!("{}{keyword} {name}", prefix(&modifiers));
        let mut body_start = None;
        let mut members = Vec::new();

        if declarators.len() == 1 {
            if let Some(ty) = field_text(first, "type", self.source) {
                signature.push_str(&squash(ty));
            }
            if let Some(value) = first.child_by_field_name("value") {
                let value = unwrap_expression(value);
                if is_function_literal(value) {
                    signature.push_str(" = ");
                    signature.push_str(&self.function_literal_header(value));
                }
                let simple = first
                    .child_by_field_name("name")
                    .is_some_and(|n| n.kind() == "identifier");
                if simple {
                    let (start, nested) = self.value_members(value);
                    body_start = start;
                    members = nested;
                }
            }
        } else {
            for declarator in &declarators {
                let simple = declarator
                    .child_by_field_name("name")
                    .is_some_and(|n| n.kind() == "identifier");
                if let (true, Some(value)) = (simple, declarator.child_by_field_name("value")) {
                    members.extend(self.value_members(unwrap_expression(value)).1);
                }
            }
        }

        let (range, doc) = span(decl.outer, self.source);
        Some(self.symbol(
            kind, name, range, signature, modifiers, doc, body_start, members,
        ))
    }

    /// Nested members exposed by an assigned value
    fn value_members(&self, value: Node<'_>) -> (Option<TextPoint>, Vec<Symbol>) {
        match value.kind() {
            _ if is_function_literal(value) => {
                match value.child_by_field_name("body") {
                    Some(body) if body.kind() == "statement_block" => {
                        (Some(start_point(body)), self.block(body))
                    }
                    _ => (None, Vec::new()),
                }
            }
            "object" => (Some(start_point(value)), self.object_members(value)),
            "class" => match value.child_by_field_name("body") {
                Some(body) => (Some(start_point(body)), self.class_members(body)),
                None => (None, Vec::new()),
            },
            _ => (None, Vec::new()),
        }
    }

    fn object_members(&self, object: Node<'_>) -> Vec<Symbol> {
        let mut members = Vec::new();

        for member in named_children(object) {
            match member.kind() {
                "method_definition" => members.push(self.method(member)),
                "pair" => {
                    let Some(key) = field_text(member, "key", self.source) else {
                        continue;
                    };
                    let key = unquote(key).to_string();
                    let value = member.child_by_field_name("value").map(unwrap_expression);
                    let (range, doc) = span(member, self.source);

                    match value {
                        Some(value) if is_function_literal(value) => {
                            let mut modifiers = Modifiers::new();
                            collect_modifiers(value, self.source, &mut modifiers);
                            let signature = format!(
                                "{}{key}{}",
                                prefix(&modifiers),
                                self.callable_tail(value)
                            );
                            let (body_start, nested) = self.value_members(value);
                            members.push(self.symbol(
                                SymbolKind::Method,
                                key,
                                range,
                                signature,
                                modifiers,
                                doc,
                                body_start,
                                nested,
                            ));
                        }
                        Some(value) => {
                            let (body_start, nested) = self.value_members(value);
                            members.push(self.symbol(
                                SymbolKind::Property,
                                key.clone(),
                                range,
                                key,
                                Modifiers::new(),
                                doc,
                                body_start,
                                nested,
                            ));
                        }
                        None => {}
                    }
                }
                _ => {}
            }
        }

        finalize_siblings(
            members,
            Some(LineRange::new(start_line(object), end_line(object))),
        )
    }

    fn namespace(&self, decl: Decl<'_>, modifiers: Modifiers) -> Symbol {
        let node = decl.node;
        let keyword = if node.kind() == "module" {
            "module"
        } else {
            "namespace"
        };
        let raw_name = field_text(node, "name", self.source).unwrap_or_default();
        let signature = format!("{}{keyword} {}", prefix(&modifiers), squash(raw_name));

        let body = node.child_by_field_name("body");
        let (range, doc) = span(decl.outer, self.source);
        self.symbol(
            SymbolKind::Namespace,
            unquote(raw_name).to_string(),
            range,
            signature,
            modifiers,
            doc,
            body.map(start_point),
            body.map(|b| self.block(b)).unwrap_or_default(),
        )
    }

    /// `module.exports = ...`, `exports.name = ...` and friends
    fn legacy_export(&self, statement: Node<'_>) -> Option<Symbol> {
        let assignment = named_children(statement)
            .into_iter()
            .find(|n| n.kind() == "assignment_expression")?;
        let left = assignment.child_by_field_name("left")?;
        if left.kind() != "member_expression" {
            return None;
        }
        let target = squash(node_text(left, self.source));
        let captures = LEGACY_EXPORT_TARGET.captures(&target)?;
        let name = captures
            .get(1)
            .map_or_else(|| "module.exports".to_string(), |m| m.as_str().to_string());
        let value = assignment.child_by_field_name("right")?;

        Some(self.assigned_value(
            &name,
            value,
            statement,
            [Modifier::Exported].into_iter().collect(),
        ))
    }

    /// Synthetic exported variable for a value assigned to an export target
    fn assigned_value(
        &self,
        name: &str,
        value: Node<'_>,
        outer: Node<'_>,
        modifiers: Modifiers,
    ) -> Symbol {
        let value = unwrap_expression(value);
        let shown = if is_function_literal(value) {
            self.function_literal_header(value)
        } else {
            preview(node_text(value, self.source), self.config.max_inline_type_chars)
        };
        let signature = match name {
            "default" => format!("export default {shown}"),
            "export =" => format!("export = {shown}"),
            _ if outer.kind() == "expression_statement" => {
                format!("{} = {shown}", squash(assignment_target(outer, self.source)))
            }
            _ => format!("{name} = {shown}"),
        };

        let (body_start, members) = self.value_members(value);
        let (range, doc) = span(outer, self.source);
        self.symbol(
            SymbolKind::Variable,
            name.to_string(),
            range,
            signature,
            modifiers,
            doc,
            body_start,
            members,
        )
    }

    fn import_symbol(&self, node: Node<'_>, import: &ImportDecl) -> Symbol {
        let (range, doc) = span(node, self.source);
        self.symbol(
            SymbolKind::Import,
            import.source.clone(),
            range,
            squash(&import.text),
            Modifiers::new(),
            doc,
            None,
            Vec::new(),
        )
    }

    fn reexport_symbol(&self, node: Node<'_>) -> Option<Symbol> {
        let reexport = parse_reexport(node, self.source)?;
        let (range, doc) = span(node, self.source);
        Some(self.symbol(
            SymbolKind::ReExport,
            reexport.display_name(),
            range,
            squash(node_text(node, self.source)),
            [Modifier::Exported].into_iter().collect(),
            doc,
            None,
            Vec::new(),
        ))
    }

    fn expression_symbol(&self, node: Node<'_>) -> Symbol {
        let name = preview(
            node_text(node, self.source).trim_end_matches(';'),
            self.config.expression_preview_chars,
        );
        let (range, doc) = span(node, self.source);
        self.symbol(
            SymbolKind::Expression,
            name.clone(),
            range,
            name,
            Modifiers::new(),
            doc,
            None,
            Vec::new(),
        )
    }

    /// Root comments that were not absorbed as a statement's doc block
    fn orphan_comments(&self, comments: &[Node<'_>]) -> Vec<Symbol> {
        let mut blocks: Vec<(LineRange, String, bool)> = Vec::new();

        for comment in comments {
            let text = node_text(*comment, self.source);
            if is_doc_comment(text) && self.absorbed_by_next(*comment) {
                continue;
            }
            let range = LineRange::new(start_line(*comment), end_line(*comment));
            let is_line = text.starts_with("//");

            if let Some((last_range, last_text, last_is_line)) = blocks.last_mut() {
                if is_line && *last_is_line && last_range.end_line + 1 == range.start_line {
                    last_range.end_line = range.end_line;
                    last_text.push('\n');
                    last_text.push_str(text);
                    continue;
                }
            }
            blocks.push((range, text.to_string(), is_line));
        }

        blocks
            .into_iter()
            .map(|(range, text, _)| {
                let first_line = text.lines().next().unwrap_or_default().trim().to_string();
                self.symbol(
                    SymbolKind::Comment,
                    preview(&text, self.config.expression_preview_chars),
                    range,
                    first_line,
                    Modifiers::new(),
                    None,
                    None,
                    Vec::new(),
                )
            })
            .collect()
    }

    fn absorbed_by_next(&self, comment: Node<'_>) -> bool {
        comment
            .next_sibling()
            .filter(|next| next.kind() != "comment")
            .and_then(|next| leading_doc(next, self.source))
            .is_some_and(|doc| doc.id() == comment.id())
    }

    /// Type parameters, parameter list and return type of a callable
    fn callable_tail(&self, node: Node<'_>) -> String {
        let mut tail = String::new();
        if let Some(params) = field_text(node, "type_parameters", self.source) {
            tail.push_str(&squash(params));
        }
        match field_text(node, "parameters", self.source) {
            Some(params) => tail.push_str(params),
            None => match field_text(node, "parameter", self.source) {
                Some(param) => {
                    tail.push('(');
                    tail.push_str(param);
                    tail.push(')');
                }
                None => tail.push_str("()"),
            },
        }
        if let Some(ret) = field_text(node, "return_type", self.source) {
            tail.push_str(&squash(ret));
        }
        tail
    }

    /// Header of an assigned function literal, e.g. `async (a: T): R =>`
    fn function_literal_header(&self, value: Node<'_>) -> String {
        let mut modifiers = Modifiers::new();
        collect_modifiers(value, self.source, &mut modifiers);
        let asyncness = if modifiers.contains(Modifier::Async) {
            "async "
        } else {
            ""
        };
        if value.kind() == "arrow_function" {
            return format!("{asyncness}{} =>", self.callable_tail(value));
        }
        let star = if value.kind() == "generator_function" {
            "*"
        } else {
            ""
        };
        let name = field_text(value, "name", self.source)
            .map(|n| format!(" {n}"))
            .unwrap_or_default();
        format!("{asyncness}function{star}{name}{}", self.callable_tail(value))
    }

    #[allow(clippy::too_many_arguments)]
    fn symbol(
        &self,
        kind: SymbolKind,
        name: String,
        range: LineRange,
        signature: String,
        modifiers: Modifiers,
        doc: Option<String>,
        body_start: Option<TextPoint>,
        children: Vec<Symbol>,
    ) -> Symbol {
        Symbol {
            name,
            kind,
            depth: 0,
            parent_name: None,
            range,
            signature,
            exported: modifiers.contains(Modifier::Exported),
            modifiers,
            doc,
            body_start,
            children,
        }
    }

    fn is_reexport(node: Node<'_>) -> bool {
        node.child_by_field_name("declaration").is_none()
            && node.child_by_field_name("value").is_none()
            && !has_token(node, "=")
            && (node.child_by_field_name("source").is_some()
                || named_children(node)
                    .iter()
                    .any(|n| n.kind() == "export_clause"))
    }

    /// `namespace Foo {}` sometimes parses as an expression statement
    fn wrapped_namespace(node: Node<'_>) -> Option<Node<'_>> {
        if node.kind() != "expression_statement" {
            return None;
        }
        named_children(node)
            .into_iter()
            .find(|n| matches!(n.kind(), "internal_module" | "module"))
    }
}

/// Per-container counters for synthesized signature names
#[derive(Default)]
struct SignatureCounters {
    seen: HashMap<&'static str, usize>,
}

impl SignatureCounters {
    fn next(&mut self, label: &'static str) -> String {
        let counter = self.seen.entry(label).or_insert(0);
        let name = format!("({label}-{counter})");
        *counter += 1;
        name
    }
}

/// Sort siblings by start line and drop any that would overlap an earlier one
/// or escape the parent's range
pub(crate) fn finalize_siblings(mut siblings: Vec<Symbol>, parent: Option<LineRange>) -> Vec<Symbol> {
    siblings.sort_by(|a, b| {
        a.start_line()
            .cmp(&b.start_line())
            .then_with(|| b.end_line().cmp(&a.end_line()))
    });

    let mut out: Vec<Symbol> = Vec::with_capacity(siblings.len());
    for symbol in siblings {
        if parent.is_some_and(|range| !range.contains(&symbol.range)) {
            continue;
        }
        if out
            .last()
            .is_some_and(|prev| prev.range.overlaps(&symbol.range))
        {
            log::debug!(
                "Dropping {} '{}' at line {}: overlaps a previous sibling",
                symbol.kind,
                symbol.name,
                symbol.start_line()
            );
            continue;
        }
        out.push(symbol);
    }
    out
}

/// Collect modifier tokens that appear before a declaration's name
fn collect_modifiers(node: Node<'_>, source: &str, modifiers: &mut Modifiers) {
    let name_start = node
        .child_by_field_name("name")
        .map_or(usize::MAX, |n| n.start_byte());

    for child in children(node) {
        match child.kind() {
            "?" => modifiers.insert(Modifier::Optional),
            _ if child.start_byte() >= name_start => {}
            "async" => modifiers.insert(Modifier::Async),
            "static" => modifiers.insert(Modifier::Static),
            "abstract" => modifiers.insert(Modifier::Abstract),
            "readonly" => modifiers.insert(Modifier::Readonly),
            "declare" => modifiers.insert(Modifier::Declare),
            "override_modifier" => modifiers.insert(Modifier::Override),
            "*" => modifiers.insert(Modifier::Generator),
            "accessibility_modifier" => match node_text(child, source) {
                "private" => modifiers.insert(Modifier::Private),
                "protected" => modifiers.insert(Modifier::Protected),
                _ => modifiers.insert(Modifier::Public),
            },
            _ => {}
        }
    }
}

/// `get`/`set` keyword of an accessor, if any
fn accessor_kind(node: Node<'_>) -> Option<&'static str> {
    let name_start = node.child_by_field_name("name")?.start_byte();
    children(node)
        .into_iter()
        .filter(|c| !c.is_named() && c.start_byte() < name_start)
        .find_map(|c| match c.kind() {
            "get" => Some("get"),
            "set" => Some("set"),
            _ => None,
        })
}

/// Keywords of the modifiers that belong in a signature, in declaration order
fn prefix(modifiers: &Modifiers) -> String {
    modifiers
        .iter()
        .filter_map(Modifier::keyword)
        .map(|keyword| format!("{keyword} "))
        .collect()
}

fn is_function_literal(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
}

/// Strip parentheses and `as`/`satisfies` wrappers around a value
fn unwrap_expression(mut node: Node<'_>) -> Node<'_> {
    loop {
        match node.kind() {
            "parenthesized_expression" | "as_expression" | "satisfies_expression"
            | "non_null_expression" => match node.named_child(0) {
                Some(inner) => node = inner,
                None => return node,
            },
            _ => return node,
        }
    }
}

fn assignment_target<'s>(statement: Node<'_>, source: &'s str) -> &'s str {
    named_children(statement)
        .into_iter()
        .find(|n| n.kind() == "assignment_expression")
        .and_then(|a| a.child_by_field_name("left"))
        .map_or("", |left| node_text(left, source))
}
