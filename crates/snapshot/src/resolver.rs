//! Same-file dependency resolution.
//!
//! Targets, the containers enclosing them, and every candidate declaration become
//! nodes of a directed graph with an edge for each identifier reference. The
//! dependencies of a snapshot are the candidates reachable from the targets.

use crate::identifiers::{bound_names, is_identifier, scan, References};
use crate::index::IndexedFile;
use crate::render::{header_text, line_span};
use crate::types::DependencyKind;
use codeslice_chunker::Chunk;
use codeslice_symbols::{ImportDecl, LineRange, Symbol, SymbolKind};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::ptr;

/// A target chunk located in its file's symbol tree
#[derive(Debug, Clone)]
pub(crate) struct Target<'f> {
    pub name: String,
    pub range: LineRange,
    pub text: String,
    /// Enclosing symbols, outermost first
    pub ancestors: Vec<&'f Symbol>,
}

/// A declaration pulled into the snapshot
#[derive(Debug, Clone)]
pub(crate) struct Resolved<'f> {
    pub kind: DependencyKind,
    pub name: String,
    pub range: LineRange,
    pub text: String,
    /// Container this member belongs to
    pub owner: Option<&'f Symbol>,
}

#[derive(Debug)]
pub(crate) struct Resolution<'f> {
    /// Reachable declarations in file order
    pub dependencies: Vec<Resolved<'f>>,
    /// Containers enclosing at least one target, in file order
    pub containers: Vec<&'f Symbol>,
}

/// Find a chunk's symbol and its ancestors
pub(crate) fn locate<'f>(file: &'f IndexedFile, lines: &[&str], chunk: &Chunk) -> Target<'f> {
    let mut path = Vec::new();
    if find_path(&file.parsed.symbols, chunk, &mut path) {
        if let Some(symbol) = path.pop() {
            return Target {
                name: chunk.name.clone(),
                range: symbol.range,
                text: line_span(lines, symbol.range),
                ancestors: path,
            };
        }
    }

    log::warn!(
        "Chunk {} ({}:{}-{}) not found in the indexed symbol tree; rendering it verbatim",
        chunk.name,
        chunk.relative_path,
        chunk.start_line,
        chunk.end_line
    );
    Target {
        name: chunk.name.clone(),
        range: chunk.range(),
        text: chunk.full_source.clone(),
        ancestors: Vec::new(),
    }
}

fn find_path<'f>(symbols: &'f [Symbol], chunk: &Chunk, path: &mut Vec<&'f Symbol>) -> bool {
    let wanted = chunk.range();
    for symbol in symbols {
        if !symbol.range.contains(&wanted) {
            continue;
        }
        path.push(symbol);
        if symbol.range == wanted && symbol.kind == chunk.node_kind && symbol.name == chunk.name {
            return true;
        }
        if find_path(&symbol.children, chunk, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Drop targets nested inside another target
pub(crate) fn fold_targets<'f>(mut targets: Vec<Target<'f>>) -> Vec<Target<'f>> {
    targets.sort_by_key(|target| (target.range.start_line, Reverse(target.range.end_line)));
    let mut kept: Vec<Target<'f>> = Vec::with_capacity(targets.len());
    for target in targets {
        if kept.iter().any(|outer| outer.range.contains(&target.range)) {
            log::debug!("Folding target {} into an enclosing target", target.name);
            continue;
        }
        kept.push(target);
    }
    kept
}

struct Node<'f> {
    range: LineRange,
    refs: References,
    /// None for targets and containers
    candidate: Option<Resolved<'f>>,
}

fn is_declared_binding(symbol: &Symbol) -> bool {
    symbol
        .signature
        .split_whitespace()
        .find(|word| !matches!(*word, "export" | "declare"))
        .is_some_and(|word| matches!(word, "const" | "let" | "var"))
}

fn is_member_name(name: &str) -> bool {
    is_identifier(name.strip_prefix('#').unwrap_or(name))
}

/// Candidate for an import statement, with the local names it binds
fn import_candidate<'f>(import: &ImportDecl) -> (Resolved<'f>, Vec<String>) {
    let binds: Vec<String> = import
        .local_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let type_only = !binds.is_empty() && binds.iter().all(|name| import.is_type_binding(name));
    let kind = if type_only {
        DependencyKind::TypeImport
    } else {
        DependencyKind::Import
    };
    let resolved = Resolved {
        kind,
        name: import.source.clone(),
        range: LineRange::new(import.start_line, import.end_line),
        text: import.text.clone(),
        owner: None,
    };
    (resolved, binds)
}

/// Candidate for a top-level declaration, with the names it binds
fn top_level_candidate<'f>(
    lines: &[&str],
    symbol: &'f Symbol,
) -> Option<(Resolved<'f>, Vec<String>)> {
    let kind = match symbol.kind {
        SymbolKind::Const if is_declared_binding(symbol) => DependencyKind::Constant,
        SymbolKind::Variable if is_declared_binding(symbol) => DependencyKind::Variable,
        SymbolKind::Type => DependencyKind::TypeAlias,
        SymbolKind::Interface => DependencyKind::Interface,
        SymbolKind::Enum => DependencyKind::Enum,
        SymbolKind::Function => DependencyKind::Function,
        SymbolKind::Class | SymbolKind::Namespace => DependencyKind::Other,
        _ => return None,
    };

    let binds: Vec<String> = match symbol.kind {
        SymbolKind::Const | SymbolKind::Variable => bound_names(&symbol.name),
        // `A.B.C` binds `A`
        SymbolKind::Namespace => symbol
            .name
            .split('.')
            .next()
            .map(str::to_string)
            .into_iter()
            .collect(),
        _ => vec![symbol.name.clone()],
    };
    let binds: Vec<String> = binds.into_iter().filter(|n| is_identifier(n)).collect();

    let resolved = Resolved {
        kind,
        name: symbol.name.clone(),
        range: symbol.range,
        text: line_span(lines, symbol.range),
        owner: None,
    };
    Some((resolved, binds))
}

/// Candidate for a property-like member of an enclosing container
fn member_candidate<'f>(
    lines: &[&str],
    owner: &'f Symbol,
    member: &Symbol,
) -> Option<(Resolved<'f>, Vec<String>)> {
    let binds = match member.kind {
        SymbolKind::Property if is_member_name(&member.name) => vec![member.name.clone()],
        SymbolKind::Const | SymbolKind::Variable if is_declared_binding(member) => {
            bound_names(&member.name)
        }
        _ => return None,
    };

    let resolved = Resolved {
        kind: DependencyKind::MemberProperty,
        name: member.name.clone(),
        range: member.range,
        text: line_span(lines, member.range),
        owner: Some(owner),
    };
    Some((resolved, binds))
}

/// Whether a candidate is in scope for code spanning `from`
fn visible(candidate: &Resolved<'_>, from: &LineRange) -> bool {
    candidate
        .owner
        .map_or(true, |owner| owner.range.contains(from))
}

/// Whether a candidate is a member of a container reachable as `object`
fn owned_by(candidate: &Resolved<'_>, object: &str) -> bool {
    candidate
        .owner
        .is_some_and(|owner| owner.name.rsplit('.').next() == Some(object))
}

/// Resolve the transitive same-file dependencies of a set of folded targets
pub(crate) fn resolve<'f>(
    file: &'f IndexedFile,
    lines: &[&str],
    targets: &[Target<'f>],
) -> Resolution<'f> {
    let mut containers: Vec<&'f Symbol> = Vec::new();
    for target in targets {
        for &ancestor in &target.ancestors {
            if !containers.iter().any(|seen| ptr::eq(*seen, ancestor)) {
                containers.push(ancestor);
            }
        }
    }
    containers.sort_by_key(|container| (container.start_line(), container.depth));

    let target_ranges: Vec<LineRange> = targets.iter().map(|target| target.range).collect();
    let blocked = |range: &LineRange| target_ranges.iter().any(|t| t.overlaps(range));

    let mut graph: DiGraph<Node<'f>, ()> = DiGraph::new();
    let mut seeds = Vec::new();
    let mut binders: HashMap<String, Vec<NodeIndex>> = HashMap::new();

    for target in targets {
        seeds.push(graph.add_node(Node {
            range: target.range,
            refs: scan(&target.text),
            candidate: None,
        }));
    }
    for &container in &containers {
        seeds.push(graph.add_node(Node {
            range: container.range,
            refs: scan(&header_text(container, lines)),
            candidate: None,
        }));
    }

    // Imports come from the statement list; root import symbols sharing a line are merged
    let mut candidates: Vec<(Resolved<'f>, Vec<String>)> =
        file.parsed.imports.iter().map(import_candidate).collect();
    for symbol in &file.parsed.symbols {
        if symbol.kind == SymbolKind::Import || blocked(&symbol.range) {
            continue;
        }
        candidates.extend(top_level_candidate(lines, symbol));
    }
    for &container in &containers {
        for member in &container.children {
            if blocked(&member.range) {
                continue;
            }
            candidates.extend(member_candidate(lines, container, member));
        }
    }

    for (candidate, binds) in candidates {
        let refs = if candidate.kind.is_import() {
            References::default()
        } else {
            scan(&candidate.text)
        };
        let index = graph.add_node(Node {
            range: candidate.range,
            refs,
            candidate: Some(candidate),
        });
        for name in binds {
            binders.entry(name).or_default().push(index);
        }
    }

    let mut edges = Vec::new();
    for from in graph.node_indices() {
        let node = &graph[from];
        let bare = node.refs.names.iter().flat_map(|name| binders.get(name));
        let members = node
            .refs
            .this_members
            .iter()
            .flat_map(|name| binders.get(name));

        for &to in bare.flatten() {
            if let Some(candidate) = &graph[to].candidate {
                if to != from && visible(candidate, &node.range) {
                    edges.push((from, to));
                }
            }
        }
        for &to in members.flatten() {
            if let Some(candidate) = &graph[to].candidate {
                if to != from && candidate.owner.is_some() && visible(candidate, &node.range) {
                    edges.push((from, to));
                }
            }
        }
        for (object, name) in &node.refs.qualified {
            for &to in binders.get(name).into_iter().flatten() {
                if let Some(candidate) = &graph[to].candidate {
                    if to != from && owned_by(candidate, object) {
                        edges.push((from, to));
                    }
                }
            }
        }
    }
    for (from, to) in edges {
        graph.update_edge(from, to, ());
    }

    let mut reached = HashSet::new();
    let mut dfs = Dfs::empty(&graph);
    for seed in seeds {
        dfs.move_to(seed);
        while let Some(index) = dfs.next(&graph) {
            reached.insert(index);
        }
    }

    let mut dependencies: Vec<Resolved<'f>> = graph
        .node_indices()
        .filter(|index| reached.contains(index))
        .filter_map(|index| graph[index].candidate.clone())
        .collect();
    dependencies.sort_by_key(|dep| (dep.range.start_line, dep.range.end_line));

    log::debug!(
        "Resolved {} dependencies for {} targets across {} candidate nodes",
        dependencies.len(),
        targets.len(),
        graph.node_count()
    );

    Resolution {
        dependencies,
        containers,
    }
}
