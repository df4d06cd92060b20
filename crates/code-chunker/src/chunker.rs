use crate::collapse::collapse;
use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::ids::chunk_id;
use crate::relevance::relevant_imports;
use crate::types::{Chunk, ChunkedFile};
use codeslice_symbols::{ParsedFile, Symbol, SymbolKind};

/// Main chunker interface: turns a symbol tree into a flat chunk arena
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
}

/// Ids assigned in the first pass, mirroring the chunkable part of the symbol tree
#[derive(Debug)]
struct IdNode {
    id: String,
    children: Vec<IdNode>,
}

impl Chunker {
    /// Create a new chunker with configuration
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate().map_err(ChunkerError::invalid_config)?;
        Ok(Self { config })
    }

    /// Chunk a parsed file.
    ///
    /// Ids are assigned over the whole tree first, then chunks are materialized
    /// depth-first so every parent precedes its children.
    pub fn chunk(&self, parsed: ParsedFile, source: &str) -> ChunkedFile {
        let lines: Vec<&str> = source.lines().collect();

        let mut chain = Vec::new();
        let ids: Vec<IdNode> = parsed
            .symbols
            .iter()
            .map(|symbol| assign_ids(&parsed.file_path, symbol, &mut chain))
            .collect();

        let mut builder = ChunkBuilder {
            config: &self.config,
            parsed: &parsed,
            lines: &lines,
            ancestors: Vec::new(),
            chunks: Vec::new(),
        };
        for (symbol, node) in parsed.symbols.iter().zip(&ids) {
            builder.visit(symbol, node, None);
        }
        let chunks = builder.chunks;

        log::debug!(
            "Chunked {}: {} chunks from {} root symbols",
            parsed.relative_path,
            chunks.len(),
            parsed.symbols.len()
        );

        ChunkedFile {
            parsed_file: parsed,
            chunks,
        }
    }

    /// Get configuration
    #[must_use]
    pub const fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Check a chunk's embedding text against the configured token budget
    #[must_use]
    pub fn exceeds_token_budget(&self, chunk: &Chunk) -> bool {
        chunk.estimated_tokens(self.config.chars_per_token) > self.config.token_budget
    }

    /// Get statistics about chunking
    #[must_use]
    pub fn get_stats(&self, chunks: &[Chunk]) -> ChunkingStats {
        let tokens: Vec<usize> = chunks
            .iter()
            .map(|chunk| chunk.estimated_tokens(self.config.chars_per_token))
            .collect();
        ChunkingStats {
            total_chunks: chunks.len(),
            root_chunks: chunks
                .iter()
                .filter(|chunk| chunk.parent_chunk_id.is_none())
                .count(),
            max_depth: chunks.iter().map(|chunk| chunk.depth).max().unwrap_or(0),
            total_tokens: tokens.iter().sum(),
            max_tokens: tokens.iter().copied().max().unwrap_or(0),
            over_budget: chunks
                .iter()
                .filter(|chunk| self.exceeds_token_budget(chunk))
                .count(),
        }
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            config: ChunkerConfig::default(),
        }
    }
}

/// Chunk a parsed file with the default configuration
pub fn chunk(parsed: ParsedFile, source: &str) -> ChunkedFile {
    Chunker::default().chunk(parsed, source)
}

/// Children that get their own chunk; one spanning exactly its parent's lines stays inlined
fn chunkable_children(symbol: &Symbol) -> impl Iterator<Item = &Symbol> {
    symbol
        .children
        .iter()
        .filter(move |child| child.range != symbol.range)
}

fn assign_ids(file_path: &str, symbol: &Symbol, chain: &mut Vec<String>) -> IdNode {
    let id = chunk_id(
        file_path,
        symbol.kind,
        &symbol.name,
        symbol.start_line(),
        chain,
    );
    chain.push(symbol.name.clone());
    let children = chunkable_children(symbol)
        .map(|child| assign_ids(file_path, child, chain))
        .collect();
    chain.pop();
    IdNode { id, children }
}

struct ChunkBuilder<'a> {
    config: &'a ChunkerConfig,
    parsed: &'a ParsedFile,
    lines: &'a [&'a str],
    ancestors: Vec<String>,
    chunks: Vec<Chunk>,
}

impl<'a> ChunkBuilder<'a> {
    fn visit(&mut self, symbol: &Symbol, node: &IdNode, parent_chunk_id: Option<&str>) {
        let kids: Vec<&Symbol> = chunkable_children(symbol).collect();

        let own_lines = self.own_lines(symbol);
        let full_source = own_lines.join("\n");
        let embedding_text = collapse(symbol, own_lines, &kids);

        let relevant = if self.config.include_relevant_imports
            && !matches!(
                symbol.kind,
                SymbolKind::Import | SymbolKind::ReExport | SymbolKind::Comment
            ) {
            relevant_imports(
                &self.parsed.imports,
                &full_source,
                self.config.max_imports_per_chunk,
            )
        } else {
            Vec::new()
        };

        let mut crumbs = vec![self.parsed.relative_path.as_str()];
        crumbs.extend(self.ancestors.iter().map(String::as_str));
        crumbs.push(symbol.name.as_str());
        let breadcrumb = crumbs.join(" > ");

        self.chunks.push(Chunk {
            id: node.id.clone(),
            file_path: self.parsed.file_path.clone(),
            relative_path: self.parsed.relative_path.clone(),
            node_kind: symbol.kind,
            name: symbol.name.clone(),
            parent_name: symbol.parent_name.clone(),
            parent_chunk_id: parent_chunk_id.map(str::to_string),
            child_chunk_ids: node.children.iter().map(|c| c.id.clone()).collect(),
            depth: symbol.depth,
            signature: symbol.signature.clone(),
            full_source,
            start_line: symbol.start_line(),
            end_line: symbol.end_line(),
            doc: symbol.doc.clone(),
            relevant_imports: relevant,
            embedding_text,
            breadcrumb,
        });

        self.ancestors.push(symbol.name.clone());
        for (child, child_node) in kids.into_iter().zip(&node.children) {
            self.visit(child, child_node, Some(&node.id));
        }
        self.ancestors.pop();
    }

    fn own_lines(&self, symbol: &Symbol) -> &'a [&'a str] {
        let lines = self.lines;
        let start = symbol.start_line().saturating_sub(1).min(lines.len());
        let end = symbol.end_line().min(lines.len()).max(start);
        &lines[start..end]
    }
}

/// Statistics about chunking results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub root_chunks: usize,
    pub max_depth: usize,
    pub total_tokens: usize,
    pub max_tokens: usize,
    pub over_budget: usize,
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} | Roots: {} | Depth: {} | Tokens: {} | Max: {} | Over budget: {}",
            self.total_chunks,
            self.root_chunks,
            self.max_depth,
            self.total_tokens,
            self.max_tokens,
            self.over_budget
        )
    }
}
