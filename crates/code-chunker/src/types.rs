use codeslice_symbols::{LineRange, ParsedFile, SymbolKind};
use serde::{Deserialize, Serialize};

/// An embeddable unit derived from one symbol
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Content hash identifying this chunk across runs
    pub id: String,

    /// Source file path
    pub file_path: String,

    /// Workspace-relative path
    pub relative_path: String,

    /// Kind of the symbol this chunk was built from
    pub node_kind: SymbolKind,

    pub name: String,

    pub parent_name: Option<String>,

    /// Id of the enclosing chunk (None at the file root)
    pub parent_chunk_id: Option<String>,

    /// Ids of the direct child chunks, in source order
    pub child_chunk_ids: Vec<String>,

    /// 0 for chunks at the file root
    pub depth: usize,

    pub signature: String,

    /// Verbatim text of the line range
    pub full_source: String,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Documentation block if available
    pub doc: Option<String>,

    /// Literal texts of the imports referenced by this chunk
    pub relevant_imports: Vec<String>,

    /// Full source with body-bearing children collapsed to their signatures
    pub embedding_text: String,

    /// "relativePath > ancestor > ... > name"
    pub breadcrumb: String,
}

impl Chunk {
    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check if chunk contains a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    #[must_use]
    pub const fn range(&self) -> LineRange {
        LineRange::new(self.start_line, self.end_line)
    }

    /// Rough token estimate of the embedding text
    #[must_use]
    pub fn estimated_tokens(&self, chars_per_token: usize) -> usize {
        estimate_tokens(&self.embedding_text, chars_per_token)
    }
}

/// Rough token estimate for a piece of text
#[must_use]
pub fn estimate_tokens(text: &str, chars_per_token: usize) -> usize {
    text.chars().count().div_ceil(chars_per_token.max(1))
}

/// A parsed file together with its chunk arena
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChunkedFile {
    pub parsed_file: ParsedFile,
    /// Chunks in depth-first pre-order
    pub chunks: Vec<Chunk>,
}

impl ChunkedFile {
    /// Look up a chunk by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Chunk> {
        self.chunks.iter().find(|chunk| chunk.id == id)
    }

    /// Chunks at the file root
    pub fn roots(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks
            .iter()
            .filter(|chunk| chunk.parent_chunk_id.is_none())
    }

    /// Direct children of a chunk, in source order
    #[must_use]
    pub fn children_of(&self, chunk: &Chunk) -> Vec<&Chunk> {
        chunk
            .child_chunk_ids
            .iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// Ancestors of a chunk, outermost first
    #[must_use]
    pub fn ancestors_of(&self, chunk: &Chunk) -> Vec<&Chunk> {
        let mut chain = Vec::new();
        let mut current = chunk.parent_chunk_id.as_deref();
        while let Some(id) = current {
            let Some(parent) = self.get(id) else {
                break;
            };
            chain.push(parent);
            current = parent.parent_chunk_id.as_deref();
        }
        chain.reverse();
        chain
    }

    /// Breadcrumb rebuilt by following parent links
    #[must_use]
    pub fn breadcrumb_of(&self, chunk: &Chunk) -> String {
        let mut parts = vec![chunk.relative_path.as_str()];
        parts.extend(self.ancestors_of(chunk).iter().map(|a| a.name.as_str()));
        parts.push(chunk.name.as_str());
        parts.join(" > ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens("", 4), 0);
        assert_eq!(estimate_tokens("abcd", 4), 1);
        assert_eq!(estimate_tokens("abcde", 4), 2);
    }
}
