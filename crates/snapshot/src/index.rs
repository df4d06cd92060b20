//! Source access for snapshot generation.

use crate::error::Result;
use codeslice_chunker::{Chunk, ChunkedFile, Chunker};
use codeslice_symbols::{ParsedFile, SymbolExtractor};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;

/// A file's text together with its symbol tree and chunks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFile {
    pub parsed: ParsedFile,
    pub source: String,
    pub chunks: Vec<Chunk>,
}

impl IndexedFile {
    #[must_use]
    pub fn new(chunked: ChunkedFile, source: impl Into<String>) -> Self {
        Self {
            parsed: chunked.parsed_file,
            source: source.into(),
            chunks: chunked.chunks,
        }
    }

    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.parsed.relative_path
    }

    /// Look up a chunk by id
    #[must_use]
    pub fn chunk(&self, id: &str) -> Option<&Chunk> {
        self.chunks.iter().find(|chunk| chunk.id == id)
    }

    /// First chunk with a given name, in pre-order
    #[must_use]
    pub fn chunk_named(&self, name: &str) -> Option<&Chunk> {
        self.chunks.iter().find(|chunk| chunk.name == name)
    }
}

/// Lookup of indexed files by path
pub trait SourceIndex {
    fn file(&self, file_path: &str) -> Option<&IndexedFile>;
}

impl SourceIndex for HashMap<String, IndexedFile> {
    fn file(&self, file_path: &str) -> Option<&IndexedFile> {
        self.get(file_path)
    }
}

/// Index that parses and chunks files as they are inserted
#[derive(Default)]
pub struct InMemorySourceIndex {
    extractor: SymbolExtractor,
    chunker: Chunker,
    files: HashMap<String, IndexedFile>,
}

impl InMemorySourceIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom chunker for inserted files
    #[must_use]
    pub fn with_chunker(chunker: Chunker) -> Self {
        Self {
            chunker,
            ..Self::default()
        }
    }

    /// Parse, chunk and store a file, replacing any previous version
    pub fn insert(
        &mut self,
        source: impl Into<String>,
        file_path: &str,
        relative_path: &str,
    ) -> Result<&IndexedFile> {
        let source = source.into();
        let parsed = self
            .extractor
            .parse_with_relative(&source, file_path, relative_path)?;
        let chunked = self.chunker.chunk(parsed, &source);
        let file = IndexedFile::new(chunked, source);

        log::debug!(
            "Indexed {relative_path}: {} symbols, {} chunks",
            file.parsed.symbols.len(),
            file.chunks.len()
        );

        Ok(match self.files.entry(file_path.to_string()) {
            Entry::Occupied(mut entry) => {
                entry.insert(file);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(file),
        })
    }

    /// Read a file from disk and insert it under its workspace-relative path
    pub fn insert_file(
        &mut self,
        path: impl AsRef<Path>,
        workspace_root: impl AsRef<Path>,
    ) -> Result<&IndexedFile> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let relative = path
            .strip_prefix(workspace_root.as_ref())
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        let file_path = path.to_string_lossy().into_owned();

        self.insert(source, &file_path, &relative)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceIndex for InMemorySourceIndex {
    fn file(&self, file_path: &str) -> Option<&IndexedFile> {
        self.files.get(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnapshotError;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_insert_replaces_previous_version() {
        let mut index = InMemorySourceIndex::new();
        index
            .insert("export const a = 1;\n", "/repo/a.ts", "a.ts")
            .unwrap();
        index
            .insert("export const a = 1;\nexport const b = 2;\n", "/repo/a.ts", "a.ts")
            .unwrap();

        assert_eq!(index.len(), 1);
        let file = index.file("/repo/a.ts").unwrap();
        assert_eq!(file.chunks.len(), 2);
        assert!(file.chunk_named("b").is_some());
    }

    #[test]
    fn test_insert_file_uses_relative_path() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        std::fs::create_dir_all(&src).unwrap();
        let path = src.join("util.ts");
        std::fs::write(&path, "export function id<T>(x: T): T {\n  return x;\n}\n").unwrap();

        let mut index = InMemorySourceIndex::new();
        let file = index.insert_file(&path, dir.path()).unwrap();
        assert_eq!(file.relative_path(), "src/util.ts");
        assert_eq!(file.chunks[0].breadcrumb, "src/util.ts > id");

        let key = path.to_string_lossy().into_owned();
        assert!(index.file(&key).is_some());
    }

    #[test]
    fn test_insert_file_missing_is_io_error() {
        let dir = TempDir::new().unwrap();
        let mut index = InMemorySourceIndex::new();
        let err = index
            .insert_file(dir.path().join("missing.ts"), dir.path())
            .unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
        assert!(index.is_empty());
    }

    #[test]
    fn test_unsupported_extension_is_parse_error() {
        let mut index = InMemorySourceIndex::new();
        let err = index.insert("print(1)", "/repo/a.py", "a.py").unwrap_err();
        assert!(matches!(err, SnapshotError::Parse(_)));
    }
}
