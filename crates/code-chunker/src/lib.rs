//! # Codeslice Chunker
//!
//! Turns a symbol tree into a flat, content-addressed arena of embeddable chunks.
//!
//! ## Philosophy
//!
//! Every symbol becomes one chunk that carries two renderings of its text:
//! - `full_source`: the verbatim lines of the declaration
//! - `embedding_text`: the same lines with each nested body replaced by its signature,
//!   so a class embeds as an outline of its members instead of all their code
//!
//! Chunks link to each other through ids only, which makes the arena trivially
//! serializable and lets ids survive re-runs over unchanged content.
//!
//! ## Architecture
//!
//! ```text
//! ParsedFile (symbol tree)
//!     │
//!     ├──> Pass 1: content-hash ids
//!     │    └─> sha256(filePath::kind::name::startLine::parentChain)
//!     │
//!     └──> Pass 2: depth-first materialization
//!          ├─> Parent/child ids from pass 1
//!          ├─> Collapse body-bearing children to signature stubs
//!          ├─> Attach referenced imports
//!          └─> Emit Chunk[] in pre-order
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codeslice_chunker::{Chunker, ChunkerConfig};
//! use codeslice_symbols::SymbolExtractor;
//!
//! let source = "export function add(a: number, b: number): number {\n  return a + b;\n}\n";
//! let mut extractor = SymbolExtractor::default();
//! let parsed = extractor
//!     .parse_with_relative(source, "/repo/src/math.ts", "src/math.ts")
//!     .unwrap();
//!
//! let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
//! let file = chunker.chunk(parsed, source);
//! for chunk in &file.chunks {
//!     println!("{} ({}-{})", chunk.breadcrumb, chunk.start_line, chunk.end_line);
//! }
//! assert_eq!(file.chunks[0].breadcrumb, "src/math.ts > add");
//! ```

mod chunker;
mod collapse;
mod config;
mod error;
mod ids;
mod relevance;
mod types;

pub use chunker::{chunk, Chunker, ChunkingStats};
pub use config::ChunkerConfig;
pub use error::{ChunkerError, Result};
pub use ids::chunk_id;
pub use types::{estimate_tokens, Chunk, ChunkedFile};
