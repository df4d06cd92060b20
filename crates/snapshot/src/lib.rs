//! # Codeslice Snapshot
//!
//! Minimal, syntactically valid excerpts of one file built around a set of target
//! chunks plus every same-file declaration they transitively depend on.
//!
//! ## Architecture
//!
//! ```text
//! targets (Chunk[]) + SourceIndex
//!     │
//!     ├──> Locate targets in the file's symbol tree, fold nested ones
//!     │
//!     ├──> Resolution (petgraph)
//!     │    ├─> Nodes: targets, enclosing containers, candidate declarations
//!     │    ├─> Edges: identifier references (bare names and this.members)
//!     │    └─> Dependencies = candidates reachable from targets
//!     │
//!     └──> Rendering
//!          ├─> // relative/path header
//!          ├─> imports (deduplicated), then declarations, in file order
//!          └─> targets, wrapped in synthesized containers when they are members
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codeslice_snapshot::{generate_snapshot, InMemorySourceIndex, SourceIndex};
//!
//! let source = "const LIMIT = 10;\n\nexport function clamp(n: number): number {\n  return Math.min(n, LIMIT);\n}\n";
//! let mut index = InMemorySourceIndex::new();
//! index.insert(source, "/repo/src/clamp.ts", "src/clamp.ts").unwrap();
//!
//! let file = index.file("/repo/src/clamp.ts").unwrap();
//! let target = file.chunk_named("clamp").unwrap().clone();
//! let snapshot = generate_snapshot(&index, &[target]).unwrap();
//!
//! assert_eq!(snapshot.dependency_count, 1);
//! assert!(snapshot.snapshot.starts_with("// src/clamp.ts\n\nconst LIMIT = 10;"));
//! ```

mod config;
mod error;
mod generator;
mod identifiers;
mod index;
mod render;
mod resolver;
mod types;

pub use config::SnapshotConfig;
pub use error::{Result, SnapshotError};
pub use generator::{generate_snapshot, generate_snapshots, SnapshotGenerator};
pub use index::{InMemorySourceIndex, IndexedFile, SourceIndex};
pub use types::{Dependency, DependencyKind, Snapshot};
