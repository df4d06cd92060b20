//! # codeslice symbols
//!
//! Structural decomposition of TypeScript/JavaScript source files into a symbol tree.
//!
//! ## Architecture
//!
//! ```text
//! Source Code + path
//!     │
//!     ├──> Language Detection (from extension, fails fast when unknown)
//!     │
//!     ├──> Tree-sitter Parsing → AST (syntax errors reported, not fatal)
//!     │
//!     └──> Walk
//!          ├─> Declarations (functions, classes, interfaces, enums, variables, namespaces)
//!          ├─> Nested scopes (class members, bodies, object literals, type members)
//!          ├─> Legacy exports (module.exports / exports.name)
//!          └─> Root content (imports, re-exports, expressions, orphan comments)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codeslice_symbols::{parse, SymbolKind};
//!
//! let code = "export function greet(name: string): string {\n  return `hi ${name}`;\n}\n";
//! let parsed = parse(code, "greet.ts").unwrap();
//! assert_eq!(parsed.symbols[0].kind, SymbolKind::Function);
//! assert_eq!(parsed.symbols[0].signature, "export function greet(name: string): string");
//! ```

mod config;
mod error;
mod extractor;
mod imports;
mod language;
mod text;
mod types;
mod walker;

pub use config::ExtractorConfig;
pub use error::{ParseError, Result};
pub use extractor::{parse, SymbolExtractor};
pub use language::Language;
pub use types::{
    ImportBinding, ImportDecl, LineRange, Modifier, Modifiers, ParsedFile, Symbol, SymbolKind,
    TextPoint,
};
