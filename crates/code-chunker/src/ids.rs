use codeslice_symbols::SymbolKind;
use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Content-addressed chunk id.
///
/// Pure function of file path, kind, name, start line and the ancestor name chain, so
/// re-chunking identical content reproduces identical ids and same-named overloads
/// stay distinct through their start line.
#[must_use]
pub fn chunk_id(
    file_path: &str,
    kind: SymbolKind,
    name: &str,
    start_line: usize,
    parent_chain: &[String],
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_path.as_bytes());
    hasher.update(b"::");
    hasher.update(kind.as_str().as_bytes());
    hasher.update(b"::");
    hasher.update(name.as_bytes());
    hasher.update(b"::");
    hasher.update(start_line.to_string().as_bytes());
    hasher.update(b"::");
    hasher.update(parent_chain.join(">").as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(32);
    for byte in &digest[..16] {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_stable() {
        let a = chunk_id("src/a.ts", SymbolKind::Function, "run", 3, &[]);
        let b = chunk_id("src/a.ts", SymbolKind::Function, "run", 3, &[]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_overloads_differ_by_line() {
        let first = chunk_id("a.ts", SymbolKind::Function, "parse", 1, &[]);
        let second = chunk_id("a.ts", SymbolKind::Function, "parse", 2, &[]);
        assert_ne!(first, second);
    }

    #[test]
    fn test_parent_chain_participates() {
        let chain = vec!["Service".to_string()];
        let member = chunk_id("a.ts", SymbolKind::Method, "run", 5, &chain);
        let free = chunk_id("a.ts", SymbolKind::Method, "run", 5, &[]);
        assert_ne!(member, free);
    }
}
