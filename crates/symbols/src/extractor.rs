use crate::config::ExtractorConfig;
use crate::error::{ParseError, Result};
use crate::language::Language;
use crate::types::ParsedFile;
use crate::walker::Walker;
use std::collections::HashMap;
use tree_sitter::Parser;

/// Extracts symbol trees from source files.
///
/// Holds one tree-sitter parser per language. Parsing needs `&mut self`, so an
/// extractor belongs to a single worker; create one per thread instead of sharing.
pub struct SymbolExtractor {
    config: ExtractorConfig,
    parsers: HashMap<Language, Parser>,
}

impl SymbolExtractor {
    /// Create a new extractor with configuration
    #[must_use]
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            parsers: HashMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Parse a file whose workspace-relative path equals its path
    pub fn parse(&mut self, source: &str, file_path: &str) -> Result<ParsedFile> {
        self.parse_with_relative(source, file_path, file_path)
    }

    /// Parse a file, recording both its absolute and workspace-relative path
    pub fn parse_with_relative(
        &mut self,
        source: &str,
        file_path: &str,
        relative_path: &str,
    ) -> Result<ParsedFile> {
        let language = Language::from_path(file_path)?;

        let tree = self
            .parser_for(language)?
            .parse(source, None)
            .ok_or_else(|| {
                ParseError::syntax_invalid(file_path, "parser produced no syntax tree")
            })?;

        let root = tree.root_node();
        let has_syntax_errors = root.has_error();
        if has_syntax_errors {
            log::warn!("{file_path} parsed with syntax errors; extracting best-effort symbols");
        }

        let (symbols, imports) = Walker::new(source, &self.config).root(root);

        log::debug!(
            "Extracted {} root symbols and {} imports from {file_path}",
            symbols.len(),
            imports.len()
        );

        Ok(ParsedFile {
            file_path: file_path.to_string(),
            relative_path: relative_path.to_string(),
            language,
            symbols,
            imports,
            total_lines: source.lines().count(),
            has_syntax_errors,
        })
    }

    fn parser_for(&mut self, language: Language) -> Result<&mut Parser> {
        if !self.parsers.contains_key(&language) {
            let mut parser = Parser::new();
            parser
                .set_language(&language.tree_sitter_language())
                .map_err(|e| ParseError::tree_sitter(format!("Failed to set language: {e}")))?;
            self.parsers.insert(language, parser);
        }

        self.parsers
            .get_mut(&language)
            .ok_or_else(|| ParseError::tree_sitter("parser cache miss"))
    }
}

impl Default for SymbolExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

/// Parse one file with a throwaway extractor
pub fn parse(source: &str, file_path: &str) -> Result<ParsedFile> {
    SymbolExtractor::default().parse(source, file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension_fails_fast() {
        let err = parse("print('hi')", "script.py").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedExtension(ref ext) if ext == ".py"));
    }

    #[test]
    fn test_syntax_errors_are_reported_not_fatal() {
        let parsed = parse("function broken( {\n  return 1;\n}\n", "broken.ts").unwrap();
        assert!(parsed.has_syntax_errors);
    }

    #[test]
    fn test_clean_file_has_no_errors() {
        let parsed = parse("export const x = 1;\n", "clean.ts").unwrap();
        assert!(!parsed.has_syntax_errors);
        assert_eq!(parsed.total_lines, 1);
        assert_eq!(parsed.relative_path, "clean.ts");
    }

    #[test]
    fn test_extractor_reuses_parser_across_languages() {
        let mut extractor = SymbolExtractor::default();
        let ts = extractor.parse("const a = 1;\n", "a.ts").unwrap();
        let js = extractor.parse("const b = 2;\n", "b.js").unwrap();
        let ts_again = extractor.parse("const a = 1;\n", "a.ts").unwrap();
        assert_eq!(ts.language, Language::TypeScript);
        assert_eq!(js.language, Language::JavaScript);
        assert_eq!(ts, ts_again);
        assert_eq!(extractor.parsers.len(), 2);
    }
}
