use codeslice_symbols::ImportDecl;

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Whole-word occurrence of an identifier in text
pub(crate) fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    text.match_indices(word).any(|(at, _)| {
        let before = text[..at].chars().next_back();
        let after = text[at + word.len()..].chars().next();
        !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
    })
}

/// Literal texts of the imports whose introduced names appear in `text`.
///
/// Side-effect imports never match. `limit` of 0 means no cap.
pub(crate) fn relevant_imports(imports: &[ImportDecl], text: &str, limit: usize) -> Vec<String> {
    let matched = imports
        .iter()
        .filter(|import| !import.is_side_effect())
        .filter(|import| {
            import
                .local_names()
                .into_iter()
                .any(|name| contains_word(text, name))
        })
        .map(|import| import.text.clone());

    if limit == 0 {
        matched.collect()
    } else {
        matched.take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeslice_symbols::ImportBinding;

    fn import(text: &str, default_name: Option<&str>, named: &[(&str, &str)]) -> ImportDecl {
        ImportDecl {
            start_line: 1,
            end_line: 1,
            text: text.to_string(),
            source: "m".to_string(),
            type_only: false,
            default_name: default_name.map(str::to_string),
            namespace_name: None,
            named: named
                .iter()
                .map(|(imported, local)| ImportBinding {
                    imported: (*imported).to_string(),
                    local: (*local).to_string(),
                    type_only: false,
                })
                .collect(),
        }
    }

    #[test]
    fn test_contains_word_respects_boundaries() {
        assert!(contains_word("return fs.readFile(p)", "fs"));
        assert!(!contains_word("return ffs.readFile(p)", "fs"));
        assert!(!contains_word("const $fs = 1", "fs"));
        assert!(!contains_word("const fs_path = 1", "fs"));
        assert!(contains_word("(fs)", "fs"));
    }

    #[test]
    fn test_aliased_import_matches_local_name() {
        let imports = vec![import(
            "import { readFile as rf } from 'fs';",
            None,
            &[("readFile", "rf")],
        )];
        assert_eq!(
            relevant_imports(&imports, "rf(path)", 0),
            vec!["import { readFile as rf } from 'fs';".to_string()]
        );
        assert!(relevant_imports(&imports, "readFile(path)", 0).is_empty());
    }

    #[test]
    fn test_side_effect_imports_never_match() {
        let imports = vec![import("import './polyfill';", None, &[])];
        assert!(relevant_imports(&imports, "polyfill()", 0).is_empty());
    }

    #[test]
    fn test_limit_caps_matches() {
        let imports = vec![
            import("import a from 'a';", Some("a"), &[]),
            import("import b from 'b';", Some("b"), &[]),
        ];
        assert_eq!(relevant_imports(&imports, "a + b", 0).len(), 2);
        assert_eq!(relevant_imports(&imports, "a + b", 1).len(), 1);
    }
}
