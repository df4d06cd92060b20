//! Lexical identifier scanning for dependency resolution.
//!
//! This is a whole-word heuristic over raw text, not a binder: there is no scope or
//! shadowing analysis, so a local that shadows a top-level name still counts as a
//! reference to it.

use std::collections::BTreeSet;

const RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
    "function", "if", "import", "in", "instanceof", "let", "new", "null", "return", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "with", "yield",
];

/// Identifiers referenced by a piece of source text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct References {
    /// Free identifiers (not the right-hand side of a member access)
    pub names: BTreeSet<String>,
    /// Names accessed as `this.name`
    pub this_members: BTreeSet<String>,
    /// `(owner, name)` pairs accessed as `Owner.name` through a bare identifier
    pub qualified: BTreeSet<(String, String)>,
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$' || c == '#'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Whether `text` is a plain identifier
pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| is_ident_start(c) && c != '#')
        && chars.all(is_ident_part)
}

enum Access {
    Free,
    Member,
    ThisMember,
    Qualified(String),
}

/// Classify the identifier starting at `start` by what precedes it
fn access_before(chars: &[char], start: usize) -> Access {
    let mut j = start;
    while j > 0 && chars[j - 1].is_whitespace() {
        j -= 1;
    }
    if j == 0 || chars[j - 1] != '.' {
        return Access::Free;
    }
    // `...spread`
    if j >= 3 && chars[j - 2] == '.' && chars[j - 3] == '.' {
        return Access::Free;
    }

    let mut k = j - 1;
    if k > 0 && chars[k - 1] == '?' {
        k -= 1;
    }
    while k > 0 && chars[k - 1].is_whitespace() {
        k -= 1;
    }
    let mut s = k;
    while s > 0 && is_ident_part(chars[s - 1]) {
        s -= 1;
    }
    if s == k || chars[s].is_ascii_digit() || (s > 0 && matches!(chars[s - 1], '.' | '#')) {
        return Access::Member;
    }
    let object: String = chars[s..k].iter().collect();
    match object.as_str() {
        "this" => Access::ThisMember,
        word if RESERVED.contains(&word) => Access::Member,
        _ => Access::Qualified(object),
    }
}

/// Whether a `/` at `i` starts a regex literal rather than a division
fn starts_regex(chars: &[char], i: usize) -> bool {
    let mut j = i;
    while j > 0 && chars[j - 1].is_whitespace() {
        j -= 1;
    }
    let Some(&prev) = j.checked_sub(1).and_then(|p| chars.get(p)) else {
        return true;
    };
    if matches!(prev, ')' | ']' | '}') {
        return false;
    }
    if !is_ident_part(prev) {
        return true;
    }
    // Keywords after which an expression starts
    let mut s = j;
    while s > 0 && is_ident_part(chars[s - 1]) {
        s -= 1;
    }
    let word: String = chars[s..j].iter().collect();
    matches!(
        word.as_str(),
        "return" | "typeof" | "instanceof" | "in" | "of" | "new" | "delete" | "void" | "throw"
            | "case" | "do" | "else" | "yield" | "await"
    )
}

/// Skip a regex literal whose opening `/` is at `i`, returning the position after its flags
fn skip_regex(chars: &[char], mut i: usize) -> usize {
    let mut in_class = false;
    i += 1;
    while let Some(&c) = chars.get(i) {
        match c {
            '\\' => i += 2,
            '\n' => return i,
            '[' => {
                in_class = true;
                i += 1;
            }
            ']' => {
                in_class = false;
                i += 1;
            }
            '/' if !in_class => {
                i += 1;
                while i < chars.len() && is_ident_part(chars[i]) {
                    i += 1;
                }
                return i;
            }
            _ => i += 1,
        }
    }
    i
}

/// Skip template literal text starting at `i`.
///
/// Returns the position after the closing backtick, or after a `${` along with `true`.
fn skip_template(chars: &[char], mut i: usize) -> (usize, bool) {
    while let Some(&c) = chars.get(i) {
        match c {
            '\\' => i += 2,
            '`' => return (i + 1, false),
            '$' if chars.get(i + 1) == Some(&'{') => return (i + 2, true),
            _ => i += 1,
        }
    }
    (i, false)
}

/// Collect referenced identifiers, skipping comments and string literals
pub(crate) fn scan(text: &str) -> References {
    let chars: Vec<char> = text.chars().collect();
    let mut refs = References::default();
    // Open-brace depth inside each active `${ ... }`
    let mut templates: Vec<usize> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            '/' if next == Some('/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if next == Some('*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
            }
            '/' if starts_regex(&chars, i) => i = skip_regex(&chars, i),
            '\'' | '"' => {
                i += 1;
                while let Some(&ch) = chars.get(i) {
                    i += 1;
                    if ch == '\\' {
                        i += 1;
                    } else if ch == c || ch == '\n' {
                        break;
                    }
                }
            }
            '`' => {
                let (after, in_expr) = skip_template(&chars, i + 1);
                i = after;
                if in_expr {
                    templates.push(0);
                }
            }
            '{' => {
                if let Some(depth) = templates.last_mut() {
                    *depth += 1;
                }
                i += 1;
            }
            '}' => match templates.last().copied() {
                Some(0) => {
                    templates.pop();
                    let (after, in_expr) = skip_template(&chars, i + 1);
                    i = after;
                    if in_expr {
                        templates.push(0);
                    }
                }
                Some(_) => {
                    if let Some(depth) = templates.last_mut() {
                        *depth -= 1;
                    }
                    i += 1;
                }
                None => i += 1,
            },
            c if c.is_ascii_digit() => {
                while i < chars.len() && is_ident_part(chars[i]) {
                    i += 1;
                }
            }
            c if is_ident_start(c) => {
                let start = i;
                i += 1;
                while i < chars.len() && is_ident_part(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                match access_before(&chars, start) {
                    Access::ThisMember => {
                        refs.this_members.insert(word);
                    }
                    Access::Member => {}
                    Access::Qualified(object) => {
                        refs.qualified.insert((object, word));
                    }
                    Access::Free => {
                        if !word.starts_with('#') && !RESERVED.contains(&word.as_str()) {
                            refs.names.insert(word);
                        }
                    }
                }
            }
            _ => i += 1,
        }
    }

    refs
}

/// Names bound by a declaration pattern such as `a, b`, `{ a, b: c = 1 }` or `[x, ...rest]`.
///
/// Property keys and default values are skipped.
pub(crate) fn bound_names(pattern: &str) -> Vec<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut names = Vec::new();
    let mut depth = 0usize;
    // Depth at which a default value is being skipped
    let mut skipping: Option<usize> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '{' | '[' | '(' => {
                depth += 1;
                i += 1;
            }
            '}' | ']' | ')' => {
                depth = depth.saturating_sub(1);
                if skipping.is_some_and(|d| depth < d) {
                    skipping = None;
                }
                i += 1;
            }
            ',' => {
                if skipping == Some(depth) {
                    skipping = None;
                }
                i += 1;
            }
            '=' if skipping.is_none() => {
                skipping = Some(depth);
                i += 1;
            }
            '\'' | '"' | '`' => {
                i += 1;
                while i < chars.len() && chars[i] != c {
                    if chars[i] == '\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            c if is_ident_start(c) => {
                let start = i;
                i += 1;
                while i < chars.len() && is_ident_part(chars[i]) {
                    i += 1;
                }
                if skipping.is_some() {
                    continue;
                }
                let mut j = i;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                let is_key = chars.get(j) == Some(&':');
                let word: String = chars[start..i].iter().collect();
                if !is_key && is_identifier(&word) {
                    names.push(word);
                }
            }
            _ => i += 1,
        }
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(refs: &References) -> Vec<&str> {
        refs.names.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_member_access_excluded() {
        let refs = scan("return config.retries + MAX;");
        assert_eq!(names(&refs), vec!["MAX", "config"]);
    }

    #[test]
    fn test_this_members_collected_separately() {
        let refs = scan("this.count += this?.step; other.count = 1;");
        assert_eq!(
            refs.this_members.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["count", "step"]
        );
        assert_eq!(names(&refs), vec!["other"]);
    }

    #[test]
    fn test_qualified_members_keyed_by_owner() {
        let refs = scan("return n < Cfg.LIMIT && Cfg?.other.deep > a.b.c && super.x;");
        let qualified: Vec<(&str, &str)> = refs
            .qualified
            .iter()
            .map(|(owner, name)| (owner.as_str(), name.as_str()))
            .collect();
        assert_eq!(
            qualified,
            vec![("Cfg", "LIMIT"), ("Cfg", "other"), ("a", "b")]
        );
        assert_eq!(names(&refs), vec!["Cfg", "a", "n"]);
        assert!(refs.this_members.is_empty());
    }

    #[test]
    fn test_regex_literals_skipped() {
        let refs = scan("const quoted = /\"[a-z/]+/gi.test(input) ? Quote : Plain;");
        assert_eq!(names(&refs), vec!["Plain", "Quote", "input", "quoted"]);

        let refs = scan("return /'/.exec(raw) || fallback;");
        assert_eq!(names(&refs), vec!["fallback", "raw"]);
    }

    #[test]
    fn test_division_is_not_a_regex() {
        let refs = scan("const ratio = total / count / (limit) / 2;");
        assert_eq!(names(&refs), vec!["count", "limit", "ratio", "total"]);
    }

    #[test]
    fn test_comments_and_strings_skipped() {
        let refs = scan("// Hidden\n/* Gone */ log('Quoted', \"Also\", x);");
        assert_eq!(names(&refs), vec!["log", "x"]);
    }

    #[test]
    fn test_template_expressions_scanned() {
        let refs = scan("`plain ${prefix} text ${fmt({ a: value })}` + tail");
        assert_eq!(names(&refs), vec!["a", "fmt", "prefix", "tail", "value"]);
    }

    #[test]
    fn test_spread_is_free_reference() {
        let refs = scan("const merged = { ...DEFAULTS, ...overrides.inner };");
        assert_eq!(names(&refs), vec!["DEFAULTS", "merged", "overrides"]);
    }

    #[test]
    fn test_keywords_and_numbers_ignored() {
        let refs = scan("if (x > 10e3) { return new Map(); }");
        assert_eq!(names(&refs), vec!["Map", "x"]);
    }

    #[test]
    fn test_bound_names() {
        assert_eq!(bound_names("MAX_RETRIES"), vec!["MAX_RETRIES"]);
        assert_eq!(bound_names("a, b"), vec!["a", "b"]);
        assert_eq!(bound_names("{ a, b: c = DEFAULT }"), vec!["a", "c"]);
        assert_eq!(bound_names("[first, ...rest]"), vec!["first", "rest"]);
        assert_eq!(bound_names("{ nested: { deep = 1 }, other }"), vec!["deep", "other"]);
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("$el"));
        assert!(is_identifier("_private"));
        assert!(!is_identifier("module.exports"));
        assert!(!is_identifier("export ="));
        assert!(!is_identifier("#field"));
    }
}
