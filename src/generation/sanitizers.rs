//! Sanitizers for text and identifiers placed into generated source
//!
//! Doc text is flattened to a single comment-safe line. Identifiers go through
//! a [`NameScope`] so reserved words and duplicates never reach the output.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static UNICODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\u{2018}\u{2019}\u{201C}\u{201D}\u{2013}\u{2014}]").expect("valid unicode regex")
});
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Flattens free text into one line that is safe inside any comment style.
///
/// Smart quotes and long dashes become ASCII, whitespace collapses, and
/// comment terminators are broken up.
///
/// ```
/// use clientforge::generation::sanitizers::sanitize_doc;
///
/// assert_eq!(sanitize_doc("Find  pets\n  by “status”"), "Find pets by \"status\"");
/// assert_eq!(sanitize_doc("ends */ here"), "ends * / here");
/// ```
pub fn sanitize_doc(input: &str) -> String {
    let ascii = UNICODE_RE.replace_all(input, |caps: &regex::Captures| match &caps[0] {
        "\u{2018}" | "\u{2019}" => "'",
        "\u{201C}" | "\u{201D}" => "\"",
        _ => "-",
    });
    let flat = WS_RE.replace_all(ascii.trim(), " ");
    flat.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .replace("*/", "* /")
}

/// [`sanitize_doc`] plus escaping for a Python triple-quoted docstring
pub fn sanitize_python_doc(input: &str) -> String {
    sanitize_doc(input)
        .trim_end_matches(['"', '\\'])
        .replace('\\', "\\\\")
        .replace("\"\"\"", "\\\"\\\"\\\"")
}

/// Quotes `s` as a double-quoted literal valid in JSON, TOML, Python, TypeScript and Go
pub fn quoted(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""))
}

/// Quotes `s` as a Rust string literal
pub fn rust_quoted(s: &str) -> String {
    format!("{s:?}")
}

/// Identifier allocator for one naming scope (a method's parameters, a class's methods).
///
/// Reserved words get a trailing underscore; repeats get a numeric suffix.
#[derive(Debug, Clone)]
pub struct NameScope {
    reserved: &'static [&'static str],
    taken: HashSet<String>,
}

impl NameScope {
    pub fn new(reserved: &'static [&'static str]) -> Self {
        Self {
            reserved,
            taken: HashSet::new(),
        }
    }

    /// Marks `name` as used without allocating it
    pub fn occupy(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    /// Allocates a legal, unused identifier derived from `candidate`
    pub fn claim(&mut self, candidate: &str, fallback: &str) -> String {
        let mut base = if candidate.is_empty() {
            fallback.to_string()
        } else {
            candidate.to_string()
        };
        if base.starts_with(|c: char| c.is_ascii_digit()) {
            base.insert(0, '_');
            base.insert_str(0, fallback);
        }
        if self.reserved.contains(&base.as_str()) {
            base.push('_');
        }

        let mut name = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&name) {
            name = format!("{base}{suffix}");
            suffix += 1;
        }
        self.taken.insert(name.clone());
        name
    }
}
