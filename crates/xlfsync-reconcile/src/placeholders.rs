use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Number of distinct positional indices referenced by `{n}`, `{n,align}` or
/// `{n:format}` tokens. Escaped braces (`{{`, `}}`) are not placeholders.
pub fn placeholder_count(s: &str) -> usize {
    static RE_POSITIONAL: OnceLock<Regex> = OnceLock::new();
    let re = RE_POSITIONAL.get_or_init(|| {
        Regex::new(r"\{\{|\}\}|\{(\d+)\s*(?:,\s*-?\d+\s*)?(?::[^{}]*)?\}").unwrap()
    });

    let mut indices = BTreeSet::new();
    for caps in re.captures_iter(s) {
        if let Some(idx) = caps.get(1) {
            indices.insert(idx.as_str().trim_start_matches('0').to_string());
        }
    }
    indices.len()
}
