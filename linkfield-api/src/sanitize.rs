//! Search-term normalization.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>?").expect("Invalid tag regex"));

static WHITESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Remove one level of backslash escaping (`\'` → `'`, `\\` → `\`).
pub fn unslash(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Normalize a raw search term.
///
/// Unslashes, strips markup, drops control characters, collapses
/// whitespace runs to one space and trims.
pub fn search_term(raw: &str) -> String {
    let unslashed = unslash(raw);
    let untagged = TAG_PATTERN.replace_all(&unslashed, "");
    let visible: String = untagged
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect();
    WHITESPACE_PATTERN
        .replace_all(&visible, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unslash() {
        assert_eq!(unslash(r"O\'Reilly"), "O'Reilly");
        assert_eq!(unslash(r"back\\slash"), r"back\slash");
        assert_eq!(unslash(r"trailing\"), "trailing");
    }

    #[test]
    fn test_search_term() {
        assert_eq!(search_term("  hello \t\n world  "), "hello world");
        assert_eq!(search_term("he\u{0}llo"), "hello");
        assert_eq!(search_term("<b>bold</b> move"), "bold move");
        assert_eq!(search_term(r#"say \"hi\""#), r#"say "hi""#);
        assert_eq!(search_term(""), "");
    }

    proptest! {
        #[test]
        fn prop_search_term_is_normalized(raw in "\\PC{0,40}") {
            let term = search_term(&raw);
            prop_assert_eq!(term.trim(), term.as_str());
            prop_assert!(!term.contains("  "));
            prop_assert!(!term.chars().any(char::is_control));
        }

        #[test]
        fn prop_search_term_is_idempotent_without_escapes(raw in "[a-zA-Z0-9 \t]{0,40}") {
            let once = search_term(&raw);
            prop_assert_eq!(search_term(&once), once);
        }
    }
}
