//! Helpers for far2l's newline encoding inside quoted values.
//!
//! Multi-item lists are stored inside a single quoted value where item
//! boundaries are a literal two-character `\n`, not a real newline. These
//! helpers normalize the variants and split/join predictably.

/// Split a far2l-encoded block into items.
///
/// Normalizes `CRLF`/`CR` to `LF`, collapses nested backslash encodings
/// (`\\n` at any depth reduces one step at a time), converts the remaining
/// literal `\n` into real newlines, then splits and drops empty items.
pub fn split_items(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }

    let mut s = value.replace("\r\n", "\n").replace('\r', "\n");

    loop {
        let collapsed = s.replace("\\\\n", "\\n");
        if collapsed == s {
            break;
        }
        s = collapsed;
    }
    s = s.replace("\\n", "\n");

    s.split('\n')
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join items with real newlines, then encode every newline as the literal
/// two-character `\n` sequence used inside quoted blocks.
///
/// Inverse of [`split_items`] only when no item was empty or carried a real
/// newline of its own; those distinctions are not representable in the
/// on-disk encoding.
pub fn join_items<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        assert_eq!(split_items(r"a\nb\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_nested_backslashes() {
        assert_eq!(split_items(r"a\\nb\\nc"), vec!["a", "b", "c"]);
        assert_eq!(split_items(r"a\\\\nb"), vec!["a", "b"]);
    }

    #[test]
    fn test_split_real_newline_variants() {
        assert_eq!(split_items("x\r\ny\rz"), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_split_empty_and_blank_items() {
        assert!(split_items("").is_empty());
        assert_eq!(split_items(r"a\n\nb"), vec!["a", "b"]);
    }

    #[test]
    fn test_join_encodes_literal() {
        assert_eq!(join_items(&["one", "two", "three"]), r"one\ntwo\nthree");
    }

    #[test]
    fn test_join_escapes_embedded_newline() {
        assert_eq!(join_items(&["a\nb"]), r"a\nb");
    }

    #[test]
    fn test_split_join_inverse() {
        let items = vec!["pwd | pbcopy".to_string(), "/usr/bin/env".to_string()];
        assert_eq!(split_items(&join_items(&items)), items);
    }
}
