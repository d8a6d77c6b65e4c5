//! Text utilities for the domain layer.

/// Truncate a string to at most `max_len` bytes, appending an ellipsis.
///
/// Truncation lands on a valid UTF-8 character boundary, so the result is
/// always well-formed even for multibyte input.
pub fn truncate_content(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&s[..end]);
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_is_unchanged() {
        assert_eq!(truncate_content("hello", 16), "hello");
        assert_eq!(truncate_content("", 0), "");
    }

    #[test]
    fn long_input_is_cut_with_ellipsis() {
        assert_eq!(truncate_content("hello world", 8), "hello...");
        let long = "x".repeat(5000);
        let cut = truncate_content(&long, 3000);
        assert_eq!(cut.len(), 3000);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Each kana is 3 bytes; the cut point falls inside one
        let cut = truncate_content("ツールの実行結果です", 10);
        assert!(cut.ends_with("..."));
        assert!(cut.is_char_boundary(cut.len()));
    }
}
