//! Key normalization and duplicate sub-key rendering.

use super::constants::MAX_KEY_BYTES;
use super::node::ElementId;

/// Trims leading and trailing ASCII whitespace and truncates the result to
/// [`MAX_KEY_BYTES`] bytes. Returns an empty slice when nothing remains;
/// callers treat that as "nothing to do". Comparison throughout the index
/// is byte-wise, so truncation may split a multi-byte character.
pub(crate) fn normalize(input: &str) -> &[u8] {
    let trimmed = input
        .trim_matches(|c: char| c.is_ascii_whitespace())
        .as_bytes();
    &trimmed[..trimmed.len().min(MAX_KEY_BYTES)]
}

/// Renders an element number as its decimal ASCII form, the key used inside
/// a duplicates sub-branch.
pub(crate) fn decimal_key(element: ElementId) -> Vec<u8> {
    element.to_string().into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_ascii_whitespace() {
        assert_eq!(normalize("  hello  "), b"hello");
        assert_eq!(normalize("\t\nhello\r "), b"hello");
        assert_eq!(normalize("hello"), b"hello");
    }

    #[test]
    fn test_normalize_empty_results() {
        assert_eq!(normalize(""), b"");
        assert_eq!(normalize("   "), b"");
        assert_eq!(normalize("\t\r\n"), b"");
    }

    #[test]
    fn test_normalize_truncates_to_32_bytes() {
        let long = "a".repeat(40);
        assert_eq!(normalize(&long).len(), 32);
        assert_eq!(normalize(&long), "a".repeat(32).as_bytes());

        let exact = "b".repeat(32);
        assert_eq!(normalize(&exact), exact.as_bytes());
    }

    #[test]
    fn test_normalize_trims_before_truncating() {
        let padded = format!("   {}", "c".repeat(40));
        assert_eq!(normalize(&padded), "c".repeat(32).as_bytes());
    }

    #[test]
    fn test_normalize_keeps_interior_whitespace() {
        assert_eq!(normalize(" a b "), b"a b");
    }

    #[test]
    fn test_decimal_key() {
        assert_eq!(decimal_key(0), b"0");
        assert_eq!(decimal_key(42), b"42");
        assert_eq!(decimal_key(-17), b"-17");
        assert_eq!(decimal_key(i64::MAX), i64::MAX.to_string().into_bytes());
    }
}
