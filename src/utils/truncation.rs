/// Character budget for a single news/update description in the prompt.
pub const NEWS_DESCRIPTION_BUDGET: usize = 500;
const MAX_ERROR_LENGTH: usize = 2_000;
const TRUNCATION_MARKER: &str = "...";

/// Keep at most `max_chars` characters, appending `...` when anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
    }
}

pub fn truncate_error(error: &str) -> String {
    truncate_chars(error, MAX_ERROR_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
    }

    #[test]
    fn test_long_text_marked() {
        assert_eq!(truncate_chars("hello world", 5), "hello...");
    }

    #[test]
    fn test_multibyte_boundary() {
        let text = "ééééé";
        assert_eq!(truncate_chars(text, 2), "éé...");
    }

    #[test]
    fn test_truncate_error_budget() {
        let long = "x".repeat(3_000);
        let out = truncate_error(&long);
        assert_eq!(out.len(), 2_000 + 3);
        assert!(out.ends_with("..."));
    }
}
