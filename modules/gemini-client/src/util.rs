//! Recovery helpers for model output. Generation responses are not guaranteed
//! to be bare JSON even when the request asks for it; these normalize the
//! payload before parsing.

/// Strip markdown code fences from a response.
pub fn strip_code_fences(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Keep only the span between the first `[` and the last `]`, inclusive.
/// Falls back to the input when no complete array span exists, so a parse
/// failure is reported against the full payload.
pub fn extract_array_span(response: &str) -> &str {
    match (response.find('['), response.rfind(']')) {
        (Some(start), Some(end)) if end > start => &response[start..=end],
        _ => response,
    }
}

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fences() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
        assert_eq!(strip_code_fences("{}"), "{}");
    }

    #[test]
    fn array_span_drops_surrounding_prose() {
        assert_eq!(
            extract_array_span("Here are the results: [1, 2, 3] Hope that helps!"),
            "[1, 2, 3]"
        );
        assert_eq!(extract_array_span("[]"), "[]");
    }

    #[test]
    fn array_span_keeps_input_without_brackets() {
        assert_eq!(extract_array_span("no json here"), "no json here");
        // A lone opening bracket is not a span
        assert_eq!(extract_array_span("[1, 2"), "[1, 2");
    }

    #[test]
    fn fenced_array_matches_bare_equivalent() {
        let bare = r#"[{"title":"x"}]"#;
        let fenced = format!("```json\n{bare}\n```");
        assert_eq!(extract_array_span(strip_code_fences(&fenced)), bare);
    }

    #[test]
    fn truncates_at_char_boundary() {
        let text = "Привет мир";
        let truncated = truncate_to_char_boundary(text, 9);
        assert!(truncated.len() <= 9);
        assert!(text.starts_with(truncated));
        assert_eq!(truncate_to_char_boundary("short", 100), "short");
    }
}
