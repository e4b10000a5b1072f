//! Small helpers shared across the pipeline.

/// Split free text into trimmed, non-empty paragraphs.
///
/// Scrapers hand over teaser text with whatever line breaks the page had;
/// blank lines and surrounding whitespace are noise.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(split_paragraphs("a\n\n  b  \n"), vec!["a", "b"]);
/// ```
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", &s[..max], s.len() - max)
    }
}
