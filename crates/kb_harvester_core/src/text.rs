/// Collapse every run of whitespace into a single space and trim both ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop lines that are empty or whitespace-only.
pub fn remove_blank_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cleanup used for flat pages: blank lines first, then whitespace collapsing.
pub fn clean_flat_text(text: &str) -> String {
    clean_text(&remove_blank_lines(text))
}

/// True when `body` is long enough to be kept as a section.
///
/// Length is counted in characters, not bytes.
pub fn exceeds_noise_threshold(body: &str, min_chars: usize) -> bool {
    body.chars().count() > min_chars
}
