use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;
pub const DEFAULT_EXCERPT_CHARS: usize = 150;

// Line markers go first so a list bullet is never taken for an emphasis star.
const STRIP_RULES: &[(&str, &str)] = &[
    (r"(?m)^[ \t]*#{1,6}[ \t]+", ""),
    (r"(?m)^[ \t]*>[ \t]?", ""),
    (r"(?m)^[ \t]*(?:[*+-]|\d+\.)[ \t]+(?:\[[ xX]\][ \t]+)?", ""),
    (r"`+", ""),
    (r"!?\[([^\]]*)\]\([^)]*\)", "${1}"),
    (r"\*\*(.+?)\*\*", "${1}"),
    (r"\*(.+?)\*", "${1}"),
];

fn strip_rules() -> &'static [(Regex, &'static str)] {
    static COMPILED: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        STRIP_RULES
            .iter()
            .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), *replacement))
            .collect()
    })
}

/// Reduce markdown to the plain text a reader would see, on a single line.
pub fn strip_markdown(markdown: &str) -> String {
    let mut text = markdown.to_string();
    for (re, replacement) in strip_rules() {
        text = re.replace_all(&text, *replacement).into_owned();
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn count_words(markdown: &str) -> usize {
    strip_markdown(markdown).split_whitespace().count()
}

/// Whole minutes needed to read the text, rounded up. A rate of zero is
/// treated as one word per minute.
pub fn estimate_reading_time(markdown: &str, words_per_minute: usize) -> usize {
    count_words(markdown).div_ceil(words_per_minute.max(1))
}

/// True when nothing but markup or whitespace is left after stripping.
pub fn is_empty_content(markdown: &str) -> bool {
    strip_markdown(markdown).is_empty()
}

/// Plain-text preview of at most `max_chars` characters, with `...` appended
/// when the text had to be cut.
pub fn excerpt(markdown: &str, max_chars: usize) -> String {
    let text = strip_markdown(markdown);
    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
