use regex::Regex;
use std::sync::OnceLock;

// ---- Substitution rules ----

// Applied top to bottom. Later rules must not re-match the output of earlier
// ones, so block fences run before inline code and `###` before `#`.
const RULES: &[(&str, &str)] = &[
    (r"(?m)^### (.*)$", "<h3>${1}</h3>"),
    (r"(?m)^## (.*)$", "<h2>${1}</h2>"),
    (r"(?m)^# (.*)$", "<h1>${1}</h1>"),
    (r"\*\*(.+?)\*\*", "<strong>${1}</strong>"),
    (r"\*(.+?)\*", "<em>${1}</em>"),
    (
        r"\[([^\]]+)\]\(([^)]+)\)",
        r#"<a href="${2}" target="_blank" rel="noopener noreferrer">${1}</a>"#,
    ),
    (r"```([^`]+)```", "<pre><code>${1}</code></pre>"),
    (r"`([^`]+)`", "<code>${1}</code>"),
    (r"(?m)^> (.*)$", "<blockquote>${1}</blockquote>"),
    (r"(?m)^\* (.*)$", "<li>${1}</li>"),
    (r"(?m)^- (.*)$", "<li>${1}</li>"),
    (r"(?m)^\d+\. (.*)$", "<li>${1}</li>"),
];

fn compiled_rules() -> &'static [(Regex, &'static str)] {
    static COMPILED: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), *replacement))
            .collect()
    })
}

fn list_seam() -> &'static Regex {
    static SEAM: OnceLock<Regex> = OnceLock::new();
    SEAM.get_or_init(|| Regex::new(r"</ul>(\n?)<ul>").unwrap())
}

/// Convert markdown to preview HTML.
///
/// This is a flat substitution pipeline, not a CommonMark parser: mixed block
/// types are not nested and no HTML escaping happens. It never fails; input it
/// does not understand passes through as text.
pub fn render(markdown: &str) -> String {
    let mut html = markdown.to_string();
    for (re, replacement) in compiled_rules() {
        html = re.replace_all(&html, *replacement).into_owned();
    }

    let html = format!("<p>{}</p>", html.replace("\n\n", "</p><p>"));

    // Every item gets its own list first, then adjacent lists collapse into one.
    let html = html.replace("<li>", "<ul><li>").replace("</li>", "</li></ul>");
    list_seam().replace_all(&html, "${1}").into_owned()
}
