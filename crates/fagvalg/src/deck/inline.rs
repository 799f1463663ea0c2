use std::sync::LazyLock;

use regex::Regex;

use super::Inline;

// Links first so bold text inside a link label stays part of the link.
static SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)|\*\*([^*]+)\*\*|\*([^*]+)\*")
        .expect("inline pattern is valid")
});

/// Parse inline markdown: `**bold**`, `*italic*` and `[text](url)`.
pub fn parse(text: &str) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut last = 0;

    for caps in SPAN.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            inlines.push(Inline::Text(text[last..whole.start()].to_string()));
        }
        if let (Some(label), Some(url)) = (caps.get(1), caps.get(2)) {
            inlines.push(Inline::Link {
                text: label.as_str().to_string(),
                url: url.as_str().to_string(),
            });
        } else if let Some(bold) = caps.get(3) {
            inlines.push(Inline::Bold(bold.as_str().to_string()));
        } else if let Some(italic) = caps.get(4) {
            inlines.push(Inline::Italic(italic.as_str().to_string()));
        }
        last = whole.end();
    }

    if last < text.len() {
        inlines.push(Inline::Text(text[last..].to_string()));
    }
    inlines
}
