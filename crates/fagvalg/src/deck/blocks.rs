use std::sync::LazyLock;

use regex::Regex;

use super::inline;
use super::{Block, Directive, ListItem, ListMarker};

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@([A-Za-z0-9_-]+):\s*(.*)$").expect("directive pattern is valid")
});

pub fn is_directive(line: &str) -> bool {
    DIRECTIVE.is_match(line)
}

/// Pull `@name: value` lines out of a raw slide, returning the directives and
/// the remaining markdown.
pub fn extract_directives(raw: &str) -> (Vec<Directive>, String) {
    let mut directives = Vec::new();
    let mut rest = Vec::new();
    for line in raw.lines() {
        match DIRECTIVE.captures(line.trim()) {
            Some(caps) => directives.push(Directive {
                name: caps[1].to_ascii_lowercase(),
                value: caps[2].trim().to_string(),
            }),
            None => rest.push(line),
        }
    }
    (directives, rest.join("\n"))
}

/// Parse slide markdown into blocks.
///
/// Reveal ordinals are assigned in document order to `+` items.
pub fn parse(content: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut items: Vec<ListItem> = Vec::new();
    let mut next_ordinal = 0;

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            flush_paragraph(&mut paragraph, &mut blocks);
            flush_list(&mut items, &mut blocks);
            continue;
        }

        if let Some((level, text)) = heading(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            flush_list(&mut items, &mut blocks);
            blocks.push(Block::Heading {
                level,
                inlines: inline::parse(text),
            });
            continue;
        }

        if let Some((marker, text)) = list_item(trimmed) {
            flush_paragraph(&mut paragraph, &mut blocks);
            let ordinal = (marker == ListMarker::Reveal).then(|| {
                next_ordinal += 1;
                next_ordinal - 1
            });
            items.push(ListItem {
                marker,
                inlines: inline::parse(text),
                ordinal,
            });
            continue;
        }

        flush_list(&mut items, &mut blocks);
        paragraph.push(trimmed);
    }

    flush_paragraph(&mut paragraph, &mut blocks);
    flush_list(&mut items, &mut blocks);
    blocks
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if !(1..=3).contains(&level) {
        return None;
    }
    line[level..]
        .strip_prefix(' ')
        .map(|text| (level as u8, text.trim()))
}

fn list_item(line: &str) -> Option<(ListMarker, &str)> {
    if let Some(text) = line.strip_prefix("+ ") {
        return Some((ListMarker::Reveal, text.trim()));
    }
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .map(|text| (ListMarker::Static, text.trim()))
}

fn flush_paragraph(lines: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if lines.is_empty() {
        return;
    }
    let text = lines.join(" ");
    lines.clear();
    blocks.push(Block::Paragraph {
        inlines: inline::parse(&text),
    });
}

fn flush_list(items: &mut Vec<ListItem>, blocks: &mut Vec<Block>) {
    if items.is_empty() {
        return;
    }
    blocks.push(Block::List {
        items: std::mem::take(items),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_directives() {
        let (directives, rest) = extract_directives("@reveal: click\n@Widget: realfag\n# Title");
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].name, "reveal");
        assert_eq!(directives[0].value, "click");
        assert_eq!(directives[1].name, "widget");
        assert_eq!(rest.trim(), "# Title");
    }

    #[test]
    fn test_at_sign_without_colon_is_text() {
        assert!(!is_directive("@someone said hi"));
        assert!(is_directive("@tooltip: frist"));
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let blocks = parse("# Title\n\nFirst line\ncontinues here\n\n## Sub");
        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[0], Block::Heading { level: 1, .. }));
        match &blocks[1] {
            Block::Paragraph { inlines } => {
                assert_eq!(
                    super::super::inlines_to_text(inlines),
                    "First line continues here"
                );
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
        assert!(matches!(blocks[2], Block::Heading { level: 2, .. }));
    }

    #[test]
    fn test_reveal_ordinals_follow_document_order() {
        let blocks = parse("+ a\n- static\n+ b\n\nText\n\n+ c");
        let ordinals: Vec<Option<usize>> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::List { items } => Some(items.iter().map(|i| i.ordinal)),
                _ => None,
            })
            .flatten()
            .collect();
        assert_eq!(ordinals, vec![Some(0), None, Some(1), Some(2)]);
    }

    #[test]
    fn test_hashes_without_space_are_text() {
        let blocks = parse("#hashtag");
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
    }
}
