use super::blocks::is_directive;

const BREAK: &str = "\u{0}BREAK\u{0}";

/// Split a deck body (frontmatter already removed) into raw slide sources.
///
/// A new slide starts at
/// 1. a `---` line surrounded by blank lines,
/// 2. a run of three or more blank lines,
/// 3. a `# ` heading when the slide being collected already has content.
///
/// Directive lines written directly above a `# ` heading travel with the heading.
pub fn split(body: &str) -> Vec<String> {
    let body = body.replace("\r\n", "\n");
    let lines: Vec<&str> = body.split('\n').collect();

    let marked = mark_breaks(&lines);

    let mut slides = Vec::new();
    for chunk in marked.join("\n").split(BREAK) {
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            split_on_headings(chunk, &mut slides);
        }
    }
    slides
}

/// Replace explicit separators and long blank runs with the break marker.
fn mark_breaks<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut blank_run = 0;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if is_separator(trimmed) {
            let prev_blank = out.last().is_none_or(|l| l.trim().is_empty() || *l == BREAK);
            let next_blank = lines.get(i + 1).is_none_or(|l| l.trim().is_empty());
            if prev_blank && next_blank {
                while out.last().is_some_and(|l| l.trim().is_empty()) {
                    out.pop();
                }
                if out.last() != Some(&BREAK) {
                    out.push(BREAK);
                }
                blank_run = 0;
                i += 1;
                continue;
            }
        }

        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run == 3 {
                out.pop();
                out.pop();
                if out.last() != Some(&BREAK) {
                    out.push(BREAK);
                }
            } else if blank_run < 3 {
                out.push(line);
            }
        } else {
            blank_run = 0;
            out.push(line);
        }
        i += 1;
    }
    out
}

fn split_on_headings(chunk: &str, slides: &mut Vec<String>) {
    let mut current: Vec<&str> = Vec::new();
    let mut has_content = false;

    for line in chunk.lines() {
        let trimmed = line.trim();

        if line.starts_with("# ") && has_content {
            let carried = take_trailing_directives(&mut current);
            push_slide(&current, slides);
            current = carried;
            has_content = false;
        }

        current.push(line);
        if !trimmed.is_empty() && !is_directive(trimmed) {
            has_content = true;
        }
    }

    push_slide(&current, slides);
}

/// Remove directive lines (and the blank lines between them) from the end of
/// `lines`, returning the directives in their original order.
fn take_trailing_directives<'a>(lines: &mut Vec<&'a str>) -> Vec<&'a str> {
    let mut carried = Vec::new();
    while let Some(last) = lines.last() {
        let trimmed = last.trim();
        if trimmed.is_empty() {
            lines.pop();
        } else if is_directive(trimmed) {
            carried.push(trimmed);
            lines.pop();
        } else {
            break;
        }
    }
    carried.reverse();
    carried
}

fn push_slide(lines: &[&str], slides: &mut Vec<String>) {
    let text = lines.join("\n");
    let text = text.trim();
    if !text.is_empty() {
        slides.push(text.to_string());
    }
}

fn is_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}
