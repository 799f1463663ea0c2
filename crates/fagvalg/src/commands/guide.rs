use std::sync::LazyLock;

use colored::Colorize;
use regex::Regex;

/// Counseling notes shipped with the binary.
pub const GUIDE: &str = include_str!("../../content/fagvalg-info.md");

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

pub fn run(plain: bool) {
    if plain {
        print!("{GUIDE}");
        return;
    }
    for line in GUIDE.lines() {
        println!("{}", format_line(line));
    }
}

fn format_line(line: &str) -> String {
    if let Some(title) = line.strip_prefix("# ") {
        return title.bold().underline().to_string();
    }
    if let Some(title) = line.strip_prefix("## ") {
        return format!("\n{}", title.cyan().bold());
    }
    if let Some(title) = line.strip_prefix("### ") {
        return title.bold().to_string();
    }
    if let Some(item) = line.strip_prefix("- ") {
        return format!("  \u{2022} {}", format_inline(item));
    }
    format_inline(line)
}

fn format_inline(text: &str) -> String {
    let text = LINK.replace_all(text, |caps: &regex::Captures| {
        format!("{} <{}>", &caps[1], caps[2].underline())
    });
    BOLD.replace_all(&text, |caps: &regex::Captures| caps[1].bold().to_string())
        .into_owned()
}
