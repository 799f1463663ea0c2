use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::deck::{Deck, Layout, ModalKind, RevealMode};
use crate::render::image_cache;

pub fn run(file: Option<&Path>) -> Result<()> {
    let deck = match file {
        Some(path) => {
            Deck::from_file(path).with_context(|| format!("Invalid deck {}", path.display()))?
        }
        None => Deck::embedded().context("Built-in deck is invalid")?,
    };

    let title = deck.meta.title.as_deref().unwrap_or("(untitled)");
    println!("{} {}", title.bold(), format!("({} slides)", deck.slide_count()).dimmed());
    println!();

    for slide in &deck.slides {
        let mut notes = Vec::new();
        let elements = slide.element_count();
        if elements > 0 {
            let mode = match slide.reveal {
                RevealMode::Click => "click",
                RevealMode::Auto => "auto",
            };
            notes.push(format!("{elements} x {mode}"));
        }
        if let Some(w) = slide.widget {
            notes.push(format!("widget {}", deck.widgets[w].id));
        }
        for &t in &slide.tooltips {
            notes.push(format!("tooltip {}", deck.tooltips[t].id));
        }
        for &m in &slide.modals {
            notes.push(format!("modal {}", deck.modals[m].id));
        }
        let layout = match slide.layout {
            Layout::Title => "title",
            Layout::Section => "section",
            Layout::Content => "content",
        };
        println!(
            "  {:>3}  {:<8} {}  {}",
            slide.number,
            layout.dimmed(),
            slide.title(),
            notes.join(", ").cyan()
        );
    }

    for widget in &deck.widgets {
        println!();
        println!("{} {}", "Widget".bold(), widget.id);
        let graph = &widget.graph;
        for unit in graph.units() {
            match unit.requires {
                Some(p) => println!("  {} {} {}", unit.label, "requires".dimmed(), graph.units()[p].label),
                None => println!("  {}", unit.label),
            }
        }
        for pair in graph.pairs() {
            let [a, b] = pair.units;
            println!(
                "  {} + {} {} {}",
                graph.units()[a].label,
                graph.units()[b].label,
                "=>".dimmed(),
                pair.outcome.green()
            );
        }
    }

    let warnings = warnings(&deck);
    println!();
    if warnings.is_empty() {
        println!("{}", "Deck is valid.".green().bold());
    } else {
        for w in &warnings {
            println!("{} {w}", "warning:".yellow().bold());
        }
    }
    Ok(())
}

/// Problems that do not prevent presenting the deck.
fn warnings(deck: &Deck) -> Vec<String> {
    let mut out = Vec::new();
    for slide in &deck.slides {
        if slide.reveal == RevealMode::Click && slide.element_count() == 0 {
            out.push(format!(
                "slide {} uses @reveal: click but has no `+` items",
                slide.number
            ));
        }
        let interactive =
            slide.widget.is_some() || !slide.tooltips.is_empty() || !slide.modals.is_empty();
        if interactive && slide.layout != Layout::Content {
            out.push(format!(
                "slide {}: widgets, tooltips and modals are only shown with @layout: content",
                slide.number
            ));
        }
    }
    for modal in &deck.modals {
        match modal.kind {
            ModalKind::Image => match modal.image.as_deref() {
                None => out.push(format!("modal `{}` has no image", modal.id)),
                Some(path) if !image_cache::is_available(&deck.base_path, path) => {
                    out.push(format!("modal `{}`: image `{path}` not found", modal.id));
                }
                Some(_) => {}
            },
            ModalKind::Qr => {
                if modal.url.is_none() {
                    out.push(format!("modal `{}` has no url", modal.id));
                }
            }
        }
    }
    let used: Vec<usize> = deck.slides.iter().filter_map(|s| s.widget).collect();
    for (i, widget) in deck.widgets.iter().enumerate() {
        if !used.contains(&i) {
            out.push(format!("widget `{}` is not placed on any slide", widget.id));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_deck_has_no_warnings() {
        let deck = Deck::embedded().unwrap();
        assert!(warnings(&deck).is_empty(), "{:?}", warnings(&deck));
    }

    #[test]
    fn test_warnings_for_loose_ends() {
        let src = "---\nwidgets:\n  - id: spare\n    units:\n      - { id: a, label: A }\nmodals:\n  - { id: pic, kind: image, label: Bilde, image: missing.png }\n  - { id: qr, kind: qr, label: QR }\n---\n@reveal: click\n# Empty\n\nNothing to reveal";
        let deck = Deck::parse(src, Path::new("/nonexistent")).unwrap();
        let found = warnings(&deck);
        assert_eq!(found.len(), 4, "{found:?}");
        assert!(found[0].contains("slide 1"));
        assert!(found.iter().any(|w| w.contains("missing.png")));
        assert!(found.iter().any(|w| w.contains("no url")));
        assert!(found.iter().any(|w| w.contains("spare")));
    }

    #[test]
    fn test_warns_about_hidden_widget() {
        let src = "---\nwidgets:\n  - id: w\n    units:\n      - { id: a, label: A }\n---\n@widget: w\n@layout: section\n# Velg";
        let deck = Deck::parse(src, Path::new(".")).unwrap();
        let found = warnings(&deck);
        assert_eq!(found.len(), 1, "{found:?}");
        assert!(found[0].contains("slide 1"));
        assert!(found[0].contains("@layout: content"));
    }
}
