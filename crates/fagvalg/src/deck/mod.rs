//! Deck loading: a markdown file with a YAML header describing the slides,
//! the dependency widgets, the info tooltips and the modals.

pub mod blocks;
pub mod frontmatter;
pub mod inline;
pub mod splitter;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::presenter::dependency::{DependencyGraph, GraphError};

pub use frontmatter::{ModalKind, ModalSpec, TooltipSpec};

/// The deck shipped with the binary.
pub const EMBEDDED_DECK: &str = include_str!("../../content/fagvalg.md");

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("frontmatter is missing its closing `---`")]
    UnterminatedFrontmatter,
    #[error("invalid frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
    #[error("deck contains no slides")]
    Empty,
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
    #[error("slide {slide}: unknown {kind} `{id}`")]
    UnknownReference {
        slide: usize,
        kind: &'static str,
        id: String,
    },
    #[error("slide {slide}: invalid value `{value}` for @{name}")]
    InvalidDirective {
        slide: usize,
        name: String,
        value: String,
    },
    #[error("slide {slide}: only one widget per slide is supported")]
    MultipleWidgets { slide: usize },
    #[error("widget `{id}` is placed on more than one slide")]
    WidgetReused { id: String },
    #[error("widget `{widget}`: {source}")]
    Graph {
        widget: String,
        #[source]
        source: GraphError,
    },
}

#[derive(Debug, Clone)]
pub struct Deck {
    pub meta: DeckMeta,
    pub slides: Vec<Slide>,
    pub widgets: Vec<WidgetDef>,
    pub tooltips: Vec<TooltipSpec>,
    pub modals: Vec<ModalSpec>,
    /// Directory that relative image paths resolve against.
    pub base_path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct DeckMeta {
    pub title: Option<String>,
    pub theme: Option<String>,
    pub footer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WidgetDef {
    pub id: String,
    pub title: Option<String>,
    pub graph: DependencyGraph,
}

#[derive(Debug, Clone)]
pub struct Slide {
    /// 1-based position in the deck.
    pub number: usize,
    pub blocks: Vec<Block>,
    pub layout: Layout,
    pub reveal: RevealMode,
    pub reset_reveal_on_leave: bool,
    /// Index into `Deck::widgets`.
    pub widget: Option<usize>,
    /// Indices into `Deck::tooltips`.
    pub tooltips: Vec<usize>,
    /// Indices into `Deck::modals`.
    pub modals: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealMode {
    /// Tagged elements appear one by one on entry.
    #[default]
    Auto,
    /// Tagged elements appear only on forward input.
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Title,
    Section,
    Content,
}

#[derive(Debug, Clone)]
pub struct Directive {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub enum Block {
    Heading { level: u8, inlines: Vec<Inline> },
    Paragraph { inlines: Vec<Inline> },
    List { items: Vec<ListItem> },
}

#[derive(Debug, Clone)]
pub struct ListItem {
    pub marker: ListMarker,
    pub inlines: Vec<Inline>,
    /// Reveal position for `+` items.
    pub ordinal: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Static,
    Reveal,
}

#[derive(Debug, Clone)]
pub enum Inline {
    Text(String),
    Bold(String),
    Italic(String),
    Link { text: String, url: String },
}

impl Deck {
    pub fn embedded() -> Result<Self, DeckError> {
        Self::parse(EMBEDDED_DECK, Path::new("."))
    }

    pub fn from_file(path: &Path) -> Result<Self, DeckError> {
        let content = std::fs::read_to_string(path).map_err(|source| DeckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_path = path.parent().unwrap_or(Path::new("."));
        Self::parse(&content, base_path)
    }

    pub fn parse(content: &str, base_path: &Path) -> Result<Self, DeckError> {
        let (fm, body) = frontmatter::extract(content)?;

        let widgets = build_widgets(&fm.widgets)?;
        ensure_unique("tooltip", fm.tooltips.iter().map(|t| t.id.as_str()))?;
        ensure_unique("modal", fm.modals.iter().map(|m| m.id.as_str()))?;

        let raw_slides: Vec<String> = splitter::split(&body)
            .into_iter()
            .filter(|raw| !raw.trim().is_empty())
            .collect();
        if raw_slides.is_empty() {
            return Err(DeckError::Empty);
        }

        let mut placed_widgets = HashSet::new();
        let mut slides = Vec::with_capacity(raw_slides.len());
        for (i, raw) in raw_slides.into_iter().enumerate() {
            let slide = build_slide(i + 1, &raw, &widgets, &fm.tooltips, &fm.modals)?;
            if let Some(w) = slide.widget {
                if !placed_widgets.insert(w) {
                    return Err(DeckError::WidgetReused {
                        id: widgets[w].id.clone(),
                    });
                }
            }
            slides.push(slide);
        }

        Ok(Self {
            meta: DeckMeta {
                title: fm.title,
                theme: fm.theme,
                footer: fm.footer,
            },
            slides,
            widgets,
            tooltips: fm.tooltips,
            modals: fm.modals,
            base_path: base_path.to_path_buf(),
        })
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Slide by 1-based number.
    pub fn slide(&self, number: usize) -> Option<&Slide> {
        number.checked_sub(1).and_then(|i| self.slides.get(i))
    }
}

impl Slide {
    /// Number of `+` elements on the slide.
    pub fn element_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| match b {
                Block::List { items } => items.iter().filter(|i| i.ordinal.is_some()).count(),
                _ => 0,
            })
            .sum()
    }

    /// Text of the first heading, used by the slide menu.
    pub fn title(&self) -> String {
        self.blocks
            .iter()
            .find_map(|b| match b {
                Block::Heading { inlines, .. } => Some(inlines_to_text(inlines)),
                _ => None,
            })
            .unwrap_or_else(|| format!("Lysbilde {}", self.number))
    }
}

fn build_widgets(specs: &[frontmatter::WidgetSpec]) -> Result<Vec<WidgetDef>, DeckError> {
    ensure_unique("widget", specs.iter().map(|w| w.id.as_str()))?;
    specs
        .iter()
        .map(|spec| {
            let graph = DependencyGraph::from_spec(spec).map_err(|source| DeckError::Graph {
                widget: spec.id.clone(),
                source,
            })?;
            Ok(WidgetDef {
                id: spec.id.clone(),
                title: spec.title.clone(),
                graph,
            })
        })
        .collect()
}

fn build_slide(
    number: usize,
    raw: &str,
    widgets: &[WidgetDef],
    tooltips: &[TooltipSpec],
    modals: &[ModalSpec],
) -> Result<Slide, DeckError> {
    let (directives, content) = blocks::extract_directives(raw);
    let blocks = blocks::parse(&content);

    let mut reveal = RevealMode::Auto;
    let mut reset_reveal_on_leave = false;
    let mut layout = None;
    let mut widget = None;
    let mut slide_tooltips = Vec::new();
    let mut slide_modals = Vec::new();

    for d in &directives {
        let invalid = || DeckError::InvalidDirective {
            slide: number,
            name: d.name.clone(),
            value: d.value.clone(),
        };
        let unknown = |kind| DeckError::UnknownReference {
            slide: number,
            kind,
            id: d.value.clone(),
        };
        match d.name.as_str() {
            "reveal" => {
                reveal = match d.value.as_str() {
                    "click" => RevealMode::Click,
                    "auto" => RevealMode::Auto,
                    _ => return Err(invalid()),
                }
            }
            "reveal-reset" => {
                reset_reveal_on_leave = match d.value.as_str() {
                    "leave" => true,
                    "never" => false,
                    _ => return Err(invalid()),
                }
            }
            "layout" => {
                layout = Some(match d.value.as_str() {
                    "title" => Layout::Title,
                    "section" => Layout::Section,
                    "content" => Layout::Content,
                    _ => return Err(invalid()),
                })
            }
            "widget" => {
                if widget.is_some() {
                    return Err(DeckError::MultipleWidgets { slide: number });
                }
                let idx = widgets
                    .iter()
                    .position(|w| w.id == d.value)
                    .ok_or_else(|| unknown("widget"))?;
                widget = Some(idx);
            }
            "tooltip" => {
                let idx = tooltips
                    .iter()
                    .position(|t| t.id == d.value)
                    .ok_or_else(|| unknown("tooltip"))?;
                slide_tooltips.push(idx);
            }
            "modal" => {
                let idx = modals
                    .iter()
                    .position(|m| m.id == d.value)
                    .ok_or_else(|| unknown("modal"))?;
                slide_modals.push(idx);
            }
            other => {
                tracing::warn!(slide = number, directive = other, "ignoring unknown directive");
            }
        }
    }

    // Widgets and action chips are only drawn by the content layout.
    let interactive = widget.is_some() || !slide_tooltips.is_empty() || !slide_modals.is_empty();
    let layout = layout.unwrap_or_else(|| {
        if interactive {
            Layout::Content
        } else {
            classify_layout(&blocks)
        }
    });

    Ok(Slide {
        number,
        blocks,
        layout,
        reveal,
        reset_reveal_on_leave,
        widget,
        tooltips: slide_tooltips,
        modals: slide_modals,
    })
}

fn ensure_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), DeckError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(DeckError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn classify_layout(blocks: &[Block]) -> Layout {
    let mut h1 = 0;
    let mut headings = 0;
    let mut short_paragraphs = 0;
    let mut other = 0;

    for block in blocks {
        match block {
            Block::Heading { level, .. } => {
                headings += 1;
                if *level == 1 {
                    h1 += 1;
                }
            }
            Block::Paragraph { inlines } if inlines_to_text(inlines).len() < 120 => {
                short_paragraphs += 1;
            }
            _ => other += 1,
        }
    }

    if headings == 1 && short_paragraphs == 0 && other == 0 {
        return Layout::Section;
    }
    // H1 followed by a single short subtitle line
    if h1 == 1
        && short_paragraphs == 1
        && other == 0
        && blocks.len() == 2
        && matches!(blocks.first(), Some(Block::Heading { level: 1, .. }))
    {
        return Layout::Title;
    }
    Layout::Content
}

/// Plain text of inline elements.
pub fn inlines_to_text(inlines: &[Inline]) -> String {
    let mut text = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(s) | Inline::Bold(s) | Inline::Italic(s) => text.push_str(s),
            Inline::Link { text: t, .. } => text.push_str(t),
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<Deck, DeckError> {
        Deck::parse(src, Path::new("."))
    }

    const WIDGET_HEADER: &str = "---\nwidgets:\n  - id: w\n    units:\n      - { id: a, label: A }\n      - { id: b, label: B, requires: a }\n    pairs:\n      - { units: [a, b], outcome: Done }\n---\n";

    #[test]
    fn test_embedded_deck_loads() {
        let deck = Deck::embedded().unwrap();
        assert_eq!(deck.slide_count(), 14);
        assert_eq!(deck.meta.title.as_deref(), Some("Fagvalg for Vg2 og Vg3"));
        assert_eq!(deck.widgets.len(), 2);
        assert_eq!(deck.slide(10).and_then(|s| s.widget), Some(0));
        assert_eq!(deck.slide(11).and_then(|s| s.widget), Some(1));
        assert!(matches!(deck.slides[0].layout, Layout::Title));
    }

    #[test]
    fn test_interactive_slides_use_content_layout() {
        let deck = Deck::embedded().unwrap();
        for slide in &deck.slides {
            if slide.widget.is_some() || !slide.tooltips.is_empty() || !slide.modals.is_empty() {
                assert!(
                    matches!(slide.layout, Layout::Content),
                    "slide {} has layout {:?}",
                    slide.number,
                    slide.layout
                );
            }
        }
        assert!(matches!(deck.slide(10).unwrap().layout, Layout::Content));
        assert!(matches!(deck.slide(11).unwrap().layout, Layout::Content));
    }

    #[test]
    fn test_widget_keeps_short_slide_out_of_title_layout() {
        let plain = parse("# Velg\n\nTrykk på fagene.").unwrap();
        assert!(matches!(plain.slides[0].layout, Layout::Title));

        let src = format!("{WIDGET_HEADER}@widget: w\n# Velg\n\nTrykk på fagene.");
        let deck = parse(&src).unwrap();
        assert!(matches!(deck.slides[0].layout, Layout::Content));

        let src = format!("{WIDGET_HEADER}@widget: w\n@layout: title\n# Velg\n\nTrykk på fagene.");
        let deck = parse(&src).unwrap();
        assert!(matches!(deck.slides[0].layout, Layout::Title));
    }

    #[test]
    fn test_embedded_deck_widgets_have_four_units_and_two_pairs() {
        let deck = Deck::embedded().unwrap();
        for widget in &deck.widgets {
            assert_eq!(widget.graph.unit_count(), 4);
            assert_eq!(widget.graph.pair_count(), 2);
        }
    }

    #[test]
    fn test_embedded_deck_reveal_modes() {
        let deck = Deck::embedded().unwrap();
        let program = deck.slide(2).unwrap();
        assert_eq!(program.reveal, RevealMode::Click);
        assert_eq!(program.element_count(), 6);
        assert!(deck.slide(5).unwrap().reset_reveal_on_leave);
        assert_eq!(deck.slide(3).unwrap().reveal, RevealMode::Auto);
    }

    #[test]
    fn test_slide_title_and_fallback() {
        let deck = parse("# Hei\n\nTekst\n\n---\n\nBare tekst").unwrap();
        assert_eq!(deck.slides[0].title(), "Hei");
        assert_eq!(deck.slides[1].title(), "Lysbilde 2");
    }

    #[test]
    fn test_empty_deck() {
        assert!(matches!(parse("---\ntitle: x\n---\n\n"), Err(DeckError::Empty)));
    }

    #[test]
    fn test_unknown_widget_reference() {
        let err = parse("@widget: nope\n# Slide").unwrap_err();
        assert!(matches!(err, DeckError::UnknownReference { slide: 1, kind: "widget", .. }));
    }

    #[test]
    fn test_widget_on_two_slides() {
        let src = format!("{WIDGET_HEADER}@widget: w\n# One\n\n---\n\n@widget: w\n# Two");
        assert!(matches!(parse(&src), Err(DeckError::WidgetReused { .. })));
    }

    #[test]
    fn test_invalid_reveal_value() {
        let err = parse("@reveal: sometimes\n# Slide").unwrap_err();
        assert!(matches!(err, DeckError::InvalidDirective { .. }));
    }

    #[test]
    fn test_unknown_directive_is_ignored() {
        let deck = parse("@sparkle: yes\n# Slide\n\nText").unwrap();
        assert_eq!(deck.slide_count(), 1);
    }

    #[test]
    fn test_duplicate_tooltip_ids() {
        let src = "---\ntooltips:\n  - { id: t, trigger: A }\n  - { id: t, trigger: B }\n---\n# S";
        assert!(matches!(
            parse(src),
            Err(DeckError::DuplicateId { kind: "tooltip", .. })
        ));
    }

    #[test]
    fn test_graph_errors_name_the_widget() {
        let src = "---\nwidgets:\n  - id: broken\n    units:\n      - { id: a, label: A, requires: z }\n---\n# S";
        match parse(src) {
            Err(DeckError::Graph { widget, .. }) => assert_eq!(widget, "broken"),
            other => panic!("expected graph error, got {other:?}"),
        }
    }

    #[test]
    fn test_layout_override() {
        let deck = parse("@layout: section\n# Heading\n\nSome text").unwrap();
        assert_eq!(deck.slides[0].layout, Layout::Section);
    }

    #[test]
    fn test_from_file_missing() {
        let err = Deck::from_file(Path::new("/definitely/not/here.md")).unwrap_err();
        assert!(matches!(err, DeckError::Io { .. }));
    }
}
