pub mod chrome;
pub mod image_cache;
pub mod regions;
pub mod text;
pub mod transition;
pub mod widget;

use eframe::egui::{self, Align2, FontId, Pos2, Rect, vec2};

use crate::deck::{Block, Deck, Layout, Slide};
use crate::presenter::Presenter;
use crate::presenter::input::Region;
use crate::theme::Theme;

use regions::RegionMap;

/// Render a single slide. Clickable parts are recorded in `regions`.
/// Returns the content height, used for scrolling.
#[allow(clippy::too_many_arguments)]
pub fn render_slide(
    ui: &egui::Ui,
    deck: &Deck,
    slide: &Slide,
    presenter: &Presenter,
    theme: &Theme,
    rect: Rect,
    scale: f32,
    now_ms: u64,
    regions: &mut RegionMap,
) -> f32 {
    match slide.layout {
        Layout::Title => render_centered(ui, slide, theme, rect, scale, 1.0),
        Layout::Section => render_centered(ui, slide, theme, rect, scale, 1.2),
        Layout::Content => {
            render_content(ui, deck, slide, presenter, theme, rect, scale, now_ms, regions)
        }
    }
}

/// Title and section slides: headings and short text stacked in the middle.
fn render_centered(
    ui: &egui::Ui,
    slide: &Slide,
    theme: &Theme,
    rect: Rect,
    scale: f32,
    heading_boost: f32,
) -> f32 {
    let painter = ui.painter();
    let max_width = rect.width() * 0.8;
    let spacing = 24.0 * scale;

    let galleys: Vec<_> = slide
        .blocks
        .iter()
        .filter_map(|block| match block {
            Block::Heading { level, inlines } => {
                let size = theme.heading_size(*level) * heading_boost * scale;
                Some(text::layout_inlines(
                    ui,
                    inlines,
                    size,
                    theme.heading_color,
                    theme.accent,
                    max_width,
                ))
            }
            Block::Paragraph { inlines } => Some(text::layout_inlines(
                ui,
                inlines,
                theme.body_size * scale,
                Theme::with_opacity(theme.foreground, 0.8),
                theme.accent,
                max_width,
            )),
            Block::List { .. } => None,
        })
        .collect();

    let total: f32 = galleys.iter().map(|g| g.rect.height()).sum::<f32>()
        + spacing * galleys.len().saturating_sub(1) as f32;
    let mut y = rect.center().y - total / 2.0;
    for galley in galleys {
        let x = rect.center().x - galley.rect.width() / 2.0;
        let height = galley.rect.height();
        painter.galley(Pos2::new(x, y), galley, theme.foreground);
        y += height + spacing;
    }
    total
}

#[allow(clippy::too_many_arguments)]
fn render_content(
    ui: &egui::Ui,
    deck: &Deck,
    slide: &Slide,
    presenter: &Presenter,
    theme: &Theme,
    rect: Rect,
    scale: f32,
    now_ms: u64,
    regions: &mut RegionMap,
) -> f32 {
    let padding = 80.0 * scale;
    let max_width = rect.width() - padding * 2.0;
    let left = rect.left() + padding;
    let top = rect.top() + padding;
    let block_spacing = 24.0 * scale;
    let mut y = top;

    let is_visible = |ordinal: usize| presenter.is_element_visible(slide.number, ordinal);

    for block in &slide.blocks {
        let pos = Pos2::new(left, y);
        let height = match block {
            Block::Heading { level, inlines } => {
                text::draw_heading(ui, inlines, *level, theme, pos, max_width, 1.0, scale)
            }
            Block::Paragraph { inlines } => {
                text::draw_paragraph(ui, inlines, theme, pos, max_width, 1.0, scale)
            }
            Block::List { items } => {
                text::draw_list(ui, items, theme, pos, max_width, 1.0, scale, &is_visible)
            }
        };
        y += height + block_spacing;
    }

    if let Some(w) = slide.widget {
        if let Some(dependency) = presenter.widget(w) {
            let title = deck.widgets.get(w).and_then(|d| d.title.as_deref());
            let is_shaking = |unit: usize| presenter.is_shaking(w, unit);
            y += widget::draw(
                ui,
                dependency,
                title,
                theme,
                Pos2::new(left, y),
                max_width,
                1.0,
                scale,
                now_ms,
                &is_shaking,
                regions,
            ) + block_spacing;
        }
    }

    if !slide.tooltips.is_empty() || !slide.modals.is_empty() {
        y += draw_slide_actions(ui, deck, slide, presenter, theme, Pos2::new(left, y), scale, regions);
    }

    y - rect.top() + padding
}

/// Row of tooltip triggers and modal buttons under the slide content.
#[allow(clippy::too_many_arguments)]
fn draw_slide_actions(
    ui: &egui::Ui,
    deck: &Deck,
    slide: &Slide,
    presenter: &Presenter,
    theme: &Theme,
    pos: Pos2,
    scale: f32,
    regions: &mut RegionMap,
) -> f32 {
    let painter = ui.painter();
    let font = FontId::proportional(theme.small_size * scale);
    let height = 44.0 * scale;
    let pad = 18.0 * scale;
    let mut x = pos.x;

    let chips = slide
        .tooltips
        .iter()
        .filter_map(|&t| deck.tooltips.get(t).map(|spec| (Region::TooltipTrigger(t), format!("\u{24D8} {}", spec.trigger))))
        .chain(
            slide
                .modals
                .iter()
                .filter_map(|&m| deck.modals.get(m).map(|spec| (Region::ModalOpen(m), spec.label.clone()))),
        );

    for (region, label) in chips {
        let open = matches!(region, Region::TooltipTrigger(t) if presenter.overlays().open_tooltip() == Some(t));
        let text_color = if open { theme.selected_text } else { theme.accent };
        let galley = painter.layout_no_wrap(label, font.clone(), text_color);
        let chip = Rect::from_min_size(Pos2::new(x, pos.y), vec2(galley.rect.width() + pad * 2.0, height));

        if open {
            painter.rect_filled(chip, height / 2.0, theme.selected_fill);
        } else {
            painter.rect_stroke(
                chip,
                height / 2.0,
                egui::Stroke::new(1.5 * scale, theme.accent),
                egui::StrokeKind::Inside,
            );
        }
        painter.galley(
            Pos2::new(chip.left() + pad, chip.center().y - galley.rect.height() / 2.0),
            galley,
            text_color,
        );
        regions.insert(region, chip);
        x = chip.right() + 12.0 * scale;
    }
    height
}

/// Reference 1920x1080 scale of `rect`.
pub fn compute_scale(rect: Rect) -> f32 {
    (rect.width() / 1920.0).min(rect.height() / 1080.0)
}

/// Hint shown when a slide scrolls.
pub fn draw_scroll_hint(ui: &egui::Ui, theme: &Theme, rect: Rect, scale: f32, down: bool) {
    let color = Theme::with_opacity(theme.foreground, 0.35);
    let (glyph, y) = if down {
        ("\u{25BC}", rect.bottom() - 90.0 * scale)
    } else {
        ("\u{25B2}", rect.top() + 16.0 * scale)
    };
    ui.painter().text(
        Pos2::new(rect.center().x, y),
        Align2::CENTER_TOP,
        glyph,
        FontId::proportional(theme.small_size * scale),
        color,
    );
}
