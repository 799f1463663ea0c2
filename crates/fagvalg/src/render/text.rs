use eframe::egui::{self, Color32, FontFamily, FontId, Pos2};

use crate::deck::{Inline, ListItem, ListMarker};
use crate::theme::Theme;

/// Create a LayoutJob from inline elements.
pub fn inlines_to_job(
    inlines: &[Inline],
    font_size: f32,
    color: Color32,
    link_color: Color32,
    max_width: f32,
) -> egui::text::LayoutJob {
    let mut job = egui::text::LayoutJob::default();
    job.wrap.max_width = max_width;
    for inline in inlines {
        let (text, size, color, italics, underline) = match inline {
            Inline::Text(s) => (s.as_str(), font_size, color, false, false),
            Inline::Bold(s) => (s.as_str(), font_size + 1.0, color, false, false),
            Inline::Italic(s) => (s.as_str(), font_size, color, true, false),
            Inline::Link { text, .. } => (text.as_str(), font_size, link_color, false, true),
        };
        let format = egui::text::TextFormat {
            font_id: FontId::new(size, FontFamily::Proportional),
            color,
            italics,
            underline: if underline {
                egui::Stroke::new(1.0, color)
            } else {
                egui::Stroke::NONE
            },
            ..Default::default()
        };
        job.append(text, 0.0, format);
    }
    job
}

/// Layout inlines without painting them.
pub fn layout_inlines(
    ui: &egui::Ui,
    inlines: &[Inline],
    font_size: f32,
    color: Color32,
    link_color: Color32,
    max_width: f32,
) -> std::sync::Arc<egui::Galley> {
    let job = inlines_to_job(inlines, font_size, color, link_color, max_width);
    ui.painter().layout_job(job)
}

/// Draw a heading block. Returns height used.
#[allow(clippy::too_many_arguments)]
pub fn draw_heading(
    ui: &egui::Ui,
    inlines: &[Inline],
    level: u8,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    let size = theme.heading_size(level) * scale;
    let color = Theme::with_opacity(theme.heading_color, opacity);
    let link = Theme::with_opacity(theme.accent, opacity);
    let galley = layout_inlines(ui, inlines, size, color, link, max_width);
    let height = galley.rect.height();
    ui.painter().galley(pos, galley, color);
    height
}

/// Draw a paragraph. Returns height used.
pub fn draw_paragraph(
    ui: &egui::Ui,
    inlines: &[Inline],
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    let color = Theme::with_opacity(theme.foreground, opacity);
    let link = Theme::with_opacity(theme.accent, opacity);
    let galley = layout_inlines(ui, inlines, theme.body_size * scale, color, link, max_width);
    let height = galley.rect.height();
    ui.painter().galley(pos, galley, color);
    height
}

/// Draw a list. Hidden reveal items keep their space so the list does not
/// jump as items appear. Returns height used.
#[allow(clippy::too_many_arguments)]
pub fn draw_list(
    ui: &egui::Ui,
    items: &[ListItem],
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
    is_visible: &dyn Fn(usize) -> bool,
) -> f32 {
    let marker_width = 45.0 * scale;
    let item_spacing = 10.0 * scale;
    let font_size = theme.body_size * scale;
    let mut y_offset = 0.0;

    for item in items {
        let shown = item.ordinal.is_none_or(is_visible);
        let item_opacity = if shown { opacity } else { 0.0 };
        let color = Theme::with_opacity(theme.foreground, item_opacity);
        let link = Theme::with_opacity(theme.accent, item_opacity);

        let text_width = max_width - marker_width;
        let galley = layout_inlines(ui, &item.inlines, font_size, color, link, text_width);
        let text_height = galley.rect.height();

        if shown {
            let marker = match item.marker {
                ListMarker::Static => "\u{2022}",
                ListMarker::Reveal => "\u{25B8}",
            };
            let marker_color = match item.marker {
                ListMarker::Static => color,
                ListMarker::Reveal => Theme::with_opacity(theme.accent, item_opacity),
            };
            let marker_galley = ui.painter().layout_no_wrap(
                marker.to_string(),
                FontId::proportional(font_size),
                marker_color,
            );
            ui.painter()
                .galley(Pos2::new(pos.x, pos.y + y_offset), marker_galley, marker_color);
            ui.painter().galley(
                Pos2::new(pos.x + marker_width, pos.y + y_offset),
                galley,
                color,
            );
        }

        y_offset += text_height + item_spacing;
    }

    y_offset
}
