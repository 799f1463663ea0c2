//! Everything drawn around and above the slide: progress bar, navigation
//! buttons, the slide menu, tooltip bubbles and modals.

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Stroke, vec2};

use crate::deck::{Deck, ModalKind, ModalSpec, TooltipSpec};
use crate::presenter::Presenter;
use crate::presenter::input::Region;
use crate::render::image_cache::ImageCache;
use crate::render::regions::RegionMap;
use crate::theme::Theme;

#[allow(clippy::too_many_arguments)]
fn button(
    painter: &egui::Painter,
    rect: Rect,
    label: &str,
    font: FontId,
    theme: &Theme,
    enabled: bool,
    active: bool,
    scale: f32,
) {
    let fill = if active {
        theme.selected_fill
    } else {
        Theme::with_opacity(theme.surface, 0.85)
    };
    let text = match (active, enabled) {
        (true, _) => theme.selected_text,
        (false, true) => theme.foreground,
        (false, false) => Theme::with_opacity(theme.muted, 0.6),
    };
    painter.rect_filled(rect, 8.0 * scale, fill);
    painter.text(rect.center(), Align2::CENTER_CENTER, label, font, text);
}

/// Progress bar, readout, navigation buttons, menu and fullscreen toggles, footer.
pub fn draw_chrome(
    ui: &egui::Ui,
    presenter: &Presenter,
    footer: Option<&str>,
    theme: &Theme,
    rect: Rect,
    scale: f32,
    regions: &mut RegionMap,
) {
    let painter = ui.painter();

    // Progress bar
    let bar_height = 6.0 * scale;
    let track = Rect::from_min_size(rect.left_top(), vec2(rect.width(), bar_height));
    painter.rect_filled(track, 0.0, Theme::with_opacity(theme.muted, 0.2));
    let filled = Rect::from_min_size(
        rect.left_top(),
        vec2(rect.width() * presenter.progress(), bar_height),
    );
    painter.rect_filled(filled, 0.0, theme.accent);

    let size = 44.0 * scale;
    let margin = 16.0 * scale;
    let bottom = rect.bottom() - margin - size;
    let font = FontId::proportional(22.0 * scale);

    // Bottom right: prev, readout, next
    let next = Rect::from_min_size(Pos2::new(rect.right() - margin - size, bottom), vec2(size, size));
    let readout = presenter.readout();
    let readout_color = Theme::with_opacity(theme.foreground, 0.6);
    let readout_galley =
        painter.layout_no_wrap(readout, FontId::monospace(16.0 * scale), readout_color);
    let readout_pos = Pos2::new(
        next.left() - 12.0 * scale - readout_galley.rect.width(),
        next.center().y - readout_galley.rect.height() / 2.0,
    );
    let prev = Rect::from_min_size(
        Pos2::new(readout_pos.x - 12.0 * scale - size, bottom),
        vec2(size, size),
    );
    painter.galley(readout_pos, readout_galley, readout_color);

    button(painter, prev, "\u{2039}", font.clone(), theme, presenter.can_go_prev(), false, scale);
    button(painter, next, "\u{203A}", font.clone(), theme, presenter.can_go_next(), false, scale);
    regions.insert(Region::NavPrev, prev);
    regions.insert(Region::NavNext, next);

    // Bottom left: menu, fullscreen
    let overlays = presenter.overlays();
    let menu = Rect::from_min_size(Pos2::new(rect.left() + margin, bottom), vec2(size, size));
    let fullscreen = menu.translate(vec2(size + 8.0 * scale, 0.0));
    button(painter, menu, "\u{2630}", font.clone(), theme, true, overlays.menu_open(), scale);
    let fs_label = if overlays.fullscreen() { "\u{2922}" } else { "\u{26F6}" };
    button(painter, fullscreen, fs_label, font, theme, true, false, scale);
    regions.insert(Region::MenuToggle, menu);
    regions.insert(Region::FullscreenToggle, fullscreen);

    if let Some(footer) = footer {
        let color = Theme::with_opacity(theme.foreground, 0.4);
        painter.text(
            Pos2::new(rect.center().x, rect.bottom() - margin - size / 2.0),
            Align2::CENTER_CENTER,
            footer,
            FontId::proportional(14.0 * scale),
            color,
        );
    }
}

/// Tooltip bubble below its trigger.
pub fn draw_tooltip(
    ui: &egui::Ui,
    id: usize,
    spec: &TooltipSpec,
    theme: &Theme,
    rect: Rect,
    scale: f32,
    regions: &mut RegionMap,
) {
    let painter = ui.painter();
    let padding = 16.0 * scale;
    let width = (rect.width() * 0.35).max(240.0 * scale);
    let galley = painter.layout(
        spec.text.clone(),
        FontId::proportional(theme.small_size * scale),
        theme.foreground,
        width - padding * 2.0,
    );
    let size = galley.rect.size() + vec2(padding * 2.0, padding * 2.0);

    let anchor = regions
        .get(Region::TooltipTrigger(id))
        .map(|r| r.left_bottom() + vec2(0.0, 10.0 * scale))
        .unwrap_or_else(|| Pos2::new(rect.center().x - size.x / 2.0, rect.top() + 80.0 * scale));
    let min = Pos2::new(
        anchor.x.clamp(rect.left() + padding, (rect.right() - size.x - padding).max(rect.left())),
        anchor.y.min(rect.bottom() - size.y - padding),
    );
    let bubble = Rect::from_min_size(min, size);

    painter.rect_filled(bubble.translate(vec2(0.0, 4.0 * scale)), 10.0 * scale, Color32::from_black_alpha(40));
    painter.rect_filled(bubble, 10.0 * scale, theme.surface);
    painter.rect_stroke(
        bubble,
        10.0 * scale,
        Stroke::new(1.5 * scale, theme.accent),
        egui::StrokeKind::Inside,
    );
    painter.galley(bubble.min + vec2(padding, padding), galley, theme.foreground);
    regions.insert(Region::TooltipBubble(id), bubble);
}

/// Modal with backdrop, panel and close button.
#[allow(clippy::too_many_arguments)]
pub fn draw_modal(
    ui: &egui::Ui,
    spec: &ModalSpec,
    images: &ImageCache,
    theme: &Theme,
    rect: Rect,
    scale: f32,
    regions: &mut RegionMap,
) {
    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, theme.backdrop);
    regions.insert(Region::ModalBackdrop, rect);

    let panel = Rect::from_center_size(rect.center(), vec2(rect.width() * 0.7, rect.height() * 0.78));
    painter.rect_filled(panel, 16.0 * scale, theme.background);
    regions.insert(Region::ModalPanel, panel);

    let padding = 28.0 * scale;
    let close_size = 44.0 * scale;
    let close = Rect::from_min_size(
        Pos2::new(panel.right() - padding - close_size, panel.top() + padding * 0.6),
        vec2(close_size, close_size),
    );
    button(painter, close, "\u{2715}", FontId::proportional(22.0 * scale), theme, true, false, scale);
    regions.insert(Region::ModalClose, close);

    let heading_color = theme.heading_color;
    painter.text(
        Pos2::new(panel.left() + padding, panel.top() + padding),
        Align2::LEFT_TOP,
        &spec.label,
        FontId::proportional(theme.h3_size * scale),
        heading_color,
    );

    let caption_height = if spec.caption.is_some() { 48.0 * scale } else { 0.0 };
    let body = Rect::from_min_max(
        Pos2::new(panel.left() + padding, panel.top() + padding * 2.0 + theme.h3_size * scale),
        Pos2::new(panel.right() - padding, panel.bottom() - padding - caption_height),
    );

    let texture = spec.image.as_deref().and_then(|path| images.get_or_load(ui.ctx(), path));
    match (spec.kind, texture) {
        (_, Some(texture)) => {
            let [w, h] = texture.size();
            let image_rect = fit(body, w as f32, h as f32);
            painter.image(
                texture.id(),
                image_rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        (ModalKind::Qr, None) => {
            let url = spec.url.as_deref().unwrap_or_default();
            let frame = Rect::from_center_size(body.center(), vec2(body.width(), 120.0 * scale));
            painter.rect_stroke(
                frame,
                12.0 * scale,
                Stroke::new(2.0 * scale, theme.accent),
                egui::StrokeKind::Inside,
            );
            painter.text(
                frame.center(),
                Align2::CENTER_CENTER,
                url,
                FontId::monospace(theme.body_size * 0.9 * scale),
                theme.accent,
            );
        }
        (ModalKind::Image, None) => {
            painter.text(
                body.center(),
                Align2::CENTER_CENTER,
                "Bildet kunne ikke lastes.",
                FontId::proportional(theme.body_size * 0.7 * scale),
                theme.muted,
            );
        }
    }

    if let Some(caption) = &spec.caption {
        painter.text(
            Pos2::new(panel.center().x, panel.bottom() - padding - caption_height / 2.0),
            Align2::CENTER_CENTER,
            caption,
            FontId::proportional(theme.small_size * scale),
            Theme::with_opacity(theme.foreground, 0.8),
        );
    }
}

/// Slide list opened from the menu button.
pub fn draw_menu(
    ui: &egui::Ui,
    deck: &Deck,
    current: usize,
    theme: &Theme,
    rect: Rect,
    scale: f32,
    regions: &mut RegionMap,
) {
    let painter = ui.painter();
    let padding = 16.0 * scale;
    let row_height = 36.0 * scale;
    let width = (rect.width() * 0.3).max(320.0 * scale);
    let height = (deck.slide_count() as f32 * row_height + padding * 2.0).min(rect.height() - 120.0 * scale);
    let panel = Rect::from_min_size(
        Pos2::new(rect.left() + 16.0 * scale, rect.bottom() - 76.0 * scale - height),
        vec2(width, height),
    );

    painter.rect_filled(panel, 12.0 * scale, theme.surface);
    painter.rect_stroke(
        panel,
        12.0 * scale,
        Stroke::new(1.0 * scale, Theme::with_opacity(theme.muted, 0.5)),
        egui::StrokeKind::Inside,
    );

    let font = FontId::proportional(theme.small_size * 0.9 * scale);
    let mut y = panel.top() + padding;
    for slide in &deck.slides {
        if y + row_height > panel.bottom() {
            break;
        }
        let row = Rect::from_min_size(Pos2::new(panel.left() + 8.0 * scale, y), vec2(width - 16.0 * scale, row_height));
        let is_current = slide.number == current;
        if is_current {
            painter.rect_filled(row, 6.0 * scale, Theme::with_opacity(theme.accent, 0.15));
        }
        let color = if is_current { theme.accent } else { theme.foreground };
        painter.text(
            Pos2::new(row.left() + 8.0 * scale, row.center().y),
            Align2::LEFT_CENTER,
            format!("{:>2}  {}", slide.number, slide.title()),
            font.clone(),
            color,
        );
        regions.insert(Region::MenuItem(slide.number), row);
        y += row_height;
    }
}

/// Largest rect with the given aspect ratio centered in `area`.
fn fit(area: Rect, width: f32, height: f32) -> Rect {
    if width <= 0.0 || height <= 0.0 {
        return area;
    }
    let scale = (area.width() / width).min(area.height() / height);
    Rect::from_center_size(area.center(), vec2(width * scale, height * scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn test_fit_keeps_aspect() {
        let area = Rect::from_min_size(pos2(0.0, 0.0), vec2(1000.0, 300.0));
        let r = fit(area, 800.0, 450.0);
        assert!((r.height() - 300.0).abs() < 1e-3);
        assert!((r.width() - 533.333).abs() < 1e-2);
        assert_eq!(r.center(), area.center());
    }

    #[test]
    fn test_fit_degenerate_image() {
        let area = Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0));
        assert_eq!(fit(area, 0.0, 5.0), area);
    }
}
