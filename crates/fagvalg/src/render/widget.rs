use eframe::egui::{self, Align2, FontId, Pos2, Rect, Stroke, vec2};

use crate::presenter::dependency::{DependencyGraph, DependencyWidget};
use crate::render::regions::RegionMap;
use crate::theme::Theme;

/// One row of unit boxes: a pair, or units that belong to no pair.
#[derive(Debug, PartialEq, Eq)]
struct Row {
    units: Vec<usize>,
    pair: Option<usize>,
}

fn rows(graph: &DependencyGraph) -> Vec<Row> {
    let mut placed = vec![false; graph.unit_count()];
    let mut rows = Vec::new();
    for (i, pair) in graph.pairs().iter().enumerate() {
        let units: Vec<usize> = pair.units.iter().copied().filter(|&u| !placed[u]).collect();
        for &u in &units {
            placed[u] = true;
        }
        if !units.is_empty() {
            rows.push(Row {
                units,
                pair: Some(i),
            });
        }
    }
    let loose: Vec<usize> = (0..graph.unit_count()).filter(|&u| !placed[u]).collect();
    for chunk in loose.chunks(2) {
        rows.push(Row {
            units: chunk.to_vec(),
            pair: None,
        });
    }
    rows
}

/// Horizontal shake of a rejected unit.
fn shake_offset(now_ms: u64, scale: f32) -> f32 {
    (now_ms as f32 / 25.0).sin() * 8.0 * scale
}

/// Draw a dependency widget starting at `pos`. Returns height used.
#[allow(clippy::too_many_arguments)]
pub fn draw(
    ui: &egui::Ui,
    widget: &DependencyWidget,
    title: Option<&str>,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
    now_ms: u64,
    is_shaking: &dyn Fn(usize) -> bool,
    regions: &mut RegionMap,
) -> f32 {
    let graph = widget.graph();
    let painter = ui.painter();
    let box_size = vec2((max_width * 0.3).min(380.0 * scale), 78.0 * scale);
    let gap = 120.0 * scale;
    let row_spacing = 28.0 * scale;
    let mut y = pos.y;
    regions.set_widget_origin(widget.index(), pos);

    if let Some(title) = title {
        let color = Theme::with_opacity(theme.heading_color, opacity);
        let galley = painter.layout(
            title.to_string(),
            FontId::proportional(theme.h3_size * scale),
            color,
            max_width,
        );
        y += galley.rect.height() + 20.0 * scale;
        painter.galley(pos, galley, color);
    }

    for row in rows(graph) {
        let mut right_edge = pos.x;
        for (col, &unit) in row.units.iter().enumerate() {
            let min = Pos2::new(pos.x + col as f32 * (box_size.x + gap), y);
            let rect = Rect::from_min_size(min, box_size);
            regions.insert(widget.region(unit), rect);
            right_edge = rect.right();

            let shaking = is_shaking(unit);
            let drawn = if shaking {
                rect.translate(vec2(shake_offset(now_ms, scale), 0.0))
            } else {
                rect
            };
            draw_unit(painter, widget, unit, drawn, theme, opacity, scale, shaking);
        }

        if let Some(pair) = row.pair {
            if let Some(connector) = widget.connector(pair) {
                let stroke = Stroke::new(4.0 * scale, Theme::with_opacity(theme.accent, opacity));
                // connectors are kept relative to the widget origin
                let ends = [connector.from + pos.to_vec2(), connector.to + pos.to_vec2()];
                painter.line_segment(ends, stroke);
                for end in ends {
                    painter.circle_filled(end, 6.0 * scale, stroke.color);
                }
            }
            if widget.is_complete(pair) {
                let color = Theme::with_opacity(theme.accent, opacity);
                painter.text(
                    Pos2::new(right_edge + 30.0 * scale, y + box_size.y / 2.0),
                    Align2::LEFT_CENTER,
                    format!("\u{2713} {}", graph.pairs()[pair].outcome),
                    FontId::proportional(theme.body_size * 0.8 * scale),
                    color,
                );
            }
        }

        y += box_size.y + row_spacing;
    }

    let outcomes: Vec<&str> = widget.outcomes().collect();
    let (summary, color) = if outcomes.is_empty() {
        (
            "Trykk på et fag for å velge det.".to_string(),
            Theme::with_opacity(theme.muted, opacity),
        )
    } else {
        (
            outcomes.join("  \u{00B7}  "),
            Theme::with_opacity(theme.foreground, opacity),
        )
    };
    let galley = painter.layout(
        summary,
        FontId::proportional(theme.small_size * scale),
        color,
        max_width,
    );
    let summary_height = galley.rect.height();
    painter.galley(Pos2::new(pos.x, y), galley, color);
    y += summary_height;

    y - pos.y
}

#[allow(clippy::too_many_arguments)]
fn draw_unit(
    painter: &egui::Painter,
    widget: &DependencyWidget,
    unit: usize,
    rect: Rect,
    theme: &Theme,
    opacity: f32,
    scale: f32,
    shaking: bool,
) {
    let graph = widget.graph();
    let Some(info) = graph.unit(unit) else {
        return;
    };
    let selected = widget.is_selected(unit);
    let available = widget.is_available(unit);
    let rounding = 12.0 * scale;

    let (fill, text_color, stroke_color) = if selected {
        (theme.selected_fill, theme.selected_text, theme.selected_fill)
    } else if available {
        (theme.surface, theme.foreground, theme.accent)
    } else {
        (theme.surface, theme.muted, theme.muted)
    };
    let stroke_color = if shaking { theme.error } else { stroke_color };

    painter.rect_filled(rect, rounding, Theme::with_opacity(fill, opacity));
    painter.rect_stroke(
        rect,
        rounding,
        Stroke::new(2.0 * scale, Theme::with_opacity(stroke_color, opacity)),
        egui::StrokeKind::Inside,
    );

    let label_font = FontId::proportional(theme.body_size * 0.75 * scale);
    match graph.prerequisite(unit).filter(|_| !available) {
        Some(p) => {
            painter.text(
                Pos2::new(rect.center().x, rect.center().y - 10.0 * scale),
                Align2::CENTER_CENTER,
                &info.label,
                label_font,
                Theme::with_opacity(text_color, opacity),
            );
            let hint = format!("krever {}", graph.units()[p].label);
            painter.text(
                Pos2::new(rect.center().x, rect.center().y + 18.0 * scale),
                Align2::CENTER_CENTER,
                hint,
                FontId::proportional(theme.small_size * 0.8 * scale),
                Theme::with_opacity(if shaking { theme.error } else { theme.muted }, opacity),
            );
        }
        None => {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                &info.label,
                label_font,
                Theme::with_opacity(text_color, opacity),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use std::path::Path;

    #[test]
    fn test_embedded_widgets_have_one_row_per_pair() {
        let deck = Deck::embedded().unwrap();
        for widget in &deck.widgets {
            let rows = rows(&widget.graph);
            assert_eq!(rows.len(), 2);
            assert!(rows.iter().all(|r| r.units.len() == 2 && r.pair.is_some()));
        }
    }

    #[test]
    fn test_loose_units_fill_extra_rows() {
        let src = "---\nwidgets:\n  - id: w\n    units:\n      - { id: a, label: A }\n      - { id: b, label: B, requires: a }\n      - { id: c, label: C }\n      - { id: d, label: D }\n      - { id: e, label: E }\n    pairs:\n      - { units: [a, b], outcome: AB }\n---\n@widget: w\n# W";
        let deck = Deck::parse(src, Path::new(".")).unwrap();
        assert_eq!(
            rows(&deck.widgets[0].graph),
            vec![
                Row { units: vec![0, 1], pair: Some(0) },
                Row { units: vec![2, 3], pair: None },
                Row { units: vec![4], pair: None },
            ]
        );
    }

    #[test]
    fn test_shake_stays_small() {
        for t in (0..400).step_by(7) {
            assert!(shake_offset(t, 1.0).abs() <= 8.0);
        }
    }
}
