use eframe::egui::{Pos2, Rect, Vec2};

use crate::presenter::geometry::GeometryProvider;
use crate::presenter::input::Region;

/// Screen rectangles of every clickable region drawn in a frame, in paint
/// order. Later entries are on top.
///
/// As a geometry provider it reports unit rects relative to their widget's
/// origin, so connectors stay attached when the slide scrolls or slides.
#[derive(Debug, Default)]
pub struct RegionMap {
    entries: Vec<(Region, Rect)>,
    widget_origins: Vec<(usize, Pos2)>,
}

impl RegionMap {
    pub fn clear(&mut self) {
        self.entries.clear();
        self.widget_origins.clear();
    }

    /// Screen position the widget was drawn at this frame.
    pub fn set_widget_origin(&mut self, widget: usize, origin: Pos2) {
        self.widget_origins.retain(|(w, _)| *w != widget);
        self.widget_origins.push((widget, origin));
    }

    fn widget_offset(&self, widget: usize) -> Vec2 {
        self.widget_origins
            .iter()
            .find(|(w, _)| *w == widget)
            .map(|(_, origin)| origin.to_vec2())
            .unwrap_or(Vec2::ZERO)
    }

    pub fn insert(&mut self, region: Region, rect: Rect) {
        self.entries.push((region, rect));
    }

    /// Topmost region under `pos`.
    pub fn hit(&self, pos: Pos2) -> Option<Region> {
        self.entries
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(region, _)| *region)
    }

    pub fn get(&self, region: Region) -> Option<Rect> {
        self.entries
            .iter()
            .rev()
            .find(|(r, _)| *r == region)
            .map(|(_, rect)| *rect)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GeometryProvider for RegionMap {
    fn region(&self, region: Region) -> Option<Rect> {
        let rect = self.get(region)?;
        match region {
            Region::Unit { widget, .. } => Some(rect.translate(-self.widget_offset(widget))),
            _ => Some(rect),
        }
    }
}
