use eframe::egui::{Pos2, Rect, Vec2};

use super::input::Region;

/// Rectangles of rendered regions, as laid out by the last frame. Unit rects
/// are reported relative to their widget, and connectors use the same frame.
pub trait GeometryProvider {
    fn region(&self, region: Region) -> Option<Rect>;
}

/// Geometry provider with nothing laid out yet.
pub struct NoGeometry;

impl GeometryProvider for NoGeometry {
    fn region(&self, _region: Region) -> Option<Rect> {
        None
    }
}

/// Line drawn between the two units of a completed pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub from: Pos2,
    pub to: Pos2,
}

impl Connector {
    /// Connect two regions border to border along the line through their centers.
    ///
    /// Returns `None` when the regions overlap, since there is no gap to bridge.
    pub fn between(a: Rect, b: Rect) -> Option<Self> {
        if a.intersects(b) {
            return None;
        }
        let from = border_point(a, b.center());
        let to = border_point(b, a.center());
        Some(Self { from, to })
    }
}

/// Point where the ray from `rect`'s center toward `target` leaves `rect`.
fn border_point(rect: Rect, target: Pos2) -> Pos2 {
    let center = rect.center();
    let dir: Vec2 = target - center;
    let half = rect.size() / 2.0;

    let tx = if dir.x.abs() > f32::EPSILON {
        half.x / dir.x.abs()
    } else {
        f32::INFINITY
    };
    let ty = if dir.y.abs() > f32::EPSILON {
        half.y / dir.y.abs()
    } else {
        f32::INFINITY
    };
    let t = tx.min(ty);
    if t.is_finite() {
        center + dir * t
    } else {
        center
    }
}
