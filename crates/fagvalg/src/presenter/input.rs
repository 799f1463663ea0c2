use eframe::egui::Pos2;

/// Keys the presenter reacts to, independent of the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    Space,
    PageDown,
    PageUp,
    Home,
    End,
    Escape,
    F,
    M,
    N,
    P,
    Q,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Forward,
    Backward,
    First,
    Last,
    Cancel,
    ToggleFullscreen,
    ToggleMenu,
    Quit,
}

impl Key {
    pub fn action(self) -> Action {
        match self {
            Key::ArrowRight | Key::Space | Key::PageDown | Key::N => Action::Forward,
            Key::ArrowLeft | Key::PageUp | Key::P => Action::Backward,
            Key::Home => Action::First,
            Key::End => Action::Last,
            Key::Escape => Action::Cancel,
            Key::F => Action::ToggleFullscreen,
            Key::M => Action::ToggleMenu,
            Key::Q => Action::Quit,
        }
    }
}

/// Clickable parts of the screen, identified by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    NavPrev,
    NavNext,
    MenuToggle,
    /// Menu entry for a 1-based slide number.
    MenuItem(usize),
    FullscreenToggle,
    Unit { widget: usize, unit: usize },
    TooltipTrigger(usize),
    TooltipBubble(usize),
    ModalOpen(usize),
    ModalClose,
    ModalBackdrop,
    /// Panel of an open modal; clicks land here instead of the backdrop.
    ModalPanel,
}

impl Region {
    /// Whether a click on this region keeps open tooltips open.
    pub fn owns_tooltip(self) -> bool {
        matches!(self, Region::TooltipTrigger(_) | Region::TooltipBubble(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved right to left.
    Left,
    /// Finger moved left to right.
    Right,
}

impl SwipeDirection {
    pub fn action(self) -> Action {
        match self {
            SwipeDirection::Left => Action::Forward,
            SwipeDirection::Right => Action::Backward,
        }
    }
}

/// Tracks one touch from start to end and classifies it as a horizontal swipe.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f32,
    start: Option<Pos2>,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.max(0.0),
            start: None,
        }
    }

    pub fn start(&mut self, pos: Pos2) {
        self.start = Some(pos);
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }

    /// Finish the touch. Only horizontal displacement counts, and it must
    /// exceed the threshold.
    pub fn end(&mut self, pos: Pos2) -> Option<SwipeDirection> {
        let start = self.start.take()?;
        let dx = pos.x - start.x;
        if dx.abs() <= self.threshold {
            return None;
        }
        Some(if dx < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn test_key_actions() {
        assert_eq!(Key::Space.action(), Action::Forward);
        assert_eq!(Key::PageUp.action(), Action::Backward);
        assert_eq!(Key::Escape.action(), Action::Cancel);
        assert_eq!(Key::End.action(), Action::Last);
    }

    #[test]
    fn test_swipe_over_threshold() {
        let mut swipe = SwipeTracker::new(50.0);
        swipe.start(pos2(300.0, 100.0));
        assert_eq!(swipe.end(pos2(240.0, 100.0)), Some(SwipeDirection::Left));
        swipe.start(pos2(100.0, 100.0));
        assert_eq!(swipe.end(pos2(160.0, 120.0)), Some(SwipeDirection::Right));
    }

    #[test]
    fn test_swipe_under_threshold_is_ignored() {
        let mut swipe = SwipeTracker::new(50.0);
        swipe.start(pos2(300.0, 100.0));
        assert_eq!(swipe.end(pos2(270.0, 100.0)), None);
    }

    #[test]
    fn test_exactly_threshold_is_ignored() {
        let mut swipe = SwipeTracker::new(50.0);
        swipe.start(pos2(100.0, 0.0));
        assert_eq!(swipe.end(pos2(50.0, 0.0)), None);
    }

    #[test]
    fn test_vertical_motion_does_not_count() {
        let mut swipe = SwipeTracker::new(50.0);
        swipe.start(pos2(100.0, 0.0));
        assert_eq!(swipe.end(pos2(110.0, 400.0)), None);
    }

    #[test]
    fn test_end_without_start() {
        let mut swipe = SwipeTracker::new(50.0);
        assert_eq!(swipe.end(pos2(0.0, 0.0)), None);
        swipe.start(pos2(0.0, 0.0));
        swipe.cancel();
        assert_eq!(swipe.end(pos2(200.0, 0.0)), None);
    }

    #[test]
    fn test_swipe_actions() {
        assert_eq!(SwipeDirection::Left.action(), Action::Forward);
        assert_eq!(SwipeDirection::Right.action(), Action::Backward);
    }
}
