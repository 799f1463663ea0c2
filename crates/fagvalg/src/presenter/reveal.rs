use std::collections::HashMap;

use crate::deck::{RevealMode, Slide};

/// Reveal settings of one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideReveal {
    pub mode: RevealMode,
    pub elements: usize,
    pub reset_on_leave: bool,
}

impl From<&Slide> for SlideReveal {
    fn from(slide: &Slide) -> Self {
        Self {
            mode: slide.reveal,
            elements: slide.element_count(),
            reset_on_leave: slide.reset_reveal_on_leave,
        }
    }
}

/// Per-slide reveal state.
///
/// Click slides keep a counter of shown elements, created on first visit.
/// Auto slides keep how far the entry stagger has progressed in the current visit.
#[derive(Debug, Clone)]
pub struct RevealSequencer {
    slides: Vec<SlideReveal>,
    counters: HashMap<usize, usize>,
    auto_shown: HashMap<usize, usize>,
}

impl RevealSequencer {
    pub fn new(slides: Vec<SlideReveal>) -> Self {
        Self {
            slides,
            counters: HashMap::new(),
            auto_shown: HashMap::new(),
        }
    }

    fn settings(&self, slide: usize) -> Option<&SlideReveal> {
        slide.checked_sub(1).and_then(|i| self.slides.get(i))
    }

    pub fn mode(&self, slide: usize) -> RevealMode {
        self.settings(slide).map_or(RevealMode::Auto, |s| s.mode)
    }

    pub fn element_count(&self, slide: usize) -> usize {
        self.settings(slide).map_or(0, |s| s.elements)
    }

    pub fn is_click_slide(&self, slide: usize) -> bool {
        self.mode(slide) == RevealMode::Click
    }

    /// Elements shown on a click slide (0 before the first visit).
    pub fn counter(&self, slide: usize) -> usize {
        self.counters.get(&slide).copied().unwrap_or(0)
    }

    /// Whether a counter exists for `slide` yet.
    pub fn has_counter(&self, slide: usize) -> bool {
        self.counters.contains_key(&slide)
    }

    /// True when a click slide still has hidden elements.
    pub fn has_pending(&self, slide: usize) -> bool {
        self.is_click_slide(slide) && self.counter(slide) < self.element_count(slide)
    }

    /// Called on entering `slide`. Returns how many auto elements need a stagger timer.
    pub fn enter(&mut self, slide: usize) -> usize {
        match self.mode(slide) {
            RevealMode::Click => {
                self.counters.entry(slide).or_insert(0);
                0
            }
            RevealMode::Auto => {
                self.auto_shown.insert(slide, 0);
                self.element_count(slide)
            }
        }
    }

    /// Called on leaving `slide`.
    pub fn leave(&mut self, slide: usize) {
        if self.settings(slide).is_some_and(|s| s.reset_on_leave) {
            self.counters.remove(&slide);
        }
    }

    /// Show the next element of a click slide.
    pub fn reveal_next(&mut self, slide: usize) -> bool {
        if !self.is_click_slide(slide) {
            return false;
        }
        let total = self.element_count(slide);
        let counter = self.counters.entry(slide).or_insert(0);
        if *counter >= total {
            return false;
        }
        *counter += 1;
        true
    }

    /// Hide the most recently shown element of a click slide.
    pub fn reveal_previous(&mut self, slide: usize) -> bool {
        match self.counters.get_mut(&slide) {
            Some(counter) if *counter > 0 => {
                *counter -= 1;
                true
            }
            _ => false,
        }
    }

    /// Apply a stagger step: element `ordinal` of an auto slide becomes visible.
    pub fn auto_step(&mut self, slide: usize, ordinal: usize) -> bool {
        if self.mode(slide) != RevealMode::Auto || ordinal >= self.element_count(slide) {
            return false;
        }
        let shown = self.auto_shown.entry(slide).or_insert(0);
        if ordinal < *shown {
            return false;
        }
        *shown = ordinal + 1;
        true
    }

    /// Whether element `ordinal` of `slide` is currently shown.
    pub fn is_visible(&self, slide: usize, ordinal: usize) -> bool {
        match self.mode(slide) {
            RevealMode::Click => ordinal < self.counter(slide),
            RevealMode::Auto => ordinal < self.auto_shown.get(&slide).copied().unwrap_or(0),
        }
    }

    /// Show every auto element of `slide` at once.
    pub fn finish_auto(&mut self, slide: usize) {
        if self.mode(slide) == RevealMode::Auto {
            let total = self.element_count(slide);
            self.auto_shown.insert(slide, total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(elements: usize) -> SlideReveal {
        SlideReveal {
            mode: RevealMode::Click,
            elements,
            reset_on_leave: false,
        }
    }

    fn auto(elements: usize) -> SlideReveal {
        SlideReveal {
            mode: RevealMode::Auto,
            elements,
            reset_on_leave: false,
        }
    }

    #[test]
    fn test_counter_created_lazily() {
        let mut seq = RevealSequencer::new(vec![auto(0), click(3)]);
        assert!(!seq.has_counter(2));
        assert_eq!(seq.enter(2), 0);
        assert!(seq.has_counter(2));
        assert_eq!(seq.counter(2), 0);
    }

    #[test]
    fn test_reveal_next_is_bounded() {
        let mut seq = RevealSequencer::new(vec![click(3)]);
        seq.enter(1);
        assert!(seq.reveal_next(1));
        assert!(seq.reveal_next(1));
        assert!(seq.reveal_next(1));
        assert!(!seq.reveal_next(1));
        assert_eq!(seq.counter(1), 3);
        assert!(!seq.has_pending(1));
    }

    #[test]
    fn test_reveal_previous_rehides() {
        let mut seq = RevealSequencer::new(vec![click(3)]);
        seq.enter(1);
        seq.reveal_next(1);
        seq.reveal_next(1);
        assert!(seq.is_visible(1, 1));
        assert!(seq.reveal_previous(1));
        assert!(!seq.is_visible(1, 1));
        assert!(seq.is_visible(1, 0));
        assert!(seq.reveal_previous(1));
        assert!(!seq.reveal_previous(1));
        assert_eq!(seq.counter(1), 0);
    }

    #[test]
    fn test_counter_survives_leaving_unless_reset() {
        let mut seq = RevealSequencer::new(vec![
            click(2),
            SlideReveal {
                reset_on_leave: true,
                ..click(2)
            },
        ]);
        seq.enter(1);
        seq.reveal_next(1);
        seq.leave(1);
        seq.enter(1);
        assert_eq!(seq.counter(1), 1);

        seq.enter(2);
        seq.reveal_next(2);
        seq.leave(2);
        assert!(!seq.has_counter(2));
        seq.enter(2);
        assert_eq!(seq.counter(2), 0);
    }

    #[test]
    fn test_auto_slide_is_never_click_revealed() {
        let mut seq = RevealSequencer::new(vec![auto(3)]);
        assert_eq!(seq.enter(1), 3);
        assert!(!seq.reveal_next(1));
        assert!(!seq.has_pending(1));
        assert!(!seq.is_visible(1, 0));
    }

    #[test]
    fn test_auto_steps_and_reentry() {
        let mut seq = RevealSequencer::new(vec![auto(3)]);
        seq.enter(1);
        assert!(seq.auto_step(1, 0));
        assert!(seq.auto_step(1, 1));
        assert!(seq.is_visible(1, 1));
        assert!(!seq.is_visible(1, 2));
        assert!(!seq.auto_step(1, 5));

        seq.enter(1);
        assert!(!seq.is_visible(1, 0));
        seq.finish_auto(1);
        assert!(seq.is_visible(1, 2));
    }

    #[test]
    fn test_unknown_slide_is_inert() {
        let mut seq = RevealSequencer::new(vec![click(1)]);
        assert!(!seq.reveal_next(0));
        assert!(!seq.reveal_next(9));
        assert!(!seq.reveal_previous(9));
        assert_eq!(seq.element_count(9), 0);
    }
}
