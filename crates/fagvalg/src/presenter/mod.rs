//! The presentation controller. Owns every piece of interactive state and is
//! driven by the app with backend-neutral input and an explicit clock.

pub mod dependency;
pub mod geometry;
pub mod input;
pub mod navigator;
pub mod overlay;
pub mod reveal;
pub mod scheduler;

use eframe::egui::Pos2;

use crate::deck::Deck;

use dependency::{ClickOutcome, DependencyWidget};
use geometry::GeometryProvider;
use input::{Action, Key, Region, SwipeTracker};
use navigator::{Exit, SlideNavigator};
use overlay::Overlays;
use reveal::{RevealSequencer, SlideReveal};
use scheduler::{Effect, Scheduler};

/// Timing and threshold settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresenterOptions {
    /// Delay between auto-revealed elements.
    pub stagger_ms: u64,
    /// How long a leaving slide keeps its exit mark.
    pub transition_ms: u64,
    /// How long a rejected unit shakes.
    pub cue_ms: u64,
    /// Minimum horizontal travel for a swipe, in points.
    pub swipe_threshold: f32,
}

impl Default for PresenterOptions {
    fn default() -> Self {
        Self {
            stagger_ms: 150,
            transition_ms: 400,
            cue_ms: 400,
            swipe_threshold: 50.0,
        }
    }
}

/// Requests for the host window, drained by the app each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    SetFullscreen(bool),
    InvalidCue { widget: usize, unit: usize },
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    /// The key was recognized but had nothing to act on.
    Ignored,
    /// Escape found nothing to close or undo; the host default applies.
    Fallthrough,
}

impl From<bool> for KeyOutcome {
    fn from(changed: bool) -> Self {
        if changed {
            KeyOutcome::Handled
        } else {
            KeyOutcome::Ignored
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Shake {
    widget: usize,
    unit: usize,
}

pub struct Presenter {
    navigator: SlideNavigator,
    reveal: RevealSequencer,
    widgets: Vec<DependencyWidget>,
    /// Widget index per slide (slide number - 1).
    slide_widgets: Vec<Option<usize>>,
    tooltip_count: usize,
    modal_count: usize,
    overlays: Overlays,
    scheduler: Scheduler,
    swipe: SwipeTracker,
    shake: Option<Shake>,
    options: PresenterOptions,
    requests: Vec<HostRequest>,
}

impl Presenter {
    pub fn new(deck: &Deck, options: PresenterOptions) -> Self {
        let widgets = deck
            .widgets
            .iter()
            .enumerate()
            .map(|(i, w)| DependencyWidget::new(i, w.graph.clone()))
            .collect();

        Self {
            navigator: SlideNavigator::new(deck.slide_count()),
            reveal: RevealSequencer::new(deck.slides.iter().map(SlideReveal::from).collect()),
            widgets,
            slide_widgets: deck.slides.iter().map(|s| s.widget).collect(),
            tooltip_count: deck.tooltips.len(),
            modal_count: deck.modals.len(),
            overlays: Overlays::default(),
            scheduler: Scheduler::default(),
            swipe: SwipeTracker::new(options.swipe_threshold),
            shake: None,
            options,
            requests: Vec::new(),
        }
    }

    /// Show the first slide (or `slide`, clamped to the deck) and run its entry.
    pub fn start(&mut self, slide: usize, now_ms: u64) {
        self.navigator.start_at(slide);
        let current = self.navigator.current();
        self.enter(current, now_ms);
    }

    // --- navigation -------------------------------------------------------

    /// Move to slide `n`. Returns false, changing nothing, when `n` is out of
    /// range or already current.
    pub fn go_to_slide(&mut self, n: usize, now_ms: u64) -> bool {
        let from = self.navigator.current();
        if !self.navigator.contains(n) || n == from {
            return false;
        }

        self.leave(from);
        let Some(mv) = self.navigator.go_to(n, now_ms) else {
            return false;
        };
        tracing::debug!(from = mv.from, to = mv.to, direction = ?mv.direction, "slide change");

        self.scheduler.schedule(
            now_ms + self.options.transition_ms,
            self.navigator.visit(),
            Effect::ClearExit { slide: mv.from },
        );
        self.enter(mv.to, now_ms);
        true
    }

    pub fn next_slide(&mut self, now_ms: u64) -> bool {
        self.go_to_slide(self.navigator.current() + 1, now_ms)
    }

    pub fn prev_slide(&mut self, now_ms: u64) -> bool {
        match self.navigator.current().checked_sub(1) {
            Some(n) => self.go_to_slide(n, now_ms),
            None => false,
        }
    }

    pub fn first_slide(&mut self, now_ms: u64) -> bool {
        self.go_to_slide(1, now_ms)
    }

    pub fn last_slide(&mut self, now_ms: u64) -> bool {
        self.go_to_slide(self.navigator.total(), now_ms)
    }

    /// Forward input: a reveal step while the slide has hidden click elements,
    /// otherwise the next slide.
    pub fn forward(&mut self, now_ms: u64) -> bool {
        if self.reveal.has_pending(self.navigator.current()) {
            self.overlays.close_all();
            self.reveal_next()
        } else {
            self.next_slide(now_ms)
        }
    }

    /// Backward input is always a direct slide change.
    pub fn backward(&mut self, now_ms: u64) -> bool {
        self.prev_slide(now_ms)
    }

    fn enter(&mut self, slide: usize, now_ms: u64) {
        let visit = self.navigator.visit();
        let auto = self.reveal.enter(slide);
        if self.options.stagger_ms == 0 {
            self.reveal.finish_auto(slide);
            return;
        }
        for ordinal in 0..auto {
            self.scheduler.schedule(
                now_ms + self.options.stagger_ms * (ordinal as u64 + 1),
                visit,
                Effect::AutoReveal { slide, ordinal },
            );
        }
    }

    fn leave(&mut self, slide: usize) {
        self.reveal.leave(slide);
        if let Some(w) = self.widget_index(slide) {
            self.widgets[w].reset();
            if self.shake.is_some_and(|s| s.widget == w) {
                self.shake = None;
            }
        }
        self.overlays.close_all();
        self.swipe.cancel();
    }

    // --- reveal -----------------------------------------------------------

    pub fn reveal_next(&mut self) -> bool {
        self.reveal.reveal_next(self.navigator.current())
    }

    pub fn reveal_previous(&mut self) -> bool {
        self.reveal.reveal_previous(self.navigator.current())
    }

    // --- input ------------------------------------------------------------

    pub fn handle_key(&mut self, key: Key, now_ms: u64) -> KeyOutcome {
        match key.action() {
            Action::Forward => self.forward(now_ms).into(),
            Action::Backward => self.backward(now_ms).into(),
            Action::First => self.first_slide(now_ms).into(),
            Action::Last => self.last_slide(now_ms).into(),
            Action::Cancel => self.cancel(),
            Action::ToggleFullscreen => {
                self.toggle_fullscreen();
                KeyOutcome::Handled
            }
            Action::ToggleMenu => {
                self.overlays.close_tooltips();
                self.overlays.toggle_menu();
                KeyOutcome::Handled
            }
            Action::Quit => {
                self.requests.push(HostRequest::Quit);
                KeyOutcome::Handled
            }
        }
    }

    /// Escape: close overlays first, then undo a reveal step, else fall through.
    pub fn cancel(&mut self) -> KeyOutcome {
        if self.overlays.close_all() {
            return KeyOutcome::Handled;
        }
        if self.reveal_previous() {
            return KeyOutcome::Handled;
        }
        KeyOutcome::Fallthrough
    }

    /// Dispatch a pointer click. `region` is `None` for clicks on nothing in particular.
    pub fn click(
        &mut self,
        region: Option<Region>,
        geometry: &dyn GeometryProvider,
        now_ms: u64,
    ) -> bool {
        // With a modal up, only the modal itself reacts.
        if self.overlays.open_modal().is_some() {
            return match region {
                Some(Region::ModalPanel) => false,
                _ => self.overlays.close_modal(),
            };
        }

        let mut changed = false;
        if !region.is_some_and(Region::owns_tooltip) {
            changed |= self.overlays.close_tooltips();
        }
        if !matches!(region, Some(Region::MenuToggle | Region::MenuItem(_))) {
            changed |= self.overlays.close_menu();
        }

        let Some(region) = region else {
            return changed;
        };

        changed |= match region {
            Region::NavPrev => self.prev_slide(now_ms),
            Region::NavNext => self.next_slide(now_ms),
            Region::MenuToggle => {
                self.overlays.toggle_menu();
                true
            }
            Region::MenuItem(n) => {
                let moved = self.go_to_slide(n, now_ms);
                self.overlays.close_menu() || moved
            }
            Region::FullscreenToggle => {
                self.toggle_fullscreen();
                true
            }
            Region::Unit { widget, unit } => self.click_unit(widget, unit, geometry, now_ms),
            Region::TooltipTrigger(id) if id < self.tooltip_count => {
                self.overlays.toggle_tooltip(id);
                true
            }
            Region::ModalOpen(id) if id < self.modal_count => {
                self.overlays.show_modal(id);
                true
            }
            Region::TooltipTrigger(_)
            | Region::TooltipBubble(_)
            | Region::ModalOpen(_)
            | Region::ModalClose
            | Region::ModalBackdrop
            | Region::ModalPanel => false,
        };
        changed
    }

    fn click_unit(
        &mut self,
        widget: usize,
        unit: usize,
        geometry: &dyn GeometryProvider,
        now_ms: u64,
    ) -> bool {
        if self.current_widget_index() != Some(widget) {
            return false;
        }
        match self.widgets[widget].click(unit, geometry) {
            ClickOutcome::Rejected { missing } => {
                tracing::debug!(widget, unit, missing, "unit rejected, prerequisite not selected");
                self.shake = Some(Shake { widget, unit });
                self.scheduler.schedule(
                    now_ms + self.options.cue_ms,
                    self.navigator.visit(),
                    Effect::ClearShake { widget, unit },
                );
                self.requests.push(HostRequest::InvalidCue { widget, unit });
                false
            }
            ClickOutcome::Selected | ClickOutcome::Deselected { .. } => true,
            ClickOutcome::Ignored => false,
        }
    }

    pub fn touch_start(&mut self, pos: Pos2) {
        self.swipe.start(pos);
    }

    pub fn touch_cancel(&mut self) {
        self.swipe.cancel();
    }

    /// Finish a touch; a swipe left goes forward, a swipe right goes back.
    pub fn touch_end(&mut self, pos: Pos2, now_ms: u64) -> bool {
        match self.swipe.end(pos).map(|s| s.action()) {
            Some(Action::Forward) => self.forward(now_ms),
            Some(Action::Backward) => self.backward(now_ms),
            _ => false,
        }
    }

    // --- timers -----------------------------------------------------------

    /// Apply due timers. Timers from an earlier visit are dropped.
    pub fn tick(&mut self, now_ms: u64) {
        for (visit, effect) in self.scheduler.drain_due(now_ms) {
            if visit != self.navigator.visit() {
                tracing::trace!(?effect, "dropping stale timer");
                continue;
            }
            match effect {
                Effect::AutoReveal { slide, ordinal } => {
                    if slide == self.navigator.current() {
                        self.reveal.auto_step(slide, ordinal);
                    }
                }
                Effect::ClearExit { slide } => {
                    self.navigator.clear_exit(slide, visit);
                }
                Effect::ClearShake { widget, unit } => {
                    if self.shake == Some(Shake { widget, unit }) {
                        self.shake = None;
                    }
                }
            }
        }
    }

    pub fn next_timer_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    // --- fullscreen & host ------------------------------------------------

    pub fn toggle_fullscreen(&mut self) {
        let on = !self.overlays.fullscreen();
        self.overlays.set_fullscreen(on);
        self.requests.push(HostRequest::SetFullscreen(on));
    }

    /// The host did not honor a fullscreen request; keep the old state.
    pub fn fullscreen_rejected(&mut self, requested: bool) {
        tracing::warn!(requested, "fullscreen request was not honored by the window system");
        self.overlays.set_fullscreen(!requested);
    }

    /// The host changed fullscreen on its own (window manager shortcut, etc).
    pub fn sync_fullscreen(&mut self, on: bool) {
        self.overlays.set_fullscreen(on);
    }

    pub fn take_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Fix connectors for pairs that completed before their units were laid out.
    pub fn fill_missing_connectors(&mut self, geometry: &dyn GeometryProvider) {
        if let Some(w) = self.current_widget_index() {
            self.widgets[w].fill_missing_connectors(geometry);
        }
    }

    // --- read access ------------------------------------------------------

    pub fn current_slide(&self) -> usize {
        self.navigator.current()
    }

    pub fn total_slides(&self) -> usize {
        self.navigator.total()
    }

    pub fn progress(&self) -> f32 {
        self.navigator.progress()
    }

    pub fn readout(&self) -> String {
        self.navigator.readout()
    }

    pub fn can_go_prev(&self) -> bool {
        self.navigator.can_go_prev()
    }

    pub fn can_go_next(&self) -> bool {
        self.navigator.can_go_next()
    }

    pub fn exiting(&self) -> Option<Exit> {
        self.navigator.exiting()
    }

    pub fn is_element_visible(&self, slide: usize, ordinal: usize) -> bool {
        self.reveal.is_visible(slide, ordinal)
    }

    pub fn reveal_counter(&self, slide: usize) -> usize {
        self.reveal.counter(slide)
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    pub fn options(&self) -> &PresenterOptions {
        &self.options
    }

    pub fn widget(&self, index: usize) -> Option<&DependencyWidget> {
        self.widgets.get(index)
    }

    fn widget_index(&self, slide: usize) -> Option<usize> {
        slide
            .checked_sub(1)
            .and_then(|i| self.slide_widgets.get(i).copied().flatten())
    }

    fn current_widget_index(&self) -> Option<usize> {
        self.widget_index(self.navigator.current())
    }

    pub fn is_shaking(&self, widget: usize, unit: usize) -> bool {
        self.shake == Some(Shake { widget, unit })
    }

    /// Whether something on screen is moving and needs continuous repaints.
    pub fn is_animating(&self) -> bool {
        self.shake.is_some() || self.navigator.exiting().is_some()
    }
}
