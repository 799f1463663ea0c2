use eframe::egui;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::deck::Deck;
use crate::presenter::input::Key;
use crate::presenter::{HostRequest, KeyOutcome, Presenter};
use crate::render::{self, chrome, image_cache::ImageCache, regions::RegionMap, transition};
use crate::theme::Theme;

/// Frames to wait for the window system to confirm a fullscreen change.
const FULLSCREEN_CONFIRM_FRAMES: u32 = 30;
const SCROLL_STEP: f32 = 120.0;

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let duration = 1.5;
        let fade_start = 1.0;
        if elapsed < fade_start {
            1.0
        } else if elapsed < duration {
            1.0 - (elapsed - fade_start) / (duration - fade_start)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= 1.5
    }
}

/// A fullscreen change that the window has not confirmed yet.
struct PendingFullscreen {
    wanted: bool,
    frames: u32,
}

#[derive(Debug, PartialEq, Eq)]
enum FullscreenCheck {
    Confirmed,
    Waiting,
    Rejected,
}

impl PendingFullscreen {
    /// Compare against the state the window reports. Backends that report no
    /// fullscreen state at all are trusted to have applied the request.
    fn check(&mut self, actual: Option<bool>) -> FullscreenCheck {
        match actual {
            None => FullscreenCheck::Confirmed,
            Some(actual) if actual == self.wanted => FullscreenCheck::Confirmed,
            Some(_) => {
                self.frames += 1;
                if self.frames > FULLSCREEN_CONFIRM_FRAMES {
                    FullscreenCheck::Rejected
                } else {
                    FullscreenCheck::Waiting
                }
            }
        }
    }
}

struct PresentationApp {
    deck: Deck,
    presenter: Presenter,
    theme: Theme,
    images: ImageCache,
    /// Clickable regions of the last frame.
    regions: RegionMap,
    clock: Instant,
    toast: Option<Toast>,
    last_esc: Option<Instant>,
    pending_fullscreen: Option<PendingFullscreen>,
    shown_slide: usize,
    scroll_offsets: Vec<f32>,
    scroll_targets: Vec<f32>,
    content_heights: Vec<f32>,
}

fn map_key(key: egui::Key) -> Option<Key> {
    Some(match key {
        egui::Key::ArrowRight => Key::ArrowRight,
        egui::Key::ArrowLeft => Key::ArrowLeft,
        egui::Key::Space => Key::Space,
        egui::Key::PageDown => Key::PageDown,
        egui::Key::PageUp => Key::PageUp,
        egui::Key::Home => Key::Home,
        egui::Key::End => Key::End,
        egui::Key::Escape => Key::Escape,
        egui::Key::F => Key::F,
        egui::Key::M => Key::M,
        egui::Key::N => Key::N,
        egui::Key::P => Key::P,
        egui::Key::Q => Key::Q,
        _ => return None,
    })
}

impl PresentationApp {
    fn new(deck: Deck, presenter: Presenter, theme: Theme) -> Self {
        let slide_count = deck.slide_count();
        let images = ImageCache::new(deck.base_path.clone());
        let shown_slide = presenter.current_slide();
        Self {
            deck,
            presenter,
            theme,
            images,
            regions: RegionMap::default(),
            clock: Instant::now(),
            toast: None,
            last_esc: None,
            pending_fullscreen: None,
            shown_slide,
            scroll_offsets: vec![0.0; slide_count],
            scroll_targets: vec![0.0; slide_count],
            content_heights: vec![0.0; slide_count],
        }
    }

    fn now_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

    /// Escape with nothing left to close: leave fullscreen, or quit on a double tap.
    fn escape_fallthrough(&mut self, viewport_cmds: &mut Vec<egui::ViewportCommand>) {
        if self.presenter.overlays().fullscreen() {
            self.presenter.toggle_fullscreen();
            return;
        }
        if let Some(last) = self.last_esc {
            if last.elapsed().as_secs_f32() < 1.0 {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }
        }
        self.last_esc = Some(Instant::now());
        self.toast = Some(Toast::new("Trykk Esc igjen for å avslutte".to_string()));
    }

    fn apply_requests(&mut self, viewport_cmds: &mut Vec<egui::ViewportCommand>) {
        for request in self.presenter.take_requests() {
            match request {
                HostRequest::SetFullscreen(on) => {
                    viewport_cmds.push(egui::ViewportCommand::Fullscreen(on));
                    self.pending_fullscreen = Some(PendingFullscreen {
                        wanted: on,
                        frames: 0,
                    });
                }
                HostRequest::InvalidCue { widget, unit } => {
                    let graph = self.deck.widgets.get(widget).map(|w| &w.graph);
                    if let Some(label) = graph
                        .and_then(|g| g.prerequisite(unit).and_then(|p| g.unit(p)))
                        .map(|u| u.label.clone())
                    {
                        self.toast = Some(Toast::new(format!("Velg {label} først")));
                    }
                }
                HostRequest::Quit => viewport_cmds.push(egui::ViewportCommand::Close),
            }
        }
    }

    fn check_fullscreen(&mut self, actual: Option<bool>) {
        match self.pending_fullscreen.as_mut() {
            Some(pending) => match pending.check(actual) {
                FullscreenCheck::Confirmed => self.pending_fullscreen = None,
                FullscreenCheck::Waiting => {}
                FullscreenCheck::Rejected => {
                    let wanted = pending.wanted;
                    self.pending_fullscreen = None;
                    self.presenter.fullscreen_rejected(wanted);
                    self.toast = Some(Toast::new("Fullskjerm er ikke tilgjengelig".to_string()));
                }
            },
            None => {
                if let Some(actual) = actual {
                    if actual != self.presenter.overlays().fullscreen() {
                        self.presenter.sync_fullscreen(actual);
                    }
                }
            }
        }
    }

    fn draw_current_with_scroll(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        rect: egui::Rect,
        scale: f32,
        now: u64,
    ) {
        let idx = self.presenter.current_slide() - 1;
        let Some(slide) = self.deck.slide(idx + 1) else {
            return;
        };

        let overflow = (self.content_heights[idx] - rect.height()).max(0.0);
        self.scroll_targets[idx] = self.scroll_targets[idx].clamp(0.0, overflow);

        // Smooth ease: move 15% of remaining distance each frame
        let target = self.scroll_targets[idx];
        let current = self.scroll_offsets[idx];
        let diff = target - current;
        if diff.abs() < 0.5 {
            self.scroll_offsets[idx] = target;
        } else {
            self.scroll_offsets[idx] = current + diff * 0.15;
            ctx.request_repaint();
        }
        let scroll_offset = self.scroll_offsets[idx];

        let scrolled_rect = rect.translate(egui::vec2(0.0, -scroll_offset));
        let child_ui = ui.new_child(egui::UiBuilder::new().max_rect(rect).id_salt("scroll_clip"));
        self.content_heights[idx] = render::render_slide(
            &child_ui,
            &self.deck,
            slide,
            &self.presenter,
            &self.theme,
            scrolled_rect,
            scale,
            now,
            &mut self.regions,
        );

        if scroll_offset < overflow - 0.5 {
            render::draw_scroll_hint(ui, &self.theme, rect, scale, true);
        }
        if scroll_offset > 0.5 {
            render::draw_scroll_hint(ui, &self.theme, rect, scale, false);
        }
    }

    fn draw_transition(
        &mut self,
        ui: &egui::Ui,
        rect: egui::Rect,
        scale: f32,
        now: u64,
        from: usize,
        (from_dx, to_dx): (f32, f32),
    ) {
        // Regions of moving slides are not clickable.
        let mut scratch = RegionMap::default();
        for (number, dx) in [(from, from_dx), (self.presenter.current_slide(), to_dx)] {
            if let Some(slide) = self.deck.slide(number) {
                render::render_slide(
                    ui,
                    &self.deck,
                    slide,
                    &self.presenter,
                    &self.theme,
                    rect.translate(egui::vec2(dx, 0.0)),
                    scale,
                    now,
                    &mut scratch,
                );
            }
        }
    }

    fn draw_overlays(&mut self, ui: &egui::Ui, rect: egui::Rect, scale: f32) {
        let overlays = self.presenter.overlays();
        let (tooltip, menu, modal) = (overlays.open_tooltip(), overlays.menu_open(), overlays.open_modal());

        if let Some(id) = tooltip {
            if let Some(spec) = self.deck.tooltips.get(id) {
                chrome::draw_tooltip(ui, id, spec, &self.theme, rect, scale, &mut self.regions);
            }
        }
        if menu {
            chrome::draw_menu(
                ui,
                &self.deck,
                self.presenter.current_slide(),
                &self.theme,
                rect,
                scale,
                &mut self.regions,
            );
        }
        if let Some(id) = modal {
            if let Some(spec) = self.deck.modals.get(id) {
                chrome::draw_modal(ui, spec, &self.images, &self.theme, rect, scale, &mut self.regions);
            }
        }
    }

    fn draw_toast(&self, ui: &egui::Ui, ctx: &egui::Context, rect: egui::Rect, scale: f32) {
        let Some(ref toast) = self.toast else {
            return;
        };
        let opacity = toast.opacity();
        if opacity <= 0.0 {
            return;
        }
        let toast_color = Theme::with_opacity(self.theme.foreground, opacity * 0.9);
        let toast_bg = Theme::with_opacity(self.theme.surface, opacity * 0.9);
        let galley = ui.painter().layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional(20.0 * scale),
            toast_color,
        );
        let padding = 16.0 * scale;
        let toast_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - galley.rect.width() / 2.0 - padding,
                rect.bottom() - 140.0 * scale,
            ),
            egui::vec2(
                galley.rect.width() + padding * 2.0,
                galley.rect.height() + padding * 2.0,
            ),
        );
        ui.painter().rect_filled(toast_rect, 8.0 * scale, toast_bg);
        let text_pos = egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding);
        ui.painter().galley(text_pos, galley, toast_color);
        ctx.request_repaint();
    }
}

impl eframe::App for PresentationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = self.now_ms();
        self.presenter.tick(now);

        // Collect input first; viewport commands are sent after the input
        // closure (sending inside ctx.input() deadlocks).
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let mut keys = Vec::new();
        let mut touches = Vec::new();
        let (click, scroll, actual_fullscreen) = ctx.input(|i| {
            for event in &i.events {
                match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        modifiers,
                        ..
                    } if !modifiers.command => {
                        if let Some(key) = map_key(*key) {
                            keys.push(key);
                        }
                    }
                    egui::Event::Touch { phase, pos, .. } => touches.push((*phase, *pos)),
                    _ => {}
                }
            }

            let click = if i.pointer.primary_clicked() {
                i.pointer.interact_pos()
            } else {
                None
            };

            let mut scroll = -i.smooth_scroll_delta.y;
            if i.key_pressed(egui::Key::ArrowUp) {
                scroll -= SCROLL_STEP;
            }
            if i.key_pressed(egui::Key::ArrowDown) {
                scroll += SCROLL_STEP;
            }
            (click, scroll, i.viewport().fullscreen)
        });

        for key in keys {
            if key != Key::Escape {
                self.last_esc = None;
            }
            if self.presenter.handle_key(key, now) == KeyOutcome::Fallthrough {
                self.escape_fallthrough(&mut viewport_cmds);
            }
        }

        if let Some(pos) = click {
            let region = self.regions.hit(pos);
            tracing::trace!(?region, "click");
            self.presenter.click(region, &self.regions, now);
        }

        for (phase, pos) in touches {
            match phase {
                egui::TouchPhase::Start => self.presenter.touch_start(pos),
                egui::TouchPhase::End => {
                    self.presenter.touch_end(pos, now);
                }
                egui::TouchPhase::Cancel => self.presenter.touch_cancel(),
                egui::TouchPhase::Move => {}
            }
        }

        let current = self.presenter.current_slide();
        if current != self.shown_slide {
            let old = self.shown_slide - 1;
            self.scroll_offsets[old] = 0.0;
            self.scroll_targets[old] = 0.0;
            self.shown_slide = current;
        }
        if scroll != 0.0 && !self.presenter.overlays().scroll_locked() {
            self.scroll_targets[current - 1] += scroll;
        }

        self.apply_requests(&mut viewport_cmds);
        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }
        self.check_fullscreen(actual_fullscreen);

        // Pairs completed before their units were laid out get their connector now.
        self.presenter.fill_missing_connectors(&self.regions);

        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        let bg = self.theme.background;
        let transition_ms = self.presenter.options().transition_ms;

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                let scale = render::compute_scale(rect);
                self.regions.clear();

                let moving = self.presenter.exiting().and_then(|exit| {
                    transition::slide_offsets(&exit, now, transition_ms, rect.width())
                        .map(|offsets| (exit.slide, offsets))
                });
                match moving {
                    Some((from, offsets)) => self.draw_transition(ui, rect, scale, now, from, offsets),
                    None => self.draw_current_with_scroll(ui, ctx, rect, scale, now),
                }

                chrome::draw_chrome(
                    ui,
                    &self.presenter,
                    self.deck.meta.footer.as_deref(),
                    &self.theme,
                    rect,
                    scale,
                    &mut self.regions,
                );
                self.draw_overlays(ui, rect, scale);
                self.draw_toast(ui, ctx, rect, scale);
            });

        if self.presenter.is_animating() || self.pending_fullscreen.is_some() {
            ctx.request_repaint();
        } else if let Some(due) = self.presenter.next_timer_due() {
            ctx.request_repaint_after(Duration::from_millis(due.saturating_sub(now)));
        }
    }
}

pub fn run(
    deck: Deck,
    file: Option<PathBuf>,
    windowed: bool,
    start_slide: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    let title = deck.meta.title.clone().unwrap_or_else(|| match &file {
        Some(file) => format!(
            "fagvalg: {}",
            file.file_name().unwrap_or_default().to_string_lossy()
        ),
        None => "fagvalg".to_string(),
    });

    let theme_name = deck
        .meta
        .theme
        .as_deref()
        .or(config.theme())
        .unwrap_or("light");
    let theme = Theme::from_name(theme_name);

    // --slide overrides the configured start slide
    let start = start_slide.or(config.start_slide()).unwrap_or(1);
    let mut presenter = Presenter::new(&deck, config.presenter_options());
    presenter.start(start, 0);
    if !windowed {
        presenter.sync_fullscreen(true);
    }
    tracing::info!(
        slides = deck.slide_count(),
        start = presenter.current_slide(),
        theme = theme_name,
        "starting presentation"
    );

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(PresentationApp::new(deck, presenter, theme)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping_covers_presenter_keys() {
        assert_eq!(map_key(egui::Key::ArrowRight), Some(Key::ArrowRight));
        assert_eq!(map_key(egui::Key::PageUp), Some(Key::PageUp));
        assert_eq!(map_key(egui::Key::Escape), Some(Key::Escape));
        assert_eq!(map_key(egui::Key::ArrowUp), None);
        assert_eq!(map_key(egui::Key::G), None);
    }

    #[test]
    fn test_fullscreen_confirmed_or_rejected() {
        let mut pending = PendingFullscreen { wanted: true, frames: 0 };
        assert_eq!(pending.check(Some(false)), FullscreenCheck::Waiting);
        assert_eq!(pending.check(Some(true)), FullscreenCheck::Confirmed);

        let mut ignored = PendingFullscreen { wanted: true, frames: 0 };
        for _ in 0..FULLSCREEN_CONFIRM_FRAMES {
            assert_eq!(ignored.check(Some(false)), FullscreenCheck::Waiting);
        }
        assert_eq!(ignored.check(Some(false)), FullscreenCheck::Rejected);
    }

    #[test]
    fn test_unknown_fullscreen_state_is_accepted() {
        let mut pending = PendingFullscreen { wanted: true, frames: 0 };
        for _ in 0..=FULLSCREEN_CONFIRM_FRAMES * 2 {
            assert_eq!(pending.check(None), FullscreenCheck::Confirmed);
        }
        let mut leaving = PendingFullscreen { wanted: false, frames: 0 };
        assert_eq!(leaving.check(None), FullscreenCheck::Confirmed);
    }
}
