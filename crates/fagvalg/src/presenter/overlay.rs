/// Tooltips, modals, the slide menu and the fullscreen flag.
///
/// At most one tooltip and at most one modal are open at a time.
#[derive(Debug, Clone, Default)]
pub struct Overlays {
    tooltip: Option<usize>,
    modal: Option<usize>,
    menu: bool,
    fullscreen: bool,
}

impl Overlays {
    pub fn open_tooltip(&self) -> Option<usize> {
        self.tooltip
    }

    pub fn open_modal(&self) -> Option<usize> {
        self.modal
    }

    pub fn menu_open(&self) -> bool {
        self.menu
    }

    pub fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Content scrolling is suppressed while a modal is up.
    pub fn scroll_locked(&self) -> bool {
        self.modal.is_some()
    }

    /// Toggle tooltip `id`; opening it closes any other. Returns whether it is now open.
    pub fn toggle_tooltip(&mut self, id: usize) -> bool {
        if self.tooltip == Some(id) {
            self.tooltip = None;
            false
        } else {
            self.tooltip = Some(id);
            true
        }
    }

    pub fn close_tooltips(&mut self) -> bool {
        self.tooltip.take().is_some()
    }

    pub fn show_modal(&mut self, id: usize) {
        self.tooltip = None;
        self.modal = Some(id);
    }

    pub fn close_modal(&mut self) -> bool {
        self.modal.take().is_some()
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu = !self.menu;
        self.menu
    }

    pub fn close_menu(&mut self) -> bool {
        std::mem::replace(&mut self.menu, false)
    }

    /// Close modal, tooltip and menu. Returns whether anything was open.
    pub fn close_all(&mut self) -> bool {
        let modal = self.close_modal();
        let tooltip = self.close_tooltips();
        let menu = self.close_menu();
        modal || tooltip || menu
    }

    pub fn set_fullscreen(&mut self, on: bool) {
        self.fullscreen = on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_open_tooltip() {
        let mut o = Overlays::default();
        assert!(o.toggle_tooltip(1));
        assert!(o.toggle_tooltip(2));
        assert_eq!(o.open_tooltip(), Some(2));
        assert!(!o.toggle_tooltip(2));
        assert_eq!(o.open_tooltip(), None);
    }

    #[test]
    fn test_modal_locks_scroll_and_closes_tooltip() {
        let mut o = Overlays::default();
        o.toggle_tooltip(0);
        o.show_modal(3);
        assert!(o.scroll_locked());
        assert_eq!(o.open_tooltip(), None);
        assert!(o.close_modal());
        assert!(!o.scroll_locked());
        assert!(!o.close_modal());
    }

    #[test]
    fn test_close_all_reports_change() {
        let mut o = Overlays::default();
        assert!(!o.close_all());
        o.toggle_menu();
        assert!(o.close_all());
        assert!(!o.menu_open());
    }
}
