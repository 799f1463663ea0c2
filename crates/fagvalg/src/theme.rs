use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub muted: Color32,
    /// Fill of unselected units, tooltip bubbles and the modal panel.
    pub surface: Color32,
    pub selected_fill: Color32,
    pub selected_text: Color32,
    pub error: Color32,
    pub backdrop: Color32,
    pub h1_size: f32,
    pub h2_size: f32,
    pub h3_size: f32,
    pub body_size: f32,
    pub small_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x1E, 0x1E, 0x1E),
            foreground: Color32::from_rgb(0xC8, 0xC8, 0xC8),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            muted: Color32::from_rgb(0x6E, 0x6E, 0x6E),
            surface: Color32::from_rgb(0x2D, 0x2D, 0x2D),
            selected_fill: Color32::from_rgb(0x52, 0x94, 0xE2),
            selected_text: Color32::WHITE,
            error: Color32::from_rgb(0xFF, 0x6B, 0x5B),
            backdrop: Color32::from_rgba_unmultiplied(0, 0, 0, 190),
            h1_size: 72.0,
            h2_size: 52.0,
            h3_size: 40.0,
            body_size: 32.0,
            small_size: 20.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            muted: Color32::from_rgb(0xA0, 0xA4, 0xAD),
            surface: Color32::from_rgb(0xF2, 0xF4, 0xF7),
            selected_fill: Color32::from_rgb(0x0F, 0x34, 0x60),
            selected_text: Color32::WHITE,
            error: Color32::from_rgb(0xC7, 0x3E, 0x1D),
            backdrop: Color32::from_rgba_unmultiplied(0x10, 0x14, 0x20, 160),
            h1_size: 72.0,
            h2_size: 52.0,
            h3_size: 40.0,
            body_size: 32.0,
            small_size: 20.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        Color32::from_rgba_unmultiplied(r, g, b, (a as f32 * opacity.clamp(0.0, 1.0)) as u8)
    }

    pub fn heading_size(&self, level: u8) -> f32 {
        match level {
            1 => self.h1_size,
            2 => self.h2_size,
            3 => self.h3_size,
            _ => self.body_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_falls_back_to_light() {
        assert_eq!(Theme::from_name("dark").name, "dark");
        assert_eq!(Theme::from_name("solarized").name, "light");
    }

    #[test]
    fn test_with_opacity_scales_alpha() {
        let c = Theme::with_opacity(Color32::from_rgb(10, 20, 30), 0.5);
        assert_eq!(c.a(), 127);
        assert_eq!(Theme::with_opacity(Color32::WHITE, 0.0).a(), 0);
        assert_eq!(Theme::with_opacity(Color32::WHITE, 2.0).a(), 255);
    }

    #[test]
    fn test_heading_sizes_shrink() {
        let t = Theme::light();
        assert!(t.heading_size(1) > t.heading_size(2));
        assert!(t.heading_size(3) > t.heading_size(4));
        assert_eq!(t.heading_size(6), t.body_size);
    }
}
