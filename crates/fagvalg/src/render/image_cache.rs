use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use eframe::egui;

/// Images bundled with the built-in deck, looked up by file name when no
/// file exists next to the deck.
const EMBEDDED: &[(&str, &[u8])] = &[("fagkart.png", include_bytes!("../../content/fagkart.png"))];

fn embedded(path: &str) -> Option<&'static [u8]> {
    EMBEDDED
        .iter()
        .find(|(name, _)| *name == path)
        .map(|(_, bytes)| *bytes)
}

/// Whether `path` resolves to a file next to the deck or a bundled image.
pub fn is_available(base_path: &Path, path: &str) -> bool {
    base_path.join(path).is_file() || embedded(path).is_some()
}

fn read_bytes(base_path: &Path, path: &str) -> Result<Vec<u8>, String> {
    let full = base_path.join(path);
    if full.is_file() {
        return std::fs::read(&full).map_err(|e| format!("{}: {e}", full.display()));
    }
    embedded(path)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| format!("{} does not exist", full.display()))
}

pub fn decode(bytes: &[u8]) -> Result<egui::ColorImage, image::ImageError> {
    let rgba = image::load_from_memory(bytes)?.into_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Lazily loaded textures for modal images. Failed loads are remembered so
/// they are reported once.
pub struct ImageCache {
    base_path: PathBuf,
    textures: RefCell<HashMap<String, Option<egui::TextureHandle>>>,
}

impl ImageCache {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            textures: RefCell::new(HashMap::new()),
        }
    }

    pub fn get_or_load(&self, ctx: &egui::Context, path: &str) -> Option<egui::TextureHandle> {
        if let Some(entry) = self.textures.borrow().get(path) {
            return entry.clone();
        }

        let loaded = read_bytes(&self.base_path, path)
            .and_then(|bytes| decode(&bytes).map_err(|e| e.to_string()));
        let texture = match loaded {
            Ok(image) => {
                tracing::debug!(path, "loaded image");
                Some(ctx.load_texture(path, image, egui::TextureOptions::LINEAR))
            }
            Err(e) => {
                tracing::warn!(path, "could not load image: {e}");
                None
            }
        };
        self.textures
            .borrow_mut()
            .insert(path.to_string(), texture.clone());
        texture
    }
}
