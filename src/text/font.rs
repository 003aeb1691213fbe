use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use fontdue::{Font, FontSettings};

use crate::foundation::error::{PressError, PressResult};

/// Lazily loaded fonts keyed by name, resolved as `<dir>/<name>.ttf`.
pub struct FontStore {
    dir: PathBuf,
    fonts: HashMap<String, Arc<Font>>,
}

impl FontStore {
    /// Create an empty store over a font directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            fonts: HashMap::new(),
        }
    }

    /// Path a font name resolves to.
    pub fn font_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.ttf"))
    }

    /// Fetch a font, loading it on first use. `element_id` is reported when the file is absent.
    pub fn get(&mut self, element_id: &str, name: &str) -> PressResult<Arc<Font>> {
        if let Some(font) = self.fonts.get(name) {
            return Ok(Arc::clone(font));
        }
        let path = self.font_path(name);
        if !path.is_file() {
            return Err(PressError::FontNotFound {
                element_id: element_id.to_string(),
                path,
            });
        }
        let font = Arc::new(load_font_file(&path)?);
        tracing::debug!(font = name, path = %path.display(), "font loaded");
        self.fonts.insert(name.to_string(), Arc::clone(&font));
        Ok(font)
    }
}

/// Parse a TrueType/OpenType file.
pub fn load_font_file(path: &Path) -> PressResult<Font> {
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    Font::from_bytes(bytes, FontSettings::default())
        .map_err(|e| PressError::render(format!("parse font '{}': {e}", path.display())))
}

/// Width of the inked bounding box of `text` at `px` pixels, kerning included.
///
/// Leading and trailing spaces carry no ink and therefore do not count.
pub fn ink_width(font: &Font, px: f32, text: &str) -> f32 {
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    for glyph in layout_line(font, px, text) {
        if glyph.width == 0 {
            continue;
        }
        min_x = min_x.min(glyph.left);
        max_x = max_x.max(glyph.left + glyph.width as f32);
    }
    if min_x.is_finite() { max_x - min_x } else { 0.0 }
}

/// One positioned glyph on a line, relative to the pen origin.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PlacedGlyph {
    pub(crate) ch: char,
    pub(crate) left: f32,
    pub(crate) width: usize,
}

pub(crate) fn layout_line(font: &Font, px: f32, text: &str) -> Vec<PlacedGlyph> {
    let mut out = Vec::with_capacity(text.len());
    let mut pen = 0.0f32;
    let mut prev: Option<char> = None;
    for ch in text.chars() {
        if let Some(p) = prev {
            pen += font.horizontal_kern(p, ch, px).unwrap_or(0.0);
        }
        let m = font.metrics(ch, px);
        out.push(PlacedGlyph {
            ch,
            left: pen + m.xmin as f32,
            width: m.width,
        });
        pen += m.advance_width;
        prev = Some(ch);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
