use fontdue::Font;
use image::{Rgba, RgbaImage};

use crate::config::master::TypographyConfig;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{PressError, PressResult};
use crate::foundation::math::mul_div255_u8;
use crate::layout::model::{Element, TextFields};
use crate::text::font::{FontStore, ink_width, layout_line};
use crate::text::wrap::wrap_lines;

/// Wrapped, line-measured text ready to rasterize.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    /// Output lines, blank lines as empty strings.
    pub lines: Vec<String>,
    /// Line pitch in pixels.
    pub line_height: u32,
    /// Bitmap width (the element's declared width).
    pub width: u32,
}

impl TextBlock {
    /// Bitmap height: `lines * line_height`.
    pub fn height(&self) -> u32 {
        self.lines.len() as u32 * self.line_height
    }
}

/// Rasterizes text elements into transparent RGBA bitmaps.
pub struct TextRenderer<'a> {
    fonts: FontStore,
    typography: &'a TypographyConfig,
}

impl<'a> TextRenderer<'a> {
    /// Create a renderer; fonts are resolved lazily from `fonts`.
    pub fn new(fonts: FontStore, typography: &'a TypographyConfig) -> Self {
        Self { fonts, typography }
    }

    /// Line pitch: the explicit leading, else `size + default_leading`.
    pub fn line_height(&self, text: &TextFields) -> u32 {
        text.leading.unwrap_or_else(|| {
            (text.size + self.typography.default_leading as f32)
                .round()
                .max(1.0) as u32
        })
    }

    /// Wrap `text` for a bitmap `width` pixels wide.
    pub fn layout(&self, font: &Font, text: &TextFields, width: u32) -> TextBlock {
        let padding = self.typography.word_wrap_padding;
        let max_width = width.saturating_sub(2 * padding) as f32;
        let lines = wrap_lines(&text.content, max_width, |s| ink_width(font, text.size, s));
        TextBlock {
            lines,
            line_height: self.line_height(text),
            width,
        }
    }

    /// Render a text element.
    #[tracing::instrument(skip(self, element), fields(id = %element.id))]
    pub fn render(&mut self, element: &Element) -> PressResult<RgbaImage> {
        let text = element.text.as_ref().ok_or_else(|| {
            PressError::layout(format!("text element '{}' has no text fields", element.id))
        })?;
        let dims = element.dimensions.ok_or_else(|| {
            PressError::layout(format!("text element '{}' has no dimensions", element.id))
        })?;

        let font = self.fonts.get(&element.id, &text.font)?;
        let block = self.layout(&font, text, dims.width);
        tracing::debug!(lines = block.lines.len(), line_height = block.line_height, "text wrapped");
        Ok(self.rasterize(&font, text, &block))
    }

    /// Draw each line at `(padding, i * line_height)`, with the ascender on the line top.
    pub fn rasterize(&self, font: &Font, text: &TextFields, block: &TextBlock) -> RgbaImage {
        let mut img = RgbaImage::new(block.width, block.height());
        let ascent = font
            .horizontal_line_metrics(text.size)
            .map(|m| m.ascent)
            .unwrap_or(text.size * 0.8);
        let origin_x = self.typography.word_wrap_padding as f32;

        for (i, line) in block.lines.iter().enumerate() {
            let baseline = (i as u32 * block.line_height) as f32 + ascent;
            for glyph in layout_line(font, text.size, line) {
                if glyph.width == 0 {
                    continue;
                }
                let (metrics, coverage) = font.rasterize(glyph.ch, text.size);
                let left = (origin_x + glyph.left).round() as i64;
                let top = baseline.round() as i64 - i64::from(metrics.ymin) - metrics.height as i64;
                draw_coverage(&mut img, left, top, metrics.width, &coverage, text.color);
            }
        }
        img
    }
}

fn draw_coverage(
    img: &mut RgbaImage,
    left: i64,
    top: i64,
    width: usize,
    coverage: &[u8],
    color: Rgb8,
) {
    if width == 0 {
        return;
    }
    for (row, chunk) in coverage.chunks_exact(width).enumerate() {
        let y = top + row as i64;
        if y < 0 || y >= i64::from(img.height()) {
            continue;
        }
        for (col, &c) in chunk.iter().enumerate() {
            let x = left + col as i64;
            if c == 0 || x < 0 || x >= i64::from(img.width()) {
                continue;
            }
            let px = img.get_pixel_mut(x as u32, y as u32);
            // Same ink everywhere, so overlapping coverage only accumulates alpha.
            let rest = mul_div255_u8(u16::from(px.0[3]), u16::from(255 - c));
            *px = Rgba(color.with_alpha(c.saturating_add(rest)));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/render.rs"]
mod tests;
