use image::{GrayImage, Luma, RgbImage};

use crate::effects::composite::composite_solid_through_mask;
use crate::foundation::core::SpineGeometry;
use crate::foundation::error::PressResult;

/// Fraction of the spine width covered by the gutter shadow on each side.
const SHADOW_SPREAD: f64 = 0.75;

/// Single-channel mask for the page-curvature shadow.
///
/// Columns run outward from each spine edge; column `i` gets
/// `opacity * 255 * (1 - i / shadow_width)^2`, so the shade is darkest against the spine and
/// fades quadratically into the page.
///
/// The shade falls on the page gutters outside the dead zone (columns `start - 1 - i` and
/// `end + i`). Columns inside `[start, end)` stay 0; that strip belongs to the binding holes.
pub fn curvature_mask(width: u32, height: u32, spine: SpineGeometry, opacity: f32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let shadow_width = (spine.width() as f64 * SHADOW_SPREAD) as i64;
    if shadow_width <= 0 || opacity <= 0.0 {
        return mask;
    }

    let mut column_alpha = vec![0u8; width as usize];
    for i in 0..shadow_width {
        let falloff = 1.0 - i as f64 / shadow_width as f64;
        let alpha = (f64::from(opacity) * 255.0 * falloff * falloff) as u8;
        for x in [spine.start - 1 - i, spine.end + i] {
            if (0..i64::from(width)).contains(&x) {
                let slot = &mut column_alpha[x as usize];
                *slot = (*slot).max(alpha);
            }
        }
    }

    for (x, _, px) in mask.enumerate_pixels_mut() {
        *px = Luma([column_alpha[x as usize]]);
    }
    mask
}

/// Darken both sides of the spine to suggest the page curving into the binding.
pub fn add_page_curvature_shadow(
    canvas: &mut RgbImage,
    spine: SpineGeometry,
    opacity: f32,
) -> PressResult<()> {
    let mask = curvature_mask(canvas.width(), canvas.height(), spine, opacity);
    composite_solid_through_mask(canvas, [0, 0, 0], &mask)
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/shadow.rs"]
mod tests;
