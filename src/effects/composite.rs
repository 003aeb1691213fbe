use image::{GrayImage, RgbImage, RgbaImage};

use crate::foundation::error::{PressError, PressResult};
use crate::foundation::math::{blend_u8, scale_alpha};

/// Straight-alpha RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Source-over for straight-alpha pixels on an RGBA destination.
///
/// Every channel (alpha included) is interpolated by the source alpha, which matches pasting a
/// bitmap through its own alpha mask.
pub fn over(dst: Rgba8, src: Rgba8, opacity: f32) -> Rgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }
    let a = scale_alpha(src[3], opacity);

    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = blend_u8(dst[i], src[i], a);
    }
    out
}

/// Paste `src` onto an RGB canvas at `(x, y)` using the source alpha as the mask.
///
/// Regions outside the canvas are clipped; fully transparent source pixels leave the canvas
/// untouched.
pub fn paste_with_alpha(canvas: &mut RgbImage, src: &RgbaImage, x: i64, y: i64) {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + sw).min(cw);
    let y1 = (y + sh).min(ch);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for cy in y0..y1 {
        for cx in x0..x1 {
            let s = src.get_pixel((cx - x) as u32, (cy - y) as u32).0;
            if s[3] == 0 {
                continue;
            }
            let d = canvas.get_pixel_mut(cx as u32, cy as u32);
            for c in 0..3 {
                d.0[c] = blend_u8(d.0[c], s[c], s[3]);
            }
        }
    }
}

/// Paste `src` into an RGBA destination at `(x, y)` through the source alpha.
pub fn paste_rgba(dst: &mut RgbaImage, src: &RgbaImage, x: u32, y: u32) {
    for (sx, sy, s) in src.enumerate_pixels() {
        let (dx, dy) = (x + sx, y + sy);
        if dx >= dst.width() || dy >= dst.height() {
            continue;
        }
        let d = dst.get_pixel_mut(dx, dy);
        d.0 = over(d.0, s.0, 1.0);
    }
}

/// Linear blend of two equally sized RGB images: `base * (1 - alpha) + layer * alpha`.
pub fn blend_images(base: &mut RgbImage, layer: &RgbImage, alpha: f32) -> PressResult<()> {
    if base.dimensions() != layer.dimensions() {
        return Err(PressError::render("blend_images expects equally sized images"));
    }
    let a = ((alpha.clamp(0.0, 1.0) * 255.0).round()) as u8;
    if a == 0 {
        return Ok(());
    }
    for (d, s) in base.iter_mut().zip(layer.iter()) {
        *d = blend_u8(*d, *s, a);
    }
    Ok(())
}

/// Composite a solid `color` layer over `canvas` through a single-channel opacity mask.
///
/// Mask value 0 keeps the canvas, 255 replaces it with `color`; black layers therefore darken
/// multiplicatively.
pub fn composite_solid_through_mask(
    canvas: &mut RgbImage,
    color: [u8; 3],
    mask: &GrayImage,
) -> PressResult<()> {
    if canvas.dimensions() != mask.dimensions() {
        return Err(PressError::render("mask dimensions must match the canvas"));
    }
    for (px, m) in canvas.pixels_mut().zip(mask.pixels()) {
        let m = m.0[0];
        if m == 0 {
            continue;
        }
        for c in 0..3 {
            px.0[c] = blend_u8(px.0[c], color[c], m);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
