use image::RgbImage;

use crate::foundation::math::blend_u8;

/// Axis-aligned ellipse described by an inclusive pixel bounding box `[x0, y0, x1, y1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Ellipse {
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
}

impl Ellipse {
    pub(crate) fn from_bounds(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self {
            cx: (x0 + x1) as f64 / 2.0,
            cy: (y0 + y1) as f64 / 2.0,
            rx: ((x1 - x0) as f64 / 2.0).max(0.5),
            ry: ((y1 - y0) as f64 / 2.0).max(0.5),
        }
    }

    fn pixel_range(&self, canvas: &RgbImage) -> Option<(u32, u32, u32, u32)> {
        let x0 = (self.cx - self.rx).floor().max(0.0);
        let y0 = (self.cy - self.ry).floor().max(0.0);
        let x1 = (self.cx + self.rx).ceil().min(f64::from(canvas.width()) - 1.0);
        let y1 = (self.cy + self.ry).ceil().min(f64::from(canvas.height()) - 1.0);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    /// Normalized radial distance (1.0 on the outline) and the angle in degrees.
    ///
    /// Angles run clockwise from 3 o'clock because the image y axis points down.
    fn polar(&self, x: u32, y: u32) -> (f64, f64) {
        let nx = (f64::from(x) - self.cx) / self.rx;
        let ny = (f64::from(y) - self.cy) / self.ry;
        let angle = ny.atan2(nx).to_degrees().rem_euclid(360.0);
        ((nx * nx + ny * ny).sqrt(), angle)
    }
}

fn put_blended(canvas: &mut RgbImage, x: u32, y: u32, rgba: [u8; 4]) {
    let px = canvas.get_pixel_mut(x, y);
    for c in 0..3 {
        px.0[c] = blend_u8(px.0[c], rgba[c], rgba[3]);
    }
}

/// Fill the ellipse interior.
pub(crate) fn fill_ellipse(canvas: &mut RgbImage, e: Ellipse, rgba: [u8; 4]) {
    let Some((x0, y0, x1, y1)) = e.pixel_range(canvas) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            if e.polar(x, y).0 <= 1.0 {
                put_blended(canvas, x, y, rgba);
            }
        }
    }
}

/// Stroke an elliptical arc between `start_deg` and `end_deg` (clockwise), `width` pixels
/// thick measured inward from the outline.
pub(crate) fn stroke_arc(
    canvas: &mut RgbImage,
    e: Ellipse,
    start_deg: f64,
    end_deg: f64,
    width: f64,
    rgba: [u8; 4],
) {
    let Some((x0, y0, x1, y1)) = e.pixel_range(canvas) else {
        return;
    };
    let inner = (1.0 - width / e.rx.min(e.ry)).max(0.0);
    let start = start_deg.rem_euclid(360.0);
    let end = end_deg.rem_euclid(360.0);
    let in_sweep = |a: f64| {
        if start <= end {
            (start..=end).contains(&a)
        } else {
            a >= start || a <= end
        }
    };

    for y in y0..=y1 {
        for x in x0..=x1 {
            let (r, a) = e.polar(x, y);
            if r <= 1.0 && r >= inner && in_sweep(a) {
                put_blended(canvas, x, y, rgba);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/draw.rs"]
mod tests;
