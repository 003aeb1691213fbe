use image::RgbImage;

use crate::canvas::draw::{Ellipse, fill_ellipse, stroke_arc};

/// Shadow tone drawn on the upper-left rim of each punched hole.
const HOLE_SHADOW_RGBA: [u8; 4] = [180, 180, 180, 200];
const HOLE_SHADOW_WIDTH: f64 = 3.0;
const COIL_INSET: i64 = 5;
const COIL_WIDTH: f64 = 10.0;

/// Vertical layout of the punched holes along the spine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoleLayout {
    /// Top edge of the first hole.
    pub start_y: i64,
    /// Distance between consecutive hole tops.
    pub pitch: i64,
    /// Number of holes.
    pub count: i64,
}

impl HoleLayout {
    /// Center as many holes as fit in `canvas_height` with the given diameter and gap.
    pub fn new(canvas_height: u32, diameter: u32, spacing: u32) -> Self {
        let h = i64::from(canvas_height);
        let d = i64::from(diameter);
        let s = i64::from(spacing);
        let pitch = (d + s).max(1);
        let count = h / pitch;
        let start_y = (h - count * pitch + s) / 2;
        Self {
            start_y,
            pitch,
            count,
        }
    }

    /// Top edge of every hole, top to bottom.
    pub fn tops(self) -> impl Iterator<Item = i64> {
        (0..self.count).map(move |i| self.start_y + i * self.pitch)
    }
}

/// Punch a column of binding holes centered on `spine_center` and draw the coil through them.
///
/// Each hole is a disk in the paper tone with a gray rim shadow and a coil arc slightly inset,
/// so the wire reads as wrapping behind the page.
pub fn add_spiral_binding(
    canvas: &mut RgbImage,
    spine_center: i64,
    hole_diameter: u32,
    hole_spacing: u32,
    paper_rgb: [u8; 3],
    coil_rgba: [u8; 4],
) {
    let layout = HoleLayout::new(canvas.height(), hole_diameter, hole_spacing);
    let d = i64::from(hole_diameter);
    let x0 = spine_center - d / 2;
    let x1 = spine_center + d / 2;
    let hole_rgba = [paper_rgb[0], paper_rgb[1], paper_rgb[2], 255];

    for y in layout.tops() {
        let hole = Ellipse::from_bounds(x0, y, x1, y + d);
        fill_ellipse(canvas, hole, hole_rgba);
        stroke_arc(
            canvas,
            hole,
            135.0,
            315.0,
            HOLE_SHADOW_WIDTH,
            HOLE_SHADOW_RGBA,
        );

        let coil = Ellipse::from_bounds(
            x0 + COIL_INSET,
            y + COIL_INSET,
            x1 - COIL_INSET,
            y + d - COIL_INSET,
        );
        stroke_arc(canvas, coil, 45.0, 225.0, COIL_WIDTH, coil_rgba);
    }

    tracing::debug!(holes = layout.count, spine_center, "spiral binding drawn");
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/binding.rs"]
mod tests;
