use image::{GrayImage, Luma, RgbImage};
use rayon::prelude::*;

use crate::config::master::ResolvedConfig;
use crate::effects::composite::composite_solid_through_mask;
use crate::foundation::core::Vec2;
use crate::foundation::error::PressResult;
use crate::foundation::math::clamp_u8;

/// Vignette radius relative to the larger image side.
const VIGNETTE_RADIUS_SCALE: f64 = 1.2;

/// Strengths of the print-simulation passes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrintSettings {
    /// Sampling offset applied to the red (magenta plate) channel.
    pub magenta_shift: Vec2,
    /// Sampling offset applied to the blue (yellow plate) channel.
    pub yellow_shift: Vec2,
    /// Uniform brightness multiplier.
    pub dot_gain: f32,
    /// Edge darkening strength in `0..=1`.
    pub vignette: f32,
    /// Number of concentric vignette rings.
    pub vignette_steps: u32,
}

impl PrintSettings {
    /// Settings taken from a resolved configuration.
    pub fn from_config(cfg: &ResolvedConfig) -> Self {
        let print = &cfg.master.print_simulation;
        Self {
            magenta_shift: cfg.magenta_shift,
            yellow_shift: cfg.yellow_shift,
            dot_gain: print.dot_gain,
            vignette: print.vignette,
            vignette_steps: print.vignette_steps,
        }
    }
}

/// Which passes run. All are on by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrintPasses {
    /// Channel misregistration.
    pub misregistration: bool,
    /// Dot gain.
    pub dot_gain: bool,
    /// Vignette.
    pub vignette: bool,
}

impl Default for PrintPasses {
    fn default() -> Self {
        Self {
            misregistration: true,
            dot_gain: true,
            vignette: true,
        }
    }
}

/// Applies the offset-press look to a finished spread.
///
/// Passes always run in the same order (misregistration, dot gain, vignette) and never change
/// the image size.
#[derive(Clone, Copy, Debug)]
pub struct PrintArtifactFilter {
    settings: PrintSettings,
    passes: PrintPasses,
}

impl PrintArtifactFilter {
    /// Filter with every pass enabled.
    pub fn new(settings: PrintSettings) -> Self {
        Self {
            settings,
            passes: PrintPasses::default(),
        }
    }

    /// Restrict which passes run.
    pub fn with_passes(mut self, passes: PrintPasses) -> Self {
        self.passes = passes;
        self
    }

    /// Run the enabled passes.
    #[tracing::instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn apply(&self, image: RgbImage) -> PressResult<RgbImage> {
        let s = &self.settings;
        let mut image = image;
        if self.passes.misregistration {
            image = misregister(&image, s.magenta_shift, s.yellow_shift);
        }
        if self.passes.dot_gain {
            apply_dot_gain(&mut image, s.dot_gain);
        }
        if self.passes.vignette {
            apply_vignette(&mut image, s.vignette, s.vignette_steps)?;
        }
        Ok(image)
    }
}

/// Shift the red and blue channels by sub-pixel offsets; green stays registered.
///
/// Output pixel `(x, y)` samples the source channel at `(x + dx, y + dy)` bilinearly; samples
/// falling outside the image read as zero.
pub fn misregister(image: &RgbImage, magenta: Vec2, yellow: Vec2) -> RgbImage {
    let (w, h) = image.dimensions();
    let mut out = image.clone();
    if w == 0 || h == 0 {
        return out;
    }
    let src = image.as_raw();
    let row_len = w as usize * 3;

    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w as usize {
                for (channel, shift) in [(0usize, magenta), (2usize, yellow)] {
                    row[x * 3 + channel] =
                        sample_bilinear(src, w, h, channel, x as f64 + shift.x, y as f64 + shift.y);
                }
            }
        });
    out
}

fn sample_bilinear(src: &[u8], w: u32, h: u32, channel: usize, sx: f64, sy: f64) -> u8 {
    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = sx - x0;
    let fy = sy - y0;
    let tap = |x: i64, y: i64| -> f64 {
        if x < 0 || y < 0 || x >= i64::from(w) || y >= i64::from(h) {
            return 0.0;
        }
        f64::from(src[(y as usize * w as usize + x as usize) * 3 + channel])
    };
    let (x0, y0) = (x0 as i64, y0 as i64);
    let top = tap(x0, y0) * (1.0 - fx) + tap(x0 + 1, y0) * fx;
    let bottom = tap(x0, y0 + 1) * (1.0 - fx) + tap(x0 + 1, y0 + 1) * fx;
    clamp_u8((top * (1.0 - fy) + bottom * fy) as f32)
}

/// Multiply every channel by `factor` (values below 1 darken).
pub fn apply_dot_gain(image: &mut RgbImage, factor: f32) {
    let mut lut = [0u8; 256];
    for (v, slot) in lut.iter_mut().enumerate() {
        *slot = clamp_u8(v as f32 * factor);
    }
    for v in image.iter_mut() {
        *v = lut[*v as usize];
    }
}

/// Opacity mask of the black vignette layer.
///
/// `steps` concentric circles around the image center have radii shrinking linearly from
/// `1.2 * max(width, height)`. A pixel takes the value of the innermost circle containing it:
/// circle `i` (0 = outermost) is `255 * intensity * (1 - (i + 1) / steps)`. The innermost circle
/// is exactly 0 and pixels outside every circle take the full `255 * intensity`.
pub fn vignette_mask(width: u32, height: u32, intensity: f32, steps: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let intensity = f64::from(intensity.clamp(0.0, 1.0));
    if intensity <= 0.0 || steps == 0 || width == 0 || height == 0 {
        return mask;
    }

    let max_r = VIGNETTE_RADIUS_SCALE * f64::from(width.max(height));
    let steps_f = f64::from(steps);
    let radii: Vec<f64> = (0..steps)
        .map(|i| (max_r * (1.0 - f64::from(i) / steps_f)).floor())
        .collect();
    let ring_alpha: Vec<u8> = (0..steps)
        .map(|i| (255.0 * intensity * (1.0 - f64::from(i + 1) / steps_f)).round() as u8)
        .collect();
    let outside = (255.0 * intensity).round() as u8;

    let cx = f64::from(width / 2);
    let cy = f64::from(height / 2);
    for (x, y, px) in mask.enumerate_pixels_mut() {
        let d = (f64::from(x) - cx).hypot(f64::from(y) - cy);
        let inside = radii.partition_point(|&r| r >= d);
        let a = if inside == 0 {
            outside
        } else {
            ring_alpha[inside - 1]
        };
        *px = Luma([a]);
    }
    mask
}

/// Darken toward the edges by compositing black through [`vignette_mask`].
pub fn apply_vignette(image: &mut RgbImage, intensity: f32, steps: u32) -> PressResult<()> {
    let mask = vignette_mask(image.width(), image.height(), intensity, steps);
    composite_solid_through_mask(image, [0, 0, 0], &mask)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/print.rs"]
mod tests;
