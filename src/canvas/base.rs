use image::{Rgb, RgbImage};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::canvas::{binding, shadow};
use crate::config::master::ResolvedConfig;
use crate::effects::blur::gaussian_blur_u8;
use crate::effects::composite::blend_images;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{PressError, PressResult};

const GRAIN_MEAN: f32 = 128.0;
const GRAIN_STD_DEV: f32 = 20.0;
const GRAIN_BLUR_RADIUS: u32 = 1;
const GRAIN_BLUR_SIGMA: f32 = 0.5;

/// Builds the blank spread: paper tone, grain, binding and gutter shadow.
pub struct CanvasBuilder<'a> {
    config: &'a ResolvedConfig,
}

impl<'a> CanvasBuilder<'a> {
    /// Create a builder over a resolved configuration.
    pub fn new(config: &'a ResolvedConfig) -> Self {
        Self { config }
    }

    /// Look up the paper tone for a canvas template.
    pub fn paper_color(&self, template: &str) -> PressResult<Rgb8> {
        self.config.palette.paper(template).ok_or_else(|| {
            let known: Vec<&str> = self.config.palette.paper_names().collect();
            PressError::layout(format!(
                "unknown canvas_template '{template}' (known: {})",
                known.join(", ")
            ))
        })
    }

    /// Solid paper tone overlaid with blurred Gaussian grain at the configured opacity.
    pub fn create_base_canvas<R: Rng + ?Sized>(
        &self,
        template: &str,
        rng: &mut R,
    ) -> PressResult<RgbImage> {
        let paper = self.paper_color(template)?;
        let size = self.config.canvas;
        let mut canvas = RgbImage::from_pixel(size.width, size.height, Rgb(paper.to_array()));

        let opacity = self.config.master.aesthetic_rules.texture_opacity.global;
        if opacity > 0.0 {
            let grain = paper_grain(size.width, size.height, rng)?;
            blend_images(&mut canvas, &grain, opacity)?;
        }
        Ok(canvas)
    }

    /// Draw the spiral binding down the spine.
    pub fn add_spiral_binding(&self, canvas: &mut RgbImage, paper: Rgb8) {
        let binding = &self.config.master.technical.binding;
        binding::add_spiral_binding(
            canvas,
            self.config.spine.center,
            binding.hole_diameter,
            binding.hole_spacing,
            paper.to_array(),
            self.config.coil_rgba,
        );
    }

    /// Shade the gutter on both sides of the spine.
    pub fn add_page_curvature_shadow(&self, canvas: &mut RgbImage) -> PressResult<()> {
        shadow::add_page_curvature_shadow(
            canvas,
            self.config.spine,
            self.config.master.print_simulation.spine_shadow,
        )
    }

    /// Full blank spread: base canvas, binding, then curvature shadow.
    #[tracing::instrument(skip(self, rng))]
    pub fn build<R: Rng + ?Sized>(&self, template: &str, rng: &mut R) -> PressResult<RgbImage> {
        let paper = self.paper_color(template)?;
        let mut canvas = self.create_base_canvas(template, rng)?;
        self.add_spiral_binding(&mut canvas, paper);
        self.add_page_curvature_shadow(&mut canvas)?;
        tracing::debug!(
            width = canvas.width(),
            height = canvas.height(),
            paper = %paper.to_hex(),
            "canvas ready"
        );
        Ok(canvas)
    }
}

/// Per-channel Gaussian noise around mid-gray, softened with a sub-pixel blur.
pub fn paper_grain<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> PressResult<RgbImage> {
    let normal = Normal::new(GRAIN_MEAN, GRAIN_STD_DEV)
        .map_err(|e| PressError::render(format!("grain distribution: {e}")))?;
    let len = (width as usize) * (height as usize) * 3;
    let raw: Vec<u8> = (0..len)
        .map(|_| normal.sample(rng).round().clamp(0.0, 255.0) as u8)
        .collect();
    let blurred = gaussian_blur_u8(&raw, width, height, 3, GRAIN_BLUR_RADIUS, GRAIN_BLUR_SIGMA)?;
    RgbImage::from_raw(width, height, blurred)
        .ok_or_else(|| PressError::render("grain buffer size mismatch"))
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/base.rs"]
mod tests;
