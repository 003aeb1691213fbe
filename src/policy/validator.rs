use std::path::Path;

use image::{ColorType, ImageFormat, ImageReader};
use serde::Serialize;

use crate::config::master::{AccentBudget, ResolvedConfig, SafeZones};
use crate::foundation::core::{CanvasSize, Rgb8, SpineGeometry};
use crate::foundation::math::blend_u8;
use crate::layout::model::{Element, ElementFamily, LayoutDocument, Page};
use crate::policy::terms::{
    ALLOWED_MODERN_TERMS, FORBIDDEN_DESIGN_TERMS, REQUIRED_VISUAL_TERMS, contains_word,
};

/// Largest accepted asset side in pixels.
pub const MAX_ASSET_DIMENSION: u32 = 10_000;
/// Per-channel distance under which a pixel counts as an accent color.
const ACCENT_TOLERANCE: i16 = 30;

/// Violations found for one subject (a prompt, an image or a layout).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// What was validated.
    pub subject: String,
    /// Human-readable violations; empty when the subject passes.
    pub violations: Vec<String>,
}

impl ValidationReport {
    /// `true` when no violation was found.
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Checks prompts, image assets and layouts against the period style rules.
///
/// The validator never renders; it reports problems so they can be fixed before composition.
#[derive(Clone, Debug)]
pub struct PolicyValidator {
    canvas: CanvasSize,
    spine: SpineGeometry,
    safe_zones: SafeZones,
    text_limit: f32,
    container_limit: f32,
    photo_limit: f32,
    accents: AccentBudget,
}

impl PolicyValidator {
    /// Build a validator from a resolved configuration.
    pub fn new(cfg: &ResolvedConfig) -> Self {
        let limits = &cfg.master.aesthetic_rules.rotation_limits;
        Self {
            canvas: cfg.canvas,
            spine: cfg.spine,
            safe_zones: cfg.master.layout.safe_zones.clone(),
            text_limit: limits.text,
            container_limit: limits.containers,
            photo_limit: limits.photos,
            accents: cfg.accent_budget(),
        }
    }

    /// Check a visual-generation prompt for anachronistic vocabulary.
    pub fn validate_prompt(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut violations = Vec::new();

        for term in FORBIDDEN_DESIGN_TERMS {
            let term_lower = term.to_lowercase();
            if ALLOWED_MODERN_TERMS.contains(&term_lower.as_str()) {
                continue;
            }
            if contains_word(&lower, &term_lower) {
                violations.push(format!(
                    "forbidden design term in prompt: '{term}' (post-1996 design concept)"
                ));
            }
        }

        for (category, required) in REQUIRED_VISUAL_TERMS {
            if !lower.contains(category) {
                continue;
            }
            if !required.iter().any(|t| lower.contains(&t.to_lowercase())) {
                violations.push(format!(
                    "missing required visual terminology for '{category}': include one of {}",
                    required.join(", ")
                ));
            }
        }

        log_outcome("prompt", &violations);
        violations
    }

    /// Check an image asset on disk: presence, size, PNG with alpha, accent color budget.
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    pub fn validate_image(&self, path: &Path) -> Vec<String> {
        let mut violations = Vec::new();
        if !path.exists() {
            violations.push(format!("image file does not exist: {}", path.display()));
            return violations;
        }
        if !path.is_file() {
            violations.push(format!("path is not a file: {}", path.display()));
            return violations;
        }

        if let Err(e) = self.inspect_image(path, &mut violations) {
            violations.push(format!("error opening/analyzing image: {e}"));
        }
        log_outcome("image", &violations);
        violations
    }

    fn inspect_image(&self, path: &Path, violations: &mut Vec<String>) -> anyhow::Result<()> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader.format();
        let img = reader.decode()?;
        let (w, h) = (img.width(), img.height());

        if w == 0 || h == 0 {
            violations.push(format!("invalid dimensions: {w}x{h} (zero width or height)"));
        }
        if w > MAX_ASSET_DIMENSION || h > MAX_ASSET_DIMENSION {
            violations.push(format!(
                "excessive dimensions: {w}x{h} (maximum is {MAX_ASSET_DIMENSION}px)"
            ));
        }
        if format != Some(ImageFormat::Png) {
            let name = format.map(|f| format!("{f:?}")).unwrap_or_else(|| "unknown".into());
            violations.push(format!(
                "invalid file format: {name} (only PNG supports the required transparency)"
            ));
        }
        if !has_alpha(img.color()) {
            violations.push(format!(
                "no alpha channel: color type is {:?} (assets must be RGBA)",
                img.color()
            ));
        }

        violations.extend(self.check_accent_share(&img.to_rgba8()));
        Ok(())
    }

    /// Share of pixels near each accent ink, with transparency flattened onto white.
    fn check_accent_share(&self, img: &image::RgbaImage) -> Vec<String> {
        let total = img.width() as f64 * img.height() as f64;
        if total == 0.0 {
            return Vec::new();
        }
        let (mut orange, mut acid) = (0u64, 0u64);
        for px in img.pixels() {
            let rgb = flatten_on_white(px.0);
            if near(rgb, self.accents.orange) {
                orange += 1;
            }
            if near(rgb, self.accents.acid) {
                acid += 1;
            }
        }

        let mut out = Vec::new();
        let orange_ratio = orange as f64 / total;
        let acid_ratio = acid as f64 / total;
        tracing::debug!(orange_ratio, acid_ratio, "accent color share");
        if orange_ratio > f64::from(self.accents.orange_max) {
            out.push(format!(
                "excessive orange accent usage: {:.2}% (maximum {:.0}%)",
                orange_ratio * 100.0,
                f64::from(self.accents.orange_max) * 100.0
            ));
        }
        if acid_ratio > f64::from(self.accents.acid_max) {
            out.push(format!(
                "excessive acid green usage: {:.2}% (maximum {:.0}%)",
                acid_ratio * 100.0,
                f64::from(self.accents.acid_max) * 100.0
            ));
        }
        out
    }

    /// Check declared element geometry: spine, rotation limits and safe zones.
    pub fn validate_layout(&self, doc: &LayoutDocument) -> Vec<String> {
        let mut violations = Vec::new();
        for (page, element) in doc.elements() {
            self.check_spine(element, &mut violations);
            self.check_rotation(element, &mut violations);
            self.check_safe_zones(page, element, &mut violations);
        }
        log_outcome("layout", &violations);
        violations
    }

    /// Parse a layout file, reporting parse failures as violations.
    pub fn validate_layout_file(&self, path: &Path) -> Vec<String> {
        if !path.exists() {
            return vec![format!("layout file does not exist: {}", path.display())];
        }
        match LayoutDocument::load(path) {
            Ok(doc) => self.validate_layout(&doc),
            Err(e) => vec![format!("layout could not be parsed: {e}")],
        }
    }

    fn check_spine(&self, element: &Element, out: &mut Vec<String>) {
        let (w, _) = declared_size(element);
        let left = element.position.x;
        let right = left + i64::from(w);
        if self.spine.intrudes(left, right) {
            out.push(format!(
                "spine intrusion for element '{}': x={left}-{right} overlaps dead zone {}-{}",
                element.id, self.spine.start, self.spine.end
            ));
        }
    }

    fn check_rotation(&self, element: &Element, out: &mut Vec<String>) {
        let Some(rotation) = element.rotation else {
            return;
        };
        let limit = match element.kind.family() {
            ElementFamily::Text => self.text_limit,
            ElementFamily::Container => self.container_limit,
            ElementFamily::Graphic => self.photo_limit,
            ElementFamily::Unknown => return,
        };
        if rotation.abs() > limit {
            out.push(format!(
                "excessive rotation for element '{}': {rotation} degrees exceeds {limit} limit for {}",
                element.id,
                element.kind.as_str()
            ));
        }
    }

    fn check_safe_zones(&self, page: Page, element: &Element, out: &mut Vec<String>) {
        let (w, h) = declared_size(element);
        let id = &element.id;
        let (x, y) = (element.position.x, element.position.y);
        let z = &self.safe_zones;
        let canvas_w = i64::from(self.canvas.width);
        let canvas_h = i64::from(self.canvas.height);

        if y < z.top {
            out.push(format!(
                "safe zone violation for element '{id}': too close to top edge (y={y}, minimum={})",
                z.top
            ));
        }
        let bottom = y + i64::from(h);
        if bottom > canvas_h - z.bottom {
            out.push(format!(
                "safe zone violation for element '{id}': too close to bottom edge (y+h={bottom}, maximum={})",
                canvas_h - z.bottom
            ));
        }
        match page {
            Page::Left if x < z.left => out.push(format!(
                "safe zone violation for element '{id}': too close to left edge (x={x}, minimum={})",
                z.left
            )),
            Page::Right if x + i64::from(w) > canvas_w - z.right => out.push(format!(
                "safe zone violation for element '{id}': too close to right edge (x+w={}, maximum={})",
                x + i64::from(w),
                canvas_w - z.right
            )),
            _ => {}
        }
    }
}

fn declared_size(element: &Element) -> (u32, u32) {
    element
        .dimensions
        .map(|d| (d.width, d.height))
        .unwrap_or((0, 0))
}

fn has_alpha(color: ColorType) -> bool {
    matches!(
        color,
        ColorType::La8 | ColorType::Rgba8 | ColorType::La16 | ColorType::Rgba16 | ColorType::Rgba32F
    )
}

fn flatten_on_white(px: [u8; 4]) -> [u8; 3] {
    [0, 1, 2].map(|c| blend_u8(255, px[c], px[3]))
}

fn near(px: [u8; 3], target: Rgb8) -> bool {
    let t = target.to_array();
    px.iter()
        .zip(t)
        .all(|(&p, t)| (i16::from(p) - i16::from(t)).abs() < ACCENT_TOLERANCE)
}

fn log_outcome(subject: &str, violations: &[String]) {
    if violations.is_empty() {
        tracing::info!(subject, "validation passed");
    } else {
        for v in violations {
            tracing::warn!(subject, "{v}");
        }
        tracing::error!(subject, count = violations.len(), "validation failed");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/policy/validator.rs"]
mod tests;
