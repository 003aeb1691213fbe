use std::collections::HashSet;
use std::path::Path;

use image::RgbImage;
use serde::Serialize;

use crate::assets::decode::decode_rgba_file;
use crate::config::master::{AccentBudget, ResolvedConfig};
use crate::foundation::core::Rgb8;
use crate::foundation::error::PressResult;

/// Flat-UI colors that never appeared in 1996 print.
pub const MODERN_UI_COLORS: &[[u8; 3]] = &[
    [0, 122, 255],
    [52, 199, 89],
    [255, 59, 48],
    [33, 150, 243],
    [76, 175, 80],
];

const COLOR_SAMPLE_STRIDE: usize = 10;
const ACCENT_DISTANCE: f64 = 30.0;
const MIN_CONTRAST: f64 = 4.5;
const MAX_CONTRAST: f64 = 21.0;
const GRADIENT_ROW_STRIDE: usize = 20;
const GRADIENT_UNIQUE_COLORS: usize = 50;
const MODERN_COLOR_TOLERANCE: i16 = 10;
const MODERN_COLOR_SHARE: f64 = 0.01;
const SHADOW_MIN_SPAN: usize = 12;
const SHADOW_MAX_STEP: i16 = 8;
const SHADOW_MIN_DROP: i16 = 24;
const SHADOW_MIN_RAMPS: usize = 3;

/// One QA check result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QaCheck {
    /// Check name.
    pub name: &'static str,
    /// Whether the check passed.
    pub passed: bool,
    /// `1.0` on pass, a check-specific partial score on failure.
    pub score: f64,
    /// Short human-readable outcome.
    pub message: String,
}

/// Aggregate quality report for one spread.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QaReport {
    /// Image the report describes.
    pub image: String,
    /// Individual checks in a fixed order.
    pub checks: Vec<QaCheck>,
    /// Mean of the check scores.
    pub score: f64,
    /// `true` when every check passed.
    pub overall_passed: bool,
}

/// Heuristic checks on a finished spread.
#[derive(Clone, Copy, Debug)]
pub struct QualityChecker {
    accents: AccentBudget,
}

impl QualityChecker {
    /// Checker using the configured accent budget.
    pub fn new(cfg: &ResolvedConfig) -> Self {
        Self {
            accents: cfg.accent_budget(),
        }
    }

    /// Load an image file and report on it.
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    pub fn report_file(&self, path: &Path) -> PressResult<QaReport> {
        let rgba = decode_rgba_file(path)?;
        let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();
        Ok(self.report(&rgb, path.display().to_string()))
    }

    /// Run every check on an in-memory image.
    pub fn report(&self, image: &RgbImage, name: String) -> QaReport {
        let checks = vec![
            self.color_distribution(image),
            contrast_check(image),
            period_authenticity(image),
        ];
        let score = checks.iter().map(|c| c.score).sum::<f64>() / checks.len() as f64;
        let overall_passed = checks.iter().all(|c| c.passed);
        tracing::info!(score, overall_passed, "qa report complete");
        QaReport {
            image: name,
            checks,
            score,
            overall_passed,
        }
    }

    /// Accent share from every 10th pixel, by Euclidean distance.
    pub fn color_distribution(&self, image: &RgbImage) -> QaCheck {
        let (mut sampled, mut orange, mut acid) = (0u64, 0u64, 0u64);
        for px in image.pixels().step_by(COLOR_SAMPLE_STRIDE) {
            sampled += 1;
            if distance(px.0, self.accents.orange) < ACCENT_DISTANCE {
                orange += 1;
            } else if distance(px.0, self.accents.acid) < ACCENT_DISTANCE {
                acid += 1;
            }
        }
        let share = |n: u64| if sampled == 0 { 0.0 } else { n as f64 / sampled as f64 };
        let (orange, acid) = (share(orange), share(acid));

        let message = if orange > f64::from(self.accents.orange_max) {
            format!("too much orange accent: {:.1}%", orange * 100.0)
        } else if acid > f64::from(self.accents.acid_max) {
            format!("too much acid green: {:.1}%", acid * 100.0)
        } else {
            String::new()
        };
        let passed = message.is_empty();
        QaCheck {
            name: "color_distribution",
            passed,
            score: if passed { 1.0 } else { 0.5 },
            message: if passed {
                format!(
                    "accent shares within limits (orange {:.1}%, acid {:.1}%)",
                    orange * 100.0,
                    acid * 100.0
                )
            } else {
                message
            },
        }
    }
}

fn distance(px: [u8; 3], target: Rgb8) -> f64 {
    px.iter()
        .zip(target.to_array())
        .map(|(&a, b)| {
            let d = f64::from(a) - f64::from(b);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// RMS contrast of the luma channel mapped to a rough `1..=21` ratio.
pub fn contrast_ratio(image: &RgbImage) -> f64 {
    let n = f64::from(image.width()) * f64::from(image.height());
    if n == 0.0 {
        return 0.0;
    }
    let luma: Vec<f64> = image
        .pixels()
        .map(|p| {
            0.299 * f64::from(p.0[0]) + 0.587 * f64::from(p.0[1]) + 0.114 * f64::from(p.0[2])
        })
        .collect();
    let mean = luma.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 0.0;
    }
    let var = luma.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (1.0 + var.sqrt() / mean * 10.0).min(MAX_CONTRAST)
}

fn contrast_check(image: &RgbImage) -> QaCheck {
    let ratio = contrast_ratio(image);
    let passed = ratio >= MIN_CONTRAST;
    QaCheck {
        name: "contrast",
        passed,
        score: if passed { 1.0 } else { 0.6 },
        message: if passed {
            format!("contrast ratio {ratio:.2}")
        } else {
            format!("low contrast: {ratio:.2} < {MIN_CONTRAST}")
        },
    }
}

/// `true` when any sampled row shows more distinct colors than a hand-cut spread would.
pub fn has_smooth_gradients(image: &RgbImage) -> bool {
    image
        .rows()
        .step_by(GRADIENT_ROW_STRIDE)
        .any(|row| row.map(|p| p.0).collect::<HashSet<_>>().len() > GRADIENT_UNIQUE_COLORS)
}

/// `true` when more than 1% of pixels sit on a modern flat-UI color.
pub fn has_modern_colors(image: &RgbImage) -> bool {
    let total = f64::from(image.width()) * f64::from(image.height());
    MODERN_UI_COLORS.iter().any(|target| {
        let hits = image
            .pixels()
            .filter(|p| {
                p.0.iter()
                    .zip(target)
                    .all(|(&a, &b)| (i16::from(a) - i16::from(b)).abs() < MODERN_COLOR_TOLERANCE)
            })
            .count();
        hits as f64 > total * MODERN_COLOR_SHARE
    })
}

/// `true` when sampled rows hold more than a few soft drop-shadow edges.
///
/// A soft edge is a monotonic luminance ramp spanning at least 12 pixels where no step exceeds
/// 8 levels and the total change is at least 24. Hard cut-outs change in one jump and never
/// count; paper grain wobbles in both directions and never accumulates.
pub fn has_soft_shadows(image: &RgbImage) -> bool {
    let ramps: usize = image
        .rows()
        .step_by(GRADIENT_ROW_STRIDE)
        .map(|row| {
            let luma: Vec<i16> = row
                .map(|p| {
                    let [r, g, b] = p.0.map(f64::from);
                    (0.299 * r + 0.587 * g + 0.114 * b).round() as i16
                })
                .collect();
            soft_ramps(&luma)
        })
        .sum();
    ramps > SHADOW_MIN_RAMPS
}

fn soft_ramps(luma: &[i16]) -> usize {
    let mut count = 0;
    // (direction, index of the first moving step, index of the last moving step, total change)
    let mut ramp: Option<(i16, usize, usize, i16)> = None;
    let mut close = |ramp: &mut Option<(i16, usize, usize, i16)>| {
        if let Some((_, first, last, total)) = ramp.take() {
            if last - first + 2 >= SHADOW_MIN_SPAN && total.abs() >= SHADOW_MIN_DROP {
                count += 1;
            }
        }
    };

    for (i, pair) in luma.windows(2).enumerate() {
        let step = pair[1] - pair[0];
        if step == 0 {
            continue;
        }
        if step.abs() > SHADOW_MAX_STEP {
            close(&mut ramp);
            continue;
        }
        match &mut ramp {
            Some((dir, _, last, total)) if *dir == step.signum() => {
                *last = i;
                *total += step;
            }
            _ => {
                close(&mut ramp);
                ramp = Some((step.signum(), i, i, step));
            }
        }
    }
    close(&mut ramp);
    count
}

fn period_authenticity(image: &RgbImage) -> QaCheck {
    let mut found = Vec::new();
    if has_smooth_gradients(image) {
        found.push("smooth gradients detected");
    }
    if has_modern_colors(image) {
        found.push("modern flat design colors detected");
    }
    if has_soft_shadows(image) {
        found.push("soft drop shadows detected");
    }
    let passed = found.is_empty();
    QaCheck {
        name: "period_authenticity",
        passed,
        score: if passed { 1.0 } else { 0.4 },
        message: if passed {
            "no anachronisms detected".to_string()
        } else {
            found.join(", ")
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/qa/report.rs"]
mod tests;
