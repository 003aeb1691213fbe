//! Spreadpress composes two-page magazine spreads that look like mid-90s offset print.
//!
//! A spread is built in fixed stages:
//!
//! - Build a blank [`CanvasBuilder`] spread: paper tone, grain, spiral binding, gutter shadow
//! - Render every element of a [`LayoutDocument`] (raster assets via [`AssetTransformer`],
//!   text via [`TextRenderer`]) and paste it with [`SpineAwareCompositor`], which keeps
//!   everything out of the spine dead zone
//! - Apply [`PrintArtifactFilter`]: channel misregistration, dot gain, vignette
//!
//! [`SpreadOrchestrator`] drives the stages as a small state machine. Output is deterministic
//! for a given configuration and layout; only the paper grain draws from a caller-supplied RNG.
//!
//! [`PostProcessor`] runs the same print passes (plus an optional [`PaperTexture`]) over images
//! that were made elsewhere.
//!
//! Alongside the compositor, [`PolicyValidator`] checks prompts, assets and layouts against the
//! period style rules and [`QualityChecker`] scores finished spreads.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod canvas;
mod config;
mod effects;
mod foundation;
mod layout;
mod policy;
mod qa;
mod render;
mod text;
mod transform;

pub use crate::foundation::core::{
    CanvasSize, Point, Rect, Rgb8, SpineGeometry, Vec2, intervals_overlap, rects_overlap,
};
pub use crate::foundation::error::{PressError, PressResult};

pub use crate::config::master::{
    AccentBudget, AestheticRules, AssetPaths, AssetsConfig, BindingConfig, CmykShift,
    ColorDistribution, ColorPalette, ColorValue, LayoutRules, MIN_VIGNETTE_STEPS, MasterConfig,
    PrintSimulationConfig, ResolvedConfig, RotationLimits, SafeZones, TechnicalConfig,
    TextureOpacity, TypographyConfig,
};
pub use crate::layout::model::{
    BorderSpec, Dimensions, Element, ElementFamily, ElementKind, LayoutDocument, Page, Position,
    TextFields,
};

pub use crate::assets::decode::decode_rgba_file;
pub use crate::assets::transformer::{AssetTransformer, add_border};
pub use crate::canvas::base::{CanvasBuilder, paper_grain};
pub use crate::canvas::binding::{HoleLayout, add_spiral_binding};
pub use crate::canvas::shadow::{add_page_curvature_shadow, curvature_mask};
pub use crate::effects::blur::gaussian_blur_u8;
pub use crate::effects::composite::{
    Rgba8, blend_images, composite_solid_through_mask, over, paste_rgba, paste_with_alpha,
};
pub use crate::effects::postprocess::{
    BatchItem, BatchReport, PaperTexture, PostProcessor, postprocess_batch, postprocess_file,
};
pub use crate::effects::print::{
    PrintArtifactFilter, PrintPasses, PrintSettings, apply_dot_gain, apply_vignette, misregister,
    vignette_mask,
};
pub use crate::policy::terms::{
    ALLOWED_MODERN_TERMS, FORBIDDEN_DESIGN_TERMS, REQUIRED_VISUAL_TERMS, contains_word,
};
pub use crate::policy::validator::{MAX_ASSET_DIMENSION, PolicyValidator, ValidationReport};
pub use crate::qa::report::{
    MODERN_UI_COLORS, QaCheck, QaReport, QualityChecker, contrast_ratio, has_modern_colors,
    has_smooth_gradients, has_soft_shadows,
};
pub use crate::render::output::{format_for_path, write_spread};
pub use crate::render::pipeline::{
    ComposeOptions, ComposedSpread, PlacedElement, SpreadOrchestrator, SpreadState,
    UnknownKindPolicy,
};
pub use crate::render::spine::{Placement, SpineAwareCompositor, resolve_placement};
pub use crate::text::font::{FontStore, ink_width, load_font_file};
pub use crate::text::render::{TextBlock, TextRenderer};
pub use crate::text::wrap::wrap_lines;
pub use crate::transform::jitter::jitter;
pub use crate::transform::rotate::rotate_expand;
