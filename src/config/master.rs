use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::core::{CanvasSize, Rgb8, SpineGeometry, Vec2};
use crate::foundation::error::{PressError, PressResult};

/// Master configuration as read from YAML.
///
/// Every section and field carries a serde default, so a partial (or absent) file still yields a
/// complete configuration. Call [`MasterConfig::resolve`] once at startup to obtain the typed,
/// validated [`ResolvedConfig`] the pipeline consumes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterConfig {
    /// Physical canvas and binding parameters.
    pub technical: TechnicalConfig,
    /// Palette, texture and style-policy limits.
    pub aesthetic_rules: AestheticRules,
    /// Print-artifact parameters.
    pub print_simulation: PrintSimulationConfig,
    /// Placement rules.
    pub layout: LayoutRules,
    /// Text block defaults.
    pub typography: TypographyConfig,
    /// Asset and font directories.
    pub assets: AssetsConfig,
}

/// Canvas size, spine width and spiral binding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalConfig {
    /// `[width, height]` of the full spread in pixels.
    pub canvas_size: [u32; 2],
    /// Width of the spine dead zone in pixels.
    pub spine_width: u32,
    /// Spiral binding geometry.
    pub binding: BindingConfig,
}

impl Default for TechnicalConfig {
    fn default() -> Self {
        Self {
            canvas_size: [3400, 2200],
            spine_width: 462,
            binding: BindingConfig::default(),
        }
    }
}

/// Spiral binding holes and coil.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Punch hole diameter in pixels.
    pub hole_diameter: u32,
    /// Gap between consecutive holes in pixels.
    pub hole_spacing: u32,
    /// Coil color as `#RRGGBB`, `[r, g, b]` or `[r, g, b, a]`.
    pub coil_color: ColorValue,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            hole_diameter: 57,
            hole_spacing: 18,
            coil_color: ColorValue::Hex("#D9D9D9".to_string()),
        }
    }
}

/// A color written either as a hex string or as a channel list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// `#RRGGBB`.
    Hex(String),
    /// Opaque `[r, g, b]`.
    Rgb([u8; 3]),
    /// `[r, g, b, a]`.
    Rgba([u8; 4]),
}

impl ColorValue {
    /// Resolve into straight RGBA8.
    pub fn to_rgba(&self) -> PressResult<[u8; 4]> {
        match self {
            Self::Hex(s) => Ok(Rgb8::from_hex(s)?.with_alpha(255)),
            Self::Rgb([r, g, b]) => Ok([*r, *g, *b, 255]),
            Self::Rgba(c) => Ok(*c),
        }
    }
}

/// Palette and style-policy limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AestheticRules {
    /// Paper tones by name (canvas templates).
    pub paper_colors: BTreeMap<String, String>,
    /// Ink accents by name.
    pub ink_colors: BTreeMap<String, String>,
    /// Paper-grain blend opacity.
    pub texture_opacity: TextureOpacity,
    /// Maximum rotation magnitudes per element family.
    pub rotation_limits: RotationLimits,
    /// Target accent color shares.
    pub color_distribution: ColorDistribution,
}

impl Default for AestheticRules {
    fn default() -> Self {
        Self {
            paper_colors: default_paper_colors(),
            ink_colors: default_ink_colors(),
            texture_opacity: TextureOpacity::default(),
            rotation_limits: RotationLimits::default(),
            color_distribution: ColorDistribution::default(),
        }
    }
}

fn default_paper_colors() -> BTreeMap<String, String> {
    [
        ("aged_newsprint", "#F8F3E5"),
        ("white", "#FFFFFF"),
        ("kraft", "#C8A878"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_ink_colors() -> BTreeMap<String, String> {
    [(ORANGE_INK, "#F57D0D"), (ACID_INK, "#95C120")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Paper-grain opacity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureOpacity {
    /// Opacity applied to the whole spread.
    pub global: f32,
}

impl Default for TextureOpacity {
    fn default() -> Self {
        Self { global: 0.08 }
    }
}

/// Rotation limits in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationLimits {
    /// `text_*` elements.
    pub text: f32,
    /// `container_*` elements.
    pub containers: f32,
    /// Photos and other graphics.
    pub photos: f32,
}

impl Default for RotationLimits {
    fn default() -> Self {
        Self {
            text: 5.0,
            containers: 15.0,
            photos: 10.0,
        }
    }
}

/// Target accent color shares (70/20/10 rule).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorDistribution {
    /// Target share of the orange accent.
    pub nickelodeon_accent: f32,
    /// Target share of the acid-green theme color.
    pub goosebumps_theme: f32,
}

impl Default for ColorDistribution {
    fn default() -> Self {
        Self {
            nickelodeon_accent: 0.20,
            goosebumps_theme: 0.10,
        }
    }
}

/// Print-artifact parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintSimulationConfig {
    /// Peak opacity of the page-curvature shadow next to the spine.
    pub spine_shadow: f32,
    /// Plane offsets for misregistration.
    pub cmyk_shift: CmykShift,
    /// Uniform brightness multiplier (< 1 darkens).
    pub dot_gain: f32,
    /// Vignette falloff intensity.
    pub vignette: f32,
    /// Number of concentric vignette rings.
    pub vignette_steps: u32,
}

impl Default for PrintSimulationConfig {
    fn default() -> Self {
        Self {
            spine_shadow: 0.3,
            cmyk_shift: CmykShift::default(),
            dot_gain: 0.95,
            vignette: 0.15,
            vignette_steps: 100,
        }
    }
}

/// Per-plane `[dx, dy]` offsets in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmykShift {
    /// Magenta plane (red channel).
    pub magenta: [f32; 2],
    /// Yellow plane (blue channel).
    pub yellow: [f32; 2],
}

impl Default for CmykShift {
    fn default() -> Self {
        Self {
            magenta: [1.0, 0.0],
            yellow: [0.0, -1.0],
        }
    }
}

/// Placement rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutRules {
    /// Gap kept between a relocated element and the spine dead zone.
    pub spine_intrusion_buffer: i64,
    /// Page margins checked by the style-policy validator.
    pub safe_zones: SafeZones,
}

impl Default for LayoutRules {
    fn default() -> Self {
        Self {
            spine_intrusion_buffer: 20,
            safe_zones: SafeZones::default(),
        }
    }
}

/// Page margins in pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeZones {
    /// Left margin of the left page.
    pub left: i64,
    /// Right margin of the right page.
    pub right: i64,
    /// Top margin of both pages.
    pub top: i64,
    /// Bottom margin of both pages.
    pub bottom: i64,
}

impl Default for SafeZones {
    fn default() -> Self {
        Self {
            left: 100,
            right: 100,
            top: 100,
            bottom: 100,
        }
    }
}

/// Text block defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypographyConfig {
    /// Horizontal padding on each side of a text block.
    pub word_wrap_padding: u32,
    /// Extra pixels added to the font size when no explicit leading is given.
    pub default_leading: u32,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            word_wrap_padding: 10,
            default_leading: 4,
        }
    }
}

/// Asset locations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory paths.
    pub paths: AssetPaths,
}

/// Asset directories, relative paths anchored at the config base directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    /// Generated raster assets.
    pub generated: PathBuf,
    /// Outline fonts (`<name>.ttf`).
    pub fonts: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            generated: PathBuf::from("assets/generated"),
            fonts: PathBuf::from("assets/fonts"),
        }
    }
}

impl MasterConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file is not an error: the defaults are used and a warning is logged.
    #[tracing::instrument]
    pub fn load(path: &Path) -> PressResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_yaml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %path.display(),
                    "config file not found, using built-in defaults"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("read config '{}'", path.display()))
                .into()),
        }
    }

    /// Parse configuration from YAML text. Empty text yields the defaults.
    pub fn from_yaml_str(text: &str) -> PressResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| PressError::config(e.to_string()))
    }

    /// Validate and derive the typed configuration used by the pipeline.
    ///
    /// Relative asset directories are anchored at `base_dir`.
    pub fn resolve(&self, base_dir: &Path) -> PressResult<ResolvedConfig> {
        let [width, height] = self.technical.canvas_size;
        if width == 0 || height == 0 {
            return Err(PressError::config("canvas_size must be non-zero"));
        }
        let spine = SpineGeometry::new(width, self.technical.spine_width)?;

        let binding = &self.technical.binding;
        if binding.hole_diameter == 0 {
            return Err(PressError::config("binding.hole_diameter must be > 0"));
        }
        let coil_rgba = binding
            .coil_color
            .to_rgba()
            .map_err(|e| PressError::config(format!("binding.coil_color: {e}")))?;

        let palette = ColorPalette::resolve(&self.aesthetic_rules)?;

        let print = &self.print_simulation;
        if !print.dot_gain.is_finite() || print.dot_gain <= 0.0 {
            return Err(PressError::config("print_simulation.dot_gain must be > 0"));
        }
        for (name, v) in [
            ("print_simulation.vignette", print.vignette),
            ("print_simulation.spine_shadow", print.spine_shadow),
            (
                "aesthetic_rules.texture_opacity.global",
                self.aesthetic_rules.texture_opacity.global,
            ),
        ] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(PressError::config(format!("{name} must be within 0..=1")));
            }
        }
        let mut shifts = print.cmyk_shift.magenta.iter().chain(&print.cmyk_shift.yellow);
        if shifts.any(|v| !v.is_finite()) {
            return Err(PressError::config("print_simulation.cmyk_shift must be finite"));
        }

        if self.layout.spine_intrusion_buffer < 0 {
            return Err(PressError::config("layout.spine_intrusion_buffer must be >= 0"));
        }

        let mut master = self.clone();
        if master.print_simulation.vignette_steps < MIN_VIGNETTE_STEPS {
            tracing::warn!(
                steps = master.print_simulation.vignette_steps,
                min = MIN_VIGNETTE_STEPS,
                "vignette_steps too low for a smooth falloff, raising"
            );
            master.print_simulation.vignette_steps = MIN_VIGNETTE_STEPS;
        }

        let anchor = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base_dir.join(p)
            }
        };
        let asset_dir = anchor(&self.assets.paths.generated);
        let font_dir = anchor(&self.assets.paths.fonts);

        tracing::info!(
            width,
            height,
            spine_start = spine.start,
            spine_end = spine.end,
            "config resolved"
        );

        Ok(ResolvedConfig {
            canvas: CanvasSize { width, height },
            spine,
            coil_rgba,
            palette,
            magenta_shift: Vec2::new(
                f64::from(print.cmyk_shift.magenta[0]),
                f64::from(print.cmyk_shift.magenta[1]),
            ),
            yellow_shift: Vec2::new(
                f64::from(print.cmyk_shift.yellow[0]),
                f64::from(print.cmyk_shift.yellow[1]),
            ),
            asset_dir,
            font_dir,
            master,
        })
    }
}

/// Vignette ring count below which banding becomes visible.
pub const MIN_VIGNETTE_STEPS: u32 = 100;

/// Named colors resolved once from the configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorPalette {
    paper: BTreeMap<String, Rgb8>,
    ink: BTreeMap<String, Rgb8>,
}

impl ColorPalette {
    fn resolve(rules: &AestheticRules) -> PressResult<Self> {
        fn merge(
            defaults: BTreeMap<String, String>,
            overrides: &BTreeMap<String, String>,
            section: &str,
        ) -> PressResult<BTreeMap<String, Rgb8>> {
            let mut merged = defaults;
            merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
            merged
                .into_iter()
                .map(|(name, hex)| {
                    let c = Rgb8::from_hex(&hex)
                        .map_err(|e| PressError::config(format!("{section}.{name}: {e}")))?;
                    Ok((name, c))
                })
                .collect()
        }

        Ok(Self {
            paper: merge(default_paper_colors(), &rules.paper_colors, "paper_colors")?,
            ink: merge(default_ink_colors(), &rules.ink_colors, "ink_colors")?,
        })
    }

    /// Look up a paper tone (canvas template).
    pub fn paper(&self, name: &str) -> Option<Rgb8> {
        self.paper.get(name).copied()
    }

    /// Look up an ink accent.
    pub fn ink(&self, name: &str) -> Option<Rgb8> {
        self.ink.get(name).copied()
    }

    /// Known paper tone names.
    pub fn paper_names(&self) -> impl Iterator<Item = &str> {
        self.paper.keys().map(String::as_str)
    }
}

/// Validated configuration with derived geometry, palette and absolute directories.
#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    /// The source configuration (after step clamping).
    pub master: MasterConfig,
    /// Spread dimensions.
    pub canvas: CanvasSize,
    /// Spine dead-zone geometry.
    pub spine: SpineGeometry,
    /// Straight RGBA coil color.
    pub coil_rgba: [u8; 4],
    /// Named colors.
    pub palette: ColorPalette,
    /// Magenta (red channel) sampling offset.
    pub magenta_shift: Vec2,
    /// Yellow (blue channel) sampling offset.
    pub yellow_shift: Vec2,
    /// Directory holding generated raster assets.
    pub asset_dir: PathBuf,
    /// Directory holding fonts.
    pub font_dir: PathBuf,
}

impl ResolvedConfig {
    /// Defaults anchored at `base_dir`.
    pub fn defaults(base_dir: &Path) -> PressResult<Self> {
        MasterConfig::default().resolve(base_dir)
    }

    /// Load, then resolve relative to the config file's directory.
    pub fn load(path: &Path) -> PressResult<Self> {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        MasterConfig::load(path)?.resolve(base)
    }

    /// Accent inks with the largest share of an image each may cover.
    ///
    /// The orange allowance is half again the configured target; acid green is capped at its
    /// target.
    pub fn accent_budget(&self) -> AccentBudget {
        let dist = &self.master.aesthetic_rules.color_distribution;
        AccentBudget {
            orange: self
                .palette
                .ink(ORANGE_INK)
                .unwrap_or(Rgb8::new(0xF5, 0x7D, 0x0D)),
            orange_max: dist.nickelodeon_accent * 1.5,
            acid: self
                .palette
                .ink(ACID_INK)
                .unwrap_or(Rgb8::new(0x95, 0xC1, 0x20)),
            acid_max: dist.goosebumps_theme,
        }
    }
}

const ORANGE_INK: &str = "nickelodeon_orange";
const ACID_INK: &str = "goosebumps_acid";

/// Accent colors and their maximum pixel share.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccentBudget {
    /// Orange accent ink.
    pub orange: Rgb8,
    /// Maximum orange share in `0..=1`.
    pub orange_max: f32,
    /// Acid-green theme ink.
    pub acid: Rgb8,
    /// Maximum acid-green share in `0..=1`.
    pub acid_max: f32,
}

#[cfg(test)]
#[path = "../../tests/unit/config/master.rs"]
mod tests;
