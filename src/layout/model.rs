use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb8;
use crate::foundation::error::{PressError, PressResult};

const DEFAULT_TEMPLATE: &str = "aged_newsprint";

/// One two-page spread as described by a layout document.
///
/// Elements keep their declared data for the whole composition; placement adjustments are
/// computed separately and never written back.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutDocument {
    /// Paper tone name selecting the background color.
    pub canvas_template: String,
    /// Left page elements in painter's order.
    pub left_page: Vec<Element>,
    /// Right page elements in painter's order.
    pub right_page: Vec<Element>,
}

/// Which half of the spread an element was declared on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Left page.
    Left,
    /// Right page.
    Right,
}

impl Page {
    /// Document key of the page.
    pub fn key(self) -> &'static str {
        match self {
            Self::Left => "left_page",
            Self::Right => "right_page",
        }
    }
}

/// A positioned visual or textual unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Identifier, also the seed for deterministic rotation.
    pub id: String,
    /// Behavior tag.
    pub kind: ElementKind,
    /// Top-left corner in canvas pixels.
    pub position: Position,
    /// Optional `(width, height)` target size.
    pub dimensions: Option<Dimensions>,
    /// Optional maximum rotation magnitude in degrees.
    pub rotation: Option<f32>,
    /// Optional hard border.
    pub border: Option<BorderSpec>,
    /// Asset file name relative to the asset directory.
    pub asset: Option<String>,
    /// Text fields, present for text elements.
    pub text: Option<TextFields>,
}

/// Top-left position in canvas pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    /// X coordinate.
    pub x: i64,
    /// Y coordinate.
    pub y: i64,
}

/// Target size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dimensions {
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

/// Text-only element fields.
#[derive(Clone, Debug, PartialEq)]
pub struct TextFields {
    /// Text to render; explicit newlines are preserved.
    pub content: String,
    /// Font name, resolved as `<font_dir>/<name>.ttf`.
    pub font: String,
    /// Font size in pixels.
    pub size: f32,
    /// Ink color, defaults to black.
    pub color: Rgb8,
    /// Explicit line height.
    pub leading: Option<u32>,
}

/// Parsed `"<width>px solid #RRGGBB"` border.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BorderSpec {
    /// Border width in pixels on every side.
    pub width: u32,
    /// Border color.
    pub color: Rgb8,
}

impl BorderSpec {
    /// Parse a border spec: the width is the integer before `px`, the color is the trailing six
    /// hex digits.
    pub fn parse(spec: &str) -> PressResult<Self> {
        let spec = spec.trim();
        let (width_part, _) = spec
            .split_once("px")
            .ok_or_else(|| PressError::layout(format!("border '{spec}' has no 'px' width")))?;
        let width = width_part
            .trim()
            .parse::<u32>()
            .map_err(|e| PressError::layout(format!("border '{spec}' width: {e}")))?;

        let hex_start = spec
            .len()
            .checked_sub(6)
            .ok_or_else(|| PressError::layout(format!("border '{spec}' has no color")))?;
        let color = spec
            .get(hex_start..)
            .ok_or_else(|| PressError::layout(format!("border '{spec}' has no color")))
            .and_then(|hex| {
                Rgb8::from_hex(hex).map_err(|e| PressError::layout(format!("border: {e}")))
            })?;

        Ok(Self { width, color })
    }
}

/// Closed set of element behaviors.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `graphic_photo_instructional`.
    PhotoInstructional,
    /// `graphic_gui_recreation`.
    GuiRecreation,
    /// `graphic_pixelart`.
    PixelArt,
    /// `container_featurebox`.
    FeatureBox,
    /// `container_splat`.
    Splat,
    /// `text_headline`.
    Headline,
    /// `text_body`.
    Body,
    /// Any other `text_*` tag; rendered as text.
    OtherText(String),
    /// Unrecognized tag; handled per [`UnknownKindPolicy`](crate::UnknownKindPolicy).
    Unknown(String),
}

/// Coarse grouping used for rotation limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementFamily {
    /// `text_*`.
    Text,
    /// `container_*`.
    Container,
    /// `graphic_*`.
    Graphic,
    /// Unrecognized.
    Unknown,
}

impl ElementKind {
    /// Classify a layout `type` tag.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "graphic_photo_instructional" => Self::PhotoInstructional,
            "graphic_gui_recreation" => Self::GuiRecreation,
            "graphic_pixelart" => Self::PixelArt,
            "container_featurebox" => Self::FeatureBox,
            "container_splat" => Self::Splat,
            "text_headline" => Self::Headline,
            "text_body" => Self::Body,
            t if t.starts_with("text_") => Self::OtherText(t.to_string()),
            t => Self::Unknown(t.to_string()),
        }
    }

    /// The layout tag for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::PhotoInstructional => "graphic_photo_instructional",
            Self::GuiRecreation => "graphic_gui_recreation",
            Self::PixelArt => "graphic_pixelart",
            Self::FeatureBox => "container_featurebox",
            Self::Splat => "container_splat",
            Self::Headline => "text_headline",
            Self::Body => "text_body",
            Self::OtherText(t) | Self::Unknown(t) => t,
        }
    }

    /// Return `true` for kinds rendered by the text renderer.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Headline | Self::Body | Self::OtherText(_))
    }

    /// Coarse family of this kind.
    pub fn family(&self) -> ElementFamily {
        match self {
            Self::Headline | Self::Body | Self::OtherText(_) => ElementFamily::Text,
            Self::FeatureBox | Self::Splat => ElementFamily::Container,
            Self::PhotoInstructional | Self::GuiRecreation | Self::PixelArt => {
                ElementFamily::Graphic
            }
            Self::Unknown(t) if t.starts_with("container") => ElementFamily::Container,
            Self::Unknown(t) if t.starts_with("graphic") || t.contains("photo") => {
                ElementFamily::Graphic
            }
            Self::Unknown(_) => ElementFamily::Unknown,
        }
    }
}

impl LayoutDocument {
    /// Load a layout from disk; `.json` files use JSON, everything else YAML.
    #[tracing::instrument]
    pub fn load(path: &Path) -> PressResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PressError::layout(format!("read layout '{}': {e}", path.display()))
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Parse a YAML layout.
    pub fn from_yaml_str(text: &str) -> PressResult<Self> {
        let raw: LayoutDef =
            serde_yaml::from_str(text).map_err(|e| PressError::layout(e.to_string()))?;
        raw.into_document()
    }

    /// Parse a JSON layout.
    pub fn from_json_str(text: &str) -> PressResult<Self> {
        let raw: LayoutDef =
            serde_json::from_str(text).map_err(|e| PressError::layout(e.to_string()))?;
        raw.into_document()
    }

    /// Elements of a page in painter's order.
    pub fn page(&self, page: Page) -> &[Element] {
        match page {
            Page::Left => &self.left_page,
            Page::Right => &self.right_page,
        }
    }

    /// All elements, left page first, each in declared order.
    pub fn elements(&self) -> impl Iterator<Item = (Page, &Element)> {
        self.left_page
            .iter()
            .map(|e| (Page::Left, e))
            .chain(self.right_page.iter().map(|e| (Page::Right, e)))
    }

    /// Ids that appear more than once.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut dups = BTreeSet::new();
        for (_, e) in self.elements() {
            if !seen.insert(e.id.as_str()) {
                dups.insert(e.id.as_str());
            }
        }
        dups.into_iter().collect()
    }
}

#[derive(Debug, Deserialize)]
struct LayoutDef {
    #[serde(default = "default_template")]
    canvas: String,
    #[serde(default)]
    left_page: Option<PageDef>,
    #[serde(default)]
    right_page: Option<PageDef>,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

#[derive(Debug, Default, Deserialize)]
struct PageDef {
    #[serde(default)]
    elements: Vec<ElementDef>,
}

#[derive(Debug, Deserialize)]
struct ElementDef {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    position: [i64; 2],
    #[serde(default)]
    dimensions: Option<[u32; 2]>,
    #[serde(default)]
    rotation: Option<f32>,
    #[serde(default)]
    border: Option<String>,
    #[serde(default)]
    asset: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    font: Option<String>,
    #[serde(default)]
    size: Option<f32>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    leading: Option<u32>,
}

impl LayoutDef {
    fn into_document(self) -> PressResult<LayoutDocument> {
        let convert = |page: Option<PageDef>| -> PressResult<Vec<Element>> {
            page.unwrap_or_default()
                .elements
                .into_iter()
                .map(ElementDef::into_element)
                .collect()
        };
        Ok(LayoutDocument {
            canvas_template: self.canvas,
            left_page: convert(self.left_page)?,
            right_page: convert(self.right_page)?,
        })
    }
}

impl ElementDef {
    fn into_element(self) -> PressResult<Element> {
        let id = self.id;
        let malformed = |msg: String| PressError::layout(format!("element '{id}': {msg}"));

        if id.trim().is_empty() {
            return Err(PressError::layout("element id must be non-empty"));
        }
        let kind = ElementKind::parse(self.kind.trim());

        let dimensions = match self.dimensions {
            Some([width, height]) if width == 0 || height == 0 => {
                return Err(malformed(format!(
                    "dimensions must be non-zero, got {width}x{height}"
                )));
            }
            Some([width, height]) => Some(Dimensions { width, height }),
            None => None,
        };

        if let Some(r) = self.rotation
            && (!r.is_finite() || r < 0.0)
        {
            return Err(malformed(format!(
                "rotation must be a finite non-negative magnitude, got {r}"
            )));
        }

        let border = self
            .border
            .as_deref()
            .map(BorderSpec::parse)
            .transpose()
            .map_err(|e| malformed(e.to_string()))?;

        let text = if kind.is_text() {
            let content = self
                .content
                .ok_or_else(|| malformed("text element requires 'content'".to_string()))?;
            let font = self
                .font
                .ok_or_else(|| malformed("text element requires 'font'".to_string()))?;
            let size = self
                .size
                .ok_or_else(|| malformed("text element requires 'size'".to_string()))?;
            if !size.is_finite() || size <= 0.0 {
                return Err(malformed(format!("text size must be > 0, got {size}")));
            }
            if dimensions.is_none() {
                return Err(malformed(
                    "text element requires 'dimensions' for its wrap width".to_string(),
                ));
            }
            let color = match self.color.as_deref() {
                Some(hex) => Rgb8::from_hex(hex).map_err(|e| malformed(e.to_string()))?,
                None => Rgb8::BLACK,
            };
            if self.leading == Some(0) {
                return Err(malformed("leading must be > 0".to_string()));
            }
            Some(TextFields {
                content,
                font,
                size,
                color,
                leading: self.leading,
            })
        } else {
            if self.asset.as_deref().is_none_or(|a| a.trim().is_empty()) {
                return Err(malformed(format!(
                    "'{}' element requires 'asset'",
                    kind.as_str()
                )));
            }
            None
        };

        Ok(Element {
            kind,
            position: Position {
                x: self.position[0],
                y: self.position[1],
            },
            dimensions,
            rotation: self.rotation,
            border,
            asset: self.asset,
            text,
            id,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/model.rs"]
mod tests;
