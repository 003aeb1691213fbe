use crate::foundation::error::{PressError, PressResult};

pub use kurbo::{Point, Rect, Vec2};

/// Straight (non-premultiplied) 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Construct from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> PressResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PressError::validation(format!(
                "invalid hex color '{s}' (expected #RRGGBB)"
            )));
        }
        let channel = |i: usize| -> PressResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| PressError::validation(format!("invalid hex color '{s}': {e}")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Channels as an array.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels plus an explicit alpha.
    pub fn with_alpha(self, a: u8) -> [u8; 4] {
        [self.r, self.g, self.b, a]
    }
}

impl std::str::FromStr for Rgb8 {
    type Err = PressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Spread canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Derived horizontal geometry of the binding dead zone.
///
/// `start = center - width/2`, `end = center + width/2` with integer halving, so a 462px spine on
/// a 3400px canvas spans `1469..1931`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpineGeometry {
    /// X of the spine centerline.
    pub center: i64,
    /// Left edge of the dead zone.
    pub start: i64,
    /// Right edge of the dead zone.
    pub end: i64,
}

impl SpineGeometry {
    /// Derive spine geometry; the dead zone must lie strictly inside the canvas.
    pub fn new(canvas_width: u32, spine_width: u32) -> PressResult<Self> {
        if spine_width < 2 {
            return Err(PressError::config("spine_width must be >= 2"));
        }
        let center = i64::from(canvas_width / 2);
        let half = i64::from(spine_width / 2);
        let geometry = Self {
            center,
            start: center - half,
            end: center + half,
        };
        if geometry.start <= 0 || geometry.end >= i64::from(canvas_width) {
            return Err(PressError::config(format!(
                "spine width {spine_width} does not fit inside canvas width {canvas_width}"
            )));
        }
        Ok(geometry)
    }

    /// Dead-zone width as derived from the edges.
    pub fn width(self) -> i64 {
        self.end - self.start
    }

    /// Return `true` when `[left, right)` overlaps the dead zone (edge-touching is not overlap).
    pub fn intrudes(self, left: i64, right: i64) -> bool {
        intervals_overlap(left, right, self.start, self.end)
    }
}

/// Strict open-interval overlap test: `a0 < b1 && a1 > b0`.
pub fn intervals_overlap(a0: i64, a1: i64, b0: i64, b1: i64) -> bool {
    a0 < b1 && a1 > b0
}

/// Return `true` when two rectangles share a region of positive area.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    let i = a.intersect(b);
    i.width() > 0.0 && i.height() > 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
