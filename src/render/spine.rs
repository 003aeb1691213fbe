use image::{RgbImage, RgbaImage};

use crate::effects::composite::paste_with_alpha;
use crate::foundation::core::SpineGeometry;
use crate::layout::model::Position;

/// Where a bitmap ended up after spine avoidance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Placement {
    /// Final left edge.
    pub x: i64,
    /// Final top edge (never changed by spine avoidance).
    pub y: i64,
    /// `true` when the declared position intruded on the spine and was moved.
    pub adjusted: bool,
}

/// Resolve the paste position for a bitmap `width` pixels wide declared at `position`.
///
/// A bitmap whose horizontal extent overlaps `[spine.start, spine.end)` is moved clear of it:
/// to `spine.start - width - buffer` when its left edge lies left of the spine center,
/// otherwise to `spine.end + buffer`. Vertical position is kept.
pub fn resolve_placement(
    spine: SpineGeometry,
    position: Position,
    width: u32,
    buffer: i64,
) -> Placement {
    let left = position.x;
    let right = left + i64::from(width);
    if !spine.intrudes(left, right) {
        return Placement {
            x: left,
            y: position.y,
            adjusted: false,
        };
    }

    let x = if left < spine.center {
        spine.start - i64::from(width) - buffer
    } else {
        spine.end + buffer
    };
    Placement {
        x,
        y: position.y,
        adjusted: true,
    }
}

/// Pastes element bitmaps onto the spread while keeping them out of the spine dead zone.
#[derive(Clone, Copy, Debug)]
pub struct SpineAwareCompositor {
    spine: SpineGeometry,
    buffer: i64,
}

impl SpineAwareCompositor {
    /// Create a compositor for a spine and a clearance buffer in pixels.
    pub fn new(spine: SpineGeometry, buffer: i64) -> Self {
        Self { spine, buffer }
    }

    /// Paste `bitmap` through its alpha at its resolved placement.
    pub fn composite_element(
        &self,
        canvas: &mut RgbImage,
        bitmap: &RgbaImage,
        position: Position,
        element_id: &str,
    ) -> Placement {
        let placement = resolve_placement(self.spine, position, bitmap.width(), self.buffer);
        if placement.adjusted {
            tracing::warn!(
                id = element_id,
                from = position.x,
                to = placement.x,
                "element intruded on spine, relocated"
            );
        }
        paste_with_alpha(canvas, bitmap, placement.x, placement.y);
        placement
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/spine.rs"]
mod tests;
