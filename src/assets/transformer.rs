use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::assets::decode::{decode_rgba_file, resolve_under};
use crate::effects::composite::paste_rgba;
use crate::foundation::error::{PressError, PressResult};
use crate::layout::model::{BorderSpec, Element};
use crate::transform::jitter::jitter;
use crate::transform::rotate::rotate_expand;

/// Turns an element's referenced raster asset into a ready-to-paste bitmap.
///
/// Steps run in a fixed order: decode, resize to the declared dimensions (Lanczos), rotate by
/// the element's deterministic jitter, then frame with the optional border.
pub struct AssetTransformer<'a> {
    asset_dir: &'a Path,
}

impl<'a> AssetTransformer<'a> {
    /// Create a transformer rooted at the generated-assets directory.
    pub fn new(asset_dir: &'a Path) -> Self {
        Self { asset_dir }
    }

    /// Path an element's asset resolves to.
    pub fn asset_path(&self, element: &Element) -> PressResult<PathBuf> {
        let source = element.asset.as_deref().ok_or_else(|| {
            PressError::layout(format!("element '{}' has no asset reference", element.id))
        })?;
        resolve_under(self.asset_dir, source)
    }

    /// Load and transform the element's asset.
    #[tracing::instrument(skip(self, element), fields(id = %element.id))]
    pub fn process(&self, element: &Element) -> PressResult<RgbaImage> {
        let path = self.asset_path(element)?;
        if !path.is_file() {
            return Err(PressError::AssetNotFound {
                element_id: element.id.clone(),
                path,
            });
        }

        let mut bitmap = decode_rgba_file(&path)?;

        if let Some(dims) = element.dimensions
            && bitmap.dimensions() != (dims.width, dims.height)
        {
            bitmap = imageops::resize(&bitmap, dims.width, dims.height, FilterType::Lanczos3);
        }

        if let Some(max) = element.rotation {
            let angle = jitter(&element.id, max);
            if angle != 0.0 {
                bitmap = rotate_expand(&bitmap, angle);
            }
            tracing::debug!(angle, "rotation jitter applied");
        }

        if let Some(border) = element.border {
            bitmap = add_border(&bitmap, border);
        }

        Ok(bitmap)
    }
}

/// Frame a bitmap with a solid opaque border.
///
/// The result is `width + 2N` by `height + 2N`; the original is pasted at `(N, N)` through its
/// own alpha.
pub fn add_border(bitmap: &RgbaImage, border: BorderSpec) -> RgbaImage {
    let n = border.width;
    if n == 0 {
        return bitmap.clone();
    }
    let (w, h) = bitmap.dimensions();
    let mut framed = RgbaImage::from_pixel(
        w + 2 * n,
        h + 2 * n,
        Rgba(border.color.with_alpha(255)),
    );
    paste_rgba(&mut framed, bitmap, n, n);
    framed
}

#[cfg(test)]
#[path = "../../tests/unit/assets/transformer.rs"]
mod tests;
