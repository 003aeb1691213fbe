use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbaImage;

use crate::foundation::error::{PressError, PressResult};

/// Normalize an asset reference into a clean relative path.
///
/// Backslashes become `/`, empty and `.` segments are dropped, and absolute paths or `..`
/// segments are rejected so references cannot escape the asset directory.
pub(crate) fn normalize_rel_path(source: &str) -> PressResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(PressError::layout("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(PressError::layout("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(PressError::layout("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(PressError::layout("asset path must contain a file name"));
    }
    Ok(out.join("/"))
}

/// Resolve an element's asset reference under `root`.
pub(crate) fn resolve_under(root: &Path, source: &str) -> PressResult<PathBuf> {
    Ok(root.join(normalize_rel_path(source)?))
}

/// Decode any supported raster file into straight-alpha RGBA8.
pub fn decode_rgba_file(path: &Path) -> PressResult<RgbaImage> {
    let img = image::open(path).with_context(|| format!("decode image '{}'", path.display()))?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
