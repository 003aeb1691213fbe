use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{ImageFormat, RgbImage};

use crate::foundation::error::{PressError, PressResult};

/// Output format implied by the file extension (`png`, `jpg`/`jpeg`).
pub fn format_for_path(path: &Path) -> PressResult<ImageFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        _ => Err(PressError::validation(format!(
            "unsupported output extension for '{}' (expected png, jpg or jpeg)",
            path.display()
        ))),
    }
}

/// Write an image so that `path` either receives the complete file or is left untouched.
///
/// The image is encoded to a sibling temporary file first and then renamed into place.
#[tracing::instrument(skip(image), fields(path = %path.display()))]
pub fn write_spread(image: &RgbImage, path: &Path) -> PressResult<()> {
    let format = format_for_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let tmp = temp_sibling(path);
    let res = image
        .save_with_format(&tmp, format)
        .with_context(|| format!("encode '{}'", tmp.display()))
        .and_then(|()| {
            std::fs::rename(&tmp, path)
                .with_context(|| format!("move output into place at '{}'", path.display()))
        });
    if let Err(e) = res {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }

    tracing::info!(width = image.width(), height = image.height(), "spread written");
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "spread".to_string());
    path.with_file_name(format!(".{}.partial.{name}", std::process::id()))
}

#[cfg(test)]
#[path = "../../tests/unit/render/output.rs"]
mod tests;
