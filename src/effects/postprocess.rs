use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use rand::Rng;
use rayon::prelude::*;

use crate::assets::decode::decode_rgba_file;
use crate::canvas::base::paper_grain;
use crate::config::master::ResolvedConfig;
use crate::effects::composite::blend_images;
use crate::effects::print::{PrintArtifactFilter, PrintSettings};
use crate::foundation::error::{PressError, PressResult};
use crate::render::output::write_spread;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Paper grain laid over an image that was not built on a spreadpress canvas.
///
/// The overlay is either a texture file (resized to the image) or freshly generated grain.
#[derive(Clone, Debug, PartialEq)]
pub struct PaperTexture {
    /// Blend opacity in `0..=1`.
    pub opacity: f32,
    /// Texture image; `None` generates grain.
    pub texture: Option<PathBuf>,
}

impl PaperTexture {
    /// Generated grain at the configured texture opacity.
    pub fn from_config(cfg: &ResolvedConfig) -> Self {
        Self {
            opacity: cfg.master.aesthetic_rules.texture_opacity.global,
            texture: None,
        }
    }

    /// Use a texture file instead of generated grain.
    pub fn with_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.texture = Some(path.into());
        self
    }

    /// Blend the texture into `image`. `rng` is only drawn from for generated grain.
    pub fn apply<R: Rng + ?Sized>(&self, image: &mut RgbImage, rng: &mut R) -> PressResult<()> {
        if self.opacity <= 0.0 {
            return Ok(());
        }
        let (w, h) = image.dimensions();
        let layer = match &self.texture {
            Some(path) => {
                if !path.is_file() {
                    return Err(PressError::validation(format!(
                        "paper texture '{}' does not exist",
                        path.display()
                    )));
                }
                let texture = DynamicImage::ImageRgba8(decode_rgba_file(path)?).to_rgb8();
                if texture.dimensions() == (w, h) {
                    texture
                } else {
                    imageops::resize(&texture, w, h, FilterType::Lanczos3)
                }
            }
            None => paper_grain(w, h, rng)?,
        };
        blend_images(image, &layer, self.opacity)
    }
}

/// Standalone print simulation: optional paper texture, then the [`PrintArtifactFilter`] passes.
#[derive(Clone, Debug)]
pub struct PostProcessor {
    filter: PrintArtifactFilter,
    texture: Option<PaperTexture>,
}

impl PostProcessor {
    /// Run only `filter`, without a paper texture.
    pub fn new(filter: PrintArtifactFilter) -> Self {
        Self {
            filter,
            texture: None,
        }
    }

    /// Every pass from the configuration, paper texture included.
    pub fn from_config(cfg: &ResolvedConfig) -> Self {
        Self::new(PrintArtifactFilter::new(PrintSettings::from_config(cfg)))
            .with_paper_texture(Some(PaperTexture::from_config(cfg)))
    }

    /// Set or clear the paper-texture pass.
    pub fn with_paper_texture(mut self, texture: Option<PaperTexture>) -> Self {
        self.texture = texture;
        self
    }

    /// The texture pass, if enabled.
    pub fn paper_texture(&self) -> Option<&PaperTexture> {
        self.texture.as_ref()
    }

    /// Process with thread-local randomness for generated grain.
    pub fn process(&self, image: RgbImage) -> PressResult<RgbImage> {
        self.process_with_rng(image, &mut rand::rng())
    }

    /// Texture first, then misregistration, dot gain and vignette.
    pub fn process_with_rng<R: Rng + ?Sized>(
        &self,
        image: RgbImage,
        rng: &mut R,
    ) -> PressResult<RgbImage> {
        let mut image = image;
        if let Some(texture) = &self.texture {
            texture.apply(&mut image, rng)?;
        }
        self.filter.apply(image)
    }
}

/// Outcome of one file in a batch run.
#[derive(Debug)]
pub struct BatchItem {
    /// Input file.
    pub input: PathBuf,
    /// Output file.
    pub output: PathBuf,
    /// Per-file result; failures do not stop the batch.
    pub result: PressResult<()>,
}

/// Summary of a batch run, sorted by input path.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per discovered input image.
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    /// Number of files processed successfully.
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.result.is_ok()).count()
    }

    /// Items that failed.
    pub fn failures(&self) -> impl Iterator<Item = &BatchItem> {
        self.items.iter().filter(|i| i.result.is_err())
    }
}

/// Run `processor` over an existing image file and write the result.
///
/// Alpha is dropped: the press prints onto opaque paper.
#[tracing::instrument(skip(processor), fields(input = %input.display(), output = %output.display()))]
pub fn postprocess_file(
    processor: &PostProcessor,
    input: &Path,
    output: &Path,
) -> PressResult<()> {
    if !input.is_file() {
        return Err(PressError::validation(format!(
            "input image '{}' does not exist",
            input.display()
        )));
    }
    let rgb = DynamicImage::ImageRgba8(decode_rgba_file(input)?).to_rgb8();
    let processed = processor.process(rgb)?;
    write_spread(&processed, output)
}

/// Post-process every `png`/`jpg`/`jpeg` directly inside `input_dir` into `output_dir`.
///
/// Files run in parallel on a rayon pool (`threads = None` uses rayon's default). Output names
/// mirror the input names.
pub fn postprocess_batch(
    processor: &PostProcessor,
    input_dir: &Path,
    output_dir: &Path,
    threads: Option<usize>,
) -> PressResult<BatchReport> {
    let inputs = list_images(input_dir)?;
    std::fs::create_dir_all(output_dir).map_err(|e| {
        PressError::validation(format!(
            "cannot create output dir '{}': {e}",
            output_dir.display()
        ))
    })?;
    let pool = build_thread_pool(threads)?;

    let mut items: Vec<BatchItem> = pool.install(|| {
        inputs
            .par_iter()
            .map(|input| {
                let output = output_dir.join(input.file_name().unwrap_or_default());
                let result = postprocess_file(processor, input, &output);
                if let Err(e) = &result {
                    tracing::error!(input = %input.display(), error = %e, "post-process failed");
                }
                BatchItem {
                    input: input.clone(),
                    output,
                    result,
                }
            })
            .collect()
    });
    items.sort_by(|a, b| a.input.cmp(&b.input));

    let report = BatchReport { items };
    tracing::info!(
        total = report.items.len(),
        succeeded = report.succeeded(),
        "batch post-process finished"
    );
    Ok(report)
}

fn list_images(dir: &Path) -> PressResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        PressError::validation(format!("cannot read input dir '{}': {e}", dir.display()))
    })?;
    let mut out = Vec::new();
    for entry in entries {
        let path = entry.map_err(anyhow::Error::new)?.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if path.is_file() && is_image {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn build_thread_pool(threads: Option<usize>) -> PressResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PressError::validation("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PressError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/postprocess.rs"]
mod tests;
