use std::path::Path;

use image::{RgbImage, RgbaImage};
use rand::Rng;
use serde::Serialize;

use crate::assets::transformer::AssetTransformer;
use crate::canvas::base::CanvasBuilder;
use crate::config::master::ResolvedConfig;
use crate::effects::print::{PrintArtifactFilter, PrintSettings};
use crate::foundation::error::{PressError, PressResult};
use crate::layout::model::{Element, ElementKind, LayoutDocument, Page, Position};
use crate::render::output::write_spread;
use crate::render::spine::{Placement, SpineAwareCompositor};
use crate::text::font::FontStore;
use crate::text::render::TextRenderer;

/// Lifecycle of one spread composition.
///
/// `Idle -> CanvasReady -> ProcessingLeftPage -> ProcessingRightPage -> ArtifactsApplied -> Done`,
/// with any failure moving to `Failed`. Artifacts are skipped straight to `Done` when disabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SpreadState {
    /// Nothing composed yet.
    Idle,
    /// Blank spread built.
    CanvasReady,
    /// Placing left-page elements.
    ProcessingLeftPage,
    /// Placing right-page elements.
    ProcessingRightPage,
    /// Print passes applied.
    ArtifactsApplied,
    /// Spread complete.
    Done,
    /// Composition aborted; no output was produced.
    Failed,
}

/// What to do with element kinds outside the known set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownKindPolicy {
    /// Render through the asset path and log a warning.
    #[default]
    TreatAsAsset,
    /// Fail the spread with a malformed-layout error before anything is drawn.
    Reject,
}

/// Knobs for one composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Run the print-artifact passes after placement.
    pub apply_artifacts: bool,
    /// Handling of unrecognized element kinds.
    pub unknown_kinds: UnknownKindPolicy,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            apply_artifacts: true,
            unknown_kinds: UnknownKindPolicy::default(),
        }
    }
}

/// Final placement of one element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlacedElement {
    /// Element id.
    pub id: String,
    /// Page the element was declared on.
    pub page: Page,
    /// Declared top-left corner.
    pub declared: Position,
    /// Where the bitmap was pasted.
    pub placement: Placement,
    /// Pasted bitmap size.
    pub size: (u32, u32),
}

/// A finished spread and how its elements were placed.
#[derive(Clone, Debug)]
pub struct ComposedSpread {
    /// Final RGB image at the configured canvas size.
    pub image: RgbImage,
    /// Elements in paint order.
    pub placements: Vec<PlacedElement>,
}

/// Drives canvas creation, element placement and print simulation for whole spreads.
pub struct SpreadOrchestrator {
    config: ResolvedConfig,
    state: SpreadState,
}

impl SpreadOrchestrator {
    /// Create an orchestrator in the `Idle` state.
    pub fn new(config: ResolvedConfig) -> Self {
        Self {
            config,
            state: SpreadState::Idle,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SpreadState {
        self.state
    }

    /// Configuration in use.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Load a layout file and compose it into `output`.
    ///
    /// Nothing is written unless every step succeeds.
    #[tracing::instrument(skip(self, opts), fields(layout = %layout_path.display(), output = %output.display()))]
    pub fn compose_to_file(
        &mut self,
        layout_path: &Path,
        output: &Path,
        opts: ComposeOptions,
    ) -> PressResult<ComposedSpread> {
        self.state = SpreadState::Idle;
        let doc = match LayoutDocument::load(layout_path) {
            Ok(doc) => doc,
            Err(e) => return Err(self.fail(e)),
        };
        let spread = self.compose(&doc, opts)?;
        if let Err(e) = write_spread(&spread.image, output) {
            return Err(self.fail(e));
        }
        Ok(spread)
    }

    /// Compose a spread with thread-local randomness for the paper grain.
    pub fn compose(
        &mut self,
        doc: &LayoutDocument,
        opts: ComposeOptions,
    ) -> PressResult<ComposedSpread> {
        self.compose_with_rng(doc, opts, &mut rand::rng())
    }

    /// Compose a spread drawing paper grain from `rng`.
    ///
    /// Geometry and rotation never depend on `rng`; a seeded generator makes the whole output
    /// reproducible.
    pub fn compose_with_rng<R: Rng + ?Sized>(
        &mut self,
        doc: &LayoutDocument,
        opts: ComposeOptions,
        rng: &mut R,
    ) -> PressResult<ComposedSpread> {
        self.state = SpreadState::Idle;
        match self.run(doc, opts, rng) {
            Ok(spread) => {
                self.state = SpreadState::Done;
                tracing::info!(elements = spread.placements.len(), "spread complete");
                Ok(spread)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, e: PressError) -> PressError {
        tracing::error!(from = ?self.state, error = %e, "spread composition failed");
        self.state = SpreadState::Failed;
        e
    }

    fn run<R: Rng + ?Sized>(
        &mut self,
        doc: &LayoutDocument,
        opts: ComposeOptions,
        rng: &mut R,
    ) -> PressResult<ComposedSpread> {
        self.preflight(doc, opts)?;

        let config = &self.config;
        let mut canvas = CanvasBuilder::new(config).build(&doc.canvas_template, rng)?;
        self.state = SpreadState::CanvasReady;

        let assets = AssetTransformer::new(&config.asset_dir);
        let mut text = TextRenderer::new(
            FontStore::new(config.font_dir.clone()),
            &config.master.typography,
        );
        let compositor =
            SpineAwareCompositor::new(config.spine, config.master.layout.spine_intrusion_buffer);

        let mut placements = Vec::with_capacity(doc.left_page.len() + doc.right_page.len());
        for (page, state) in [
            (Page::Left, SpreadState::ProcessingLeftPage),
            (Page::Right, SpreadState::ProcessingRightPage),
        ] {
            self.state = state;
            let elements = doc.page(page);
            tracing::info!(page = page.key(), count = elements.len(), "placing elements");
            for element in elements {
                let bitmap = render_element(element, &assets, &mut text)?;
                let placement = compositor.composite_element(
                    &mut canvas,
                    &bitmap,
                    element.position,
                    &element.id,
                );
                placements.push(PlacedElement {
                    id: element.id.clone(),
                    page,
                    declared: element.position,
                    placement,
                    size: bitmap.dimensions(),
                });
            }
        }

        if opts.apply_artifacts {
            let filter = PrintArtifactFilter::new(PrintSettings::from_config(config));
            canvas = filter.apply(canvas)?;
            self.state = SpreadState::ArtifactsApplied;
        }

        Ok(ComposedSpread {
            image: canvas,
            placements,
        })
    }

    /// Checks that need no pixels: unknown kinds under `Reject`, duplicate ids.
    fn preflight(&self, doc: &LayoutDocument, opts: ComposeOptions) -> PressResult<()> {
        for (_, element) in doc.elements() {
            if let ElementKind::Unknown(tag) = &element.kind {
                match opts.unknown_kinds {
                    UnknownKindPolicy::Reject => {
                        return Err(PressError::layout(format!(
                            "element '{}' has unknown type '{tag}'",
                            element.id
                        )));
                    }
                    UnknownKindPolicy::TreatAsAsset => tracing::warn!(
                        id = %element.id,
                        kind = %tag,
                        "unknown element type, rendering as asset"
                    ),
                }
            }
        }
        for id in doc.duplicate_ids() {
            tracing::warn!(id, "duplicate element id; rotation jitter will repeat");
        }
        Ok(())
    }
}

fn render_element(
    element: &Element,
    assets: &AssetTransformer<'_>,
    text: &mut TextRenderer<'_>,
) -> PressResult<RgbaImage> {
    if element.kind.is_text() {
        text.render(element)
            .map_err(|e| e.at_stage(element.id.clone(), "text rendering"))
    } else {
        assets
            .process(element)
            .map_err(|e| e.at_stage(element.id.clone(), "asset transform"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
