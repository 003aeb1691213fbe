use std::path::PathBuf;

/// Convenience result type used across spreadpress.
pub type PressResult<T> = Result<T, PressError>;

/// Top-level error taxonomy used by compositor, validator and post-processing APIs.
#[derive(thiserror::Error, Debug)]
pub enum PressError {
    /// Master configuration text exists but could not be understood.
    #[error("config error: {0}")]
    Config(String),

    /// Layout document is missing required fields or has invalid values.
    #[error("malformed layout: {0}")]
    LayoutMalformed(String),

    /// A raster asset referenced by an element does not exist on disk.
    #[error("asset not found for element '{element_id}': {}", path.display())]
    AssetNotFound {
        /// Element that referenced the asset.
        element_id: String,
        /// Resolved path that was checked.
        path: PathBuf,
    },

    /// A font referenced by a text element does not exist on disk.
    #[error("font not found for element '{element_id}': {}", path.display())]
    FontNotFound {
        /// Element that referenced the font.
        element_id: String,
        /// Resolved path that was checked.
        path: PathBuf,
    },

    /// Invalid caller-provided data outside of layout parsing.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing or compositing.
    #[error("render error: {0}")]
    Render(String),

    /// A per-element failure annotated with the element and pipeline stage.
    #[error("element '{element_id}' failed during {stage}: {source}")]
    Stage {
        /// Element being processed.
        element_id: String,
        /// Pipeline stage name.
        stage: &'static str,
        /// Underlying failure.
        #[source]
        source: Box<PressError>,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PressError {
    /// Build a [`PressError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`PressError::LayoutMalformed`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::LayoutMalformed(msg.into())
    }

    /// Build a [`PressError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PressError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Attach element id and stage context to an error.
    pub fn at_stage(self, element_id: impl Into<String>, stage: &'static str) -> Self {
        Self::Stage {
            element_id: element_id.into(),
            stage,
            source: Box::new(self),
        }
    }

    /// Return the innermost error, looking through [`PressError::Stage`] wrappers.
    pub fn root(&self) -> &PressError {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
