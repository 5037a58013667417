use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the card detection core.
#[derive(Error, Debug)]
pub enum CardError {
    #[error("Gaussian kernel size must be a positive odd integer, got {0}")]
    InvalidKernelSize(u32),

    #[error("Canny low threshold {low} is above high threshold {high}")]
    InvalidCannyThresholds { low: f32, high: f32 },

    #[error("Failed to load template '{name}' from '{}': {source}", path.display())]
    TemplateLoad {
        name: String,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Template '{0}' has no pixels")]
    EmptyTemplate(String),

    #[error("Cannot classify a {0} glyph against an empty template set")]
    EmptyTemplateSet(&'static str),

    #[error("Input image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Canonical card image must be 250x350, got {width}x{height}")]
    InvalidCanonicalSize { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, CardError>;
