pub mod config;
pub mod debug;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod templates;

pub use config::{
    ApproximationMode, CannyParameters, ContourParameters, GaussianParameters, PipelineConfig,
    RetrievalMode,
};
pub use error::{CardError, Result};
pub use models::{BoundingBox, Contour, DetectedCard, Diagnostics, FrameResult, Quad, stages};
pub use pipeline::CardPipeline;
pub use templates::{TemplateEntry, TemplateSet, TemplateSource, DirectorySource};
