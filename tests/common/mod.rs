mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from cardscan for tests
pub use cardscan::{CardError, CardPipeline, PipelineConfig, TemplateEntry, TemplateSet, stages};
