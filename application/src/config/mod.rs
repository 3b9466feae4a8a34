//! Application-level configuration.
//!
//! - [`ExtractionParams`]: retry loop control (attempts, delay)
//! - [`PipelineConfig`]: names, dialect and template for one run

pub mod extraction_params;
pub mod pipeline_config;

pub use extraction_params::ExtractionParams;
pub use pipeline_config::PipelineConfig;
