//! Poster generation orchestration.
//!
//! [`PosterPipeline`] drives one request from upload to a finished
//! [`GenerationResult`]: the primary poster call, a single stronger retry when
//! the model answers without an image, then the pitch and scene-still
//! enrichments running concurrently under [`settle`] so neither can fail the
//! request.

pub mod error;
pub mod orchestrator;
pub mod settle;

pub use error::PipelineError;
pub use orchestrator::{GenerationResult, PosterPipeline};
pub use settle::{settle, settle_all};
