//! Client for the hosted Gemini multimodal generation API.
//!
//! Provides the wire types for `generateContent`, a REST client built on
//! [`reqwest`], and the [`GenerativeModel`] seam the orchestrator depends on
//! so tests can substitute a scripted model.

pub mod api;
pub mod model;
pub mod types;

pub use api::{GeminiClient, GeminiConfig, GeminiError};
pub use model::{GeneratedContent, GenerativeModel};
