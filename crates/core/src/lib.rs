//! Domain building blocks for the cat poster generator.
//!
//! Everything here is pure and synchronous: request validation, image
//! payloads, the injectable randomness used to pick movies, themes and
//! voices, uniqueness tokens, and the prompt templates sent upstream.

pub mod error;
pub mod image;
pub mod picker;
pub mod prompt;
pub mod scene;
