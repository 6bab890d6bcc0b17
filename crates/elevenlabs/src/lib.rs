//! ElevenLabs text-to-speech client.
//!
//! Wraps the `text-to-speech/{voice_id}` endpoint and exposes the
//! [`SpeechSynthesizer`] seam used by the HTTP layer.

pub mod api;
pub mod voices;

pub use api::{ElevenLabsClient, ElevenLabsConfig, SpeechSynthesizer, TtsError};
