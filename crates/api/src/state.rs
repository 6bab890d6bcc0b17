use std::sync::Arc;

use catposter_core::picker::{Picker, ThreadRngPicker};
use catposter_elevenlabs::{ElevenLabsClient, SpeechSynthesizer};
use catposter_gemini::GeminiClient;
use catposter_pipeline::PosterPipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Poster orchestrator; `None` when no Gemini key is configured.
    pub pipeline: Option<Arc<PosterPipeline>>,
    /// Text-to-speech client; `None` when no ElevenLabs key is configured.
    pub speech: Option<Arc<dyn SpeechSynthesizer>>,
    /// Randomness for voice selection and archive file names.
    pub picker: Arc<dyn Picker>,
}

impl AppState {
    /// Build the production clients from configuration.
    pub fn from_config(config: ServerConfig) -> Self {
        let picker: Arc<dyn Picker> = Arc::new(ThreadRngPicker);

        let pipeline = config.gemini.clone().map(|gemini| {
            tracing::info!(model = %gemini.model, "Gemini client configured");
            Arc::new(PosterPipeline::new(
                Arc::new(GeminiClient::new(gemini)),
                Arc::clone(&picker),
            ))
        });
        if pipeline.is_none() {
            tracing::warn!("GEMINI_API_KEY not set; /api/generate will answer 500");
        }

        let speech = config.elevenlabs.clone().map(|elevenlabs| {
            tracing::info!("ElevenLabs client configured");
            Arc::new(ElevenLabsClient::new(elevenlabs)) as Arc<dyn SpeechSynthesizer>
        });
        if speech.is_none() {
            tracing::warn!("ELEVEN_LABS_API_KEY not set; /api/tts will answer 500");
        }

        Self {
            config: Arc::new(config),
            pipeline,
            speech,
            picker,
        }
    }
}
