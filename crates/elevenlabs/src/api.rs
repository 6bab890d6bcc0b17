//! REST client for the ElevenLabs text-to-speech endpoint.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::ACCEPT;
use serde::Serialize;

use crate::voices::{MODEL_ID, OUTPUT_FORMAT};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";

#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    pub api_key: String,
    /// API root without a trailing slash, e.g. `https://host/v1`.
    pub base_url: String,
}

impl ElevenLabsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Errors from the text-to-speech REST layer.
#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// ElevenLabs returned a non-2xx status code.
    #[error("ElevenLabs API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body, possibly empty.
        body: String,
    },
}

/// Something that turns text into MP3 audio with a given voice.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes, TtsError>;
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    model_id: &'static str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.4,
            similarity_boost: 0.7,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

/// HTTP client for the ElevenLabs API.
pub struct ElevenLabsClient {
    client: reqwest::Client,
    config: ElevenLabsConfig,
}

impl ElevenLabsClient {
    pub fn new(config: ElevenLabsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Synthesize `text` with `voice_id` and return the MP3 bytes.
    pub async fn text_to_speech(&self, text: &str, voice_id: &str) -> Result<Bytes, TtsError> {
        let url = format!(
            "{}/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            voice_id
        );
        let body = SynthesisRequest {
            text,
            model_id: MODEL_ID,
            voice_settings: VoiceSettings::default(),
        };

        let response = self
            .client
            .post(url)
            .query(&[("output_format", OUTPUT_FORMAT)])
            .header("xi-api-key", &self.config.api_key)
            .header(ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), voice_id, "ElevenLabs rejected request");
            return Err(TtsError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes().await?;
        tracing::debug!(voice_id, bytes = audio.len(), "Speech synthesized");
        Ok(audio)
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes, TtsError> {
        self.text_to_speech(text, voice_id).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
