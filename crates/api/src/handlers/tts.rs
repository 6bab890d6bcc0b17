//! Handler for text-to-speech of poster pitches.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use catposter_core::picker::pick;
use catposter_elevenlabs::voices::VOICE_IDS;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Longest text accepted for synthesis, in characters.
pub const MAX_TTS_CHARS: usize = 5000;

#[derive(Debug, Deserialize)]
struct TtsRequest {
    text: Option<String>,
}

/// POST /api/tts
///
/// The body is parsed leniently: anything that is not a JSON object with a
/// non-blank string `text` is treated as missing text.
pub async fn synthesize(State(state): State<AppState>, body: Bytes) -> AppResult<Response> {
    let text = serde_json::from_slice::<TtsRequest>(&body)
        .ok()
        .and_then(|r| r.text)
        .map(|t| t.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(AppError::BadRequest("Missing 'text'".into()));
    }
    let chars = text.chars().count();
    if chars > MAX_TTS_CHARS {
        return Err(AppError::BadRequest(format!(
            "'text' exceeds {MAX_TTS_CHARS} characters"
        )));
    }

    let speech = state
        .speech
        .as_ref()
        .ok_or(AppError::NotConfigured("ELEVEN_LABS_API_KEY not configured on server"))?;

    let voice_id = *pick(state.picker.as_ref(), VOICE_IDS);
    tracing::info!(voice_id, chars, "Synthesizing speech");

    let audio = speech.synthesize(&text, voice_id).await?;

    Ok((
        [(CONTENT_TYPE, "audio/mpeg"), (CACHE_CONTROL, "no-store")],
        audio,
    )
        .into_response())
}
