//! Handler for poster generation.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use catposter_pipeline::GenerationResult;

use crate::error::{AppError, AppResult};
use crate::extract::PosterUpload;
use crate::gallery;
use crate::state::AppState;

/// Successful generation payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    /// The poster as `data:<mime>;base64,<data>`.
    pub data_url: String,
    /// Trailer-style pitch, `null` when the pitch call failed.
    pub description: Option<String>,
    /// Zero to three scene stills as data URLs.
    pub scenes: Vec<String>,
}

impl From<&GenerationResult> for GenerateResponse {
    fn from(result: &GenerationResult) -> Self {
        Self {
            data_url: result.poster.to_data_url(),
            description: result.description.clone(),
            scenes: result.scenes.iter().map(|s| s.to_data_url()).collect(),
        }
    }
}

/// POST /api/generate
///
/// Validates the upload, runs the poster pipeline, and optionally archives
/// the poster into the public posters directory.
pub async fn generate(
    State(state): State<AppState>,
    PosterUpload(request): PosterUpload,
) -> AppResult<Json<GenerateResponse>> {
    let pipeline = state
        .pipeline
        .as_ref()
        .ok_or(AppError::NotConfigured("GEMINI_API_KEY not configured on server"))?;

    let result = pipeline.run(&request).await?;

    if state.config.archive_posters {
        match gallery::archive_poster(&state.config.posters_dir, &result.poster, state.picker.as_ref())
            .await
        {
            Ok(path) => tracing::info!(path = %path.display(), "Poster archived"),
            Err(err) => tracing::warn!(error = %err, "Failed to archive poster"),
        }
    }

    Ok(Json(GenerateResponse::from(&result)))
}
