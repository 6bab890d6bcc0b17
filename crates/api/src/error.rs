use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catposter_core::error::CoreError;
use catposter_elevenlabs::TtsError;
use catposter_pipeline::PipelineError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{ "error", "code", "details"? }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `catposter_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A required upstream credential is missing from the server config.
    #[error("Not configured: {0}")]
    NotConfigured(&'static str),

    /// The model answered without an image even after the retry.
    #[error("No image returned")]
    NoImage { details: Option<String> },

    /// Poster generation failed at the transport or API level.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Speech synthesis failed at the transport level.
    #[error("Speech synthesis failed: {0}")]
    SpeechFailed(String),

    /// An upstream provider answered with a non-2xx status.
    #[error("{message}: {details}")]
    UpstreamRejected { message: &'static str, details: String },

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::NoImage { details } => AppError::NoImage { details },
            PipelineError::Model(err) => AppError::GenerationFailed(err.to_string()),
        }
    }
}

impl From<TtsError> for AppError {
    fn from(err: TtsError) -> Self {
        match err {
            TtsError::ApiError { status, body } => {
                let details = if body.trim().is_empty() {
                    StatusCode::from_u16(status)
                        .ok()
                        .and_then(|s| s.canonical_reason())
                        .map(str::to_string)
                        .unwrap_or_else(|| status.to_string())
                } else {
                    body
                };
                AppError::UpstreamRejected {
                    message: "TTS request failed",
                    details,
                }
            }
            TtsError::Request(err) => AppError::SpeechFailed(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg, None)
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            AppError::NotConfigured(msg) => {
                tracing::error!(error = msg, "Server misconfiguration");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    msg.to_string(),
                    None,
                )
            }

            // --- Upstream errors ---
            AppError::NoImage { details } => (
                StatusCode::BAD_GATEWAY,
                "NO_IMAGE",
                "No image returned".to_string(),
                Some(details.map_or(serde_json::Value::Null, serde_json::Value::String)),
            ),
            AppError::GenerationFailed(details) => {
                tracing::error!(error = %details, "Poster generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_FAILED",
                    "Failed to generate image".to_string(),
                    Some(details.into()),
                )
            }
            AppError::SpeechFailed(details) => {
                tracing::error!(error = %details, "Speech synthesis failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SPEECH_FAILED",
                    "Failed to synthesize speech".to_string(),
                    Some(details.into()),
                )
            }
            AppError::UpstreamRejected { message, details } => {
                tracing::warn!(error = message, details = %details, "Upstream rejected request");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    message.to_string(),
                    Some(details.into()),
                )
            }

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}
