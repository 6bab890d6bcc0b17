//! REST client for the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use catposter_core::image::InlineImage;

use crate::model::{GeneratedContent, GenerativeModel};
use crate::types::{GenerateContentRequest, GenerateContentResponse};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default image-capable model.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Connection settings for one Gemini model.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// API root without a trailing slash, e.g. `https://host/v1beta`.
    pub base_url: String,
    pub model: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

/// Errors from the Gemini REST layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response carried an image part that is not valid base64.
    #[error("Failed to decode image data: {0}")]
    Decode(String),
}

/// HTTP client for a single Gemini model.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Send one instruction plus one inline image and collapse the first
    /// candidate into a [`GeneratedContent`].
    pub async fn generate_content(
        &self,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<GeneratedContent, GeminiError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let body = GenerateContentRequest::text_and_image(prompt, image);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed: GenerateContentResponse = response.json().await?;
        let content = parsed.into_content()?;

        let outcome = match &content {
            GeneratedContent::Image(_) => "image",
            GeneratedContent::Text(_) => "text",
            GeneratedContent::Empty => "empty",
        };
        tracing::debug!(model = %self.config.model, outcome, "Gemini call completed");

        Ok(content)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`GeminiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GeminiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<GeneratedContent, GeminiError> {
        self.generate_content(prompt, image).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    /// Serve `router` on an ephemeral local port and return its base URL.
    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1beta")
    }

    fn client_for(base_url: String) -> GeminiClient {
        GeminiClient::new(GeminiConfig {
            api_key: "test-key".into(),
            base_url,
            model: "test-model".into(),
        })
    }

    #[tokio::test]
    async fn sends_key_and_parses_image() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["x-goog-api-key"], "test-key");
                assert_eq!(body["contents"][0]["parts"][0]["text"], "draw");
                assert_eq!(body["contents"][0]["parts"][1]["inlineData"]["data"], "AQID");
                Json(json!({
                    "candidates": [{ "content": { "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "BAUG" } }
                    ]}}]
                }))
            }),
        );
        let client = client_for(spawn_upstream(router).await);

        let content = client
            .generate("draw", &InlineImage::new("image/png", vec![1, 2, 3]))
            .await
            .unwrap();

        assert_eq!(
            content,
            GeneratedContent::Image(InlineImage::new("image/png", vec![4, 5, 6]))
        );
    }

    #[tokio::test]
    async fn non_success_status_is_api_error_with_body() {
        let router = Router::new().route(
            "/v1beta/models/{call}",
            post(|| async { (StatusCode::FORBIDDEN, "API key not valid") }),
        );
        let client = client_for(spawn_upstream(router).await);

        let err = client
            .generate("draw", &InlineImage::new("image/png", vec![1]))
            .await
            .unwrap_err();

        assert_matches!(err, GeminiError::ApiError { status: 403, body } if body == "API key not valid");
    }
}
