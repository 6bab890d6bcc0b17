//! Request extractor for poster uploads.
//!
//! `/api/generate` accepts the same payload two ways: a JSON body
//! `{ mimeType, base64, prompt? }` or a multipart form with a `file` part and
//! an optional `prompt` field. Both end up as a validated
//! [`GenerationRequest`]; anything else is rejected with 400 before any
//! upstream work happens.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use bytes::Bytes;
use catposter_core::image::{
    mime_from_filename, normalize_mime, GenerationRequest, InlineImage,
};
use serde::Deserialize;

use crate::error::AppError;

/// A validated poster upload.
#[derive(Debug)]
pub struct PosterUpload(pub GenerationRequest);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonUpload {
    mime_type: Option<String>,
    base64: Option<String>,
    prompt: Option<String>,
}

impl<S> FromRequest<S> for PosterUpload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            from_multipart(multipart).await.map(PosterUpload)
        } else if content_type.starts_with("application/json") {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            from_json(&body).map(PosterUpload)
        } else {
            Err(AppError::BadRequest(
                "Expected an application/json body or a multipart/form-data upload".into(),
            ))
        }
    }
}

fn from_json(body: &[u8]) -> Result<GenerationRequest, AppError> {
    let upload: JsonUpload = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;

    let (Some(mime_type), Some(base64)) = (
        upload.mime_type.filter(|m| !m.trim().is_empty()),
        upload.base64.filter(|b| !b.trim().is_empty()),
    ) else {
        return Err(AppError::BadRequest("Missing mimeType or base64".into()));
    };

    // Reject unsupported types before decoding a possibly large payload.
    let mime_type = normalize_mime(&mime_type)?;
    let image = InlineImage::from_base64(mime_type.clone(), &base64)?;
    Ok(GenerationRequest::new(&mime_type, image.data, upload.prompt)?)
}

async fn from_multipart(mut multipart: Multipart) -> Result<GenerationRequest, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut prompt: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let mime_type = match field.content_type() {
                    Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => {
                        ct.to_string()
                    }
                    _ => field
                        .file_name()
                        .and_then(mime_from_filename)
                        .unwrap_or_default()
                        .to_string(),
                };
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((mime_type, data.to_vec()));
            }
            "prompt" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                prompt = Some(text);
            }
            _ => {} // ignore unknown fields
        }
    }

    let (mime_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    Ok(GenerationRequest::new(&mime_type, data, prompt)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use catposter_core::error::CoreError;

    #[test]
    fn json_requires_mime_and_base64() {
        assert_matches!(from_json(b"{}"), Err(AppError::BadRequest(msg)) if msg == "Missing mimeType or base64");
        assert_matches!(
            from_json(br#"{"mimeType":"image/png","base64":"   "}"#),
            Err(AppError::BadRequest(_))
        );
    }

    #[test]
    fn json_rejects_malformed_body() {
        assert_matches!(from_json(b"{not json"), Err(AppError::BadRequest(msg)) if msg.starts_with("Invalid JSON body"));
    }

    #[test]
    fn json_rejects_unsupported_mime() {
        assert_matches!(
            from_json(br#"{"mimeType":"image/gif","base64":"AQID"}"#),
            Err(AppError::Core(CoreError::Validation(msg))) if msg.contains("image/gif")
        );
    }

    #[test]
    fn json_checks_mime_before_decoding() {
        assert_matches!(
            from_json(br#"{"mimeType":"image/gif","base64":"%%%"}"#),
            Err(AppError::Core(CoreError::Validation(msg))) if msg.contains("image/gif")
        );
    }

    #[test]
    fn json_accepts_unpadded_base64() {
        let request = from_json(br#"{"mimeType":"image/png","base64":"AQI"}"#).unwrap();
        assert_eq!(request.image().data, vec![1, 2]);
    }

    #[test]
    fn json_builds_request_with_prompt() {
        let request =
            from_json(br#"{"mimeType":"image/png","base64":"AQID","prompt":"as a pirate"}"#)
                .unwrap();
        assert_eq!(request.image().data, vec![1, 2, 3]);
        assert_eq!(request.user_prompt(), Some("as a pirate"));
    }
}
