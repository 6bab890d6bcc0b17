//! Wire types for `models/{model}:generateContent`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use catposter_core::image::{InlineImage, DEFAULT_OUTPUT_MIME};

use crate::api::GeminiError;
use crate::model::GeneratedContent;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
pub struct RequestContent {
    pub role: &'static str,
    pub parts: Vec<RequestPart>,
}

/// Untagged union of text and inline media parts.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

/// Base64 inline payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data: String,
}

impl GenerateContentRequest {
    /// A single user turn: the instruction followed by the image.
    pub fn text_and_image(prompt: &str, image: &InlineImage) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![
                    RequestPart::Text {
                        text: prompt.to_string(),
                    },
                    RequestPart::InlineData {
                        inline_data: Blob {
                            mime_type: Some(image.mime_type.clone()),
                            data: image.to_base64(),
                        },
                    },
                ],
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// A response part. Parts may carry fields this client does not use, so
/// the known ones are optional rather than an untagged enum.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "inline_data")]
    pub inline_data: Option<Blob>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Collapse the first candidate into a [`GeneratedContent`].
    ///
    /// - The first non-empty inline image part wins.
    /// - Otherwise all text parts are joined.
    /// - A blocked prompt or an abnormal finish reason is reported as text
    ///   so callers can surface it.
    pub fn into_content(self) -> Result<GeneratedContent, GeminiError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Ok(match self.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => GeneratedContent::Text(format!("Request blocked: {reason}")),
                None => GeneratedContent::Empty,
            });
        };

        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

        if let Some(blob) = parts
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|b| !b.data.is_empty())
        {
            let data = BASE64
                .decode(blob.data.as_bytes())
                .map_err(|e| GeminiError::Decode(e.to_string()))?;
            let mime = blob
                .mime_type
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_OUTPUT_MIME.to_string());
            return Ok(GeneratedContent::Image(InlineImage::new(mime, data)));
        }

        let text = parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if !text.is_empty() {
            return Ok(GeneratedContent::Text(text));
        }

        match candidate.finish_reason {
            Some(reason) if reason != "STOP" => {
                Ok(GeneratedContent::Text(format!("Generation stopped: {reason}")))
            }
            _ => Ok(GeneratedContent::Empty),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GeneratedContent {
        serde_json::from_value::<GenerateContentResponse>(value)
            .unwrap()
            .into_content()
            .unwrap()
    }

    #[test]
    fn request_serializes_text_then_inline_data() {
        let image = InlineImage::new("image/png", vec![1, 2, 3]);
        let body = serde_json::to_value(GenerateContentRequest::text_and_image("hi", &image)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "text": "hi" },
                        { "inlineData": { "mimeType": "image/png", "data": "AQID" } }
                    ]
                }]
            })
        );
    }

    #[test]
    fn image_part_wins_over_text() {
        let content = parse(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here is your poster" },
                    { "inlineData": { "mimeType": "image/jpeg", "data": "AQID" } }
                ]},
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(
            content,
            GeneratedContent::Image(InlineImage::new("image/jpeg", vec![1, 2, 3]))
        );
    }

    #[test]
    fn missing_mime_defaults_to_png() {
        let content = parse(json!({
            "candidates": [{ "content": { "parts": [ { "inlineData": { "data": "AQID" } } ] } }]
        }));
        assert_matches!(content, GeneratedContent::Image(img) if img.mime_type == "image/png");
    }

    #[test]
    fn text_parts_are_joined() {
        let content = parse(json!({
            "candidates": [{ "content": { "parts": [ { "text": "I can't " }, { "text": "do that." } ] } }]
        }));
        assert_eq!(content, GeneratedContent::Text("I can't\ndo that.".into()));
    }

    #[test]
    fn blocked_prompt_is_reported_as_text() {
        let content = parse(json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
        assert_eq!(content, GeneratedContent::Text("Request blocked: SAFETY".into()));
    }

    #[test]
    fn abnormal_finish_without_parts_is_reported_as_text() {
        let content = parse(json!({ "candidates": [{ "finishReason": "IMAGE_SAFETY" }] }));
        assert_eq!(content, GeneratedContent::Text("Generation stopped: IMAGE_SAFETY".into()));
    }

    #[test]
    fn no_candidates_is_empty() {
        assert_eq!(parse(json!({})), GeneratedContent::Empty);
    }

    #[test]
    fn undecodable_image_is_an_error() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [ { "inlineData": { "data": "%%%" } } ] } }]
        }))
        .unwrap();
        assert_matches!(response.into_content(), Err(GeminiError::Decode(_)));
    }
}
