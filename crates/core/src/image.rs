//! Image payloads and the validated generation request.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD as BASE64};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use crate::error::CoreError;

/// Standard alphabet, accepting payloads with or without `=` padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// ---------------------------------------------------------------------------
// Mime types
// ---------------------------------------------------------------------------

/// Upload mime types the generation model accepts as inline data.
pub const SUPPORTED_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/webp",
    "image/heic",
    "image/heif",
];

/// Mime type assumed for upstream image parts that omit one.
pub const DEFAULT_OUTPUT_MIME: &str = "image/png";

/// Trim, lower-case and alias a client-supplied mime type, then check it
/// against [`SUPPORTED_MIME_TYPES`].
pub fn normalize_mime(raw: &str) -> Result<String, CoreError> {
    let mime = raw.trim().to_ascii_lowercase();
    let mime = match mime.as_str() {
        "image/jpg" | "image/pjpeg" => "image/jpeg".to_string(),
        _ => mime,
    };

    if SUPPORTED_MIME_TYPES.contains(&mime.as_str()) {
        Ok(mime)
    } else if mime.is_empty() {
        Err(CoreError::Validation("Missing mimeType".to_string()))
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported image type '{mime}'. Supported: {}",
            SUPPORTED_MIME_TYPES.join(", ")
        )))
    }
}

/// Guess a mime type from a file name's extension.
pub fn mime_from_filename(filename: &str) -> Option<&'static str> {
    let (_, ext) = filename.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

/// File extension used when writing an image of the given mime type to disk.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/avif" => "avif",
        "image/heic" => "heic",
        "image/heif" => "heif",
        _ => "png",
    }
}

// ---------------------------------------------------------------------------
// InlineImage
// ---------------------------------------------------------------------------

/// Raw image bytes together with their mime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Decode a standard-alphabet base64 payload, padded or not. A leading
    /// `data:<mime>;base64,` prefix is tolerated and stripped.
    pub fn from_base64(mime_type: impl Into<String>, payload: &str) -> Result<Self, CoreError> {
        let raw = strip_data_url_prefix(payload.trim());
        let data = LENIENT_BASE64
            .decode(raw)
            .map_err(|e| CoreError::Validation(format!("Invalid base64 image data: {e}")))?;
        Ok(Self::new(mime_type, data))
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }

    /// Render as `data:<mime>;base64,<data>`.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

fn strip_data_url_prefix(payload: &str) -> &str {
    if payload.starts_with("data:") {
        if let Some((_, rest)) = payload.split_once(";base64,") {
            return rest;
        }
    }
    payload
}

// ---------------------------------------------------------------------------
// GenerationRequest
// ---------------------------------------------------------------------------

/// A validated poster generation request, built once per HTTP request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    image: InlineImage,
    user_prompt: Option<String>,
}

impl GenerationRequest {
    /// Validate the upload and optional user direction.
    ///
    /// - `mime_type` must normalise to one of [`SUPPORTED_MIME_TYPES`].
    /// - `data` must be non-empty.
    /// - A blank `user_prompt` is treated as absent.
    pub fn new(
        mime_type: &str,
        data: Vec<u8>,
        user_prompt: Option<String>,
    ) -> Result<Self, CoreError> {
        let mime_type = normalize_mime(mime_type)?;
        if data.is_empty() {
            return Err(CoreError::Validation("Image data is empty".to_string()));
        }

        let user_prompt = user_prompt
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(Self {
            image: InlineImage::new(mime_type, data),
            user_prompt,
        })
    }

    pub fn image(&self) -> &InlineImage {
        &self.image
    }

    pub fn user_prompt(&self) -> Option<&str> {
        self.user_prompt.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
