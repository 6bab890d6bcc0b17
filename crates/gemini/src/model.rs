use async_trait::async_trait;
use catposter_core::image::InlineImage;

use crate::api::GeminiError;

/// What one generation call produced.
///
/// An image part always wins over text; `Text` means the model answered
/// with commentary (or a refusal) instead of an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedContent {
    Image(InlineImage),
    Text(String),
    Empty,
}

impl GeneratedContent {
    pub fn into_image(self) -> Option<InlineImage> {
        match self {
            GeneratedContent::Image(image) => Some(image),
            GeneratedContent::Text(_) | GeneratedContent::Empty => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            GeneratedContent::Text(text) => Some(text),
            GeneratedContent::Image(_) | GeneratedContent::Empty => None,
        }
    }
}

/// A multimodal model that takes a text instruction plus one inline image.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<GeneratedContent, GeminiError>;
}
