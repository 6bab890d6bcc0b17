//! The poster generation state machine.
//!
//! ```text
//! Start -> primary call --image--> PosterReady
//!                       \-text/empty-> Retrying --image--> PosterReady
//!                                               \-otherwise-> Failed
//! PosterReady -> join(settle(pitch), settle(scenes)) -> Complete
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use catposter_core::image::{GenerationRequest, InlineImage};
use catposter_core::picker::{pick, Picker};
use catposter_core::prompt::{
    pitch_prompt, poster_prompt, poster_retry_prompt, scene_prompt, PosterBrief, UniquenessToken,
};
use catposter_core::scene::{
    SceneVariant, MAX_POSTER_ATTEMPTS, SCENE_ATTEMPTS_PER_VARIANT, SCENE_SAFETY_FILL_BUDGET,
    SCENE_TARGET,
};
use catposter_gemini::{GeminiError, GeneratedContent, GenerativeModel};

use crate::error::PipelineError;
use crate::settle::{settle, settle_all};

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub brief: PosterBrief,
    pub poster: InlineImage,
    /// Trailer-style pitch for the poster, when the pitch call succeeded.
    pub description: Option<String>,
    /// Up to [`SCENE_TARGET`] stills, labelled with the upload's mime type.
    pub scenes: Vec<InlineImage>,
}

/// Drives one poster generation run against a [`GenerativeModel`].
///
/// Cheap to share behind an `Arc`; holds no per-request state.
pub struct PosterPipeline {
    model: Arc<dyn GenerativeModel>,
    picker: Arc<dyn Picker>,
}

impl PosterPipeline {
    pub fn new(model: Arc<dyn GenerativeModel>, picker: Arc<dyn Picker>) -> Self {
        Self { model, picker }
    }

    /// Run the whole pipeline for one request.
    pub async fn run(&self, request: &GenerationRequest) -> Result<GenerationResult, PipelineError> {
        let brief = PosterBrief::draw(self.picker.as_ref());
        tracing::info!(
            movie = brief.movie,
            theme = brief.theme,
            mime_type = %request.image().mime_type,
            "Generating poster",
        );

        let poster = self.generate_poster(request, &brief).await?;

        let (description, scenes) = futures::join!(
            settle("description", self.describe(&poster, &brief)),
            settle("scenes", self.generate_scenes(request, &brief)),
        );
        let description = description.flatten();
        let scenes = scenes.unwrap_or_default();

        tracing::info!(
            movie = brief.movie,
            has_description = description.is_some(),
            scene_count = scenes.len(),
            "Poster generation complete",
        );

        Ok(GenerationResult {
            brief,
            poster,
            description,
            scenes,
        })
    }

    fn token(&self, label: impl Into<String>) -> UniquenessToken {
        UniquenessToken::mint(label, self.picker.as_ref())
    }

    /// Primary call, then strengthened retries up to [`MAX_POSTER_ATTEMPTS`]
    /// calls in total. The most recent text answer becomes the failure details.
    async fn generate_poster(
        &self,
        request: &GenerationRequest,
        brief: &PosterBrief,
    ) -> Result<InlineImage, PipelineError> {
        let mut details: Option<String> = None;

        for attempt in 1..=MAX_POSTER_ATTEMPTS {
            let prompt = if attempt == 1 {
                poster_prompt(brief, request.user_prompt(), &self.token("poster"))
            } else {
                tracing::warn!(
                    attempt,
                    details = details.as_deref().unwrap_or("<empty>"),
                    "Poster call returned no image, retrying with image-only directive",
                );
                let label = format!("poster-retry-{}", attempt - 1);
                poster_retry_prompt(brief, request.user_prompt(), &self.token(label))
            };

            match self.model.generate(&prompt, request.image()).await? {
                GeneratedContent::Image(poster) => return Ok(poster),
                GeneratedContent::Text(text) => details = Some(text),
                GeneratedContent::Empty => {}
            }
        }

        Err(PipelineError::NoImage { details })
    }

    /// Ask for a pitch of the finished poster.
    async fn describe(
        &self,
        poster: &InlineImage,
        brief: &PosterBrief,
    ) -> Result<Option<String>, GeminiError> {
        let prompt = pitch_prompt(brief, &self.token("pitch"));
        let content = self.model.generate(&prompt, poster).await?;
        Ok(content
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string))
    }

    /// All archetypes concurrently, then sequential safety fill.
    async fn generate_scenes(
        &self,
        request: &GenerationRequest,
        brief: &PosterBrief,
    ) -> Result<Vec<InlineImage>, Infallible> {
        let per_variant = SceneVariant::ALL.map(|variant| self.scene_with_retries(request, brief, variant));
        let mut scenes: Vec<InlineImage> = settle_all("scene", per_variant)
            .await
            .into_iter()
            .flatten()
            .flatten()
            .collect();

        let mut fills = 0;
        while scenes.len() < SCENE_TARGET && fills < SCENE_SAFETY_FILL_BUDGET {
            fills += 1;
            let variant = *pick(self.picker.as_ref(), &SceneVariant::ALL);
            let label = format!("fill-{fills}");
            let attempt = self.scene_attempt(request, brief, variant, 1, label);
            if let Some(Some(scene)) = settle("scene-fill", attempt).await {
                scenes.push(scene);
            }
        }

        if scenes.len() < SCENE_TARGET {
            tracing::warn!(
                scene_count = scenes.len(),
                fills,
                "Scene generation fell short of target",
            );
        }

        Ok(scenes)
    }

    /// Up to [`SCENE_ATTEMPTS_PER_VARIANT`] sequential attempts for one
    /// archetype. An upstream error counts as a failed attempt.
    async fn scene_with_retries(
        &self,
        request: &GenerationRequest,
        brief: &PosterBrief,
        variant: SceneVariant,
    ) -> Result<Option<InlineImage>, Infallible> {
        for attempt in 1..=SCENE_ATTEMPTS_PER_VARIANT {
            let label = format!("scene-{variant}-{attempt}");
            match self.scene_attempt(request, brief, variant, attempt, label).await {
                Ok(Some(scene)) => return Ok(Some(scene)),
                Ok(None) => {
                    tracing::debug!(%variant, attempt, "Scene call returned no image");
                }
                Err(err) => {
                    tracing::warn!(%variant, attempt, error = %err, "Scene call failed");
                }
            }
        }
        Ok(None)
    }

    async fn scene_attempt(
        &self,
        request: &GenerationRequest,
        brief: &PosterBrief,
        variant: SceneVariant,
        attempt: u32,
        label: String,
    ) -> Result<Option<InlineImage>, GeminiError> {
        let prompt = scene_prompt(variant, brief, attempt, &self.token(label));
        let content = self.model.generate(&prompt, request.image()).await?;
        Ok(content
            .into_image()
            .map(|still| InlineImage::new(request.image().mime_type.clone(), still.data)))
    }
}
