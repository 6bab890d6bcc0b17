use catposter_gemini::GeminiError;

/// Terminal failures of a generation run. Enrichment failures never appear
/// here; they are absorbed by [`crate::settle`].
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Neither the primary call nor its retry produced an image.
    #[error("No image returned")]
    NoImage {
        /// Text the model answered with instead, if any.
        details: Option<String>,
    },

    /// The poster call failed at the transport or API level.
    #[error(transparent)]
    Model(#[from] GeminiError),
}
