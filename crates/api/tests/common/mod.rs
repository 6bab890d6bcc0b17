#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use catposter_api::config::ServerConfig;
use catposter_api::router::build_app_router;
use catposter_api::state::AppState;
use catposter_core::image::InlineImage;
use catposter_core::picker::{Picker, SeededPicker};
use catposter_elevenlabs::{SpeechSynthesizer, TtsError};
use catposter_gemini::{GeminiError, GeneratedContent, GenerativeModel};
use catposter_pipeline::PosterPipeline;

/// Build a test `ServerConfig` with safe defaults, serving posters from `posters_dir`.
///
/// Uses `http://localhost:5173` as CORS origin and a 30-second request timeout.
/// No upstream keys are set; tests inject fakes through [`TestApp`].
pub fn test_config(posters_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        posters_dir: posters_dir.to_path_buf(),
        archive_posters: false,
        gemini: None,
        elevenlabs: None,
    }
}

// ---------------------------------------------------------------------------
// Upstream fakes
// ---------------------------------------------------------------------------

type Responder = dyn Fn(&str) -> Result<GeneratedContent, GeminiError> + Send + Sync;

/// Image model whose answer is decided by a closure over the prompt.
pub struct ScriptedModel {
    prompts: Mutex<Vec<String>>,
    respond: Box<Responder>,
}

impl ScriptedModel {
    pub fn new(
        respond: impl Fn(&str) -> Result<GeneratedContent, GeminiError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            prompts: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    /// Poster and scenes answer with a PNG, the pitch answers with text.
    pub fn happy() -> Arc<Self> {
        Self::new(happy_path)
    }

    pub fn calls(&self) -> usize {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(
        &self,
        prompt: &str,
        _image: &InlineImage,
    ) -> Result<GeneratedContent, GeminiError> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());
        (self.respond)(prompt)
    }
}

pub fn is_pitch(prompt: &str) -> bool {
    prompt.contains("movie pitch")
}

pub fn is_poster(prompt: &str) -> bool {
    prompt.contains("theatrical movie poster") && !prompt.contains("IMAGE ONLY")
}

pub fn png() -> GeneratedContent {
    GeneratedContent::Image(InlineImage::new("image/png", vec![0x89, 0x50, 0x4e, 0x47]))
}

pub fn happy_path(prompt: &str) -> Result<GeneratedContent, GeminiError> {
    if is_pitch(prompt) {
        Ok(GeneratedContent::Text("In a world of naps...".into()))
    } else {
        Ok(png())
    }
}

/// Speech synthesizer returning fixed bytes and recording the voices used.
#[derive(Default)]
pub struct FakeSpeech {
    pub voices: Mutex<Vec<String>>,
}

pub const FAKE_AUDIO: &[u8] = b"ID3fake-mp3";

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn synthesize(&self, _text: &str, voice_id: &str) -> Result<Bytes, TtsError> {
        self.voices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(voice_id.to_string());
        Ok(Bytes::from_static(FAKE_AUDIO))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Builder for a router wired with optional upstream fakes.
pub struct TestApp {
    pub config: ServerConfig,
    pub model: Option<Arc<dyn GenerativeModel>>,
    pub speech: Option<Arc<dyn SpeechSynthesizer>>,
}

impl TestApp {
    pub fn new(posters_dir: &Path) -> Self {
        Self {
            config: test_config(posters_dir),
            model: None,
            speech: None,
        }
    }

    pub fn with_model(mut self, model: Arc<dyn GenerativeModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Build the full application router with all middleware layers.
    ///
    /// Uses the same `build_app_router` as production so tests exercise the
    /// real middleware stack (CORS, request ID, timeout, tracing, panic recovery).
    pub fn build(self) -> Router {
        let picker: Arc<dyn Picker> = Arc::new(SeededPicker::new(7));
        let state = AppState {
            config: Arc::new(self.config.clone()),
            pipeline: self
                .model
                .map(|model| Arc::new(PosterPipeline::new(model, Arc::clone(&picker)))),
            speech: self.speech,
            picker,
        };
        build_app_router(state, &self.config)
    }
}

/// Shortcut: app with no upstreams configured.
pub fn build_test_app(posters_dir: &Path) -> Router {
    TestApp::new(posters_dir).build()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, "application/json", json.to_string()).await
}

pub async fn post_raw(
    app: Router,
    uri: &str,
    content_type: &str,
    body: impl Into<Body>,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(body.into())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
