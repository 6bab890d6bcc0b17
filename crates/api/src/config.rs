use std::path::PathBuf;

use catposter_elevenlabs::ElevenLabsConfig;
use catposter_gemini::GeminiConfig;

/// Server configuration loaded from environment variables.
///
/// Upstream credentials are optional here: a missing key is reported per
/// request as a configuration error, not at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// Whole-request timeout in seconds (default: `300`). Generation fans out
    /// to many sequential model calls, so this is deliberately generous.
    pub request_timeout_secs: u64,
    /// Maximum accepted request body size in bytes (default: 20 MiB).
    pub max_upload_bytes: usize,
    /// Directory listed by `/api/posters` and served under `/cat-posters`.
    pub posters_dir: PathBuf,
    /// Write each generated poster into `posters_dir` (default: `false`).
    pub archive_posters: bool,
    /// Gemini settings, present only when `GEMINI_API_KEY` is set.
    pub gemini: Option<GeminiConfig>,
    /// ElevenLabs settings, present only when `ELEVEN_LABS_API_KEY` is set.
    pub elevenlabs: Option<ElevenLabsConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                            |
    /// |------------------------|----------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                          |
    /// | `PORT`                 | `3000`                                             |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`                            |
    /// | `REQUEST_TIMEOUT_SECS` | `300`                                              |
    /// | `MAX_UPLOAD_BYTES`     | `20971520`                                         |
    /// | `POSTERS_DIR`          | `public/cat-posters`                               |
    /// | `ARCHIVE_POSTERS`      | `false`                                            |
    /// | `GEMINI_API_KEY`       | unset                                              |
    /// | `GEMINI_BASE_URL`      | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `GEMINI_IMAGE_MODEL`   | `gemini-2.5-flash-image-preview`                   |
    /// | `ELEVEN_LABS_API_KEY`  | unset                                              |
    /// | `ELEVEN_LABS_BASE_URL` | `https://api.elevenlabs.io/v1`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "20971520".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let posters_dir = std::env::var("POSTERS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("public/cat-posters"));

        let archive_posters = std::env::var("ARCHIVE_POSTERS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let gemini = non_empty_var("GEMINI_API_KEY").map(|api_key| {
            let mut config = GeminiConfig::new(api_key);
            if let Some(base_url) = non_empty_var("GEMINI_BASE_URL") {
                config.base_url = base_url;
            }
            if let Some(model) = non_empty_var("GEMINI_IMAGE_MODEL") {
                config.model = model;
            }
            config
        });

        let elevenlabs = non_empty_var("ELEVEN_LABS_API_KEY").map(|api_key| {
            let mut config = ElevenLabsConfig::new(api_key);
            if let Some(base_url) = non_empty_var("ELEVEN_LABS_BASE_URL") {
                config.base_url = base_url;
            }
            config
        });

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            posters_dir,
            archive_posters,
            gemini,
            elevenlabs,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
