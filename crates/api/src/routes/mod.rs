pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// POST /generate   poster + pitch + scene stills
/// POST /tts        pitch narration as audio/mpeg
/// GET  /posters    public gallery listing
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/generate", post(handlers::generate::generate))
        .route("/tts", post(handlers::tts::synthesize))
        .route("/posters", get(handlers::posters::list))
}
