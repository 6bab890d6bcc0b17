//! Handler listing the public posters directory.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::gallery;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PosterList {
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /api/posters
///
/// Always answers 200; an unreadable directory yields an empty list plus
/// the I/O error message.
pub async fn list(State(state): State<AppState>) -> Json<PosterList> {
    match gallery::list_posters(&state.config.posters_dir).await {
        Ok(images) => Json(PosterList {
            images,
            error: None,
        }),
        Err(err) => {
            tracing::warn!(
                dir = %state.config.posters_dir.display(),
                error = %err,
                "Failed to list posters",
            );
            Json(PosterList {
                images: Vec::new(),
                error: Some(err.to_string()),
            })
        }
    }
}
