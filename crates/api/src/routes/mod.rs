pub mod health;
pub mod qa;
pub mod video;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /qa                  answer a question (POST)
/// /text-to-video       generate a video from a prompt (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(qa::router()).merge(video::router())
}
