//! Route definitions for text-to-video generation.
//!
//! ```text
//! POST /text-to-video       generate_video
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::video;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/text-to-video", post(video::generate_video))
}
