//! Route definitions for question answering.
//!
//! ```text
//! POST /qa                  ask_question
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::qa;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/qa", post(qa::ask_question))
}
