pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use rest::ApiDoc;
pub use state::AppState;

/// Builds the API router. Cross-cutting layers (CORS, tracing) are added by the binary.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/reading", get(rest::get_reading_handler))
        .route("/reading/next", post(rest::next_handler))
        .route("/reading/previous", post(rest::previous_handler))
        .route("/reading/jump", post(rest::jump_handler))
        .route("/reading/reset", post(rest::reset_handler))
        .route("/reading/read", post(rest::mark_read_handler))
        .route("/daily", get(rest::daily_verse_handler))
        .route("/daily/read", post(rest::daily_read_handler))
        .route("/reference/chapters", get(rest::list_chapters_handler))
        .route("/reference/parts", get(rest::list_parts_handler))
        .with_state(state)
}
