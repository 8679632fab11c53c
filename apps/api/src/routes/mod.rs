pub mod health;
pub mod ui;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        .route("/api/v1/resumes/extract", post(handlers::handle_extract))
        .route("/api/v1/evaluations", post(handlers::handle_evaluate))
        .route(
            "/api/v1/evaluations/text",
            post(handlers::handle_evaluate_text),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
