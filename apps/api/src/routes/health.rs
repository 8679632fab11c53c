use axum::Json;
use serde_json::{json, Value};

use crate::extraction::{DOCX_MIME, PDF_MIME};
use crate::llm_client::MODEL;

/// GET /health
/// Liveness plus the fixed model and the upload formats this build accepts.
/// Never touches the remote API.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "model": MODEL,
        "accepted_formats": [PDF_MIME, DOCX_MIME],
    }))
}
