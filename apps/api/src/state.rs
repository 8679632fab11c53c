use std::sync::Arc;

use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-evaluation data; every request is independent.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable generator. Default: GeminiClient. Tests inject a fake.
    pub generator: Arc<dyn TextGenerator>,
    /// Multipart body limit applied by the router.
    pub max_upload_bytes: usize,
}
