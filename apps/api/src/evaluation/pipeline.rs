//! Evaluation pipeline: prompts in, two AI replies out.
//!
//! Calls are sequential. If the match call fails the keywords call is never made,
//! and no partial result is returned.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::builder::build_prompts;
use crate::llm_client::TextGenerator;

#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub evaluation_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    /// Free text from the model, shown as-is.
    pub match_percentage: String,
    /// Free text from the model, shown as-is.
    pub missing_keywords: String,
}

/// Runs one evaluation. The job description must be non-blank; an empty resume
/// text is allowed and produces an odd but valid prompt.
pub async fn evaluate(
    generator: &dyn TextGenerator,
    job_description: &str,
    resume_text: &str,
) -> Result<Evaluation, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::missing_input());
    }

    let evaluation_id = Uuid::new_v4();
    let prompts = build_prompts(job_description, resume_text);

    let match_percentage = generator
        .generate(&prompts.match_evaluation)
        .await
        .map_err(|e| {
            warn!(%evaluation_id, "Match evaluation call failed: {e}");
            AppError::RemoteCall(e)
        })?;

    let missing_keywords = generator
        .generate(&prompts.missing_keywords)
        .await
        .map_err(|e| {
            warn!(%evaluation_id, "Missing keywords call failed: {e}");
            AppError::RemoteCall(e)
        })?;

    info!(%evaluation_id, "Evaluation complete");

    Ok(Evaluation {
        evaluation_id,
        evaluated_at: Utc::now(),
        match_percentage,
        missing_keywords,
    })
}
