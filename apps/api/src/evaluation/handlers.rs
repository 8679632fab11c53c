//! Axum route handlers for the Evaluation API.

use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::evaluation::pipeline::{evaluate, Evaluation};
use crate::extraction::{extract, MediaType, UploadedDocument};
use crate::state::AppState;

const JOB_DESCRIPTION_FIELD: &str = "job_description";
const RESUME_FIELD: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EvaluateTextRequest {
    pub job_description: String,
    #[serde(default)]
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub media_type: MediaType,
    pub resume_text: String,
    pub characters: usize,
    pub pages: Option<usize>,
}

/// Fields collected from an evaluation form.
#[derive(Debug, Default)]
struct EvaluationForm {
    job_description: Option<String>,
    resume: Option<UploadedDocument>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/extract
///
/// Extracts and returns the resume text so the user can check what the model will see.
pub async fn handle_extract(multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    let form = read_form(multipart).await?;
    let document = form.resume.ok_or_else(|| {
        AppError::MissingInput(format!("No '{RESUME_FIELD}' file was uploaded"))
    })?;

    let extracted = extract(document).await?;

    Ok(Json(ExtractResponse {
        media_type: extracted.media_type,
        characters: extracted.text.chars().count(),
        resume_text: extracted.text,
        pages: extracted.pages,
    }))
}

/// POST /api/v1/evaluations
///
/// Full pipeline: validate form → extract resume text → match prompt → keywords prompt.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Evaluation>, AppError> {
    let form = read_form(multipart).await?;

    let job_description = form.job_description.unwrap_or_default();
    let document = match form.resume {
        Some(document) if !job_description.trim().is_empty() => document,
        _ => return Err(AppError::missing_input()),
    };

    let extracted = extract(document).await?;
    let evaluation = evaluate(state.generator.as_ref(), &job_description, &extracted.text).await?;

    Ok(Json(evaluation))
}

/// POST /api/v1/evaluations/text
///
/// Same pipeline for callers that already have the resume as text.
pub async fn handle_evaluate_text(
    State(state): State<AppState>,
    request: Result<Json<EvaluateTextRequest>, JsonRejection>,
) -> Result<Json<Evaluation>, AppError> {
    let Json(request) = request.map_err(json_error)?;
    let evaluation = evaluate(
        state.generator.as_ref(),
        &request.job_description,
        &request.resume_text,
    )
    .await?;

    Ok(Json(evaluation))
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart parsing
// ────────────────────────────────────────────────────────────────────────────

async fn read_form(mut multipart: Multipart) -> Result<EvaluationForm, AppError> {
    let mut form = EvaluationForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(JOB_DESCRIPTION_FIELD) => {
                form.job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            Some(RESUME_FIELD) => {
                let file_name = field.file_name().map(str::to_string);
                let declared = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;

                // Browsers send an empty, unnamed part when no file was chosen.
                if bytes.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
                    continue;
                }

                let media_type = MediaType::resolve(declared.as_deref(), file_name.as_deref())?;
                form.resume = Some(UploadedDocument {
                    file_name,
                    media_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Malformed multipart body: {}", e.body_text()))
    }
}

fn json_error(e: JsonRejection) -> AppError {
    AppError::Validation(format!("Malformed JSON body: {}", e.body_text()))
}
