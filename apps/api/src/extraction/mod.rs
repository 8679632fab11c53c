//! Turns an uploaded PDF or DOCX into plain resume text.
//!
//! The parsers are CPU-bound and can panic on hostile input, so `extract` runs them
//! inside `tokio::task::spawn_blocking`. A panicked task becomes `ExtractError::Panicked`;
//! a task that was cancelled becomes `ExtractError::Interrupted`.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

pub mod docx;
pub mod pdf;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported format '{0}': upload a PDF or DOCX resume")]
    UnsupportedFormat(String),

    #[error("uploaded file is empty")]
    EmptyUpload,

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read DOCX: {0}")]
    Docx(String),

    #[error("document parser crashed while reading the file")]
    Panicked,

    #[error("extraction task was cancelled: {0}")]
    Interrupted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MediaType {
    #[serde(rename = "application/pdf")]
    Pdf,
    #[serde(rename = "application/vnd.openxmlformats-officedocument.wordprocessingml.document")]
    Docx,
}

impl MediaType {
    pub fn as_mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => PDF_MIME,
            MediaType::Docx => DOCX_MIME,
        }
    }

    /// Resolves the media type of an upload. The declared content type wins;
    /// a missing or generic `application/octet-stream` type falls back to the
    /// file name's extension.
    pub fn resolve(declared: Option<&str>, file_name: Option<&str>) -> Result<Self, ExtractError> {
        let declared = declared.map(str::trim).filter(|d| !d.is_empty());
        match declared {
            Some(d) if !is_generic(d) => d.parse(),
            _ => {
                let guessed = file_name.and_then(|name| mime_guess::from_path(name).first_raw());
                match guessed {
                    Some(mime) => mime.parse(),
                    None => Err(ExtractError::UnsupportedFormat(
                        declared
                            .or(file_name)
                            .unwrap_or("unknown")
                            .to_string(),
                    )),
                }
            }
        }
    }
}

fn is_generic(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/octet-stream"))
        .unwrap_or(false)
}

impl FromStr for MediaType {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let essence = s.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(PDF_MIME) {
            Ok(MediaType::Pdf)
        } else if essence.eq_ignore_ascii_case(DOCX_MIME) {
            Ok(MediaType::Docx)
        } else {
            Err(ExtractError::UnsupportedFormat(s.trim().to_string()))
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// An uploaded resume. Consumed by value: once it is handed to `extract` the
/// bytes are dropped on every exit path.
#[derive(Debug)]
pub struct UploadedDocument {
    pub file_name: Option<String>,
    pub media_type: MediaType,
    pub bytes: Bytes,
}

/// Plain text pulled out of a document, plus what was read to get it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedText {
    pub media_type: MediaType,
    pub text: String,
    /// PDF pages read. `None` for DOCX, which has no page model.
    pub pages: Option<usize>,
}

/// Synchronous extraction. Blocking; call through `extract` from async code.
pub fn extract_sync(document: UploadedDocument) -> Result<ExtractedText, ExtractError> {
    let UploadedDocument {
        media_type, bytes, ..
    } = document;

    if bytes.is_empty() {
        return Err(ExtractError::EmptyUpload);
    }

    match media_type {
        MediaType::Pdf => {
            let pages = pdf::extract_pages(&bytes)?;
            let page_count = pages.len();
            Ok(ExtractedText {
                media_type,
                text: pdf::join_pages(pages),
                pages: Some(page_count),
            })
        }
        MediaType::Docx => Ok(ExtractedText {
            media_type,
            text: docx::extract_text(&bytes)?,
            pages: None,
        }),
    }
}

/// Extracts text on the blocking pool.
pub async fn extract(document: UploadedDocument) -> Result<ExtractedText, ExtractError> {
    let media_type = document.media_type;
    let size = document.bytes.len();
    let file_name = document.file_name.clone().unwrap_or_default();

    let result = tokio::task::spawn_blocking(move || extract_sync(document))
        .await
        .map_err(|e| {
            warn!("Extraction task for '{file_name}' did not complete: {e}");
            join_failure(e)
        })?;

    match &result {
        Ok(extracted) => info!(
            media_type = %media_type,
            bytes = size,
            characters = extracted.text.chars().count(),
            pages = ?extracted.pages,
            "Resume text extracted"
        ),
        Err(e) => warn!(media_type = %media_type, bytes = size, "Resume extraction failed: {e}"),
    }

    result
}

fn join_failure(e: tokio::task::JoinError) -> ExtractError {
    if e.is_panic() {
        ExtractError::Panicked
    } else {
        ExtractError::Interrupted(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_pdf_type_is_accepted() {
        assert_eq!(MediaType::resolve(Some("application/pdf"), None).unwrap(), MediaType::Pdf);
    }

    #[test]
    fn test_declared_docx_type_is_accepted() {
        assert_eq!(MediaType::resolve(Some(DOCX_MIME), Some("cv.bin")).unwrap(), MediaType::Docx);
    }

    #[test]
    fn test_parameters_and_case_are_ignored() {
        assert_eq!(
            "Application/PDF; charset=binary".parse::<MediaType>().unwrap(),
            MediaType::Pdf
        );
    }

    #[test]
    fn test_plain_text_is_unsupported() {
        let err = MediaType::resolve(Some("text/plain"), Some("resume.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(ref t) if t == "text/plain"));
    }

    #[test]
    fn test_legacy_word_format_is_unsupported() {
        assert!(matches!(
            MediaType::resolve(Some("application/msword"), None),
            Err(ExtractError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_octet_stream_falls_back_to_extension() {
        assert_eq!(
            MediaType::resolve(Some("application/octet-stream"), Some("Jane_Doe.docx")).unwrap(),
            MediaType::Docx
        );
        assert_eq!(MediaType::resolve(None, Some("resume.PDF")).unwrap(), MediaType::Pdf);
    }

    #[test]
    fn test_unknown_extension_without_type_is_unsupported() {
        assert!(matches!(
            MediaType::resolve(None, Some("resume.txt")),
            Err(ExtractError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            MediaType::resolve(None, None),
            Err(ExtractError::UnsupportedFormat(ref t)) if t == "unknown"
        ));
    }

    #[test]
    fn test_empty_upload_is_extraction_failure() {
        let document = UploadedDocument {
            file_name: None,
            media_type: MediaType::Pdf,
            bytes: Bytes::new(),
        };
        assert!(matches!(extract_sync(document), Err(ExtractError::EmptyUpload)));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_surfaces_error_instead_of_crashing() {
        let document = UploadedDocument {
            file_name: Some("broken.pdf".to_string()),
            media_type: MediaType::Pdf,
            bytes: Bytes::from_static(b"%PDF-1.4 this is not really a pdf"),
        };
        let err = extract(document).await.unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_) | ExtractError::Panicked));
    }

    #[tokio::test]
    async fn test_docx_upload_extracts_on_blocking_pool() {
        let bytes = docx::tests::build_docx(&["Rust engineer", "Tokio, Axum"]);
        let document = UploadedDocument {
            file_name: Some("resume.docx".to_string()),
            media_type: MediaType::Docx,
            bytes: Bytes::from(bytes),
        };
        let extracted = extract(document).await.unwrap();
        assert_eq!(extracted.media_type, MediaType::Docx);
        assert!(extracted.text.contains("Rust engineer"));
        assert!(extracted.text.contains("Tokio, Axum"));
        assert_eq!(extracted.pages, None);
    }

    #[tokio::test]
    async fn test_panicked_task_is_parser_crash() {
        let err = tokio::task::spawn_blocking(|| panic!("bad xref"))
            .await
            .unwrap_err();
        assert!(matches!(join_failure(err), ExtractError::Panicked));
    }

    #[tokio::test]
    async fn test_cancelled_task_is_interrupted() {
        let handle = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        handle.abort();
        let err = handle.await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(matches!(join_failure(err), ExtractError::Interrupted(_)));
    }
}
