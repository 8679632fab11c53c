//! PDF text extraction, one text layer per page.

use super::ExtractError;

/// Returns the text of every page in page order. Image-only pages come back as
/// empty strings rather than errors.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// Folds page texts into one string. Empty pages contribute nothing; non-empty
/// pages are kept in order and separated by a line break.
pub fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    pages.into_iter().fold(String::new(), |mut text, page| {
        let page = page.as_ref().trim();
        if !page.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(page);
        }
        text
    })
}
