//! Intake — turns an uploaded file into plain text for prompt assembly.
//!
//! PDF uploads go through `pdf-extract`; plain-text formats are read as UTF-8.
//! Anything else is rejected with a validation error before the LLM is called.

use crate::errors::AppError;

/// File extensions read directly as UTF-8 text.
const TEXT_EXTENSIONS: [&str; 4] = ["txt", "md", "yaml", "yml"];

/// Extracts text from an uploaded file, dispatching on the filename extension.
pub fn text_from_upload(filename: &str, bytes: &[u8]) -> Result<String, AppError> {
    let extension = filename
        .rsplit('.')
        .next()
        .map(str::to_lowercase)
        .unwrap_or_default();

    if extension == "pdf" {
        return pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            AppError::Validation(format!("Could not extract text from '{filename}': {e}"))
        });
    }

    if TEXT_EXTENSIONS.contains(&extension.as_str()) {
        return String::from_utf8(bytes.to_vec()).map_err(|_| {
            AppError::Validation(format!("File '{filename}' is not valid UTF-8 text"))
        });
    }

    Err(AppError::Validation(format!(
        "Unsupported file type: {extension}"
    )))
}
