//! Axum route handlers for the Resume API.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::intake::text_from_upload;
use crate::llm_client::prompts::{build_generate_prompt, ATS_SYSTEM};
use crate::resume::model::ResumeDocument;
use crate::resume::parse_resume_reply;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResumeResponse {
    pub resume_data: ResumeDocument,
}

/// Decoded multipart form for the generate endpoint.
#[derive(Debug, Default)]
struct GenerateForm {
    job_description: String,
    resume: Option<(String, Vec<u8>)>,
    references: Vec<(String, Vec<u8>)>,
}

/// POST /api/v1/resumes/generate
///
/// Multipart form: `job_description` text field, a `resume` file, and any
/// number of optional `reference_*` files. Sends everything to the LLM and
/// runs the reply through the extraction/normalization pipeline. Nothing is
/// persisted; the uploads live only for the duration of the request.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateResumeResponse>, AppError> {
    let form = read_form(multipart).await?;

    if form.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    let (resume_name, resume_bytes) = form
        .resume
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;

    let resume_text = text_from_upload(&resume_name, &resume_bytes)?;
    let references = form
        .references
        .iter()
        .map(|(name, bytes)| Ok((name.clone(), text_from_upload(name, bytes)?)))
        .collect::<Result<Vec<_>, AppError>>()?;

    info!(
        resume_file = %resume_name,
        reference_count = references.len(),
        "Generating resume"
    );

    let prompt = build_generate_prompt(&form.job_description, &resume_text, &references);
    let reply = state
        .llm
        .call_text(&prompt, ATS_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume generation call failed: {e}")))?;

    debug!(reply_len = reply.len(), "Model reply received");

    let resume_data = parse_resume_reply(&reply)?;

    Ok(Json(GenerateResumeResponse { resume_data }))
}

async fn read_form(mut multipart: Multipart) -> Result<GenerateForm, AppError> {
    let mut form = GenerateForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart form: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => {
                form.job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid job_description: {e}")))?;
            }
            "resume" => {
                let filename = field.file_name().unwrap_or("resume.txt").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid resume upload: {e}")))?;
                form.resume = Some((filename, bytes.to_vec()));
            }
            other if other.starts_with("reference_") => {
                let filename = field.file_name().unwrap_or(other).to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid reference upload: {e}")))?;
                form.references.push((filename, bytes.to_vec()));
            }
            // Unknown fields are skipped, not rejected.
            _ => {}
        }
    }

    Ok(form)
}
