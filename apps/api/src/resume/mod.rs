// Resume pipeline: turns the LLM's free-form reply into a canonical resume.
// Two stages, composed in sequence:
//   extract   — locate and parse the YAML payload embedded in the reply text
//   normalize — map the loosely-typed tree onto one `ResumeDocument`
// Both stages are pure; all I/O stays in the handlers.

pub mod extract;
pub mod handlers;
pub mod model;
pub mod normalize;

use thiserror::Error;

use crate::resume::model::ResumeDocument;

/// Failure modes of the reply-to-resume pipeline. Both are recoverable: the
/// caller surfaces them as "please retry", never as a process fault.
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    /// No strategy produced a parseable top-level mapping.
    /// Carries the strategies attempted, in order, for diagnostics.
    #[error("no parseable resume data found in model reply (strategies tried: {})", .attempted.join(", "))]
    ExtractionFailed { attempted: Vec<&'static str> },

    /// A mapping was parsed but it lacked every resume-defining field.
    /// Distinct from extraction failure so operators can tell "model ignored
    /// format instructions" from "model returned the wrong kind of content".
    #[error("model reply parsed but does not look like a resume")]
    NormalizationFailed,
}

/// Runs the full pipeline on a raw model reply.
pub fn parse_resume_reply(reply: &str) -> Result<ResumeDocument, PipelineError> {
    let raw = extract::extract_structured_block(reply)?;
    normalize::normalize_resume(&raw)
}
