// Prompt constants for the resume generation call.
// The template instructs the model to answer with a fenced YAML block; the
// extraction pipeline still tolerates replies that ignore that instruction.

/// System prompt for the generation call.
pub const ATS_SYSTEM: &str = "You are an expert ATS optimization specialist";

/// User prompt template. `{job_description}`, `{resume}` and `{references}`
/// are substituted by `build_generate_prompt`.
const GENERATE_PROMPT_TEMPLATE: &str = "\
You are an expert ATS optimization specialist and technical recruiter who understands \
how applicant tracking systems parse and score resumes. Your task is to analyze a job \
description and the candidate's existing resume, then produce an ATS-optimized YAML \
resume that maximizes match rates while maintaining authenticity and readability.

Before creating the YAML, perform these analysis steps:

1. Extract Keywords:
- Identify primary job title variations
- List all technical skills and tools
- Identify recurring phrases and industry terminology
- Note specific certifications or methodologies
- Capture soft skills and leadership competencies

2. Rewrite the candidate's experience to emphasize the extracted keywords, never \
inventing experience the candidate does not have.

Respond with a single YAML document inside a ```yaml fenced code block. The document \
must start with the `personal_information:` key and use these sections: \
personal_information, professional_summary, core_competencies, skills, \
professional_experience (with title, company, dates: {start, end}, description), \
education, certifications.

JOB DESCRIPTION:
{job_description}

CANDIDATE RESUME:
{resume}
{references}";

/// Builds the full generation prompt from the request inputs.
/// Reference documents are optional and appended as named sections.
pub fn build_generate_prompt(job_description: &str, resume: &str, references: &[(String, String)]) -> String {
    let references_section = if references.is_empty() {
        String::new()
    } else {
        let mut section = String::from("\nREFERENCE DOCUMENTS:\n");
        for (name, content) in references {
            section.push_str(&format!("--- {name} ---\n{content}\n"));
        }
        section
    };

    GENERATE_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{resume}", resume)
        .replace("{references}", &references_section)
}
