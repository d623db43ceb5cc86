#![allow(dead_code)]

//! Canonical resume model — the only shape the renderer ever sees.
//!
//! Everything is optional: the model reply is free to omit whole sections.
//! The normalizer guarantees only that at least one of name, summary, or
//! experience is present; all other emptiness is the renderer's problem.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub summary: Option<String>,
    /// `competencies` and `skills` are tracked as two independently optional
    /// lists. When only one is present the front-end shows it under the
    /// "Core Competencies" heading; when both are present it shows both
    /// sections. That asymmetry is preserved here, so presence matters and
    /// the lists are never merged or deduplicated.
    pub competencies: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<Certification>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub title: Option<String>,
    pub company: Option<String>,
    pub date_range: DateRange,
    pub bullets: Vec<String>,
}

/// Start/end of an experience entry. `end` may be the literal "Present".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: Option<String>,
    pub location: Option<String>,
    pub level: Option<String>,
    pub field_of_study: Option<String>,
    pub degree: Option<String>,
    pub graduation_year: Option<String>,
}

impl EducationEntry {
    /// Composed credential line: "{level} in {field} ({year})".
    /// `degree` substitutes when `field_of_study` is absent; absent parts are
    /// dropped without leaving stray spacing or punctuation.
    pub fn credential(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(level) = &self.level {
            parts.push(level.clone());
        }
        if let Some(field) = &self.field_of_study {
            parts.push(format!("in {field}"));
        } else if let Some(degree) = &self.degree {
            parts.push(degree.clone());
        }
        if let Some(year) = &self.graduation_year {
            parts.push(format!("({year})"));
        }
        parts.join(" ")
    }
}

/// A certification is either a bare string or a structured entry.
/// `untagged` keeps the wire shape identical to the source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Certification {
    Plain(String),
    Detailed {
        name: Option<String>,
        issuer: Option<String>,
        date: Option<String>,
    },
}

impl Certification {
    /// Single-line rendering: "{name} - {issuer} ({date})", with absent
    /// sub-fields omitted and no dangling separators.
    pub fn display_line(&self) -> String {
        match self {
            Certification::Plain(text) => text.clone(),
            Certification::Detailed { name, issuer, date } => {
                let mut line = String::new();
                if let Some(name) = name {
                    line.push_str(name);
                }
                if let Some(issuer) = issuer {
                    if !line.is_empty() {
                        line.push_str(" - ");
                    }
                    line.push_str(issuer);
                }
                if let Some(date) = date {
                    if !line.is_empty() {
                        line.push(' ');
                    }
                    line.push('(');
                    line.push_str(date);
                    line.push(')');
                }
                line
            }
        }
    }
}
