//! Resume normalizer — maps the extracted mapping onto the canonical
//! `ResumeDocument`, tolerating both known schema generations.
//!
//! Two field-naming conventions exist in the wild: the original flat one
//! (`name`, `phone`, `summary`, `experience`) and the nested one the prompt
//! now asks for (`personal_information.*`, `professional_summary`,
//! `professional_experience`). Each logical field is resolved through an
//! ordered list of sources, first present non-null wins, so schema evolution
//! stays confined to this file.
//!
//! Resolution degrades field-by-field: a nested group of the wrong shape is
//! treated as absent, never as a hard error. Only the aggregate gate at the
//! end fails the whole normalization.

use serde_yaml::{Mapping, Value};

use crate::resume::model::{
    Certification, DateRange, EducationEntry, ExperienceEntry, PersonalInfo, ResumeDocument,
};
use crate::resume::PipelineError;

/// Normalizes a parsed mapping into a `ResumeDocument`.
///
/// Fails with `NormalizationFailed` only when name, summary, and experience
/// are all absent — a parseable reply that is not resume-shaped.
pub fn normalize_resume(raw: &Mapping) -> Result<ResumeDocument, PipelineError> {
    let personal = submap(raw, "personal_information");

    let personal_info = PersonalInfo {
        name: personal
            .and_then(|p| text(p, "name"))
            .or_else(|| text(raw, "name")),
        surname: personal.and_then(|p| text(p, "surname")),
        phone: resolve_phone(raw, personal),
        email: personal
            .and_then(|p| text(p, "email"))
            .or_else(|| text(raw, "email")),
        linkedin: personal
            .and_then(|p| text(p, "linkedin"))
            .or_else(|| text(raw, "linkedin")),
    };

    let summary = text(raw, "professional_summary").or_else(|| text(raw, "summary"));

    // Read independently; the renderer decides how the two sections interact.
    let competencies = string_list(raw, "core_competencies");
    let skills = string_list(raw, "skills");

    let experience = seq(raw, "professional_experience")
        .or_else(|| seq(raw, "experience"))
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_mapping)
                .map(experience_entry)
                .collect::<Vec<_>>()
        });

    let education = seq(raw, "education")
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_mapping)
                .map(education_entry)
                .collect()
        })
        .unwrap_or_default();

    let certifications = seq(raw, "certifications")
        .map(|entries| entries.iter().filter_map(certification_entry).collect())
        .unwrap_or_default();

    // Aggregate gate: something parseable arrived, but nothing that defines
    // a resume. An experience key that is present but empty still counts as
    // present.
    if personal_info.name.is_none() && summary.is_none() && experience.is_none() {
        return Err(PipelineError::NormalizationFailed);
    }

    Ok(ResumeDocument {
        personal_info,
        summary,
        competencies,
        skills,
        experience: experience.unwrap_or_default(),
        education,
        certifications,
    })
}

/// Phone: the nested prefix+number pair concatenated with no separator, only
/// when BOTH are present under `personal_information`; otherwise the
/// top-level `phone`. A nested `phone` without its prefix is ignored,
/// matching the observed source behavior.
fn resolve_phone(raw: &Mapping, personal: Option<&Mapping>) -> Option<String> {
    if let Some(p) = personal {
        if let (Some(prefix), Some(number)) = (text(p, "phone_prefix"), text(p, "phone")) {
            return Some(format!("{prefix}{number}"));
        }
    }
    text(raw, "phone")
}

fn experience_entry(entry: &Mapping) -> ExperienceEntry {
    ExperienceEntry {
        title: text(entry, "title"),
        company: text(entry, "company"),
        date_range: resolve_dates(entry),
        bullets: string_list(entry, "description")
            .or_else(|| string_list(entry, "responsibilities"))
            .unwrap_or_default(),
    }
}

/// Start/end resolved per field: the nested `dates` object first, then the
/// corresponding segment of a single `duration` string split on its first
/// dash ("2019-2022" → "2019" / "2022").
fn resolve_dates(entry: &Mapping) -> DateRange {
    let dates = submap(entry, "dates");
    let duration = text(entry, "duration");
    let segment = |idx: usize| {
        duration
            .as_deref()
            .and_then(|d| d.splitn(2, '-').nth(idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    DateRange {
        start: dates.and_then(|d| text(d, "start")).or_else(|| segment(0)),
        end: dates.and_then(|d| text(d, "end")).or_else(|| segment(1)),
    }
}

fn education_entry(entry: &Mapping) -> EducationEntry {
    EducationEntry {
        institution: text(entry, "institution").or_else(|| text(entry, "university")),
        location: text(entry, "location"),
        level: text(entry, "education_level"),
        field_of_study: text(entry, "field_of_study"),
        degree: text(entry, "degree"),
        graduation_year: text(entry, "graduation_year"),
    }
}

fn certification_entry(value: &Value) -> Option<Certification> {
    match value {
        Value::Null => None,
        Value::Mapping(cert) => Some(Certification::Detailed {
            name: text(cert, "name"),
            issuer: text(cert, "issuer"),
            date: text(cert, "date"),
        }),
        other => lossless_text(other).map(Certification::Plain),
    }
}

// ── Field access helpers ────────────────────────────────────────────────────

/// Non-null lookup. Explicit nulls count as absent so they never shadow a
/// lower-priority source.
fn field<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn submap<'a>(map: &'a Mapping, key: &str) -> Option<&'a Mapping> {
    field(map, key).and_then(Value::as_mapping)
}

fn seq<'a>(map: &'a Mapping, key: &str) -> Option<&'a Vec<Value>> {
    field(map, key).and_then(Value::as_sequence)
}

fn text(map: &Mapping, key: &str) -> Option<String> {
    field(map, key).and_then(lossless_text)
}

fn string_list(map: &Mapping, key: &str) -> Option<Vec<String>> {
    seq(map, key).map(|items| items.iter().filter_map(lossless_text).collect())
}

/// Lossless textual fallback: strings pass through, numbers and booleans via
/// their display form, structured values via their JSON serialization. The
/// renderer never receives an unprintable value.
fn lossless_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => serde_json::to_string(other).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Builds a raw mapping from a `json!` literal; null fields behave
    /// exactly like absent ones, which keeps fixtures compact.
    fn raw(value: serde_json::Value) -> Mapping {
        let yaml: Value = serde_yaml::to_value(&value).unwrap();
        yaml.as_mapping().unwrap().clone()
    }

    /// Re-expresses a canonical document through the new-schema field names.
    /// The canonical phone is already prefix+number combined, so it travels
    /// via the top-level `phone` key.
    fn to_raw(doc: &ResumeDocument) -> Mapping {
        raw(json!({
            "personal_information": {
                "name": doc.personal_info.name,
                "surname": doc.personal_info.surname,
                "email": doc.personal_info.email,
                "linkedin": doc.personal_info.linkedin,
            },
            "phone": doc.personal_info.phone,
            "professional_summary": doc.summary,
            "core_competencies": doc.competencies,
            "skills": doc.skills,
            "professional_experience": doc.experience.iter().map(|e| json!({
                "title": e.title,
                "company": e.company,
                "dates": {"start": e.date_range.start, "end": e.date_range.end},
                "description": e.bullets,
            })).collect::<Vec<_>>(),
            "education": doc.education.iter().map(|e| json!({
                "institution": e.institution,
                "location": e.location,
                "education_level": e.level,
                "field_of_study": e.field_of_study,
                "degree": e.degree,
                "graduation_year": e.graduation_year,
            })).collect::<Vec<_>>(),
            "certifications": doc.certifications,
        }))
    }

    #[test]
    fn test_old_and_new_schema_produce_the_same_document() {
        let old = raw(json!({
            "name": "John Smith",
            "phone": "555-0100",
            "email": "john@example.com",
            "linkedin": "linkedin.com/in/johnsmith",
            "summary": "Backend engineer",
        }));
        let new = raw(json!({
            "personal_information": {
                "name": "John Smith",
                "phone_prefix": "555-",
                "phone": "0100",
                "email": "john@example.com",
                "linkedin": "linkedin.com/in/johnsmith",
            },
            "professional_summary": "Backend engineer",
        }));

        assert_eq!(normalize_resume(&old).unwrap(), normalize_resume(&new).unwrap());
    }

    #[test]
    fn test_nested_phone_without_prefix_falls_back_to_top_level() {
        let map = raw(json!({
            "personal_information": {"name": "Jane", "phone": "5551234"},
            "phone": "+1 555 0100",
        }));
        let doc = normalize_resume(&map).unwrap();
        assert_eq!(doc.personal_info.phone.as_deref(), Some("+1 555 0100"));
    }

    #[test]
    fn test_phone_prefix_concatenated_without_separator() {
        let map = raw(json!({
            "personal_information": {"name": "Jane", "phone_prefix": "+44", "phone": "7700900"},
        }));
        let doc = normalize_resume(&map).unwrap();
        assert_eq!(doc.personal_info.phone.as_deref(), Some("+447700900"));
    }

    #[test]
    fn test_malformed_personal_information_treated_as_absent() {
        let map = raw(json!({
            "personal_information": "not a mapping",
            "name": "Jane",
            "summary": "Engineer",
        }));
        let doc = normalize_resume(&map).unwrap();
        assert_eq!(doc.personal_info.name.as_deref(), Some("Jane"));
        assert_eq!(doc.personal_info.surname, None);
    }

    #[test]
    fn test_duration_split_on_first_dash() {
        let map = raw(json!({
            "name": "Jane",
            "experience": [{"title": "Engineer", "company": "Acme", "duration": "2019-2022"}],
        }));
        let doc = normalize_resume(&map).unwrap();
        assert_eq!(doc.experience[0].date_range.start.as_deref(), Some("2019"));
        assert_eq!(doc.experience[0].date_range.end.as_deref(), Some("2022"));
    }

    #[test]
    fn test_dates_object_wins_over_duration() {
        let map = raw(json!({
            "name": "Jane",
            "professional_experience": [{
                "title": "Engineer",
                "dates": {"start": "2020", "end": "Present"},
                "duration": "1999-2001",
            }],
        }));
        let doc = normalize_resume(&map).unwrap();
        assert_eq!(doc.experience[0].date_range.start.as_deref(), Some("2020"));
        assert_eq!(doc.experience[0].date_range.end.as_deref(), Some("Present"));
    }

    #[test]
    fn test_duration_without_dash_leaves_end_absent() {
        let map = raw(json!({
            "name": "Jane",
            "experience": [{"title": "Engineer", "duration": "2019"}],
        }));
        let doc = normalize_resume(&map).unwrap();
        assert_eq!(doc.experience[0].date_range.start.as_deref(), Some("2019"));
        assert_eq!(doc.experience[0].date_range.end, None);
    }

    #[test]
    fn test_bullets_prefer_description_then_responsibilities() {
        let map = raw(json!({
            "name": "Jane",
            "experience": [
                {"title": "A", "description": ["built it"], "responsibilities": ["ignored"]},
                {"title": "B", "responsibilities": ["ran it"]},
            ],
        }));
        let doc = normalize_resume(&map).unwrap();
        assert_eq!(doc.experience[0].bullets, vec!["built it"]);
        assert_eq!(doc.experience[1].bullets, vec!["ran it"]);
    }

    #[test]
    fn test_non_string_list_elements_use_lossless_fallback() {
        let map = raw(json!({
            "name": "Jane",
            "core_competencies": ["Leadership", 42, {"area": "Delivery"}],
        }));
        let doc = normalize_resume(&map).unwrap();
        assert_eq!(
            doc.competencies,
            Some(vec![
                "Leadership".to_string(),
                "42".to_string(),
                "{\"area\":\"Delivery\"}".to_string(),
            ])
        );
    }

    #[test]
    fn test_competencies_and_skills_are_independent() {
        let map = raw(json!({
            "name": "Jane",
            "skills": ["Rust", "SQL"],
        }));
        let doc = normalize_resume(&map).unwrap();
        assert_eq!(doc.competencies, None);
        assert_eq!(doc.skills, Some(vec!["Rust".to_string(), "SQL".to_string()]));
    }

    #[test]
    fn test_education_university_fallback_and_fields() {
        let map = raw(json!({
            "name": "Jane",
            "education": [{
                "university": "MIT",
                "location": "Cambridge",
                "education_level": "BSc",
                "field_of_study": "Computer Science",
                "graduation_year": 2018,
            }],
        }));
        let doc = normalize_resume(&map).unwrap();
        let edu = &doc.education[0];
        assert_eq!(edu.institution.as_deref(), Some("MIT"));
        assert_eq!(edu.graduation_year.as_deref(), Some("2018"));
        assert_eq!(edu.credential(), "BSc in Computer Science (2018)");
    }

    #[test]
    fn test_certifications_mixed_plain_and_detailed() {
        let map = raw(json!({
            "name": "Jane",
            "certifications": [
                "AWS Certified Developer",
                {"name": "PMP", "issuer": "PMI"},
            ],
        }));
        let doc = normalize_resume(&map).unwrap();
        assert_eq!(
            doc.certifications[0],
            Certification::Plain("AWS Certified Developer".to_string())
        );
        assert_eq!(doc.certifications[1].display_line(), "PMP - PMI");
    }

    #[test]
    fn test_gate_fails_when_name_summary_and_experience_all_absent() {
        let map = raw(json!({
            "skills": ["Rust"],
            "education": [{"institution": "MIT"}],
        }));
        assert_eq!(
            normalize_resume(&map).unwrap_err(),
            PipelineError::NormalizationFailed
        );
    }

    #[test]
    fn test_gate_passes_with_present_but_empty_experience() {
        let map = raw(json!({"experience": []}));
        let doc = normalize_resume(&map).unwrap();
        assert!(doc.experience.is_empty());
        assert_eq!(doc.personal_info.name, None);
    }

    #[test]
    fn test_normalization_is_idempotent_through_new_schema_round_trip() {
        let map = raw(json!({
            "personal_information": {
                "name": "Jane",
                "surname": "Doe",
                "phone_prefix": "+1",
                "phone": "5550100",
                "email": "jane@example.com",
                "linkedin": "linkedin.com/in/janedoe",
            },
            "professional_summary": "Engineer",
            "core_competencies": ["Leadership"],
            "skills": ["Rust"],
            "professional_experience": [{
                "title": "Engineer",
                "company": "Acme",
                "dates": {"start": "2019", "end": "Present"},
                "description": ["Built the platform"],
            }],
            "education": [{
                "institution": "MIT",
                "location": "Cambridge",
                "education_level": "BSc",
                "field_of_study": "Computer Science",
                "graduation_year": "2018",
            }],
            "certifications": ["PMP", {"name": "CSM", "issuer": "Scrum Alliance", "date": "2020"}],
        }));

        let first = normalize_resume(&map).unwrap();
        let second = normalize_resume(&to_raw(&first)).unwrap();
        assert_eq!(first, second);
    }
}
