//! Structured Field Deriver: maps plain résumé text onto [`StructuredResume`].
//!
//! Flow: contact probe → six-section fan-out → per-section fallback →
//!       post-fill of essential sections → global fallback.
//!
//! The deriver never fails. Backend errors, completions without a JSON payload
//! and payloads that don't match the section schema all resolve to the
//! Reference Default Resume for that section, and [`DerivedResume`] records
//! which sections were substituted.

pub mod json_scan;
pub mod prompts;
pub mod reference;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::derivation::json_scan::{first_balanced, JsonShape};
use crate::derivation::prompts::{max_output_tokens, section_prompt};
use crate::derivation::reference::reference_resume;
use crate::llm_client::{BackendError, CompletionBackend};
use crate::models::resume::{
    Certification, ContactInfo, Education, Language, Project, ResumeSection, Skills,
    StructuredResume, WorkExperience,
};

/// Where the returned record's data came from. Kept outside the schema so
/// schema consumers never special-case it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Every section was derived from the input text.
    Extracted,
    /// At least one section holds reference data.
    PartiallyDefaulted,
    /// The whole record is the Reference Default Resume.
    ReferenceDefault,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedResume {
    pub resume: StructuredResume,
    pub source: DataSource,
    /// Sections holding reference data, in schema order.
    pub defaulted_sections: Vec<ResumeSection>,
}

impl DerivedResume {
    fn reference() -> Self {
        Self {
            resume: reference_resume().clone(),
            source: DataSource::ReferenceDefault,
            defaulted_sections: ResumeSection::ALL.to_vec(),
        }
    }

    /// The advisory flag: true when any shown data is sample data.
    pub fn contains_sample_data(&self) -> bool {
        self.source != DataSource::Extracted
    }
}

#[derive(Debug, Error)]
enum SectionError {
    #[error("backend call failed: {0}")]
    Backend(#[from] BackendError),

    #[error("completion contained no JSON {0:?}")]
    NoPayload(JsonShape),

    #[error("payload does not match the section schema: {0}")]
    Schema(#[from] serde_json::Error),
}

fn expected_shape(section: ResumeSection) -> JsonShape {
    match section {
        ResumeSection::ContactInfo | ResumeSection::Skills => JsonShape::Object,
        _ => JsonShape::Array,
    }
}

/// Issues one section request and parses its payload strictly.
async fn request_section<T: DeserializeOwned>(
    backend: &dyn CompletionBackend,
    section: ResumeSection,
    resume_text: &str,
) -> Result<T, SectionError> {
    let prompt = section_prompt(section, resume_text);
    let completion = backend
        .complete(&prompt, max_output_tokens(section))
        .await?;

    let shape = expected_shape(section);
    let payload = first_balanced(&completion, shape).ok_or(SectionError::NoPayload(shape))?;
    Ok(serde_json::from_str(payload)?)
}

/// Defaulted sections, deduplicated.
#[derive(Default)]
struct DefaultLedger(Vec<ResumeSection>);

impl DefaultLedger {
    fn mark(&mut self, section: ResumeSection) {
        if !self.0.contains(&section) {
            self.0.push(section);
        }
    }

    /// Unwraps a section outcome, substituting `fallback` on failure.
    fn settle<T: Clone>(
        &mut self,
        section: ResumeSection,
        outcome: Result<T, SectionError>,
        fallback: &T,
    ) -> T {
        match outcome {
            Ok(value) => value,
            Err(e) => {
                warn!("Section {section} fell back to reference data: {e}");
                self.mark(section);
                fallback.clone()
            }
        }
    }

    fn into_sorted(mut self) -> Vec<ResumeSection> {
        self.0.sort_by_key(|s| ResumeSection::ALL.iter().position(|a| a == s));
        self.0
    }
}

/// Derives a structured résumé from plain text. Always returns a fully
/// populated record.
pub async fn derive_resume(resume_text: &str, backend: &dyn CompletionBackend) -> DerivedResume {
    if resume_text.trim().is_empty() {
        warn!("No resume text to derive from, returning reference resume");
        return DerivedResume::reference();
    }

    // Contact doubles as the backend probe.
    let contact_info =
        match request_section::<ContactInfo>(backend, ResumeSection::ContactInfo, resume_text)
            .await
        {
            Ok(contact) if !contact.is_empty() => contact,
            Ok(_) => {
                warn!("Contact probe returned no fields, returning reference resume");
                return DerivedResume::reference();
            }
            Err(e) => {
                warn!("Contact probe failed ({e}), returning reference resume");
                return DerivedResume::reference();
            }
        };

    let (skills, work_experience, education, projects, certifications, languages) = tokio::join!(
        request_section::<Skills>(backend, ResumeSection::Skills, resume_text),
        request_section::<Vec<WorkExperience>>(
            backend,
            ResumeSection::WorkExperience,
            resume_text
        ),
        request_section::<Vec<Education>>(backend, ResumeSection::Education, resume_text),
        request_section::<Vec<Project>>(backend, ResumeSection::Projects, resume_text),
        request_section::<Vec<Certification>>(
            backend,
            ResumeSection::Certifications,
            resume_text
        ),
        request_section::<Vec<Language>>(backend, ResumeSection::Languages, resume_text),
    );

    let reference = reference_resume();
    let mut ledger = DefaultLedger::default();

    let mut resume = StructuredResume {
        contact_info,
        skills: ledger.settle(ResumeSection::Skills, skills, &reference.skills),
        work_experience: ledger.settle(
            ResumeSection::WorkExperience,
            work_experience,
            &reference.work_experience,
        ),
        education: ledger.settle(ResumeSection::Education, education, &reference.education),
        projects: ledger.settle(ResumeSection::Projects, projects, &reference.projects),
        certifications: ledger.settle(
            ResumeSection::Certifications,
            certifications,
            &reference.certifications,
        ),
        languages: ledger.settle(ResumeSection::Languages, languages, &reference.languages),
    };

    // Essential sections must never come back empty.
    if resume.skills.is_empty() {
        warn!("Skills section is empty, using reference skills");
        resume.skills = reference.skills.clone();
        ledger.mark(ResumeSection::Skills);
    }
    if resume.work_experience.is_empty() {
        warn!("Work experience section is empty, using reference work experience");
        resume.work_experience = reference.work_experience.clone();
        ledger.mark(ResumeSection::WorkExperience);
    }
    if resume.education.is_empty() {
        warn!("Education section is empty, using reference education");
        resume.education = reference.education.clone();
        ledger.mark(ResumeSection::Education);
    }

    if resume.is_empty() {
        warn!("Nothing was derived from the resume, returning reference resume");
        return DerivedResume::reference();
    }

    let defaulted_sections = ledger.into_sorted();
    let source = if defaulted_sections.is_empty() {
        DataSource::Extracted
    } else {
        DataSource::PartiallyDefaulted
    };

    info!(
        "Resume derived via {} backend: {} work entries, {} education entries, {} sections defaulted",
        backend.name(),
        resume.work_experience.len(),
        resume.education.len(),
        defaulted_sections.len()
    );

    DerivedResume {
        resume,
        source,
        defaulted_sections,
    }
}
