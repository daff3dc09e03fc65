//! Offline completion backend.
//!
//! Used when no API key is configured so the upload flow still runs end to end.
//! It reads the instruction line of the prompt and answers with a fixed payload
//! of the matching section's shape. Results are sample data, never derived
//! from the résumé text.

use async_trait::async_trait;

use crate::llm_client::{BackendError, CompletionBackend};

const SAMPLE_CONTACT: &str = r#"{"name": "John Doe", "email": "john.doe@example.com", "phone": "123-456-7890", "location": "New York, NY", "linkedin": "linkedin.com/in/johndoe", "website": null}"#;

const SAMPLE_SKILLS: &str = r#"{"technical": ["JavaScript", "Python", "React", "Node.js"], "soft": ["Communication", "Leadership", "Problem Solving"], "domain": ["Web Development", "Data Analysis"]}"#;

const SAMPLE_WORK_EXPERIENCE: &str = r#"[{"company": "Example Corp", "position": "Senior Developer", "start_date": "2020-01", "end_date": null, "current": true, "description": "Leading development team for web applications", "responsibilities": ["Code review", "Architecture design", "Mentoring"], "achievements": ["Reduced load time by 40%", "Implemented CI/CD pipeline"]}]"#;

const SAMPLE_EDUCATION: &str = r#"[{"institution": "University of Example", "degree": "Bachelor's", "field_of_study": "Computer Science", "start_date": "2014-09", "end_date": "2018-05", "current": false, "gpa": "3.8", "achievements": ["Dean's List", "Graduated with Honors"]}]"#;

const SAMPLE_PROJECTS: &str = r#"[{"name": "Portfolio Website", "description": "Personal portfolio showcasing projects and skills", "technologies": ["React", "Tailwind CSS", "Next.js"], "url": "https://example.com", "start_date": "2022-03", "end_date": "2022-04"}]"#;

const SAMPLE_CERTIFICATIONS: &str = r#"[{"name": "AWS Certified Developer", "issuer": "Amazon Web Services", "date": "2021-06", "expires": "2024-06", "url": "https://aws.amazon.com/certification/"}]"#;

const SAMPLE_LANGUAGES: &str = r#"[{"language": "English", "proficiency": "Native"}, {"language": "Spanish", "proficiency": "Intermediate"}]"#;

/// Answer for an instruction that names no known section; matches no section schema.
const SAMPLE_UNRECOGNISED: &str = r#"{"message": "Extracted data using fallback method"}"#;

/// Checked in order against the lowercased instruction line.
const SAMPLE_ROUTES: &[(&str, &str)] = &[
    ("contact information", SAMPLE_CONTACT),
    ("skills", SAMPLE_SKILLS),
    ("work experience", SAMPLE_WORK_EXPERIENCE),
    ("education", SAMPLE_EDUCATION),
    ("project", SAMPLE_PROJECTS),
    ("certification", SAMPLE_CERTIFICATIONS),
    ("language", SAMPLE_LANGUAGES),
];

pub struct SampleCompletionBackend;

#[async_trait]
impl CompletionBackend for SampleCompletionBackend {
    fn name(&self) -> &'static str {
        "sample"
    }

    fn produces_sample_data(&self) -> bool {
        true
    }

    async fn complete(
        &self,
        prompt: &str,
        _max_output_tokens: u32,
    ) -> Result<String, BackendError> {
        Ok(sample_payload(prompt).to_string())
    }
}

fn sample_payload(prompt: &str) -> &'static str {
    let instruction = prompt
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_lowercase();

    SAMPLE_ROUTES
        .iter()
        .find(|(keyword, _)| instruction.contains(keyword))
        .map(|(_, payload)| *payload)
        .unwrap_or(SAMPLE_UNRECOGNISED)
}
