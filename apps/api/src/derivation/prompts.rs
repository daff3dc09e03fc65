// Derivation prompt templates, one per schema section.
// Replace `{resume_text}` before sending. The first line of each template is
// the instruction; the offline sample backend keys off its wording.

use crate::models::resume::ResumeSection;

/// Contact details sit at the top of a résumé; only this many characters are sent.
pub const CONTACT_SLICE_CHARS: usize = 2000;

pub const CONTACT_PROMPT_TEMPLATE: &str = r#"Extract the following contact information from this resume text.
Return a JSON object with EXACTLY these fields (no extra fields):
{
  "name": "string" | null,
  "email": "string" | null,
  "phone": "string" | null,
  "location": "string" | null,
  "linkedin": "string" | null,
  "website": "string" | null
}
If a field is not found, set it to null.

RESUME TEXT:
{resume_text}"#;

pub const SKILLS_PROMPT_TEMPLATE: &str = r#"Extract and categorize skills from this resume text.
Return a JSON object with EXACTLY these three arrays (no extra fields):
{
  "technical": ["string"],
  "soft": ["string"],
  "domain": ["string"]
}
- technical: programming languages, tools, frameworks
- soft: communication, leadership and other interpersonal skills
- domain: industry knowledge and specialized expertise
A skill belongs to exactly one category.

RESUME TEXT:
{resume_text}"#;

pub const WORK_EXPERIENCE_PROMPT_TEMPLATE: &str = r#"Extract work experience entries from this resume text.
Return a JSON array where each object has EXACTLY these fields:
[
  {
    "company": "string",
    "position": "string",
    "start_date": "YYYY-MM",
    "end_date": "YYYY-MM" | null,
    "current": true | false,
    "description": "string",
    "responsibilities": ["string"],
    "achievements": ["string"]
  }
]
Use null for end_date and true for current when this is the current position.
Return [] if there is no work experience.

RESUME TEXT:
{resume_text}"#;

pub const EDUCATION_PROMPT_TEMPLATE: &str = r#"Extract education entries from this resume text.
Return a JSON array where each object has EXACTLY these fields:
[
  {
    "institution": "string",
    "degree": "string",
    "field_of_study": "string",
    "start_date": "YYYY-MM",
    "end_date": "YYYY-MM" | null,
    "current": true | false,
    "gpa": "string" | null,
    "achievements": ["string"]
  }
]
Use null for end_date and true for current when still studying.
Return [] if there is no education.

RESUME TEXT:
{resume_text}"#;

pub const PROJECTS_PROMPT_TEMPLATE: &str = r#"Extract project entries from this resume text.
Return a JSON array where each object has EXACTLY these fields:
[
  {
    "name": "string",
    "description": "string",
    "technologies": ["string"],
    "url": "string" | null,
    "start_date": "YYYY-MM" | null,
    "end_date": "YYYY-MM" | null
  }
]
Return [] if there are no projects.

RESUME TEXT:
{resume_text}"#;

pub const CERTIFICATIONS_PROMPT_TEMPLATE: &str = r#"Extract certification entries from this resume text.
Return a JSON array where each object has EXACTLY these fields:
[
  {
    "name": "string",
    "issuer": "string",
    "date": "YYYY-MM",
    "expires": "YYYY-MM" | null,
    "url": "string" | null
  }
]
Return [] if there are no certifications.

RESUME TEXT:
{resume_text}"#;

pub const LANGUAGES_PROMPT_TEMPLATE: &str = r#"Extract language proficiency entries from this resume text.
Return a JSON array where each object has EXACTLY these fields:
[
  {
    "language": "string",
    "proficiency": "Native" | "Fluent" | "Intermediate" | "Basic"
  }
]
Return [] if no spoken languages are listed.

RESUME TEXT:
{resume_text}"#;

fn template(section: ResumeSection) -> &'static str {
    match section {
        ResumeSection::ContactInfo => CONTACT_PROMPT_TEMPLATE,
        ResumeSection::Skills => SKILLS_PROMPT_TEMPLATE,
        ResumeSection::WorkExperience => WORK_EXPERIENCE_PROMPT_TEMPLATE,
        ResumeSection::Education => EDUCATION_PROMPT_TEMPLATE,
        ResumeSection::Projects => PROJECTS_PROMPT_TEMPLATE,
        ResumeSection::Certifications => CERTIFICATIONS_PROMPT_TEMPLATE,
        ResumeSection::Languages => LANGUAGES_PROMPT_TEMPLATE,
    }
}

/// Output token budget per section.
pub fn max_output_tokens(section: ResumeSection) -> u32 {
    match section {
        ResumeSection::ContactInfo | ResumeSection::Languages => 500,
        ResumeSection::Skills | ResumeSection::Education | ResumeSection::Certifications => 1000,
        ResumeSection::Projects => 1500,
        ResumeSection::WorkExperience => 2000,
    }
}

/// Builds the prompt for one section. Contact receives only the leading slice
/// of the text; every other section receives all of it.
pub fn section_prompt(section: ResumeSection, resume_text: &str) -> String {
    let text = match section {
        ResumeSection::ContactInfo => leading_chars(resume_text, CONTACT_SLICE_CHARS),
        _ => resume_text,
    };
    template(section).replace("{resume_text}", text)
}

fn leading_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}
