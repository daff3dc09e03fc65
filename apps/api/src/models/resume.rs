//! The structured résumé schema produced by the derivation pipeline.
//!
//! Every list field deserializes to an empty `Vec` when absent so display code
//! can index sections unconditionally. Entry types are strict: a payload with
//! unknown or missing required fields is rejected rather than half-accepted.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Contact details. Each field is independently nullable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    /// Professional-network profile URL.
    pub linkedin: Option<String>,
    /// Personal site URL.
    pub website: Option<String>,
}

impl ContactInfo {
    /// True when no field carries a non-blank value.
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.email,
            &self.phone,
            &self.location,
            &self.linkedin,
            &self.website,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, |v| v.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Skills {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
    pub domain: Vec<String>,
}

impl Skills {
    pub fn is_empty(&self) -> bool {
        self.technical.is_empty() && self.soft.is_empty() && self.domain.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    pub start_date: String,
    /// `None` while the position is current.
    pub end_date: Option<String>,
    pub current: bool,
    pub description: String,
    pub responsibilities: Vec<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub current: bool,
    /// Models report GPA as either `"3.8"` or `3.8`; both land here as text.
    #[serde(default, deserialize_with = "optional_text_or_number")]
    pub gpa: Option<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    /// Date obtained.
    pub date: String,
    pub expires: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Language {
    pub language: String,
    pub proficiency: String,
}

/// The canonical résumé record. Always fully constructed before it leaves the
/// deriver; sections that could not be derived hold reference data instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StructuredResume {
    pub contact_info: ContactInfo,
    pub skills: Skills,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
    pub languages: Vec<Language>,
}

impl StructuredResume {
    /// True when there are no contact keys and every list is empty.
    pub fn is_empty(&self) -> bool {
        self.contact_info.is_empty()
            && self.skills.is_empty()
            && self.work_experience.is_empty()
            && self.education.is_empty()
            && self.projects.is_empty()
            && self.certifications.is_empty()
            && self.languages.is_empty()
    }
}

/// Names one schema section. Used to report which sections were defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeSection {
    ContactInfo,
    Skills,
    WorkExperience,
    Education,
    Projects,
    Certifications,
    Languages,
}

impl ResumeSection {
    pub const ALL: [ResumeSection; 7] = [
        ResumeSection::ContactInfo,
        ResumeSection::Skills,
        ResumeSection::WorkExperience,
        ResumeSection::Education,
        ResumeSection::Projects,
        ResumeSection::Certifications,
        ResumeSection::Languages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeSection::ContactInfo => "contact_info",
            ResumeSection::Skills => "skills",
            ResumeSection::WorkExperience => "work_experience",
            ResumeSection::Education => "education",
            ResumeSection::Projects => "projects",
            ResumeSection::Certifications => "certifications",
            ResumeSection::Languages => "languages",
        }
    }
}

impl fmt::Display for ResumeSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn optional_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Number(number) => number.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_resume() -> StructuredResume {
        StructuredResume {
            contact_info: ContactInfo {
                name: Some("Ada Park".to_string()),
                email: Some("ada@example.org".to_string()),
                ..Default::default()
            },
            skills: Skills {
                technical: vec!["Rust".to_string(), "SQL".to_string()],
                soft: vec!["Mentoring".to_string()],
                domain: vec![],
            },
            work_experience: vec![WorkExperience {
                company: "Northwind".to_string(),
                position: "Platform Engineer".to_string(),
                start_date: "2021-04".to_string(),
                end_date: None,
                current: true,
                description: "Runs the ingestion platform".to_string(),
                responsibilities: vec!["On-call rotation".to_string()],
                achievements: vec![],
            }],
            education: vec![Education {
                institution: "State University".to_string(),
                degree: "BSc".to_string(),
                field_of_study: "Mathematics".to_string(),
                start_date: "2015-09".to_string(),
                end_date: Some("2019-06".to_string()),
                current: false,
                gpa: Some("3.6".to_string()),
                achievements: vec![],
            }],
            projects: vec![Project {
                name: "tidepool".to_string(),
                description: "Log shipper".to_string(),
                technologies: vec!["Rust".to_string()],
                url: None,
                start_date: None,
                end_date: None,
            }],
            certifications: vec![],
            languages: vec![Language {
                language: "Korean".to_string(),
                proficiency: "Native".to_string(),
            }],
        }
    }

    #[test]
    fn test_resume_serializes_and_parses_back_to_equal_value() {
        let resume = sample_resume();
        let json = serde_json::to_string(&resume).unwrap();
        let parsed: StructuredResume = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, resume);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let parsed: StructuredResume =
            serde_json::from_str(r#"{"contact_info": {"name": "Ada"}}"#).unwrap();
        assert!(parsed.work_experience.is_empty());
        assert!(parsed.languages.is_empty());
        assert!(parsed.skills.is_empty());
    }

    #[test]
    fn test_contact_with_only_blank_fields_is_empty() {
        let contact = ContactInfo {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(contact.is_empty());
        assert!(StructuredResume::default().is_empty());
    }

    #[test]
    fn test_contact_rejects_unknown_fields() {
        let result = serde_json::from_str::<ContactInfo>(
            r#"{"message": "Generated using fallback", "timestamp": "2024-01-01"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_work_entry_missing_required_field_is_rejected() {
        let result = serde_json::from_str::<WorkExperience>(
            r#"{"company": "Northwind", "position": "Engineer"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_numeric_gpa_is_accepted_as_text() {
        let json = r#"{
            "institution": "State University",
            "degree": "BSc",
            "field_of_study": "Physics",
            "start_date": "2010-09",
            "end_date": "2014-06",
            "current": false,
            "gpa": 3.9,
            "achievements": []
        }"#;
        let entry: Education = serde_json::from_str(json).unwrap();
        assert_eq!(entry.gpa.as_deref(), Some("3.9"));
    }

    #[test]
    fn test_section_names_match_schema_keys() {
        let value = serde_json::to_value(StructuredResume::default()).unwrap();
        for section in ResumeSection::ALL {
            assert!(value.get(section.as_str()).is_some(), "{section}");
        }
    }
}
