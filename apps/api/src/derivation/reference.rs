//! Reference Default Resume: the fixed sample record substituted whenever a
//! section (or the whole record) cannot be derived from the caller's text.

use once_cell::sync::Lazy;

use crate::models::resume::{
    Certification, ContactInfo, Education, Language, Project, Skills, StructuredResume,
    WorkExperience,
};

static REFERENCE_RESUME: Lazy<StructuredResume> = Lazy::new(build_reference_resume);

/// Returns the shared reference record. Callers clone the sections they need.
pub fn reference_resume() -> &'static StructuredResume {
    &REFERENCE_RESUME
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn build_reference_resume() -> StructuredResume {
    StructuredResume {
        contact_info: ContactInfo {
            name: Some("John Doe".to_string()),
            email: Some("john.doe@example.com".to_string()),
            phone: Some("+1 (555) 123-4567".to_string()),
            location: Some("San Francisco, CA".to_string()),
            linkedin: Some("https://linkedin.com/in/johndoe".to_string()),
            website: Some("https://johndoe.com".to_string()),
        },
        skills: Skills {
            technical: strings(&[
                "JavaScript",
                "TypeScript",
                "React",
                "Next.js",
                "Node.js",
                "Python",
                "SQL",
                "Git",
            ]),
            soft: strings(&[
                "Communication",
                "Leadership",
                "Problem Solving",
                "Teamwork",
                "Time Management",
            ]),
            domain: strings(&[
                "Web Development",
                "UI/UX Design",
                "Data Analysis",
                "Project Management",
            ]),
        },
        work_experience: vec![
            WorkExperience {
                company: "Tech Solutions Inc.".to_string(),
                position: "Senior Frontend Developer".to_string(),
                start_date: "2020-01".to_string(),
                end_date: None,
                current: true,
                description: "Leading frontend development for enterprise applications"
                    .to_string(),
                responsibilities: strings(&[
                    "Develop and maintain frontend applications using React and TypeScript",
                    "Collaborate with UX designers to implement responsive designs",
                    "Mentor junior developers and conduct code reviews",
                ]),
                achievements: strings(&[
                    "Reduced page load time by 40% through code optimization",
                    "Implemented CI/CD pipeline that reduced deployment time by 60%",
                    "Led the migration from Angular to React, improving developer productivity",
                ]),
            },
            WorkExperience {
                company: "Digital Innovations LLC".to_string(),
                position: "Frontend Developer".to_string(),
                start_date: "2017-03".to_string(),
                end_date: Some("2019-12".to_string()),
                current: false,
                description: "Worked on various web applications for clients".to_string(),
                responsibilities: strings(&[
                    "Developed responsive web applications using React",
                    "Implemented RESTful API integrations",
                    "Participated in agile development processes",
                ]),
                achievements: strings(&[
                    "Delivered 15+ projects on time and within budget",
                    "Received client satisfaction rating of 4.8/5",
                    "Implemented automated testing that caught 95% of bugs before production",
                ]),
            },
        ],
        education: vec![Education {
            institution: "University of California, Berkeley".to_string(),
            degree: "Bachelor of Science".to_string(),
            field_of_study: "Computer Science".to_string(),
            start_date: "2013-09".to_string(),
            end_date: Some("2017-05".to_string()),
            current: false,
            gpa: Some("3.8".to_string()),
            achievements: strings(&[
                "Dean's List: 2014-2017",
                "Senior Thesis: 'Optimizing React Performance in Large Applications'",
                "Teaching Assistant for Introduction to Programming",
            ]),
        }],
        projects: vec![
            Project {
                name: "E-commerce Platform".to_string(),
                description: "A full-stack e-commerce platform with payment processing and inventory management".to_string(),
                technologies: strings(&["React", "Node.js", "Express", "MongoDB", "Stripe API"]),
                url: Some("https://github.com/johndoe/ecommerce-platform".to_string()),
                start_date: Some("2019-06".to_string()),
                end_date: Some("2019-12".to_string()),
            },
            Project {
                name: "Task Management App".to_string(),
                description: "A productivity app for managing tasks and projects with team collaboration features".to_string(),
                technologies: strings(&["React Native", "Firebase", "Redux"]),
                url: Some("https://github.com/johndoe/task-manager".to_string()),
                start_date: Some("2018-03".to_string()),
                end_date: Some("2018-08".to_string()),
            },
        ],
        certifications: vec![
            Certification {
                name: "AWS Certified Developer - Associate".to_string(),
                issuer: "Amazon Web Services".to_string(),
                date: "2021-05".to_string(),
                expires: Some("2024-05".to_string()),
                url: Some("https://www.youracclaim.com/badges/aws-certified-developer".to_string()),
            },
            Certification {
                name: "Professional Scrum Master I".to_string(),
                issuer: "Scrum.org".to_string(),
                date: "2020-02".to_string(),
                expires: None,
                url: Some("https://www.scrum.org/certificates/psm-i".to_string()),
            },
        ],
        languages: vec![
            Language {
                language: "English".to_string(),
                proficiency: "Native".to_string(),
            },
            Language {
                language: "Spanish".to_string(),
                proficiency: "Intermediate".to_string(),
            },
            Language {
                language: "French".to_string(),
                proficiency: "Basic".to_string(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_resume_populates_every_section() {
        let resume = reference_resume();
        assert!(!resume.contact_info.is_empty());
        assert!(!resume.skills.is_empty());
        assert!(!resume.work_experience.is_empty());
        assert!(!resume.education.is_empty());
        assert!(!resume.projects.is_empty());
        assert!(!resume.certifications.is_empty());
        assert!(!resume.languages.is_empty());
    }

    #[test]
    fn test_current_positions_have_no_end_date() {
        for entry in &reference_resume().work_experience {
            assert_eq!(entry.current, entry.end_date.is_none(), "{}", entry.company);
        }
    }
}
