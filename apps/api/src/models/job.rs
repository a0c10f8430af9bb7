use serde::Serialize;

/// The job posting candidates are evaluated against.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetails {
    pub title: String,
    pub location: String,
    pub post_date: String,
    pub university: String,
    pub start_date: String,
    pub duration: String,
    pub schedule: String,
    pub job_type: String,
    pub is_paid: String,
    pub stipend: String,
    pub apply_by: String,
}

/// One weighted dimension of the role's evaluation rubric.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringCriterion {
    pub label: String,
    pub weight_pct: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobPosting {
    pub details: JobDetails,
    pub criteria: Vec<ScoringCriterion>,
}

/// The single posting this service reviews.
pub fn current_posting() -> JobPosting {
    JobPosting {
        details: JobDetails {
            title: "Product Owner".to_string(),
            location: "H-141, H BLOCK, SECTOR -10 DLF, GURUGRAM".to_string(),
            post_date: "5 Feb 2026".to_string(),
            university: "New University".to_string(),
            start_date: "17 Jun 2025".to_string(),
            duration: "8hr".to_string(),
            schedule: "Full Time".to_string(),
            job_type: "Location".to_string(),
            is_paid: "Paid".to_string(),
            stipend: "$89.00 / Per Month".to_string(),
            apply_by: "27 Jun 2025".to_string(),
        },
        criteria: [
            ("Agile Methodology", 30),
            ("Roadmapping", 25),
            ("Communication", 20),
            ("Jira / Tools", 15),
            ("Experience", 10),
        ]
        .into_iter()
        .map(|(label, weight_pct)| ScoringCriterion {
            label: label.to_string(),
            weight_pct,
        })
        .collect(),
    }
}
