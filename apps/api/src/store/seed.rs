//! Mock data: the seeded resume list and the report template every
//! simulated evaluation is derived from.

use rand::Rng;

use crate::models::{EvaluationReport, ResumeRecord, SkillScore, Verdict};

/// Template evaluation, overridden per candidate by name and score.
pub fn template_report(candidate_name: &str, overall_score: f64) -> EvaluationReport {
    EvaluationReport {
        candidate_name: candidate_name.to_string(),
        contact_email: "priyasharma@email.com".to_string(),
        linkedin_url: "https://linkedin.com/in/priyasharma".to_string(),
        github_handle: crate::models::report::GITHUB_NOT_AVAILABLE.to_string(),
        summary: "Motivated Product Owner with over 4 years of experience supporting agile \
                  software teams in delivering B2B solutions. Skilled in backlog management, \
                  cross-functional collaboration, and facilitating sprint meetings."
            .to_string(),
        verdict: Verdict::StrongCandidate,
        verdict_rationale: "Demonstrates relevant experience and skills, aligning well with \
                            the job role as a Product Owner."
            .to_string(),
        overall_score,
        overall_assessment: "Good fit for the role with strengths in Agile methodologies and \
                             stakeholder communication."
            .to_string(),
        strengths: vec![
            "Proficient in Agile Practices".to_string(),
            "Strong communication skills".to_string(),
        ],
        improvements: vec!["Could benefit from advanced certifications".to_string()],
        technical_skills: vec![
            SkillScore::new("Agile Methodology", 8.0, 10.0, "Extensive use of Jira"),
            SkillScore::new("Stakeholder Management", 7.0, 8.0, "Regular interactions"),
        ],
        soft_skills: vec![SkillScore::new("Communication", 9.0, 10.0, "Handled presentations")],
        notes: vec!["The resume aligns with the job title.".to_string()],
        final_evaluation: "Move forward with further interviews.".to_string(),
    }
}

/// Seeded resume list. Index 0 is the showcase candidate; every third
/// record arrives pre-scored.
pub fn seed_records<R: Rng>(count: usize, rng: &mut R) -> Vec<ResumeRecord> {
    (0..count)
        .map(|i| {
            let id = (i + 1).to_string();
            let day = i / 5 + 1;
            let hour = 10 + i % 8;
            let received_at = format!("2025-10-{day:02} {hour:02}:30:00");

            let (display_name, candidate_name, score) = if i == 0 {
                (
                    "Resume_Priya_Sharma.pdf".to_string(),
                    "Priya Sharma".to_string(),
                    83.4,
                )
            } else {
                (
                    format!("Resume_Candidate_{id}.pdf"),
                    format!("Candidate {id}"),
                    f64::from(rng.gen_range(65..95u32)),
                )
            };

            let record = ResumeRecord::unscored(id, display_name, received_at);
            if i % 3 == 0 {
                record.with_report(template_report(&candidate_name, score))
            } else {
                record
            }
        })
        .collect()
}

/// Record created by a completed upload.
pub fn uploaded_record(id: String, received_at: String) -> ResumeRecord {
    let display_name = format!("Newly_Added_Resume_{id}.pdf");
    ResumeRecord::unscored(id, display_name, received_at)
}

/// Report produced when a scoring run completes for `record`.
pub fn generated_report<R: Rng>(record: &ResumeRecord, rng: &mut R) -> EvaluationReport {
    let name = record.display_name.replace(".pdf", "");
    template_report(&name, f64::from(rng.gen_range(75..95u32)))
}
