use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel the evaluator writes when a candidate has no GitHub profile.
pub const GITHUB_NOT_AVAILABLE: &str = "Not Available";

/// Categorical recommendation attached to a report.
///
/// The evaluator may emit any label; the three known ones are what the
/// verdict filter offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    StrongCandidate,
    Recommended,
    NeedsReview,
    Other(String),
}

impl Verdict {
    /// Labels offered by the verdict whitelist filter.
    pub const FILTERABLE: [Verdict; 3] = [
        Verdict::StrongCandidate,
        Verdict::Recommended,
        Verdict::NeedsReview,
    ];

    pub fn label(&self) -> &str {
        match self {
            Verdict::StrongCandidate => "Strong Candidate",
            Verdict::Recommended => "Recommended",
            Verdict::NeedsReview => "Needs Review",
            Verdict::Other(label) => label,
        }
    }
}

impl From<String> for Verdict {
    fn from(label: String) -> Self {
        match label.trim() {
            "Strong Candidate" => Verdict::StrongCandidate,
            "Recommended" => Verdict::Recommended,
            "Needs Review" => Verdict::NeedsReview,
            _ => Verdict::Other(label),
        }
    }
}

impl From<&str> for Verdict {
    fn from(label: &str) -> Self {
        Verdict::from(label.to_string())
    }
}

impl From<Verdict> for String {
    fn from(verdict: Verdict) -> Self {
        verdict.label().to_string()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display band for a score, used to colour bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    /// Band for a percentage: ≥80 high, ≥60 medium, else low.
    pub fn for_percentage(pct: f64) -> Self {
        if pct >= 80.0 {
            ScoreBand::High
        } else if pct >= 60.0 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }

    /// Band used by the candidate list: anything above 80 is high, the rest medium.
    pub fn for_overall(score: f64) -> Self {
        if score > 80.0 {
            ScoreBand::High
        } else {
            ScoreBand::Medium
        }
    }
}

/// One scored skill. `score` is bounded by its own `max`, scales differ per skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub name: String,
    pub score: f64,
    pub max: f64,
    pub note: String,
}

impl SkillScore {
    pub fn new(name: &str, score: f64, max: f64, note: &str) -> Self {
        Self {
            name: name.to_string(),
            score,
            max,
            note: note.to_string(),
        }
    }

    /// Score as a percentage of its own scale. Zero when `max` is not positive.
    pub fn percentage(&self) -> f64 {
        if self.max > 0.0 {
            self.score / self.max * 100.0
        } else {
            0.0
        }
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_percentage(self.percentage())
    }
}

/// Mean of raw skill scores; an empty list averages to 0.
pub fn average_score(skills: &[SkillScore]) -> f64 {
    if skills.is_empty() {
        return 0.0;
    }
    skills.iter().map(|s| s.score).sum::<f64>() / skills.len() as f64
}

/// AI-generated assessment of a candidate against the job's criteria.
/// Immutable once attached to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub candidate_name: String,
    pub contact_email: String,
    pub linkedin_url: String,
    pub github_handle: String,
    pub summary: String,
    pub verdict: Verdict,
    pub verdict_rationale: String,
    /// Nominally 0–100, not enforced.
    pub overall_score: f64,
    pub overall_assessment: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub technical_skills: Vec<SkillScore>,
    pub soft_skills: Vec<SkillScore>,
    pub notes: Vec<String>,
    pub final_evaluation: String,
}

impl EvaluationReport {
    pub fn has_github(&self) -> bool {
        let handle = self.github_handle.trim();
        !handle.is_empty() && handle != GITHUB_NOT_AVAILABLE
    }

    pub fn technical_average(&self) -> f64 {
        average_score(&self.technical_skills)
    }

    pub fn soft_average(&self) -> f64 {
        average_score(&self.soft_skills)
    }

    /// `w * avg(technical) + (100 - w) * avg(soft)`, with `w` clamped to 0–100.
    pub fn weighted_composite(&self, technical_weight: u8) -> f64 {
        let w = f64::from(technical_weight.min(100));
        w * self.technical_average() + (100.0 - w) * self.soft_average()
    }
}
