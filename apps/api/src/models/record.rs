use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::report::EvaluationReport;

/// Format used for timestamps the service itself writes.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Scoring state of a record. Consumers must handle both arms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "report", rename_all = "snake_case")]
pub enum Evaluation {
    Unscored,
    Scored(Arc<EvaluationReport>),
}

impl Evaluation {
    pub fn report(&self) -> Option<&EvaluationReport> {
        match self {
            Evaluation::Unscored => None,
            Evaluation::Scored(report) => Some(report),
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, Evaluation::Scored(_))
    }
}

/// One resume submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub id: String,
    pub display_name: String,
    /// Raw arrival timestamp as received; parsed lazily for ordering.
    pub received_at: String,
    pub evaluation: Evaluation,
}

impl ResumeRecord {
    pub fn unscored(id: impl Into<String>, display_name: impl Into<String>, received_at: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            received_at: received_at.into(),
            evaluation: Evaluation::Unscored,
        }
    }

    pub fn with_report(mut self, report: EvaluationReport) -> Self {
        self.evaluation = Evaluation::Scored(Arc::new(report));
        self
    }

    pub fn report(&self) -> Option<&EvaluationReport> {
        self.evaluation.report()
    }

    /// Overall score, 0 when unscored.
    pub fn score_or_zero(&self) -> f64 {
        self.report().map(|r| r.overall_score).unwrap_or(0.0)
    }

    /// Arrival instant; unparsable timestamps resolve to the Unix epoch.
    pub fn received_instant(&self) -> DateTime<Utc> {
        // Default for DateTime<Utc> is 1970-01-01T00:00:00Z.
        parse_timestamp(&self.received_at).unwrap_or_default()
    }
}

/// Accepts RFC 3339 and the naive `YYYY-MM-DD HH:MM:SS` form (read as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_naive_timestamp() {
        let ts = parse_timestamp("2025-10-03 12:30:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-10-03T12:30:00+00:00");
    }

    #[test]
    fn test_parse_rfc3339_timestamp() {
        let ts = parse_timestamp("2025-10-03T12:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-10-03T10:30:00+00:00");
    }

    #[test]
    fn test_unparsable_timestamp_falls_back_to_epoch() {
        let record = ResumeRecord::unscored("1", "a.pdf", "yesterday-ish");
        assert_eq!(record.received_instant().timestamp(), 0);
    }

    #[test]
    fn test_unscored_serializes_with_status_tag() {
        let record = ResumeRecord::unscored("9", "Resume_9.pdf", "2025-10-01 10:30:00");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["evaluation"]["status"], "unscored");
        assert_eq!(record.score_or_zero(), 0.0);
    }
}
