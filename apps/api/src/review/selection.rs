//! Comparison Set: record ids marked for side-by-side comparison.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::{Evaluation, ResumeRecord, Verdict};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSet {
    ids: BTreeSet<String>,
}

impl ComparisonSet {
    /// New set with `id` flipped: added when absent, removed when present.
    pub fn toggled(&self, id: &str) -> Self {
        let mut ids = self.ids.clone();
        if !ids.remove(id) {
            ids.insert(id.to_string());
        }
        Self { ids }
    }

    pub fn cleared(&self) -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Members that exist in `records` and carry a report, in store order.
    /// Unscored members are dropped silently.
    pub fn comparable<'a>(&self, records: &'a [ResumeRecord]) -> Vec<&'a ResumeRecord> {
        records
            .iter()
            .filter(|r| self.ids.contains(&r.id) && r.evaluation.is_scored())
            .collect()
    }

    /// Whether the comparison view has anything to render.
    pub fn is_visible(&self, records: &[ResumeRecord]) -> bool {
        !self.comparable(records).is_empty()
    }
}

/// One column of the comparison view.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub id: String,
    pub display_name: String,
    pub candidate_name: String,
    pub overall_score: f64,
    pub verdict: Verdict,
    pub technical_average: f64,
    pub soft_average: f64,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

pub fn comparison_rows(set: &ComparisonSet, records: &[ResumeRecord]) -> Vec<ComparisonRow> {
    set.comparable(records)
        .into_iter()
        .filter_map(|record| match &record.evaluation {
            Evaluation::Scored(report) => Some(ComparisonRow {
                id: record.id.clone(),
                display_name: record.display_name.clone(),
                candidate_name: report.candidate_name.clone(),
                overall_score: report.overall_score,
                verdict: report.verdict.clone(),
                technical_average: report.technical_average(),
                soft_average: report.soft_average(),
                strengths: report.strengths.clone(),
                improvements: report.improvements.clone(),
            }),
            Evaluation::Unscored => None,
        })
        .collect()
}
