//! Filter Pipeline: order-preserving subset of records passing every predicate.

use crate::models::{Evaluation, ResumeRecord};
use crate::review::criteria::FilterCriteria;

/// Returns the records matching all of `criteria`, in input order.
///
/// Predicates (all must pass):
/// 1. display name contains the search term, case-insensitive
/// 2. id is in the AI match set, when that set is active
/// 3. score ≥ floor; unscored records only pass a zero floor
/// 4. verdict is whitelisted, when the whitelist is non-empty
///
/// AI match ids with no local record simply never match anything.
pub fn filter_records<'a>(
    records: &'a [ResumeRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a ResumeRecord> {
    let needle = criteria.search.to_lowercase();
    records
        .iter()
        .filter(|r| matches_search(r, &needle))
        .filter(|r| matches_ai(r, criteria))
        .filter(|r| matches_score_floor(r, criteria))
        .filter(|r| matches_verdict(r, criteria))
        .collect()
}

fn matches_search(record: &ResumeRecord, needle: &str) -> bool {
    needle.is_empty() || record.display_name.to_lowercase().contains(needle)
}

fn matches_ai(record: &ResumeRecord, criteria: &FilterCriteria) -> bool {
    match &criteria.ai_match_ids {
        None => true,
        Some(ids) => ids.contains(&record.id),
    }
}

fn matches_score_floor(record: &ResumeRecord, criteria: &FilterCriteria) -> bool {
    match &record.evaluation {
        Evaluation::Scored(report) => report.overall_score >= criteria.min_score,
        Evaluation::Unscored => !criteria.has_score_floor(),
    }
}

fn matches_verdict(record: &ResumeRecord, criteria: &FilterCriteria) -> bool {
    if criteria.verdicts.is_empty() {
        return true;
    }
    match &record.evaluation {
        Evaluation::Scored(report) => criteria.verdicts.contains(&report.verdict),
        Evaluation::Unscored => false,
    }
}
