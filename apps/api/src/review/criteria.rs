//! Filter criteria and the lenient parsing of user-supplied filter input.
//!
//! Malformed input never fails a request: the offending field is dropped
//! (previous value kept) and a warning is logged.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::Verdict;

pub const MIN_SCORE_FLOOR: f64 = 0.0;
pub const MAX_SCORE_FLOOR: f64 = 100.0;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("expected a number, got {0}")]
    NotNumeric(String),

    #[error("'{0}' is not a filterable verdict")]
    UnknownVerdict(String),
}

/// Ephemeral filter state. `ai_match_ids == None` means the AI filter is off.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterCriteria {
    pub search: String,
    pub min_score: f64,
    /// Empty set places no restriction.
    pub verdicts: BTreeSet<Verdict>,
    pub ai_match_ids: Option<HashSet<String>>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: String::new(),
            min_score: MIN_SCORE_FLOOR,
            verdicts: BTreeSet::new(),
            ai_match_ids: None,
        }
    }
}

impl FilterCriteria {
    pub fn has_score_floor(&self) -> bool {
        self.min_score > MIN_SCORE_FLOOR
    }
}

/// Partial update of the user-editable criteria. Absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
pub struct CriteriaUpdate {
    pub search: Option<String>,
    /// Raw JSON so that strings and garbage reach the lenient parser.
    pub min_score: Option<Value>,
    pub verdicts: Option<Vec<String>>,
}

impl CriteriaUpdate {
    /// Applies the update on top of `current`, skipping fields that fail validation.
    pub fn apply_to(self, current: &FilterCriteria) -> FilterCriteria {
        let mut next = current.clone();

        if let Some(search) = self.search {
            next.search = search;
        }

        if let Some(raw) = self.min_score {
            match parse_score_floor(&raw) {
                Ok(floor) => next.min_score = floor,
                Err(e) => warn!("Ignoring min_score update: {e}"),
            }
        }

        if let Some(labels) = self.verdicts {
            next.verdicts = labels
                .into_iter()
                .filter_map(|label| match parse_filter_verdict(&label) {
                    Ok(verdict) => Some(verdict),
                    Err(e) => {
                        warn!("Ignoring verdict filter entry: {e}");
                        None
                    }
                })
                .collect();
        }

        next
    }
}

/// Parses a score floor from a number or numeric string, clamped to 0–100.
pub fn parse_score_floor(raw: &Value) -> Result<f64, ValidationError> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(MIN_SCORE_FLOOR),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null => Some(MIN_SCORE_FLOOR),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v.clamp(MIN_SCORE_FLOOR, MAX_SCORE_FLOOR)),
        _ => Err(ValidationError::NotNumeric(raw.to_string())),
    }
}

/// Parses a technical weight (0–100) from a number or numeric string, clamped.
pub fn parse_technical_weight(raw: &Value) -> Result<u8, ValidationError> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v.round().clamp(0.0, 100.0) as u8),
        _ => Err(ValidationError::NotNumeric(raw.to_string())),
    }
}

/// Only the three labels the filter offers are accepted.
pub fn parse_filter_verdict(label: &str) -> Result<Verdict, ValidationError> {
    let verdict = Verdict::from(label);
    if Verdict::FILTERABLE.contains(&verdict) {
        Ok(verdict)
    } else {
        Err(ValidationError::UnknownVerdict(label.to_string()))
    }
}
