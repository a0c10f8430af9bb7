//! Sort Strategy: picks a comparator from `SortMode` and applies a stable sort.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::ResumeRecord;

/// Default split between technical and soft skills for the composite mode.
pub const DEFAULT_TECHNICAL_WEIGHT: u8 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    /// Most recently received first.
    #[default]
    #[serde(rename = "newest")]
    Recency,
    #[serde(rename = "score-desc")]
    ScoreDesc,
    #[serde(rename = "name-asc")]
    NameAsc,
    /// Descending by `w * avg(technical) + (100 - w) * avg(soft)`.
    #[serde(rename = "weighted")]
    WeightedComposite,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Recency => "newest",
            SortMode::ScoreDesc => "score-desc",
            SortMode::NameAsc => "name-asc",
            SortMode::WeightedComposite => "weighted",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "newest" | "recency" => Ok(SortMode::Recency),
            "score-desc" => Ok(SortMode::ScoreDesc),
            "name-asc" => Ok(SortMode::NameAsc),
            "weighted" | "weighted-composite" => Ok(SortMode::WeightedComposite),
            other => Err(format!("unknown sort mode '{other}'")),
        }
    }
}

/// Sorts in place. `slice::sort_by` is stable, so ties keep their input order.
pub fn sort_records(records: &mut [&ResumeRecord], mode: SortMode, technical_weight: u8) {
    match mode {
        SortMode::Recency => {
            records.sort_by(|a, b| b.received_instant().cmp(&a.received_instant()));
        }
        SortMode::ScoreDesc => {
            records.sort_by(|a, b| b.score_or_zero().total_cmp(&a.score_or_zero()));
        }
        SortMode::NameAsc => {
            records.sort_by(|a, b| locale_cmp(&a.display_name, &b.display_name));
        }
        SortMode::WeightedComposite => {
            records.sort_by(|a, b| {
                composite_score(b, technical_weight).total_cmp(&composite_score(a, technical_weight))
            });
        }
    }
}

/// Composite score of a record; unscored records score 0.
pub fn composite_score(record: &ResumeRecord, technical_weight: u8) -> f64 {
    record
        .report()
        .map(|r| r.weighted_composite(technical_weight))
        .unwrap_or(0.0)
}

/// Case-insensitive ordering close to `localeCompare`: punctuation and
/// whitespace sort before digits, digits before letters. Names differing only
/// by case put lowercase first.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(collation_key)
        .cmp(b.chars().map(collation_key))
        .then_with(|| b.cmp(a))
}

fn collation_key(c: char) -> (u8, char) {
    let class = if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    };
    (class, c.to_lowercase().next().unwrap_or(c))
}
