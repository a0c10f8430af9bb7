//! Review state: the whole UI state as one immutable snapshot.
//!
//! `ReviewState::apply` is a reducer: it never mutates `self`, it returns the
//! next snapshot. Derived views (filtered, sorted, paginated lists) are
//! recomputed in full from a snapshot on every read.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::{EvaluationReport, ResumeRecord, ScoreBand, Verdict};
use crate::review::criteria::{CriteriaUpdate, FilterCriteria};
use crate::review::filter::filter_records;
use crate::review::paginate::{clamp_page, paginate, total_pages, Page};
use crate::review::selection::ComparisonSet;
use crate::review::sort::{sort_records, SortMode, DEFAULT_TECHNICAL_WEIGHT};
use crate::store::seed::uploaded_record;
use crate::store::{RecordStore, StoreError};

/// Number of leading page-1 slots eligible for the `new` badge.
const NEW_BADGE_SLOTS: usize = 3;

#[derive(Debug, Clone)]
pub struct ReviewState {
    pub store: RecordStore,
    pub criteria: FilterCriteria,
    pub sort_mode: SortMode,
    pub technical_weight: u8,
    pub page: usize,
    pub page_size: usize,
    pub comparison: ComparisonSet,
    pub active_id: Option<String>,
}

/// Every transition the review screen supports.
#[derive(Debug)]
pub enum ViewAction {
    UpdateCriteria(CriteriaUpdate),
    SetAiMatches(Option<HashSet<String>>),
    SetSort {
        mode: Option<SortMode>,
        technical_weight: Option<u8>,
    },
    GoToPage(usize),
    NextPage,
    PrevPage,
    Select(String),
    ToggleComparison(String),
    ClearComparison,
    /// A simulated upload finished; the record gets the next free id.
    UploadLanded { received_at: String },
    ReportAttached {
        id: String,
        report: EvaluationReport,
    },
}

impl ReviewState {
    /// Fresh state over `store`; the first record starts active.
    pub fn new(store: RecordStore, page_size: usize) -> Self {
        let active_id = store.records().first().map(|r| r.id.clone());
        Self {
            store,
            criteria: FilterCriteria::default(),
            sort_mode: SortMode::default(),
            technical_weight: DEFAULT_TECHNICAL_WEIGHT,
            page: 1,
            page_size: page_size.max(1),
            comparison: ComparisonSet::default(),
            active_id,
        }
    }

    /// Next snapshot after `action`. Any change to criteria or sort resets to page 1.
    pub fn apply(&self, action: ViewAction) -> Result<Self, StoreError> {
        let mut next = self.clone();
        match action {
            ViewAction::UpdateCriteria(update) => {
                next.criteria = update.apply_to(&self.criteria);
                next.page = 1;
            }
            ViewAction::SetAiMatches(ids) => {
                next.criteria.ai_match_ids = ids;
                next.page = 1;
            }
            ViewAction::SetSort {
                mode,
                technical_weight,
            } => {
                if let Some(mode) = mode {
                    next.sort_mode = mode;
                }
                if let Some(weight) = technical_weight {
                    next.technical_weight = weight.min(100);
                }
                next.page = 1;
            }
            ViewAction::GoToPage(page) => {
                next.page = clamp_page(page, self.total_pages());
            }
            ViewAction::NextPage => {
                next.page = clamp_page(self.page.saturating_add(1), self.total_pages());
            }
            ViewAction::PrevPage => {
                next.page = clamp_page(self.page.saturating_sub(1), self.total_pages());
            }
            ViewAction::Select(id) => {
                self.require(&id)?;
                next.active_id = Some(id);
            }
            ViewAction::ToggleComparison(id) => {
                self.require(&id)?;
                next.comparison = self.comparison.toggled(&id);
            }
            ViewAction::ClearComparison => {
                next.comparison = self.comparison.cleared();
            }
            ViewAction::UploadLanded { received_at } => {
                let record = uploaded_record(self.store.next_id(), received_at);
                next.active_id = Some(record.id.clone());
                next.store = self.store.with_prepended(record);
                next.sort_mode = SortMode::Recency;
                next.page = 1;
            }
            ViewAction::ReportAttached { id, report } => {
                next.store = self.store.with_report(&id, report)?;
            }
        }
        Ok(next)
    }

    fn require(&self, id: &str) -> Result<(), StoreError> {
        if self.store.contains(id) {
            Ok(())
        } else {
            Err(StoreError::UnknownRecord(id.to_string()))
        }
    }

    pub fn active_record(&self) -> Option<&ResumeRecord> {
        self.active_id.as_deref().and_then(|id| self.store.get(id))
    }

    /// Filtered then sorted records.
    pub fn processed(&self) -> Vec<&ResumeRecord> {
        let mut records = filter_records(self.store.records(), &self.criteria);
        sort_records(&mut records, self.sort_mode, self.technical_weight);
        records
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.processed().len(), self.page_size)
    }

    /// The current page as the candidate list shows it.
    pub fn list_view(&self) -> ListView {
        let processed = self.processed();
        let page = paginate(&processed, self.page_size, self.page);
        let on_first_page = self.page == 1;

        let items: Vec<ListItem> = page
            .items
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let badge = badge_for(record, idx, on_first_page, self.sort_mode);
                ListItem::new(record, badge, self)
            })
            .collect();

        let page = Page {
            items,
            page: page.page,
            total_pages: page.total_pages,
            total_items: page.total_items,
        };

        ListView {
            has_prev: page.has_prev(),
            has_next: page.has_next(),
            page,
            sort_mode: self.sort_mode,
            technical_weight: self.technical_weight,
            criteria: self.criteria.clone(),
            ai_filter_active: self.criteria.ai_match_ids.is_some(),
            active_id: self.active_id.clone(),
            comparison_count: self.comparison.len(),
            comparison_visible: self.comparison.is_visible(self.store.records()),
        }
    }
}

fn badge_for(record: &ResumeRecord, idx: usize, on_first_page: bool, mode: SortMode) -> Option<Badge> {
    if !on_first_page {
        return None;
    }
    let scored = record.evaluation.is_scored();
    if idx == 0 && mode == SortMode::ScoreDesc && scored {
        Some(Badge::Best)
    } else if !scored && idx < NEW_BADGE_SLOTS {
        Some(Badge::New)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Best,
    New,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListItem {
    pub id: String,
    pub display_name: String,
    pub received_at: String,
    pub scored: bool,
    pub overall_score: Option<f64>,
    pub score_band: Option<ScoreBand>,
    pub verdict: Option<Verdict>,
    pub badge: Option<Badge>,
    pub active: bool,
    pub in_comparison: bool,
}

impl ListItem {
    fn new(record: &ResumeRecord, badge: Option<Badge>, state: &ReviewState) -> Self {
        let report = record.report();
        Self {
            id: record.id.clone(),
            display_name: record.display_name.clone(),
            received_at: record.received_at.clone(),
            scored: report.is_some(),
            overall_score: report.map(|r| r.overall_score),
            score_band: report.map(|r| ScoreBand::for_overall(r.overall_score)),
            verdict: report.map(|r| r.verdict.clone()),
            badge,
            active: state.active_id.as_deref() == Some(record.id.as_str()),
            in_comparison: state.comparison.contains(&record.id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    #[serde(flatten)]
    pub page: Page<ListItem>,
    pub has_prev: bool,
    pub has_next: bool,
    pub sort_mode: SortMode,
    pub technical_weight: u8,
    pub criteria: FilterCriteria,
    pub ai_filter_active: bool,
    pub active_id: Option<String>,
    pub comparison_count: usize,
    pub comparison_visible: bool,
}
