//! Record Store: ordered, immutable snapshots of resume records.
//!
//! Every mutation returns a new `RecordStore`; readers holding an older
//! snapshot never observe a half-applied change.

pub mod seed;

use std::sync::Arc;

use thiserror::Error;

use crate::models::{EvaluationReport, ResumeRecord};

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("unknown record {0}")]
    UnknownRecord(String),

    #[error("record {0} already has a report")]
    AlreadyScored(String),
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Arc<[ResumeRecord]>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl RecordStore {
    pub fn new(records: Vec<ResumeRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[ResumeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, id: &str) -> Option<&ResumeRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Next id to assign. Records are never deleted, so `len + 1` is never reused.
    pub fn next_id(&self) -> String {
        (self.records.len() + 1).to_string()
    }

    /// Snapshot with `record` placed at the front.
    pub fn with_prepended(&self, record: ResumeRecord) -> Self {
        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.push(record);
        records.extend(self.records.iter().cloned());
        Self::new(records)
    }

    /// Snapshot with `report` attached to record `id`. A report is attached exactly once.
    pub fn with_report(&self, id: &str, report: EvaluationReport) -> Result<Self, StoreError> {
        let current = self
            .get(id)
            .ok_or_else(|| StoreError::UnknownRecord(id.to_string()))?;
        if current.evaluation.is_scored() {
            return Err(StoreError::AlreadyScored(id.to_string()));
        }

        let records = self
            .records
            .iter()
            .map(|r| {
                if r.id == id {
                    r.clone().with_report(report.clone())
                } else {
                    r.clone()
                }
            })
            .collect();
        Ok(Self::new(records))
    }
}
