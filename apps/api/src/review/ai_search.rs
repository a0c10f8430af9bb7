//! AI Search Adapter: delegates free-text candidate matching to an
//! external language model.
//!
//! The oracle is pluggable (`CandidateOracle`), like the fit scorer in the
//! generation pipeline: `AppState` carries an `Option<Arc<dyn CandidateOracle>>`
//! and the AI search endpoints are disabled when it is `None`.
//!
//! Answers are untrusted and non-deterministic. Returned ids are kept as-is;
//! the filter pipeline ignores ids with no local record.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::{Evaluation, ResumeRecord};
use crate::review::prompts::{AI_SEARCH_PROMPT_TEMPLATE, AI_SEARCH_ROLE, AI_SEARCH_SCHEMA};
use crate::tasks::{TaskError, TaskSlot};

#[derive(Debug, Error)]
pub enum RemoteQueryError {
    #[error("language model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("could not encode candidates: {0}")]
    Encode(serde_json::Error),

    #[error("search was cancelled")]
    Cancelled,
}

/// Compact view of one scored candidate sent to the oracle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateProjection {
    pub id: String,
    pub name: String,
    pub score: f64,
    pub verdict: String,
    pub summary: String,
}

/// Expected oracle answer.
#[derive(Debug, Deserialize)]
pub struct MatchResponse {
    #[serde(rename = "matchIds", alias = "match_ids")]
    pub match_ids: Vec<String>,
}

/// Projects every scored record; unscored records have nothing to match on.
pub fn project_candidates(records: &[ResumeRecord]) -> Vec<CandidateProjection> {
    records
        .iter()
        .filter_map(|record| match &record.evaluation {
            Evaluation::Scored(report) => Some(CandidateProjection {
                id: record.id.clone(),
                name: report.candidate_name.clone(),
                score: report.overall_score,
                verdict: report.verdict.label().to_string(),
                summary: report.summary.clone(),
            }),
            Evaluation::Unscored => None,
        })
        .collect()
}

#[async_trait]
pub trait CandidateOracle: Send + Sync {
    /// Ids of the candidates matching `query`.
    async fn find_matches(
        &self,
        query: &str,
        candidates: &[CandidateProjection],
    ) -> Result<Vec<String>, RemoteQueryError>;
}

/// Oracle backed by the Anthropic Messages API.
pub struct LlmCandidateOracle(pub LlmClient);

#[async_trait]
impl CandidateOracle for LlmCandidateOracle {
    async fn find_matches(
        &self,
        query: &str,
        candidates: &[CandidateProjection],
    ) -> Result<Vec<String>, RemoteQueryError> {
        let prompt = build_search_prompt(query, candidates)?;
        let system = format!("{AI_SEARCH_ROLE} {JSON_ONLY_SYSTEM} {AI_SEARCH_SCHEMA}");
        let response: MatchResponse = self.0.call_json(&prompt, &system).await?;
        Ok(response.match_ids)
    }
}

pub fn build_search_prompt(
    query: &str,
    candidates: &[CandidateProjection],
) -> Result<String, RemoteQueryError> {
    let candidates_json =
        serde_json::to_string_pretty(candidates).map_err(RemoteQueryError::Encode)?;
    Ok(AI_SEARCH_PROMPT_TEMPLATE
        .replace("{query}", query.trim())
        .replace("{candidates}", &candidates_json))
}

/// How a search ended. The AI filter has already been published through the
/// caller's callback for `Cleared` and `Matched`.
#[derive(Debug, PartialEq)]
pub enum SearchOutcome {
    /// Blank query: the AI filter was switched off.
    Cleared,
    /// The list was restricted to these ids.
    Matched(HashSet<String>),
    /// The oracle failed; the previous AI filter stays.
    Failed,
    /// A clear or cancel arrived first; the answer was dropped.
    Cancelled,
}

/// Runs one AI search behind `slot`'s busy gate and hands the resulting AI
/// filter to `publish`.
///
/// A blank query cancels any outstanding search and publishes `None` in the
/// same step, so a late answer can never overwrite the clear. Matches are
/// published only if the search was not cancelled in the meantime.
///
/// Fails only with `TaskError::Busy` when a search is already outstanding.
/// Oracle failures are logged and reported as `SearchOutcome::Failed`; the
/// gate is released on every path.
pub async fn run_search<F>(
    oracle: &dyn CandidateOracle,
    slot: &TaskSlot,
    query: &str,
    records: &[ResumeRecord],
    publish: F,
) -> Result<SearchOutcome, TaskError>
where
    F: FnOnce(Option<HashSet<String>>),
{
    if query.trim().is_empty() {
        let (superseded, ()) = slot.cancel_with(|| publish(None));
        if superseded {
            info!("Outstanding AI search cancelled by clear");
        }
        return Ok(SearchOutcome::Cleared);
    }

    let handle = slot.try_begin()?;
    let candidates = project_candidates(records);
    info!(
        task_id = %handle.id(),
        candidates = candidates.len(),
        "AI search started"
    );

    let result = tokio::select! {
        _ = handle.cancelled() => Err(RemoteQueryError::Cancelled),
        result = oracle.find_matches(query, &candidates) => result,
    };

    match result {
        Ok(ids) => {
            let matched: HashSet<String> = ids.into_iter().collect();
            let unknown = matched
                .iter()
                .filter(|id| !records.iter().any(|r| &r.id == *id))
                .count();
            if unknown > 0 {
                debug!(unknown, "AI search returned ids with no local record");
            }
            let published = matched.clone();
            match handle.commit(move || publish(Some(published))) {
                Some(()) => {
                    info!(task_id = %handle.id(), matches = matched.len(), "AI search finished");
                    Ok(SearchOutcome::Matched(matched))
                }
                None => {
                    info!(task_id = %handle.id(), "AI search answer dropped after cancel");
                    Ok(SearchOutcome::Cancelled)
                }
            }
        }
        Err(RemoteQueryError::Cancelled) => {
            info!(task_id = %handle.id(), "AI search cancelled");
            Ok(SearchOutcome::Cancelled)
        }
        Err(e) => {
            warn!(task_id = %handle.id(), "AI search failed, keeping previous filter: {e}");
            Ok(SearchOutcome::Failed)
        }
    }
}
