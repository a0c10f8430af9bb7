//! Axum route handlers for the review API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::job::{current_posting, JobPosting};
use crate::models::record::TIMESTAMP_FORMAT;
use crate::models::{ResumeRecord, ScoreBand};
use crate::review::ai_search::{run_search, SearchOutcome};
use crate::review::criteria::{parse_technical_weight, CriteriaUpdate};
use crate::review::selection::{comparison_rows, ComparisonRow};
use crate::review::sort::SortMode;
use crate::review::view::{ListView, ViewAction};
use crate::state::AppState;
use crate::store::seed::generated_report;

/// Progress step per tick of a simulated task.
const PROGRESS_STEP: u8 = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TaskStatus {
    pub uploading: bool,
    pub upload_progress: u8,
    pub scoring: bool,
    pub ai_searching: bool,
    pub ai_search_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    #[serde(flatten)]
    pub list: ListView,
    pub tasks: TaskStatus,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub mode: Option<String>,
    pub technical_weight: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SkillInsight {
    pub name: String,
    pub percentage: f64,
    pub band: ScoreBand,
}

#[derive(Debug, Serialize)]
pub struct ReportInsights {
    pub overall_band: ScoreBand,
    pub technical_average: f64,
    pub soft_average: f64,
    pub has_github: bool,
    pub skills: Vec<SkillInsight>,
}

#[derive(Debug, Serialize)]
pub struct ResumeDetailResponse {
    pub record: ResumeRecord,
    pub insights: Option<ReportInsights>,
}

#[derive(Debug, Serialize)]
pub struct UploadStatusResponse {
    pub in_progress: bool,
    pub progress: u8,
}

#[derive(Debug, Serialize)]
pub struct UploadStartedResponse {
    pub task_id: String,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStatus {
    Started,
    AlreadyScored,
    InProgress,
    NoActiveRecord,
}

#[derive(Debug, Serialize)]
pub struct ScoringResponse {
    pub status: ScoringStatus,
    pub record_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AiSearchRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AiSearchStatus {
    Matched,
    Cleared,
    Failed,
    Cancelled,
}

#[derive(Debug, Serialize)]
pub struct AiSearchResponse {
    pub status: AiSearchStatus,
    pub ai_filter_active: bool,
    pub match_count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    pub selected: usize,
    pub rows: Vec<ComparisonRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn task_status(state: &AppState) -> TaskStatus {
    TaskStatus {
        uploading: state.tasks.upload.is_busy(),
        upload_progress: state.tasks.upload.progress(),
        scoring: state.tasks.scoring.is_busy(),
        ai_searching: state.tasks.ai_search.is_busy(),
        ai_search_enabled: state.oracle.is_some(),
    }
}

fn view_response(state: &AppState, list: ListView) -> Json<ViewResponse> {
    Json(ViewResponse {
        list,
        tasks: task_status(state),
    })
}

fn dispatch_view(state: &AppState, action: ViewAction) -> Result<Json<ViewResponse>, AppError> {
    let snapshot = state.dispatch(action)?;
    Ok(view_response(state, snapshot.list_view()))
}

fn comparison_response(state: &AppState) -> Json<ComparisonResponse> {
    let snapshot = state.snapshot();
    Json(ComparisonResponse {
        selected: snapshot.comparison.len(),
        rows: comparison_rows(&snapshot.comparison, snapshot.store.records()),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/job
pub async fn handle_get_job() -> Json<JobPosting> {
    Json(current_posting())
}

/// GET /api/v1/view
///
/// Current page of the candidate list: filter → sort → paginate.
pub async fn handle_get_view(State(state): State<AppState>) -> Json<ViewResponse> {
    view_response(&state, state.snapshot().list_view())
}

/// PATCH /api/v1/view/criteria
///
/// Malformed fields are ignored; the rest of the update still applies.
pub async fn handle_update_criteria(
    State(state): State<AppState>,
    Json(update): Json<CriteriaUpdate>,
) -> Result<Json<ViewResponse>, AppError> {
    dispatch_view(&state, ViewAction::UpdateCriteria(update))
}

/// PUT /api/v1/view/sort
pub async fn handle_set_sort(
    State(state): State<AppState>,
    Json(request): Json<SortRequest>,
) -> Result<Json<ViewResponse>, AppError> {
    let mode = request.mode.and_then(|raw| match raw.parse::<SortMode>() {
        Ok(mode) => Some(mode),
        Err(e) => {
            warn!("Ignoring sort mode: {e}");
            None
        }
    });
    let technical_weight = request
        .technical_weight
        .and_then(|raw| match parse_technical_weight(&raw) {
            Ok(weight) => Some(weight),
            Err(e) => {
                warn!("Ignoring technical weight: {e}");
                None
            }
        });

    if mode.is_none() && technical_weight.is_none() {
        return Ok(view_response(&state, state.snapshot().list_view()));
    }

    dispatch_view(
        &state,
        ViewAction::SetSort {
            mode,
            technical_weight,
        },
    )
}

/// PUT /api/v1/view/page/:n
pub async fn handle_go_to_page(
    State(state): State<AppState>,
    Path(page): Path<usize>,
) -> Result<Json<ViewResponse>, AppError> {
    dispatch_view(&state, ViewAction::GoToPage(page))
}

/// POST /api/v1/view/page/next
pub async fn handle_next_page(State(state): State<AppState>) -> Result<Json<ViewResponse>, AppError> {
    dispatch_view(&state, ViewAction::NextPage)
}

/// POST /api/v1/view/page/prev
pub async fn handle_prev_page(State(state): State<AppState>) -> Result<Json<ViewResponse>, AppError> {
    dispatch_view(&state, ViewAction::PrevPage)
}

/// PUT /api/v1/view/active/:id
pub async fn handle_select(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ViewResponse>, AppError> {
    dispatch_view(&state, ViewAction::Select(id))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResumeDetailResponse>, AppError> {
    let snapshot = state.snapshot();
    let record = snapshot
        .store
        .get(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    let insights = record.report().map(|report| ReportInsights {
        overall_band: ScoreBand::for_overall(report.overall_score),
        technical_average: report.technical_average(),
        soft_average: report.soft_average(),
        has_github: report.has_github(),
        skills: report
            .technical_skills
            .iter()
            .chain(report.soft_skills.iter())
            .map(|skill| SkillInsight {
                name: skill.name.clone(),
                percentage: skill.percentage(),
                band: skill.band(),
            })
            .collect(),
    });

    Ok(Json(ResumeDetailResponse { record, insights }))
}

/// POST /api/v1/uploads
///
/// Starts a simulated upload. The record lands after the configured delay,
/// becomes the active record and the list snaps back to recency order.
pub async fn handle_start_upload(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<UploadStartedResponse>), AppError> {
    let handle = state.tasks.upload.try_begin()?;
    let task_id = handle.id().to_string();
    info!(%task_id, "Upload started");

    let worker = state.clone();
    tokio::spawn(async move {
        let config = &worker.config;
        if let Err(e) = handle
            .simulate(config.upload_delay, config.progress_tick, PROGRESS_STEP)
            .await
        {
            info!(task = handle.name(), task_id = %handle.id(), "Stopped: {e}");
            return;
        }

        let received_at = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        match worker.dispatch(ViewAction::UploadLanded { received_at }) {
            Ok(snapshot) => info!(
                task_id = %handle.id(),
                record_id = snapshot.active_id.as_deref().unwrap_or_default(),
                "Upload landed"
            ),
            Err(e) => warn!(task_id = %handle.id(), "Upload could not be stored: {e}"),
        }
        drop(handle);
    });

    Ok((StatusCode::ACCEPTED, Json(UploadStartedResponse { task_id })))
}

/// GET /api/v1/uploads
pub async fn handle_upload_status(State(state): State<AppState>) -> Json<UploadStatusResponse> {
    Json(UploadStatusResponse {
        in_progress: state.tasks.upload.is_busy(),
        progress: state.tasks.upload.progress(),
    })
}

/// DELETE /api/v1/uploads
pub async fn handle_cancel_upload(State(state): State<AppState>) -> Json<CancelResponse> {
    Json(CancelResponse {
        cancelled: state.tasks.upload.cancel(),
    })
}

/// POST /api/v1/scoring
///
/// Scores the active record. A no-op when it already has a report or a
/// scoring run is in flight.
pub async fn handle_start_scoring(
    State(state): State<AppState>,
) -> (StatusCode, Json<ScoringResponse>) {
    let snapshot = state.snapshot();
    let Some(record) = snapshot.active_record() else {
        return (
            StatusCode::OK,
            Json(ScoringResponse {
                status: ScoringStatus::NoActiveRecord,
                record_id: None,
            }),
        );
    };
    let record_id = record.id.clone();

    if record.evaluation.is_scored() {
        return (
            StatusCode::OK,
            Json(ScoringResponse {
                status: ScoringStatus::AlreadyScored,
                record_id: Some(record_id),
            }),
        );
    }

    let Ok(handle) = state.tasks.scoring.try_begin() else {
        return (
            StatusCode::OK,
            Json(ScoringResponse {
                status: ScoringStatus::InProgress,
                record_id: Some(record_id),
            }),
        );
    };

    info!(task_id = %handle.id(), %record_id, "Scoring started");
    let worker = state.clone();
    let id = record_id.clone();
    tokio::spawn(async move {
        let config = &worker.config;
        if let Err(e) = handle
            .simulate(config.scoring_delay, config.progress_tick, PROGRESS_STEP)
            .await
        {
            info!(task = handle.name(), task_id = %handle.id(), "Stopped: {e}");
            return;
        }

        let report = {
            let snapshot = worker.snapshot();
            let Some(record) = snapshot.store.get(&id) else {
                warn!(record_id = %id, "Scored record disappeared");
                return;
            };
            generated_report(record, &mut *worker.rng.lock())
        };

        match worker.dispatch(ViewAction::ReportAttached {
            id: id.clone(),
            report,
        }) {
            Ok(_) => info!(task_id = %handle.id(), record_id = %id, "Scoring finished"),
            Err(e) => warn!(task_id = %handle.id(), "Report not attached: {e}"),
        }
        drop(handle);
    });

    (
        StatusCode::ACCEPTED,
        Json(ScoringResponse {
            status: ScoringStatus::Started,
            record_id: Some(record_id),
        }),
    )
}

/// POST /api/v1/ai-search
///
/// Free-text search through the language model. A blank query cancels any
/// outstanding search and switches the AI filter off. Failures are logged and
/// leave the previous filter in place.
pub async fn handle_ai_search(
    State(state): State<AppState>,
    Json(request): Json<AiSearchRequest>,
) -> Result<Json<AiSearchResponse>, AppError> {
    let oracle = state
        .oracle
        .clone()
        .ok_or_else(|| AppError::NotImplemented("AI search is not enabled".to_string()))?;

    let snapshot = state.snapshot();
    let outcome = run_search(
        oracle.as_ref(),
        &state.tasks.ai_search,
        &request.query,
        snapshot.store.records(),
        |ids| {
            if let Err(e) = state.dispatch(ViewAction::SetAiMatches(ids)) {
                warn!("AI filter not applied: {e}");
            }
        },
    )
    .await?;

    let (status, match_count) = match outcome {
        SearchOutcome::Matched(ids) => (AiSearchStatus::Matched, Some(ids.len())),
        SearchOutcome::Cleared => (AiSearchStatus::Cleared, None),
        SearchOutcome::Failed => (AiSearchStatus::Failed, None),
        SearchOutcome::Cancelled => (AiSearchStatus::Cancelled, None),
    };

    Ok(Json(AiSearchResponse {
        status,
        ai_filter_active: state.snapshot().criteria.ai_match_ids.is_some(),
        match_count,
    }))
}

/// DELETE /api/v1/ai-search
///
/// Cancels an outstanding search and switches the AI filter off.
pub async fn handle_clear_ai_search(
    State(state): State<AppState>,
) -> Result<Json<ViewResponse>, AppError> {
    let (cancelled, snapshot) = state
        .tasks
        .ai_search
        .cancel_with(|| state.dispatch(ViewAction::SetAiMatches(None)));
    if cancelled {
        info!("AI search cancelled");
    }
    Ok(view_response(&state, snapshot?.list_view()))
}

/// GET /api/v1/comparison
pub async fn handle_get_comparison(State(state): State<AppState>) -> Json<ComparisonResponse> {
    comparison_response(&state)
}

/// POST /api/v1/comparison/:id
pub async fn handle_toggle_comparison(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ComparisonResponse>, AppError> {
    state.dispatch(ViewAction::ToggleComparison(id))?;
    Ok(comparison_response(&state))
}

/// DELETE /api/v1/comparison
pub async fn handle_clear_comparison(
    State(state): State<AppState>,
) -> Result<Json<ComparisonResponse>, AppError> {
    state.dispatch(ViewAction::ClearComparison)?;
    Ok(comparison_response(&state))
}
