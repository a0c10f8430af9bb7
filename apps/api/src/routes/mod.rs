pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::review::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/job", get(handlers::handle_get_job))
        // Candidate list
        .route("/api/v1/view", get(handlers::handle_get_view))
        .route(
            "/api/v1/view/criteria",
            patch(handlers::handle_update_criteria),
        )
        .route("/api/v1/view/sort", put(handlers::handle_set_sort))
        .route("/api/v1/view/page/next", post(handlers::handle_next_page))
        .route("/api/v1/view/page/prev", post(handlers::handle_prev_page))
        .route("/api/v1/view/page/:n", put(handlers::handle_go_to_page))
        .route("/api/v1/view/active/:id", put(handlers::handle_select))
        .route("/api/v1/resumes/:id", get(handlers::handle_get_resume))
        // Simulated long-running tasks
        .route(
            "/api/v1/uploads",
            post(handlers::handle_start_upload)
                .get(handlers::handle_upload_status)
                .delete(handlers::handle_cancel_upload),
        )
        .route("/api/v1/scoring", post(handlers::handle_start_scoring))
        .route(
            "/api/v1/ai-search",
            post(handlers::handle_ai_search).delete(handlers::handle_clear_ai_search),
        )
        // Comparison
        .route(
            "/api/v1/comparison",
            get(handlers::handle_get_comparison).delete(handlers::handle_clear_comparison),
        )
        .route(
            "/api/v1/comparison/:id",
            post(handlers::handle_toggle_comparison),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::review::ai_search::{CandidateOracle, CandidateProjection, RemoteQueryError};

    struct FixedOracle(Vec<&'static str>);

    #[async_trait]
    impl CandidateOracle for FixedOracle {
        async fn find_matches(
            &self,
            _query: &str,
            _candidates: &[CandidateProjection],
        ) -> Result<Vec<String>, RemoteQueryError> {
            Ok(self.0.iter().map(|id| id.to_string()).collect())
        }
    }

    struct SlowOracle;

    #[async_trait]
    impl CandidateOracle for SlowOracle {
        async fn find_matches(
            &self,
            _query: &str,
            _candidates: &[CandidateProjection],
        ) -> Result<Vec<String>, RemoteQueryError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec!["1".to_string()])
        }
    }

    fn app(oracle: Option<Arc<dyn CandidateOracle>>) -> Router {
        build_router(AppState::new(Config::default(), oracle))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(None), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_initial_view() {
        let (status, body) = send(&app(None), Method::GET, "/api/v1/view", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().unwrap().len(), 8);
        assert_eq!(body["page"], 1);
        assert_eq!(body["total_pages"], 6);
        assert_eq!(body["total_items"], 42);
        assert_eq!(body["has_prev"], false);
        assert_eq!(body["sort_mode"], "newest");
        assert_eq!(body["active_id"], "1");
        assert_eq!(body["tasks"]["ai_search_enabled"], false);
    }

    #[tokio::test]
    async fn test_criteria_update_filters_and_resets_page() {
        let app = app(None);
        send(&app, Method::PUT, "/api/v1/view/page/3", None).await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/v1/view/criteria",
            Some(json!({ "search": "priya" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"], 1);
        assert_eq!(body["total_items"], 1);
        assert_eq!(body["items"][0]["id"], "1");
    }

    #[tokio::test]
    async fn test_malformed_score_floor_is_ignored() {
        let app = app(None);
        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/v1/view/criteria",
            Some(json!({ "min_score": "abc", "search": "Candidate_2" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["criteria"]["min_score"], 0.0);
        assert_eq!(body["criteria"]["search"], "Candidate_2");
    }

    #[tokio::test]
    async fn test_page_requests_are_clamped() {
        let app = app(None);
        let (_, body) = send(&app, Method::PUT, "/api/v1/view/page/99", None).await;
        assert_eq!(body["page"], 6);
        assert_eq!(body["has_next"], false);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);

        let (_, body) = send(&app, Method::POST, "/api/v1/view/page/next", None).await;
        assert_eq!(body["page"], 6);

        let (_, body) = send(&app, Method::POST, "/api/v1/view/page/prev", None).await;
        assert_eq!(body["page"], 5);
    }

    #[tokio::test]
    async fn test_score_sort_marks_best_candidate() {
        let app = app(None);
        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/view/sort",
            Some(json!({ "mode": "score-desc" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sort_mode"], "score-desc");
        assert_eq!(body["items"][0]["badge"], "best");
    }

    #[tokio::test]
    async fn test_unknown_sort_mode_is_ignored() {
        let app = app(None);
        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/view/sort",
            Some(json!({ "mode": "shuffle" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sort_mode"], "newest");
    }

    #[tokio::test]
    async fn test_unknown_resume_is_not_found() {
        let app = app(None);
        let (status, body) = send(&app, Method::GET, "/api/v1/resumes/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (status, _) = send(&app, Method::PUT, "/api/v1/view/active/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_resume_detail_includes_insights_when_scored() {
        let app = app(None);
        let (_, body) = send(&app, Method::GET, "/api/v1/resumes/1", None).await;
        assert_eq!(body["record"]["evaluation"]["status"], "scored");
        assert_eq!(body["insights"]["overall_band"], "high");
        assert_eq!(body["insights"]["has_github"], false);

        let (_, body) = send(&app, Method::GET, "/api/v1/resumes/2", None).await;
        assert_eq!(body["record"]["evaluation"]["status"], "unscored");
        assert!(body["insights"].is_null());
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_lands_after_delay() {
        let app = app(None);
        send(&app, Method::PUT, "/api/v1/view/page/4", None).await;

        let (status, _) = send(&app, Method::POST, "/api/v1/uploads", None).await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let (status, body) = send(&app, Method::POST, "/api/v1/uploads", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "BUSY");

        tokio::time::sleep(Duration::from_millis(2500)).await;

        let (_, body) = send(&app, Method::GET, "/api/v1/view", None).await;
        assert_eq!(body["total_items"], 43);
        assert_eq!(body["page"], 1);
        assert_eq!(body["active_id"], "43");
        assert_eq!(body["items"][0]["display_name"], "Newly_Added_Resume_43.pdf");
        assert_eq!(body["items"][0]["badge"], "new");
        assert_eq!(body["tasks"]["uploading"], false);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_upload_adds_nothing() {
        let app = app(None);
        send(&app, Method::POST, "/api/v1/uploads", None).await;
        tokio::time::sleep(Duration::from_millis(500)).await;

        let (_, body) = send(&app, Method::DELETE, "/api/v1/uploads", None).await;
        assert_eq!(body["cancelled"], true);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        let (_, body) = send(&app, Method::GET, "/api/v1/view", None).await;
        assert_eq!(body["total_items"], 42);
        assert_eq!(body["tasks"]["uploading"], false);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scoring_attaches_report_to_active_record() {
        let app = app(None);

        let (_, body) = send(&app, Method::POST, "/api/v1/scoring", None).await;
        assert_eq!(body["status"], "already_scored");

        send(&app, Method::PUT, "/api/v1/view/active/2", None).await;
        let (status, body) = send(&app, Method::POST, "/api/v1/scoring", None).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["status"], "started");

        let (_, body) = send(&app, Method::POST, "/api/v1/scoring", None).await;
        assert_eq!(body["status"], "in_progress");

        tokio::time::sleep(Duration::from_millis(2000)).await;

        let (_, body) = send(&app, Method::GET, "/api/v1/resumes/2", None).await;
        assert_eq!(body["record"]["evaluation"]["status"], "scored");
        assert_eq!(
            body["record"]["evaluation"]["report"]["candidate_name"],
            "Resume_Candidate_2"
        );
    }

    #[tokio::test]
    async fn test_ai_search_without_oracle_is_not_implemented() {
        let (status, body) = send(
            &app(None),
            Method::POST,
            "/api/v1/ai-search",
            Some(json!({ "query": "agile" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body["error"]["code"], "NOT_IMPLEMENTED");
    }

    #[tokio::test]
    async fn test_ai_search_restricts_view_until_cleared() {
        let app = app(Some(Arc::new(FixedOracle(vec!["1", "4", "404"]))));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/ai-search",
            Some(json!({ "query": "agile product owners" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "matched");
        assert_eq!(body["ai_filter_active"], true);

        let (_, body) = send(&app, Method::GET, "/api/v1/view", None).await;
        assert_eq!(body["total_items"], 2);

        let (_, body) = send(&app, Method::DELETE, "/api/v1/ai-search", None).await;
        assert_eq!(body["ai_filter_active"], false);
        assert_eq!(body["total_items"], 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_during_search_wins_over_late_answer() {
        let app = app(Some(Arc::new(SlowOracle)));
        let first = {
            let app = app.clone();
            tokio::spawn(async move {
                send(&app, Method::POST, "/api/v1/ai-search", Some(json!({ "query": "agile" }))).await
            })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/ai-search",
            Some(json!({ "query": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "cleared");
        assert_eq!(body["ai_filter_active"], false);

        let (status, body) = first.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "cancelled");
        assert_eq!(body["ai_filter_active"], false);

        let (_, body) = send(&app, Method::GET, "/api/v1/view", None).await;
        assert_eq!(body["ai_filter_active"], false);
        assert_eq!(body["total_items"], 42);
        assert_eq!(body["tasks"]["ai_searching"], false);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_endpoint_during_search_wins_over_late_answer() {
        let app = app(Some(Arc::new(SlowOracle)));
        let first = {
            let app = app.clone();
            tokio::spawn(async move {
                send(&app, Method::POST, "/api/v1/ai-search", Some(json!({ "query": "agile" }))).await
            })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        let (status, body) = send(&app, Method::DELETE, "/api/v1/ai-search", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ai_filter_active"], false);

        let (_, body) = first.await.unwrap();
        assert_eq!(body["status"], "cancelled");

        let (_, body) = send(&app, Method::GET, "/api/v1/view", None).await;
        assert_eq!(body["ai_filter_active"], false);
        assert_eq!(body["total_items"], 42);
    }

    #[tokio::test]
    async fn test_comparison_toggle_and_clear() {
        let app = app(None);
        send(&app, Method::POST, "/api/v1/comparison/1", None).await;
        let (_, body) = send(&app, Method::POST, "/api/v1/comparison/4", None).await;
        assert_eq!(body["selected"], 2);
        assert_eq!(body["rows"].as_array().unwrap().len(), 2);

        let (_, body) = send(&app, Method::POST, "/api/v1/comparison/4", None).await;
        assert_eq!(body["selected"], 1);

        let (status, _) = send(&app, Method::POST, "/api/v1/comparison/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&app, Method::DELETE, "/api/v1/comparison", None).await;
        assert_eq!(body["selected"], 0);
        assert!(body["rows"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_job_posting() {
        let (status, body) = send(&app(None), Method::GET, "/api/v1/job", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["criteria"].as_array().unwrap().len(), 5);
    }
}
