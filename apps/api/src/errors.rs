use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;
use crate::tasks::TaskError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Busy: {0}")]
    Busy(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownRecord(id) => AppError::NotFound(format!("Resume {id} not found")),
            StoreError::AlreadyScored(id) => {
                AppError::Internal(anyhow::anyhow!("Resume {id} already has a report"))
            }
        }
    }
}

impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Busy(name) => AppError::Busy(format!("{name} is already in progress")),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Busy(msg) => (StatusCode::CONFLICT, "BUSY", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::NotImplemented(msg) => {
                (StatusCode::NOT_IMPLEMENTED, "NOT_IMPLEMENTED", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_task_maps_to_conflict() {
        let response = AppError::from(TaskError::Busy("upload")).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_store_errors_map_to_status() {
        let missing = AppError::from(StoreError::UnknownRecord("9".to_string())).into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let scored = AppError::from(StoreError::AlreadyScored("1".to_string())).into_response();
        assert_eq!(scored.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
