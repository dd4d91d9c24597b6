use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::report::{ReportId, ReportSubmission};
use super::scheduler::DashboardPublisher;
use super::service::{TriageService, TriageServiceError};
use super::store::{ReportStore, StoreError};

struct RouterState<S> {
    service: Arc<TriageService<S>>,
    publisher: DashboardPublisher,
}

impl<S> Clone for RouterState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// Router builder exposing HTTP endpoints for intake and the dashboard.
pub fn triage_router<S>(
    service: Arc<TriageService<S>>,
    publisher: DashboardPublisher,
) -> Router
where
    S: ReportStore + 'static,
{
    let state = RouterState { service, publisher };
    Router::new()
        .route("/api/v1/reports", post(submit_handler::<S>))
        .route(
            "/api/v1/reports/:report_id/score",
            get(score_handler::<S>),
        )
        .route("/api/v1/dashboard/areas", get(dashboard_handler::<S>))
        .with_state(state)
}

async fn submit_handler<S>(
    State(state): State<RouterState<S>>,
    axum::Json(submission): axum::Json<ReportSubmission>,
) -> Response
where
    S: ReportStore + 'static,
{
    match state.service.submit(submission) {
        Ok(record) => {
            let receipt = record.receipt();
            (StatusCode::ACCEPTED, axum::Json(receipt)).into_response()
        }
        Err(TriageServiceError::Store(StoreError::Conflict)) => {
            let payload = json!({
                "error": "report already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(TriageServiceError::Store(StoreError::Unavailable(reason))) => {
            let payload = json!({
                "error": format!("store unavailable: {reason}"),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}

async fn score_handler<S>(
    State(state): State<RouterState<S>>,
    Path(report_id): Path<String>,
) -> Response
where
    S: ReportStore + 'static,
{
    let id = ReportId(report_id);
    match state.service.score_trail(&id) {
        Ok(Some((record, breakdown))) => {
            let payload = json!({
                "report_id": record.id.0,
                "priority_score": record.priority_score,
                "recorded_at": record.recorded_at,
                "components": breakdown.components,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(None) => {
            let payload = json!({
                "error": format!("report {} not found", id.0),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

async fn dashboard_handler<S>(State(state): State<RouterState<S>>) -> Response
where
    S: ReportStore + 'static,
{
    let snapshot = state.publisher.snapshot();
    (StatusCode::OK, axum::Json(snapshot)).into_response()
}
