use crate::infra::AppState;
use axum::body::Bytes;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use course_admission::admission::{
    admission_router, AdmissionEngine, AdmissionService, AdmissionStatus, CourseDataSource,
    CourseId, CourseRecord, PointsOverview,
};
use course_admission::error::AppError;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Ad-hoc evaluation of a course snapshot posted in the request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EvaluationResponse {
    pub(crate) course: CourseId,
    pub(crate) admission: Vec<AdmissionStatus>,
    pub(crate) points_overview: PointsOverview,
}

pub(crate) fn with_admission_routes<S>(service: Arc<AdmissionService<S>>) -> axum::Router
where
    S: CourseDataSource + 'static,
{
    admission_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/admission/evaluate",
            axum::routing::post(evaluate_snapshot_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn evaluate_snapshot_endpoint(
    body: Bytes,
) -> Result<Json<EvaluationResponse>, AppError> {
    let course: CourseRecord = serde_json::from_slice(&body)?;
    let engine = AdmissionEngine::new(&course.admission_criteria, &course.assignments)?;
    let admission = engine.evaluate_all(&course.participants);
    let points_overview = PointsOverview::compute(&course.assignments, &course.participants);

    debug!(
        course = %course.id,
        participants = admission.len(),
        "evaluated posted course snapshot"
    );

    Ok(Json(EvaluationResponse {
        course: course.id,
        admission,
        points_overview,
    }))
}
