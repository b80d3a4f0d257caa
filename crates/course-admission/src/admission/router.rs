use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::domain::{CourseId, ParticipantId};
use super::repository::{CourseDataSource, RepositoryError};
use super::service::{AdmissionService, AdmissionServiceError};

/// Router builder exposing admission status and points overview endpoints.
pub fn admission_router<S>(service: Arc<AdmissionService<S>>) -> Router
where
    S: CourseDataSource + 'static,
{
    Router::new()
        .route(
            "/api/v1/courses/:course_id/admission-status",
            get(admission_status_handler::<S>),
        )
        .route(
            "/api/v1/courses/:course_id/admission-status/:participant_id",
            get(participant_admission_handler::<S>),
        )
        .route(
            "/api/v1/courses/:course_id/admission-status/:participant_id/breakdown",
            get(participant_breakdown_handler::<S>),
        )
        .route(
            "/api/v1/courses/:course_id/points-overview",
            get(points_overview_handler::<S>),
        )
        .route(
            "/api/v1/courses/:course_id/points-overview/:participant_id",
            get(participant_points_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn admission_status_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
    Path(course_id): Path<String>,
) -> Response
where
    S: CourseDataSource + 'static,
{
    match service.compute_admission_status_for_all(&CourseId(course_id)) {
        Ok(statuses) => (StatusCode::OK, axum::Json(statuses)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn participant_admission_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
    Path((course_id, participant_id)): Path<(String, String)>,
) -> Response
where
    S: CourseDataSource + 'static,
{
    match service.compute_admission_status_for_one(
        &CourseId(course_id),
        &ParticipantId(participant_id),
    ) {
        Ok(status) => (StatusCode::OK, axum::Json(status)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn participant_breakdown_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
    Path((course_id, participant_id)): Path<(String, String)>,
) -> Response
where
    S: CourseDataSource + 'static,
{
    match service.compute_assignment_breakdown_for_one(
        &CourseId(course_id),
        &ParticipantId(participant_id),
    ) {
        Ok(breakdowns) => (StatusCode::OK, axum::Json(breakdowns)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn points_overview_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
    Path(course_id): Path<String>,
) -> Response
where
    S: CourseDataSource + 'static,
{
    match service.compute_points_overview(&CourseId(course_id)) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn participant_points_handler<S>(
    State(service): State<Arc<AdmissionService<S>>>,
    Path((course_id, participant_id)): Path<(String, String)>,
) -> Response
where
    S: CourseDataSource + 'static,
{
    match service
        .compute_points_overview_for_one(&CourseId(course_id), &ParticipantId(participant_id))
    {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AdmissionServiceError) -> Response {
    let status = match &error {
        AdmissionServiceError::Configuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AdmissionServiceError::Repository(RepositoryError::CourseNotFound(_))
        | AdmissionServiceError::Repository(RepositoryError::ParticipantNotFound { .. }) => {
            StatusCode::NOT_FOUND
        }
        AdmissionServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
