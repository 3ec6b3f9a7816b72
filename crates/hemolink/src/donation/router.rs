use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    Appointment, AppointmentStatus, DonationRequestId, DonationRequestStatus, HospitalDecision,
    QuestionnaireSubmission,
};
use super::repository::{DonationRequestRepository, NotificationPublisher};
use super::service::{DonationService, DonationServiceError};
use crate::storage::RepositoryError;

/// Router builder exposing HTTP endpoints for intake, status, hospital
/// decisions, and appointment scheduling.
pub fn donation_router<R, N>(service: Arc<DonationService<R, N>>) -> Router
where
    R: DonationRequestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/donations", post(submit_handler::<R, N>))
        .route(
            "/api/v1/donations/pending",
            get(pending_handler::<R, N>),
        )
        .route(
            "/api/v1/donations/:request_id",
            get(status_handler::<R, N>),
        )
        .route(
            "/api/v1/donations/:request_id/decision",
            post(decision_handler::<R, N>),
        )
        .route(
            "/api/v1/donations/:request_id/appointment",
            post(appointment_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    #[serde(flatten)]
    submission: QuestionnaireSubmission,
    /// Evaluation date override; defaults to today. Tests inject it so the
    /// deferral check stays deterministic.
    #[serde(default)]
    submitted_on: Option<NaiveDate>,
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<DonationService<R, N>>>,
    axum::Json(payload): axum::Json<SubmitRequest>,
) -> Response
where
    R: DonationRequestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let today = payload
        .submitted_on
        .unwrap_or_else(|| Local::now().date_naive());

    match service.submit(payload.submission, today) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(DonationServiceError::Intake(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(DonationServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "donation request already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PendingQuery {
    #[serde(default = "default_pending_limit")]
    limit: usize,
}

fn default_pending_limit() -> usize {
    20
}

pub(crate) async fn pending_handler<R, N>(
    State(service): State<Arc<DonationService<R, N>>>,
    Query(query): Query<PendingQuery>,
) -> Response
where
    R: DonationRequestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.pending(query.limit) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<DonationService<R, N>>>,
    Path(request_id): Path<String>,
) -> Response
where
    R: DonationRequestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = DonationRequestId(request_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(DonationServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "request_id": id.0,
                "status": DonationRequestStatus::Pending.label(),
                "rationale": "pending evaluation",
                "score": serde_json::Value::Null,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn decision_handler<R, N>(
    State(service): State<Arc<DonationService<R, N>>>,
    Path(request_id): Path<String>,
    axum::Json(decision): axum::Json<HospitalDecision>,
) -> Response
where
    R: DonationRequestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = DonationRequestId(request_id);
    match service.decide(&id, decision) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppointmentRequest {
    date: NaiveDate,
    time: NaiveTime,
    #[serde(default = "default_duration_minutes")]
    duration_minutes: u32,
    #[serde(default)]
    room: Option<String>,
}

fn default_duration_minutes() -> u32 {
    45
}

pub(crate) async fn appointment_handler<R, N>(
    State(service): State<Arc<DonationService<R, N>>>,
    Path(request_id): Path<String>,
    axum::Json(payload): axum::Json<AppointmentRequest>,
) -> Response
where
    R: DonationRequestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let id = DonationRequestId(request_id);
    let appointment = Appointment {
        date: payload.date,
        time: payload.time,
        duration_minutes: payload.duration_minutes,
        room: payload.room,
        status: AppointmentStatus::Scheduled,
    };

    match service.schedule(&id, appointment) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: DonationServiceError) -> Response {
    let status = match &error {
        DonationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DonationServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
        DonationServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
