use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CampaignDraft, CampaignId};
use super::repository::CampaignRepository;
use super::service::{CampaignService, CampaignServiceError};
use crate::storage::RepositoryError;

/// Router builder exposing campaign CRUD, donor joins, and the grouped
/// board view.
pub fn campaign_router<R>(service: Arc<CampaignService<R>>) -> Router
where
    R: CampaignRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/campaigns",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route("/api/v1/campaigns/board", get(board_handler::<R>))
        .route("/api/v1/campaigns/:campaign_id", get(get_handler::<R>))
        .route(
            "/api/v1/campaigns/:campaign_id/join",
            post(join_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateRequest {
    #[serde(flatten)]
    draft: CampaignDraft,
    /// Creation instant override; defaults to now. Tests inject it so the
    /// stamped status stays deterministic.
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<CampaignService<R>>>,
    axum::Json(payload): axum::Json<CreateRequest>,
) -> Response
where
    R: CampaignRepository + 'static,
{
    let now = payload.created_at.unwrap_or_else(Utc::now);

    match service.create(payload.draft, now) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(CampaignServiceError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    hospital_id: Option<String>,
    /// Reference instant for the derived status; defaults to now.
    #[serde(default)]
    at: Option<DateTime<Utc>>,
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<CampaignService<R>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: CampaignRepository + 'static,
{
    let now = query.at.unwrap_or_else(Utc::now);
    let result = match query.hospital_id.as_deref() {
        Some(hospital_id) => service.list_for_hospital(hospital_id, now),
        None => service.list(now),
    };

    match result {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AtQuery {
    #[serde(default)]
    at: Option<DateTime<Utc>>,
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<CampaignService<R>>>,
    Path(campaign_id): Path<String>,
    Query(query): Query<AtQuery>,
) -> Response
where
    R: CampaignRepository + 'static,
{
    let id = CampaignId(campaign_id);
    let now = query.at.unwrap_or_else(Utc::now);

    match service.get(&id, now) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn join_handler<R>(
    State(service): State<Arc<CampaignService<R>>>,
    Path(campaign_id): Path<String>,
    Query(query): Query<AtQuery>,
) -> Response
where
    R: CampaignRepository + 'static,
{
    let id = CampaignId(campaign_id);
    let now = query.at.unwrap_or_else(Utc::now);

    match service.join(&id, now) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn board_handler<R>(
    State(service): State<Arc<CampaignService<R>>>,
    Query(query): Query<AtQuery>,
) -> Response
where
    R: CampaignRepository + 'static,
{
    let now = query.at.unwrap_or_else(Utc::now);

    match service.board(now) {
        Ok(board) => (StatusCode::OK, axum::Json(board)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: CampaignServiceError) -> Response {
    let status = match &error {
        CampaignServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CampaignServiceError::NotActive { .. } | CampaignServiceError::CapacityReached { .. } => {
            StatusCode::CONFLICT
        }
        CampaignServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
