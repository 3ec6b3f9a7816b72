use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{BloodBagDraft, BloodBagId};
use super::repository::BloodBagRepository;
use super::service::{InventoryService, InventoryServiceError};
use crate::storage::RepositoryError;

/// Router builder exposing bag intake, lifecycle transitions, and the
/// stock summary.
pub fn inventory_router<R>(service: Arc<InventoryService<R>>) -> Router
where
    R: BloodBagRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/inventory/bags",
            get(list_handler::<R>).post(register_handler::<R>),
        )
        .route(
            "/api/v1/inventory/bags/:bag_id/reserve",
            post(reserve_handler::<R>),
        )
        .route(
            "/api/v1/inventory/bags/:bag_id/use",
            post(use_handler::<R>),
        )
        .route("/api/v1/inventory/stock", get(stock_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    #[serde(flatten)]
    draft: BloodBagDraft,
    /// Intake date override; defaults to today.
    #[serde(default)]
    registered_on: Option<NaiveDate>,
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<InventoryService<R>>>,
    axum::Json(payload): axum::Json<RegisterRequest>,
) -> Response
where
    R: BloodBagRepository + 'static,
{
    let today = payload
        .registered_on
        .unwrap_or_else(|| Local::now().date_naive());

    match service.register(payload.draft, today) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error @ InventoryServiceError::EmptyBag)
        | Err(error @ InventoryServiceError::FutureCollection { .. }) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct InventoryQuery {
    #[serde(default)]
    hospital_id: Option<String>,
    /// Reference date for the expiry overlay; defaults to today.
    #[serde(default)]
    on: Option<NaiveDate>,
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<InventoryService<R>>>,
    Query(query): Query<InventoryQuery>,
) -> Response
where
    R: BloodBagRepository + 'static,
{
    let today = query.on.unwrap_or_else(|| Local::now().date_naive());

    match service.list(query.hospital_id.as_deref(), today) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OnQuery {
    #[serde(default)]
    on: Option<NaiveDate>,
}

pub(crate) async fn reserve_handler<R>(
    State(service): State<Arc<InventoryService<R>>>,
    Path(bag_id): Path<String>,
    Query(query): Query<OnQuery>,
) -> Response
where
    R: BloodBagRepository + 'static,
{
    let id = BloodBagId(bag_id);
    let today = query.on.unwrap_or_else(|| Local::now().date_naive());

    match service.reserve(&id, today) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn use_handler<R>(
    State(service): State<Arc<InventoryService<R>>>,
    Path(bag_id): Path<String>,
    Query(query): Query<OnQuery>,
) -> Response
where
    R: BloodBagRepository + 'static,
{
    let id = BloodBagId(bag_id);
    let today = query.on.unwrap_or_else(|| Local::now().date_naive());

    match service.mark_used(&id, today) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stock_handler<R>(
    State(service): State<Arc<InventoryService<R>>>,
    Query(query): Query<OnQuery>,
) -> Response
where
    R: BloodBagRepository + 'static,
{
    let today = query.on.unwrap_or_else(|| Local::now().date_naive());

    match service.stock_summary(today) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: InventoryServiceError) -> Response {
    let status = match &error {
        InventoryServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        InventoryServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,
        InventoryServiceError::EmptyBag | InventoryServiceError::FutureCollection { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::inventory::domain::BloodBag;

    #[derive(Default)]
    struct MemoryBags {
        records: Mutex<HashMap<BloodBagId, BloodBag>>,
    }

    impl BloodBagRepository for MemoryBags {
        fn insert(&self, bag: BloodBag) -> Result<BloodBag, RepositoryError> {
            let mut guard = self.records.lock().expect("bag mutex poisoned");
            if guard.contains_key(&bag.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(bag.id.clone(), bag.clone());
            Ok(bag)
        }

        fn update(&self, bag: BloodBag) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("bag mutex poisoned");
            guard.insert(bag.id.clone(), bag);
            Ok(())
        }

        fn fetch(&self, id: &BloodBagId) -> Result<Option<BloodBag>, RepositoryError> {
            let guard = self.records.lock().expect("bag mutex poisoned");
            Ok(guard.get(id).cloned())
        }

        fn all(&self) -> Result<Vec<BloodBag>, RepositoryError> {
            let guard = self.records.lock().expect("bag mutex poisoned");
            Ok(guard.values().cloned().collect())
        }
    }

    fn router() -> axum::Router {
        inventory_router(Arc::new(InventoryService::new(Arc::new(
            MemoryBags::default(),
        ))))
    }

    fn register_payload(volume_ml: u32) -> Value {
        json!({
            "blood_type": "O+",
            "hospital_id": "hosp-001",
            "volume_ml": volume_ml,
            "collected_on": "2025-06-01",
            "registered_on": "2025-06-01"
        })
    }

    async fn post_json(router: axum::Router, uri: &str, payload: &Value) -> Response {
        router
            .oneshot(
                axum::http::Request::post(uri)
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(
                        serde_json::to_vec(payload).unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .expect("route executes")
    }

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn register_route_creates_bags() {
        let response = post_json(router(), "/api/v1/inventory/bags", &register_payload(450)).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json_body(response).await;
        assert_eq!(body["status"], "available");
        assert_eq!(body["expiry_date"], "2025-07-13");
        assert!(body.get("id").is_some());
    }

    #[tokio::test]
    async fn register_route_rejects_empty_bags() {
        let response = post_json(router(), "/api/v1/inventory/bags", &register_payload(0)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json_body(response).await;
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("greater than zero"));
    }

    #[tokio::test]
    async fn reserve_route_returns_conflict_for_held_bags() {
        let router = router();
        let created = post_json(
            router.clone(),
            "/api/v1/inventory/bags",
            &register_payload(450),
        )
        .await;
        let body = read_json_body(created).await;
        let bag_id = body["id"].as_str().expect("bag id").to_string();

        let uri = format!("/api/v1/inventory/bags/{bag_id}/reserve?on=2025-06-01");
        let first = post_json(router.clone(), &uri, &json!({})).await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = post_json(router, &uri, &json!({})).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body = read_json_body(second).await;
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("reserved"));
    }

    #[tokio::test]
    async fn reserve_route_returns_not_found_for_unknown_bags() {
        let response = post_json(
            router(),
            "/api/v1/inventory/bags/bag-unseen/reserve?on=2025-06-01",
            &json!({}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn stock_route_covers_every_blood_type() {
        let router = router();
        post_json(
            router.clone(),
            "/api/v1/inventory/bags",
            &register_payload(450),
        )
        .await;

        let response = router
            .oneshot(
                axum::http::Request::get("/api/v1/inventory/stock?on=2025-06-01")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        let by_type = body["by_type"].as_array().expect("array body");
        assert_eq!(by_type.len(), 8);
        let o_positive = by_type
            .iter()
            .find(|stock| stock["blood_type"] == "O+")
            .expect("type present");
        assert_eq!(o_positive["available"], 1);
        assert_eq!(o_positive["level"], "low");
    }
}
