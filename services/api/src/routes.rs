use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use hemolink::campaign::{campaign_router, CampaignRepository, CampaignService};
use hemolink::donation::{
    donation_router, Deduction, DonationRequestRepository, DonationService, EligibilityAnswers,
    EligibilityEvaluator, EligibilityPolicy, NotificationPublisher,
};
use hemolink::inventory::{inventory_router, BloodBagRepository, InventoryService};

use crate::infra::{deserialize_optional_date, AppState};

/// Compose the module routers with the operational endpoints.
pub(crate) fn with_api_routes<DR, N, CR, BR>(
    donations: Arc<DonationService<DR, N>>,
    campaigns: Arc<CampaignService<CR>>,
    inventory: Arc<InventoryService<BR>>,
) -> axum::Router
where
    DR: DonationRequestRepository + 'static,
    N: NotificationPublisher + 'static,
    CR: CampaignRepository + 'static,
    BR: BloodBagRepository + 'static,
{
    donation_router(donations)
        .merge(campaign_router(campaigns))
        .merge(inventory_router(inventory))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/eligibility/check",
            axum::routing::post(eligibility_check_endpoint),
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

/// Stateless pre-check donors run before submitting the questionnaire.
/// Nothing is stored; it scores the answers and echoes the audit trail.
#[derive(Debug, Deserialize)]
pub(crate) struct EligibilityCheckRequest {
    pub(crate) answers: EligibilityAnswers,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EligibilityCheckResponse {
    pub(crate) score: i32,
    pub(crate) eligible: bool,
    pub(crate) rationale: String,
    pub(crate) deductions: Vec<Deduction>,
    pub(crate) today: NaiveDate,
}

pub(crate) async fn eligibility_check_endpoint(
    Json(payload): Json<EligibilityCheckRequest>,
) -> Json<EligibilityCheckResponse> {
    let today = payload.today.unwrap_or_else(|| Local::now().date_naive());
    let evaluator = EligibilityEvaluator::new(EligibilityPolicy::default());
    let result = evaluator.evaluate(&payload.answers, today);

    Json(EligibilityCheckResponse {
        score: result.score,
        eligible: result.eligible,
        rationale: result.rationale(),
        deductions: result.deductions,
        today,
    })
}
