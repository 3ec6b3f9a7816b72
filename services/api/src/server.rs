use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use hemolink::campaign::CampaignService;
use hemolink::config::AppConfig;
use hemolink::donation::DonationService;
use hemolink::error::AppError;
use hemolink::inventory::InventoryService;
use hemolink::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{
    eligibility_policy, AppState, InMemoryBloodBagRepository, InMemoryCampaignRepository,
    InMemoryDonationRepository, InMemoryNotificationPublisher,
};
use crate::routes::with_api_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let donation_service = Arc::new(DonationService::new(
        Arc::new(InMemoryDonationRepository::default()),
        Arc::new(InMemoryNotificationPublisher::default()),
        eligibility_policy(&config.eligibility),
    ));
    let campaign_service = Arc::new(CampaignService::new(Arc::new(
        InMemoryCampaignRepository::default(),
    )));
    let inventory_service = Arc::new(InventoryService::new(Arc::new(
        InMemoryBloodBagRepository::default(),
    )));

    let app = with_api_routes(donation_service, campaign_service, inventory_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "blood donation coordinator ready");

    axum::serve(listener, app).await?;
    Ok(())
}
