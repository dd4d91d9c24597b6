use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryReportStore};
use crate::routes::with_triage_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use relief_triage::config::AppConfig;
use relief_triage::error::AppError;
use relief_triage::telemetry;
use relief_triage::triage::{AggregationScheduler, DashboardPublisher, TriageService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(interval) = args.refresh_interval_ms.take() {
        config.aggregation.refresh_interval_ms = interval;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryReportStore::default());
    let service = Arc::new(TriageService::new(store.clone()));
    let publisher = DashboardPublisher::default();

    let scheduler = AggregationScheduler::new(
        store,
        publisher.clone(),
        config.aggregation.refresh_interval(),
    );
    tokio::spawn(scheduler.run());

    let app = with_triage_routes(service, publisher)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        refresh_interval_ms = config.aggregation.refresh_interval_ms,
        "relief triage service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
