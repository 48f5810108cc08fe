use crate::cli::ServeArgs;
use crate::infra::{AppState, MemoryStores};
use crate::routes::{application_routes, with_operational_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use dealer_desk::admin::StaticTokenVerifier;
use dealer_desk::config::AppConfig;
use dealer_desk::error::AppError;
use dealer_desk::images::LocalImageStore;
use dealer_desk::notifications::{transport_from_config, DispatchQueue, NotificationRelay};
use dealer_desk::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    if config.notification.resend_api_key.is_none() {
        warn!("RESEND_API_KEY not set; operator notifications will only be logged");
    }
    let transport = transport_from_config(&config.notification)?;
    let relay = NotificationRelay::from_config(&config.notification, transport);
    let (outbox, _worker) = DispatchQueue::spawn(relay);

    if config.admin.api_token.is_none() {
        warn!("ADMIN_API_TOKEN not set; admin routes will reject every request");
    }
    let verifier = StaticTokenVerifier::from_config(&config.admin);
    let images = LocalImageStore::from_config(&config.images);

    let stores = MemoryStores::default();
    let app = with_operational_routes(application_routes(
        &stores,
        Arc::new(outbox),
        Arc::new(images),
        Arc::new(verifier),
        &config.admin.login_path,
    ))
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "dealership backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
