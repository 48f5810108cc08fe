use crate::infra::{AppState, MemoryStores};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json, Router};
use dealer_desk::admin::{admin_router, AdminState, SessionVerifier};
use dealer_desk::catalogue::catalogue_router;
use dealer_desk::images::ImageStore;
use dealer_desk::inquiries::{inquiry_router, InquiryIntakeService};
use dealer_desk::notifications::NotificationOutbox;
use dealer_desk::seo::seo_router;
use serde_json::json;
use std::sync::Arc;

/// Everything the dealership site talks to, minus the operational endpoints.
pub(crate) fn application_routes(
    stores: &MemoryStores,
    outbox: Arc<dyn NotificationOutbox>,
    images: Arc<dyn ImageStore>,
    verifier: Arc<dyn SessionVerifier>,
    login_path: &str,
) -> Router {
    let intake = Arc::new(InquiryIntakeService::new(
        stores.inquiries.clone(),
        stores.listings.clone(),
        outbox,
    ));
    let admin = AdminState::new(stores.admin_backend(images), verifier, login_path);

    Router::new()
        .merge(catalogue_router(stores.listing_service()))
        .merge(inquiry_router(intake))
        .merge(seo_router(stores.seo_service()))
        .merge(admin_router(admin))
}

pub(crate) fn with_operational_routes(app: Router) -> Router {
    app.route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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
