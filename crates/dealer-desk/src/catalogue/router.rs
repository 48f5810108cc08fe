use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{ListingFilter, ListingId};
use super::repository::ListingRepository;
use super::service::ListingService;

/// Public, read-only catalogue routes.
pub fn catalogue_router<L>(service: ListingService<L>) -> Router
where
    L: ListingRepository + 'static,
{
    Router::new()
        .route("/api/v1/listings", get(list_handler::<L>))
        .route("/api/v1/listings/:listing_id", get(detail_handler::<L>))
        .with_state(service)
}

pub(crate) async fn list_handler<L>(
    State(service): State<ListingService<L>>,
    Query(filter): Query<ListingFilter>,
) -> Response
where
    L: ListingRepository + 'static,
{
    match service.list(&filter) {
        Ok(listings) => (StatusCode::OK, axum::Json(listings)).into_response(),
        Err(err) => {
            error!(error = %err, "catalogue listing failed");
            unavailable()
        }
    }
}

pub(crate) async fn detail_handler<L>(
    State(service): State<ListingService<L>>,
    Path(listing_id): Path<String>,
) -> Response
where
    L: ListingRepository + 'static,
{
    match service.get(&ListingId(listing_id)) {
        Ok(Some(listing)) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "listing not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "catalogue lookup failed");
            unavailable()
        }
    }
}

fn unavailable() -> Response {
    let payload = json!({ "error": "catalogue temporarily unavailable" });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{ListingDraft, ListingStatus};
    use crate::store::MemoryListingRepository;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn service() -> ListingService<MemoryListingRepository> {
        ListingService::new(Arc::new(MemoryListingRepository::default()))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn listings_can_be_filtered_by_status() {
        let service = service();
        for (title, status) in [
            ("Hymer Exsis", ListingStatus::Available),
            ("Bürstner Lyseo", ListingStatus::Sold),
        ] {
            service
                .create(ListingDraft {
                    title: Some(title.to_string()),
                    status: Some(status),
                    ..ListingDraft::default()
                })
                .expect("listing created");
        }

        let response = catalogue_router(service)
            .oneshot(get("/api/v1/listings?status=sold"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let listings: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(listings.as_array().map(Vec::len), Some(1));
        assert_eq!(listings[0]["title"], "Bürstner Lyseo");
    }

    #[tokio::test]
    async fn unknown_listing_is_not_found() {
        let response = catalogue_router(service())
            .oneshot(get("/api/v1/listings/missing"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
