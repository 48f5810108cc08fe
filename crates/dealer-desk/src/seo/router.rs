use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::PageSlug;
use super::repository::SeoRepository;
use super::service::SeoService;

/// Page-supplied defaults used when no override is stored.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SeoFallbacks {
    title: Option<String>,
    description: Option<String>,
}

/// Public, read-only SEO resolution.
pub fn seo_router<S>(service: SeoService<S>) -> Router
where
    S: SeoRepository + 'static,
{
    Router::new()
        .route("/api/v1/seo/:slug", get(resolve_handler::<S>))
        .with_state(service)
}

pub(crate) async fn resolve_handler<S>(
    State(service): State<SeoService<S>>,
    Path(slug): Path<String>,
    Query(fallbacks): Query<SeoFallbacks>,
) -> Response
where
    S: SeoRepository + 'static,
{
    let slug = match slug.parse::<PageSlug>() {
        Ok(slug) => slug,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
    };

    match service.resolve(
        slug,
        fallbacks.title.as_deref(),
        fallbacks.description.as_deref(),
    ) {
        Ok(resolved) => (StatusCode::OK, axum::Json(resolved)).into_response(),
        Err(err) => {
            error!(slug = slug.label(), error = %err, "seo lookup failed");
            let payload = json!({ "error": "seo metadata temporarily unavailable" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
